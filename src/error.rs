//! Structured error types for vgrid.
//!
//! Layout and navigation never fail: invalid column specs are normalized and
//! boundary moves are resolved by policy. Errors only surface at the host
//! boundary (configuration, JSON exchange, imperative handle misuse).

/// All errors that can surface from the grid's host-facing API.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Invalid grid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A position outside the current grid bounds.
    #[error("Position out of bounds: column {idx}, row {row_idx}")]
    PositionOutOfBounds { idx: usize, row_idx: isize },

    /// A column key or index that does not exist.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Catch-all for host-supplied string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
