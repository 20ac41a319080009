//! Grid configuration: layout constants and behavior toggles.
//!
//! Every field has a default, so hosts only pass what they override:
//!
//! ```
//! let config = vgrid::GridConfig::from_json(r#"{ "rowHeight": 28 }"#).unwrap();
//! assert_eq!(config.header_height(), 28.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::selection::CellNavigationMode;

/// Default data row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 35.0;

/// Default header filter row height in pixels
pub const DEFAULT_FILTER_ROW_HEIGHT: f32 = 45.0;

/// Default minimum column width in pixels
pub const DEFAULT_MIN_COLUMN_WIDTH: f32 = 80.0;

/// Extra columns materialized on each side of the visible range
pub const DEFAULT_COLUMN_OVERSCAN: usize = 1;

/// Extra rows materialized above and below the visible range
pub const DEFAULT_ROW_OVERSCAN: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub row_height: f32,
    /// Header row height; `None` uses `row_height`
    pub header_row_height: Option<f32>,
    pub filter_row_height: f32,
    /// Summary row height; `None` uses `row_height`
    pub summary_row_height: Option<f32>,
    pub min_column_width: f32,
    pub column_overscan: usize,
    pub row_overscan: usize,
    pub cell_navigation_mode: CellNavigationMode,
    /// When false, clicks and keys never select cells
    pub enable_cell_select: bool,
    /// Show the filter row under the header
    pub enable_header_filters: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            header_row_height: None,
            filter_row_height: DEFAULT_FILTER_ROW_HEIGHT,
            summary_row_height: None,
            min_column_width: DEFAULT_MIN_COLUMN_WIDTH,
            column_overscan: DEFAULT_COLUMN_OVERSCAN,
            row_overscan: DEFAULT_ROW_OVERSCAN,
            cell_navigation_mode: CellNavigationMode::None,
            enable_cell_select: true,
            enable_header_filters: false,
        }
    }
}

impl GridConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or non-positive sizes.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every size is a positive, finite pixel value.
    ///
    /// # Errors
    /// Returns [`GridError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("rowHeight", Some(self.row_height)),
            ("headerRowHeight", self.header_row_height),
            ("filterRowHeight", Some(self.filter_row_height)),
            ("summaryRowHeight", self.summary_row_height),
            ("minColumnWidth", Some(self.min_column_width)),
        ];
        for (name, value) in sizes {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(GridError::Config(format!(
                        "{name} must be a positive number, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn header_row_height(&self) -> f32 {
        self.header_row_height.unwrap_or(self.row_height)
    }

    pub fn summary_row_height(&self) -> f32 {
        self.summary_row_height.unwrap_or(self.row_height)
    }

    /// Height of everything above the body: header row plus the filter row
    /// when header filters are enabled.
    pub fn header_height(&self) -> f32 {
        if self.enable_header_filters {
            self.header_row_height() + self.filter_row_height
        } else {
            self.header_row_height()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.row_height, 35.0);
        assert_eq!(config.header_row_height(), 35.0);
        assert_eq!(config.filter_row_height, 45.0);
        assert_eq!(config.min_column_width, 80.0);
        assert_eq!(config.header_height(), 35.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            GridConfig::from_json(r#"{"rowHeight": 24, "cellNavigationMode": "LOOP"}"#).unwrap();
        assert_eq!(config.row_height, 24.0);
        assert_eq!(config.summary_row_height(), 24.0);
        assert_eq!(config.min_column_width, 80.0);
        assert_eq!(config.cell_navigation_mode, CellNavigationMode::Loop);
    }

    #[test]
    fn test_filters_extend_header() {
        let config = GridConfig {
            enable_header_filters: true,
            ..GridConfig::default()
        };
        assert_eq!(config.header_height(), 80.0);
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let err = GridConfig::from_json(r#"{"minColumnWidth": 0}"#).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
        assert!(err.to_string().contains("minColumnWidth"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GridConfig::from_json("{ rowHeight").unwrap_err();
        assert!(matches!(err, GridError::Json(_)));
    }
}
