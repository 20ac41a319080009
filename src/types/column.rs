use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Declarative column description supplied by the host.
///
/// The position of a column in the host's list is its original index; the
/// layout engine may reorder columns (frozen first) but keeps that index for
/// callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique key, also the field name in each row record
    pub key: String,
    /// Header label, passed through to the renderer
    #[serde(default)]
    pub name: String,
    /// Fixed width in pixels; `None` shares the remaining viewport width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Per-column minimum width; `None` uses the grid minimum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    /// Pinned to the left edge, outside the horizontal scroll region
    #[serde(default)]
    pub frozen: bool,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default)]
    pub sortable: bool,
    /// First header click sorts descending instead of ascending
    #[serde(default)]
    pub sort_descending_first: bool,
}

impl Column {
    /// Create an editable, resizable, auto-width column.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: String::new(),
            width: None,
            min_width: None,
            frozen: false,
            editable: true,
            resizable: true,
            sortable: false,
            sort_descending_first: false,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: f32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    #[must_use]
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// A column with its resolved geometry.
///
/// Serialized with the host's column nested under `column`, so its requested
/// `width` never collides with the resolved one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedColumn {
    pub column: Column,
    /// Index in calculated (frozen-first) order
    pub idx: usize,
    /// Index in the host-supplied order
    pub original_idx: usize,
    /// Resolved width in pixels
    pub width: f32,
    /// Left edge, cumulative sum of the preceding widths
    pub left: f32,
}

impl CalculatedColumn {
    pub fn key(&self) -> &str {
        &self.column.key
    }

    pub fn is_frozen(&self) -> bool {
        self.column.frozen
    }

    /// Right edge (`left + width`)
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::{compute_metrics, WidthOverrides};

    #[test]
    fn test_column_json_defaults() {
        let column: Column = serde_json::from_str(r#"{"key":"price","minWidth":40}"#).unwrap();
        assert_eq!(column.key, "price");
        assert_eq!(column.min_width, Some(40.0));
        assert!(column.editable);
        assert!(column.resizable);
        assert!(!column.frozen);
        assert_eq!(column.width, None);
    }

    #[test]
    fn test_calculated_column_nests_host_column() {
        let mut overrides = WidthOverrides::new();
        overrides.insert("a".to_string(), 150.0);
        let metrics = compute_metrics(
            &[Column::new("a").with_width(100.0)],
            80.0,
            400.0,
            &overrides,
        )
        .unwrap();

        let json = serde_json::to_string(&metrics.columns[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["width"], serde_json::json!(150.0));
        assert_eq!(value["column"]["width"], serde_json::json!(100.0));
        assert_eq!(value["column"]["key"], "a");
        assert_eq!(value["originalIdx"], 0);
        assert_eq!(value.as_object().unwrap().len(), 5);
    }
}
