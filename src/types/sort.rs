use serde::{Deserialize, Serialize};

use super::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

/// The column the host should sort rows by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortColumn {
    pub column_key: String,
    pub direction: SortDirection,
}

/// Next sort state after a header activation on `column`.
///
/// Cycles none → first direction → second direction → none, where the first
/// direction is descending only for columns that ask for it.
pub fn next_sort(current: Option<&SortColumn>, column: &Column) -> Option<SortColumn> {
    let (first, second) = if column.sort_descending_first {
        (SortDirection::Descending, SortDirection::Ascending)
    } else {
        (SortDirection::Ascending, SortDirection::Descending)
    };

    let direction = match current {
        Some(sort) if sort.column_key == column.key => {
            if sort.direction == first {
                Some(second)
            } else {
                None
            }
        }
        _ => Some(first),
    };

    direction.map(|direction| SortColumn {
        column_key: column.key.clone(),
        direction,
    })
}
