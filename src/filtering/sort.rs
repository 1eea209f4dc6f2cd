use indexmap::IndexSet;
use serde::Serialize;

use crate::config::{FilterConfiguration, SortDirection};
use crate::params::RawParameterMap;

/// Longest accepted `sort_by` value, in characters
pub const MAX_SORT_COLUMN_LENGTH: usize = 50;

/// Columns every resource may be sorted by
pub const IMPLICIT_SORTABLE_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Sort whitelist: filterable and searchable fields plus the implicit columns
#[must_use]
pub fn sortable_columns(config: &FilterConfiguration) -> IndexSet<String> {
    config
        .filterable_fields()
        .iter()
        .cloned()
        .chain(config.searchable_fields().iter().cloned())
        .chain(IMPLICIT_SORTABLE_COLUMNS.iter().map(ToString::to_string))
        .collect()
}

/// Effective ordering of a list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortInstruction {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSort {
    pub instruction: SortInstruction,
    /// Requested column that was not on the whitelist
    pub rejected_column: Option<String>,
}

/// Resolve `sort_by`/`sort_direction` against the whitelist.
///
/// Missing or empty `sort_by` selects the default column; a column outside
/// `sortable` does too, and is reported in `rejected_column`. An unknown
/// direction falls back to the configured default.
#[must_use]
pub fn parse_sorting(
    params: &RawParameterMap,
    config: &FilterConfiguration,
    sortable: &IndexSet<String>,
) -> ParsedSort {
    let requested = params
        .get("sort_by")
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|column| !column.is_empty());

    let (column, rejected_column) = match requested {
        None => (config.default_sort_column().to_string(), None),
        Some(column) if sortable.contains(column) => (column.to_string(), None),
        Some(column) => (
            config.default_sort_column().to_string(),
            Some(column.to_string()),
        ),
    };

    let direction = params
        .get("sort_direction")
        .and_then(|value| value.as_str())
        .and_then(SortDirection::parse)
        .unwrap_or_else(|| config.default_sort_direction());

    ParsedSort {
        instruction: SortInstruction { column, direction },
        rejected_column,
    }
}
