use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Reserved query parameters of a list endpoint.
///
/// Handlers read the raw query string (filters are resource-specific and
/// use bracket notation); this type documents the fixed parameters for
/// OpenAPI.
///
/// # Filtering
/// Any whitelisted field can be filtered:
/// - Equality: `status=active`
/// - Null checks: `discontinued_at=null`, `category_id=not_null`
/// - Ranges: `price[min]=100&price[max]=500`
/// - Sets: `status[]=active&status[]=pending`
/// - Date bounds: `created_at_from=2024-01-01&created_at_to=2024-06-30`
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct ListQueryParams {
    /// Case-insensitive substring search across the searchable fields.
    /// `%` and `_` match literally.
    #[param(example = "phone")]
    pub search: Option<String>,
    /// Column to sort by. Unknown columns fall back to the default sort.
    #[param(example = "created_at")]
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    #[param(example = "desc")]
    pub sort_direction: Option<String>,
    /// Page size (1 to the configured maximum)
    #[param(example = 15)]
    pub per_page: Option<u64>,
    /// 1-based page number
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Return every matching row. Only honoured for authorized callers;
    /// otherwise the default pagination applies.
    #[param(example = false)]
    pub all: Option<bool>,
}
