//! Response envelope for list endpoints.
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Retrieved 2 of 14 records",
//!   "data": [ ... ],
//!   "meta": {
//!     "search": "phone",
//!     "sort_by": "price",
//!     "sort_direction": "asc",
//!     "filters": { "status": "active" },
//!     "pagination": { "current_page": 1, "per_page": 2, "total": 14, "last_page": 7, "from": 1, "to": 2 }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::SortDirection;
use crate::core::ListPage;
use crate::filtering::Pagination;
use crate::params::ParamValue;
use crate::translator::TranslationResult;

/// Standard success envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

impl<T> ApiResponse<Vec<T>> {
    /// Wrap a fetched page together with what the translation applied.
    /// The sort reported is the one the page was fetched with.
    #[must_use]
    pub fn list(page: ListPage<T>, query: &TranslationResult) -> Self {
        let count = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
        let pagination = PageMeta::new(page.pagination, page.total, count);
        let total = pagination.as_ref().map(|meta| meta.total);

        Self {
            success: true,
            message: list_message(count, total),
            data: page.items,
            meta: Some(ListMeta {
                search: query.search_term.clone(),
                sort_by: page.sort.column,
                sort_direction: page.sort.direction,
                filters: query.applied_filters.clone(),
                pagination,
            }),
        }
    }
}

/// What a list response applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListMeta {
    pub search: String,
    pub sort_by: String,
    pub sort_direction: SortDirection,
    pub filters: IndexMap<String, ParamValue>,
    /// Absent when every row was returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
}

/// Page position; `from`/`to` are 1-based row numbers, 0 for an empty page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: u64,
    pub to: u64,
}

impl PageMeta {
    /// `None` for unpaginated results
    #[must_use]
    pub fn new(pagination: Pagination, total: u64, count: u64) -> Option<Self> {
        let Pagination::Paginated { page_size, page } = pagination else {
            return None;
        };

        let last_page = total.div_ceil(page_size).max(1);
        let (from, to) = if count == 0 {
            (0, 0)
        } else {
            let from = pagination.offset() + 1;
            (from, from + count - 1)
        };

        Some(Self {
            current_page: page,
            per_page: page_size,
            total,
            last_page,
            from,
            to,
        })
    }
}

/// Summary message for a list response.
///
/// `total` is `Some` for paginated results.
#[must_use]
pub fn list_message(count: u64, total: Option<u64>) -> String {
    match (count, total) {
        (0, _) => "No records found".to_string(),
        (count, Some(total)) => format!("Retrieved {count} of {total} records"),
        (count, None) => format!("Retrieved {count} records"),
    }
}
