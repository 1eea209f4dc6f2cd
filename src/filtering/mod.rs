//! # Request-to-query translation pieces
//!
//! Each submodule handles one family of list parameters and produces
//! storage-independent output:
//!
//! - [`search`]: `search` becomes one OR group of `Contains` predicates
//! - [`conditions`]: whitelisted filter parameters become AND-ed predicates
//! - [`sort`]: `sort_by`/`sort_direction` resolved against a whitelist
//! - [`pagination`]: page size and number, or "all" for authorized callers
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Search across every searchable field (LIKE wildcards are escaped)
//! GET /products?search=phone
//!
//! // Equality, null sentinels and booleans
//! GET /products?status=active&discontinued_at=null&featured=1
//!
//! // Ranges and sets
//! GET /products?price[min]=100&price[max]=500
//! GET /products?status[]=active&status[]=pending
//!
//! // Date bounds (compared on the date part only)
//! GET /products?created_at_from=2024-01-01&created_at_to=2024-06-30
//!
//! // Sorting and pagination
//! GET /products?sort_by=price&sort_direction=asc&per_page=25&page=2
//! ```
//!
//! Parameters whose field is not in the configured whitelist are ignored.

pub mod conditions;
pub mod pagination;
pub mod predicate;
pub mod search;
pub mod sort;

pub use conditions::{FilterOutcome, RESERVED_PARAMETERS, build_filter_predicates, is_filterable};
pub use pagination::{Pagination, PaginationDecision, decide_pagination};
pub use predicate::{FilterValue, Predicate};
pub use search::{build_search_predicate, escape_like_wildcards, sanitize_search_term};
pub use sort::{ParsedSort, SortInstruction, parse_sorting, sortable_columns};
