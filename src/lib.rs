//! # querycrate
//!
//! Safe list endpoints for axum and sea-orm: request parameters in, a
//! whitelisted, sanitized, sorted and paginated query out.
//!
//! ```rust,ignore
//! use querycrate::{FilterConfiguration, ListState, QueryTranslator, list_handler};
//!
//! let translator = QueryTranslator::new(
//!     FilterConfiguration::new()
//!         .searchable(["name", "category.name"])
//!         .filterable(["status", "price", "created_at"]),
//! )?;
//!
//! let app = Router::new()
//!     .route("/products", get(list_handler::<Product>))
//!     .with_state(ListState::new(db, translator));
//! ```
//!
//! - Filters only apply to whitelisted fields; an empty whitelist allows none
//! - Search escapes LIKE wildcards, so `%` and `_` match literally
//! - Sorting falls back to the default column for unknown columns
//! - Results are always paginated unless the caller is authorized to fetch all

pub mod auth;
pub mod config;
pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod params;
pub mod response;
pub mod routes;
pub mod translator;
pub mod validation;

pub use auth::{AllowAll, AuthorizationContext, Caller, DenyAll, Principal};
pub use config::{ConfigError, FilterConfiguration, SortDirection};
pub use core::{ListPage, ListResource};
pub use database::{ColumnCatalog, RelatedTable};
pub use errors::{ApiError, sanitize_error_message};
pub use filtering::{FilterValue, Pagination, Predicate, SortInstruction};
pub use models::ListQueryParams;
pub use params::{ParamValue, RawParameterMap};
pub use response::{ApiResponse, ListMeta, PageMeta};
pub use routes::{ListState, list_handler, list_resources};
pub use translator::{PolicyEvent, QueryTranslator, TranslationResult};
pub use validation::{ValidationError, ValidationErrors};
