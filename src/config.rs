//! # Filter configuration
//!
//! A [`FilterConfiguration`] declares what a list endpoint allows: which
//! fields can be searched, which can be filtered, the default sort, and the
//! pagination bounds. It is built once (in code or deserialized from a config
//! file) and shared read-only between requests.
//!
//! ```rust,ignore
//! use querycrate::{FilterConfiguration, SortDirection};
//!
//! let config = FilterConfiguration::new()
//!     .searchable(["name", "category.name"])
//!     .filterable(["status", "price", "created_at"])
//!     .default_sort("created_at", SortDirection::Desc)
//!     .page_sizes(15, 100);
//! ```
//!
//! Leaving `filterable` empty denies every filter parameter.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SORT_COLUMN: &str = "created_at";
pub const DEFAULT_PAGE_SIZE: u64 = 15;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MAX_SEARCH_TERM_LENGTH: usize = 255;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` in any letter case
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of what a list endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfiguration {
    searchable_fields: Vec<String>,
    filterable_fields: IndexSet<String>,
    default_sort_column: String,
    default_sort_direction: SortDirection,
    default_page_size: u64,
    max_page_size: u64,
    max_search_term_length: usize,
    strict_params: bool,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self {
            searchable_fields: Vec::new(),
            filterable_fields: IndexSet::new(),
            default_sort_column: DEFAULT_SORT_COLUMN.to_string(),
            default_sort_direction: SortDirection::Desc,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            max_search_term_length: MAX_SEARCH_TERM_LENGTH,
            strict_params: true,
        }
    }
}

impl FilterConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields matched by `search`. Entries may be `column` or `relation.column`.
    #[must_use]
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Fields accepted as filter parameters
    #[must_use]
    pub fn filterable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn default_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort_column = column.into();
        self.default_sort_direction = direction;
        self
    }

    #[must_use]
    pub const fn page_sizes(mut self, default_page_size: u64, max_page_size: u64) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    #[must_use]
    pub const fn max_search_term_length(mut self, length: usize) -> Self {
        self.max_search_term_length = length;
        self
    }

    /// Reject malformed pagination/sort parameters with a validation error
    /// (`true`, the default) or silently clamp them (`false`).
    #[must_use]
    pub const fn strict_params(mut self, strict: bool) -> Self {
        self.strict_params = strict;
        self
    }

    #[must_use]
    pub fn searchable_fields(&self) -> &[String] {
        &self.searchable_fields
    }

    #[must_use]
    pub const fn filterable_fields(&self) -> &IndexSet<String> {
        &self.filterable_fields
    }

    #[must_use]
    pub fn default_sort_column(&self) -> &str {
        &self.default_sort_column
    }

    #[must_use]
    pub const fn default_sort_direction(&self) -> SortDirection {
        self.default_sort_direction
    }

    #[must_use]
    pub const fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    #[must_use]
    pub const fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    #[must_use]
    pub const fn search_term_limit(&self) -> usize {
        self.max_search_term_length
    }

    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict_params
    }

    /// Check the invariants a translator relies on.
    ///
    /// # Errors
    ///
    /// Returns the first broken invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize("default_page_size"));
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::ZeroPageSize("max_page_size"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::DefaultExceedsMax {
                default_page_size: self.default_page_size,
                max_page_size: self.max_page_size,
            });
        }
        if self.max_search_term_length == 0 {
            return Err(ConfigError::ZeroSearchTermLength);
        }
        if self.default_sort_column.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultSort);
        }
        if let Some(field) = self
            .searchable_fields
            .iter()
            .find(|field| field.is_empty() || field.matches('.').count() > 1)
        {
            return Err(ConfigError::InvalidSearchableField(field.clone()));
        }
        Ok(())
    }
}

/// A configuration that cannot be used to translate requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroPageSize(&'static str),
    DefaultExceedsMax {
        default_page_size: u64,
        max_page_size: u64,
    },
    ZeroSearchTermLength,
    EmptyDefaultSort,
    /// Empty, or nested deeper than one relation
    InvalidSearchableField(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPageSize(name) => write!(f, "{name} must be at least 1"),
            Self::DefaultExceedsMax {
                default_page_size,
                max_page_size,
            } => write!(
                f,
                "default_page_size ({default_page_size}) must not exceed max_page_size ({max_page_size})"
            ),
            Self::ZeroSearchTermLength => write!(f, "max_search_term_length must be at least 1"),
            Self::EmptyDefaultSort => write!(f, "default_sort_column must not be empty"),
            Self::InvalidSearchableField(field) => write!(
                f,
                "searchable field '{field}' must be a column or a single relation.column path"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
