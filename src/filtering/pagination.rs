use serde::Serialize;

use crate::auth::AuthorizationContext;
use crate::config::FilterConfiguration;
use crate::params::RawParameterMap;
use crate::validation::PAGE_SIZE_PARAMS;

/// Largest offset storage drivers accept; they bind offsets as `i64`
pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// How many rows a list query may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Pagination {
    /// One page; `page` is 1-based
    Paginated { page_size: u64, page: u64 },
    /// Every matching row. Only produced for authorized callers.
    All,
}

impl Pagination {
    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        matches!(self, Self::Paginated { .. })
    }

    /// Rows skipped before the current page, capped at [`MAX_OFFSET`]
    #[must_use]
    pub const fn offset(&self) -> u64 {
        match self {
            Self::Paginated { page_size, page } => {
                let offset = page.saturating_sub(1).saturating_mul(*page_size);
                if offset > MAX_OFFSET { MAX_OFFSET } else { offset }
            }
            Self::All => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationDecision {
    pub pagination: Pagination,
    /// `all=true` was requested by a caller without permission
    pub denied_all: bool,
}

/// Decide the pagination for a request.
///
/// The unpaginated path needs both `all=true` and `may_fetch_all()`. Every
/// other request is paginated: the page size falls back to the default when
/// missing, non-numeric or below 1, and is capped at the maximum; the page
/// number has a floor of 1.
#[must_use]
pub fn decide_pagination(
    params: &RawParameterMap,
    config: &FilterConfiguration,
    auth: &dyn AuthorizationContext,
) -> PaginationDecision {
    let wants_all = params
        .get("all")
        .and_then(|value| value.as_strict_bool())
        .unwrap_or(false);

    if wants_all && auth.may_fetch_all() {
        return PaginationDecision {
            pagination: Pagination::All,
            denied_all: false,
        };
    }

    PaginationDecision {
        pagination: Pagination::Paginated {
            page_size: page_size(params, config),
            page: page_number(params),
        },
        denied_all: wants_all,
    }
}

fn page_size(params: &RawParameterMap, config: &FilterConfiguration) -> u64 {
    let requested = PAGE_SIZE_PARAMS
        .iter()
        .find_map(|name| params.get(name))
        .and_then(|value| value.as_integer())
        .and_then(|n| u64::try_from(n).ok())
        .filter(|&n| n >= 1);

    requested
        .unwrap_or_else(|| config.default_page_size())
        .min(config.max_page_size())
}

fn page_number(params: &RawParameterMap) -> u64 {
    params
        .get("page")
        .and_then(|value| value.as_integer())
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(1)
        .max(1)
}
