//! # Query translation
//!
//! [`QueryTranslator`] turns request parameters into a [`TranslationResult`]:
//! the predicates, sort and pagination a storage layer should apply, plus the
//! metadata describing what was applied.
//!
//! Translation runs in a fixed order: validation, search, filters, sort,
//! pagination. It is synchronous, performs no I/O, and a translator can be
//! shared between requests behind an `Arc`.
//!
//! Two policy decisions are logged at WARN level, each with an `event` field:
//! - `invalid_sort_column`: `sort_by` named a column outside the whitelist
//! - `unauthorized_all_request`: `all=true` from a caller without permission
//!
//! Rejected filter keys are dropped without logging.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::auth::AuthorizationContext;
use crate::config::{ConfigError, FilterConfiguration};
use crate::filtering::{
    Pagination, Predicate, SortInstruction, build_filter_predicates, build_search_predicate,
    decide_pagination, parse_sorting, sanitize_search_term, sortable_columns,
};
use crate::params::{ParamValue, RawParameterMap};
use crate::validation::{ValidationErrors, validate_params};

pub const INVALID_SORT_COLUMN_EVENT: &str = "invalid_sort_column";
pub const UNAUTHORIZED_ALL_REQUEST_EVENT: &str = "unauthorized_all_request";

/// A policy fallback taken during translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PolicyEvent {
    InvalidSortColumn {
        attempted: String,
        identity: Option<String>,
    },
    UnauthorizedAllRequest {
        identity: Option<String>,
    },
}

impl PolicyEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvalidSortColumn { .. } => INVALID_SORT_COLUMN_EVENT,
            Self::UnauthorizedAllRequest { .. } => UNAUTHORIZED_ALL_REQUEST_EVENT,
        }
    }
}

/// Everything needed to run a list query and describe it afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    /// The search group (if any) first, then filters in parameter order.
    /// Combined with AND.
    pub predicates: Vec<Predicate>,
    pub sort: SortInstruction,
    pub pagination: Pagination,
    /// Accepted filter parameters with their raw values
    pub applied_filters: IndexMap<String, ParamValue>,
    /// Sanitized search term, or empty
    pub search_term: String,
    pub events: Vec<PolicyEvent>,
}

impl TranslationResult {
    /// The OR group produced by `search`
    #[must_use]
    pub fn search_predicate(&self) -> Option<&Predicate> {
        self.predicates.first().filter(|p| p.is_search())
    }

    /// Predicates produced by filter parameters
    #[must_use]
    pub fn filter_predicates(&self) -> &[Predicate] {
        let skip = usize::from(self.search_predicate().is_some());
        &self.predicates[skip..]
    }

    #[must_use]
    pub fn has_event(&self, name: &str) -> bool {
        self.events.iter().any(|event| event.name() == name)
    }
}

/// Translates list request parameters under one [`FilterConfiguration`].
#[derive(Debug, Clone)]
pub struct QueryTranslator {
    config: FilterConfiguration,
    sortable: IndexSet<String>,
}

impl QueryTranslator {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration breaks an invariant.
    pub fn new(config: FilterConfiguration) -> Result<Self, ConfigError> {
        config.validate()?;
        let sortable = sortable_columns(&config);
        Ok(Self { config, sortable })
    }

    #[must_use]
    pub const fn config(&self) -> &FilterConfiguration {
        &self.config
    }

    /// Translate one request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when strict parameter checking is enabled
    /// and a reserved parameter is malformed. Nothing else fails: unknown
    /// filters, sort columns and unauthorized `all` requests fall back to
    /// defaults.
    pub fn translate(
        &self,
        params: &RawParameterMap,
        auth: &dyn AuthorizationContext,
    ) -> Result<TranslationResult, ValidationErrors> {
        if self.config.is_strict() {
            validate_params(params, &self.config)?;
        }

        let mut predicates = Vec::new();
        let mut events = Vec::new();

        let search_term = params
            .get("search")
            .and_then(ParamValue::scalar_text)
            .map(|raw| sanitize_search_term(&raw, self.config.search_term_limit()))
            .unwrap_or_default();
        if let Some(search) = build_search_predicate(&search_term, self.config.searchable_fields()) {
            predicates.push(search);
        }

        let filters = build_filter_predicates(params, &self.config);
        predicates.extend(filters.predicates);

        let parsed_sort = parse_sorting(params, &self.config, &self.sortable);
        if let Some(attempted) = parsed_sort.rejected_column {
            let identity = auth.identity();
            tracing::warn!(
                event = INVALID_SORT_COLUMN_EVENT,
                attempted_column = %attempted,
                identity = identity.as_deref().unwrap_or("anonymous"),
                fallback_column = %parsed_sort.instruction.column,
                "Rejected sort column"
            );
            events.push(PolicyEvent::InvalidSortColumn { attempted, identity });
        }

        let decision = decide_pagination(params, &self.config, auth);
        if decision.denied_all {
            let identity = auth.identity();
            tracing::warn!(
                event = UNAUTHORIZED_ALL_REQUEST_EVENT,
                identity = identity.as_deref().unwrap_or("anonymous"),
                "Unauthorized request for all records, paginating instead"
            );
            events.push(PolicyEvent::UnauthorizedAllRequest { identity });
        }

        Ok(TranslationResult {
            predicates,
            sort: parsed_sort.instruction,
            pagination: decision.pagination,
            applied_filters: filters.applied,
            search_term,
            events,
        })
    }
}

impl TryFrom<FilterConfiguration> for QueryTranslator {
    type Error = ConfigError;

    fn try_from(config: FilterConfiguration) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AllowAll, DenyAll, Principal};
    use crate::config::SortDirection;

    fn translator() -> QueryTranslator {
        QueryTranslator::new(
            FilterConfiguration::new()
                .searchable(["name", "category.name"])
                .filterable(["status", "price"]),
        )
        .unwrap()
    }

    fn translate(query: &str) -> TranslationResult {
        translator()
            .translate(&RawParameterMap::from_query_str(query), &DenyAll)
            .unwrap()
    }

    #[test]
    fn test_new_rejects_broken_config() {
        let result = QueryTranslator::new(FilterConfiguration::new().page_sizes(20, 10));
        assert!(result.is_err());

        let converted: Result<QueryTranslator, _> =
            FilterConfiguration::new().max_search_term_length(0).try_into();
        assert_eq!(converted.unwrap_err(), ConfigError::ZeroSearchTermLength);
    }

    #[test]
    fn test_empty_request() {
        let result = translate("");
        assert!(result.predicates.is_empty());
        assert!(result.applied_filters.is_empty());
        assert_eq!(result.search_term, "");
        assert_eq!(result.sort.column, "created_at");
        assert_eq!(result.sort.direction, SortDirection::Desc);
        assert_eq!(
            result.pagination,
            Pagination::Paginated {
                page_size: 15,
                page: 1
            }
        );
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_search_comes_first() {
        let result = translate("status=active&search=phone");
        assert_eq!(result.predicates.len(), 2);
        assert!(result.search_predicate().is_some());
        assert_eq!(result.filter_predicates().len(), 1);
        assert_eq!(result.search_term, "phone");
    }

    #[test]
    fn test_filters_only() {
        let result = translate("status=active");
        assert!(result.search_predicate().is_none());
        assert_eq!(result.filter_predicates().len(), 1);
    }

    #[test]
    fn test_validation_failure_stops_translation() {
        let errors = translator()
            .translate(&RawParameterMap::from_query_str("per_page=abc"), &DenyAll)
            .unwrap_err();
        assert!(errors.has_field("per_page"));
    }

    #[test]
    fn test_lenient_mode_clamps() {
        let translator =
            QueryTranslator::new(FilterConfiguration::new().strict_params(false)).unwrap();
        let result = translator
            .translate(&RawParameterMap::from_query_str("per_page=abc&page=0"), &DenyAll)
            .unwrap();
        assert_eq!(
            result.pagination,
            Pagination::Paginated {
                page_size: 15,
                page: 1
            }
        );
    }

    #[test]
    fn test_invalid_sort_records_event_with_identity() {
        let result = translator()
            .translate(
                &RawParameterMap::from_query_str("sort_by=password"),
                &Principal::new("u1"),
            )
            .unwrap();
        assert_eq!(result.sort.column, "created_at");
        assert_eq!(
            result.events,
            [PolicyEvent::InvalidSortColumn {
                attempted: "password".into(),
                identity: Some("u1".into())
            }]
        );
        assert!(result.has_event(INVALID_SORT_COLUMN_EVENT));
    }

    #[test]
    fn test_unauthorized_all_records_event() {
        let result = translate("all=true");
        assert!(result.pagination.is_paginated());
        assert!(result.has_event(UNAUTHORIZED_ALL_REQUEST_EVENT));
    }

    #[test]
    fn test_authorized_all() {
        let result = translator()
            .translate(&RawParameterMap::from_query_str("all=true"), &AllowAll)
            .unwrap();
        assert_eq!(result.pagination, Pagination::All);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = PolicyEvent::UnauthorizedAllRequest { identity: None };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "unauthorized_all_request");
    }
}
