use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use super::predicate::{FilterValue, Predicate};
use crate::config::FilterConfiguration;
use crate::params::{ParamValue, RawParameterMap};

/// Parameters consumed by search, sort and pagination; never filters
pub const RESERVED_PARAMETERS: [&str; 7] = [
    "search",
    "sort_by",
    "sort_direction",
    "per_page",
    "page_size",
    "page",
    "all",
];

const DATE_FROM_SUFFIX: &str = "_from";
const DATE_TO_SUFFIX: &str = "_to";

/// Null sentinels; an empty string is an ordinary value
const NULL_SENTINEL: &str = "null";
const NOT_NULL_SENTINEL: &str = "not_null";

#[must_use]
pub fn is_reserved(key: &str) -> bool {
    RESERVED_PARAMETERS.contains(&key)
}

/// Strip bracket notation, then a `_from`/`_to` suffix
#[must_use]
pub fn base_field_name(key: &str) -> &str {
    let unbracketed = key.find('[').map_or(key, |open| &key[..open]);
    unbracketed
        .strip_suffix(DATE_FROM_SUFFIX)
        .or_else(|| unbracketed.strip_suffix(DATE_TO_SUFFIX))
        .unwrap_or(unbracketed)
}

/// Whether `key` names a whitelisted field. An empty whitelist rejects all keys.
#[must_use]
pub fn is_filterable(key: &str, config: &FilterConfiguration) -> bool {
    let allowed = config.filterable_fields();
    !allowed.is_empty() && allowed.contains(base_field_name(key))
}

/// Filter predicates together with the parameters that produced them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub predicates: Vec<Predicate>,
    pub applied: IndexMap<String, ParamValue>,
}

/// Turn every non-reserved, whitelisted parameter into at most one predicate.
///
/// Rejected keys and unparseable dates are dropped without a trace in the
/// result; only keys that produced a predicate are listed in `applied`.
#[must_use]
pub fn build_filter_predicates(
    params: &RawParameterMap,
    config: &FilterConfiguration,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for (key, value) in params.iter() {
        if is_reserved(key) || !is_filterable(key, config) {
            continue;
        }

        match build_filter_predicate(key, value) {
            Some(predicate) => {
                outcome.predicates.push(predicate);
                outcome.applied.insert(key.clone(), value.clone());
            }
            None => tracing::debug!(key = %key, "Dropping filter without a usable value"),
        }
    }

    outcome
}

/// Build the predicate for one accepted key, in priority order:
/// date bound, range/set, boolean, null sentinel, equality.
fn build_filter_predicate(key: &str, value: &ParamValue) -> Option<Predicate> {
    let unbracketed = key.find('[').map_or(key, |open| &key[..open]);

    if let Some(field) = unbracketed.strip_suffix(DATE_FROM_SUFFIX) {
        let date = value.as_str().and_then(parse_date)?;
        return Some(Predicate::GreaterEq {
            field: field.to_string(),
            value: FilterValue::Date(date),
        });
    }
    if let Some(field) = unbracketed.strip_suffix(DATE_TO_SUFFIX) {
        let date = value.as_str().and_then(parse_date)?;
        return Some(Predicate::LessEq {
            field: field.to_string(),
            value: FilterValue::Date(date),
        });
    }

    let field = unbracketed.to_string();
    match value {
        ParamValue::Map(map) => range_or_set(field, map),
        ParamValue::List(items) => set(field, items.iter()),
        scalar => {
            if let Some(flag) = scalar.as_strict_bool() {
                return Some(Predicate::Equals {
                    field,
                    value: FilterValue::Bool(flag),
                });
            }
            match scalar.as_str() {
                Some(NULL_SENTINEL) => Some(Predicate::IsNull { field }),
                Some(NOT_NULL_SENTINEL) => Some(Predicate::IsNotNull { field }),
                _ => FilterValue::from_param(scalar).map(|value| Predicate::Equals { field, value }),
            }
        }
    }
}

fn range_or_set(field: String, map: &IndexMap<String, ParamValue>) -> Option<Predicate> {
    let min = map.get("min").and_then(FilterValue::from_param);
    let max = map.get("max").and_then(FilterValue::from_param);

    match (min, max) {
        (Some(min), Some(max)) => Some(Predicate::Between { field, min, max }),
        (Some(value), None) => Some(Predicate::GreaterEq { field, value }),
        (None, Some(value)) => Some(Predicate::LessEq { field, value }),
        (None, None) if map.contains_key("min") || map.contains_key("max") => None,
        (None, None) => set(field, map.values()),
    }
}

fn set<'a>(field: String, items: impl Iterator<Item = &'a ParamValue>) -> Option<Predicate> {
    let values: Vec<FilterValue> = items.filter_map(FilterValue::from_param).collect();
    if values.is_empty() {
        None
    } else {
        Some(Predicate::In { field, values })
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 and `YYYY-MM-DD HH:MM:SS`; keeps the date part
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
