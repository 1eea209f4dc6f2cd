//! Raw request parameters.
//!
//! A [`RawParameterMap`] is what the translator consumes: an insertion-ordered
//! map of parameter names to [`ParamValue`]s. It can be built from a raw query
//! string (with one level of bracket notation, e.g. `price[min]=100` or
//! `status[]=a&status[]=b`) or deserialized from JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use url::form_urlencoded;

/// A single parameter value.
///
/// Query strings only ever produce `String`, `List` and `Map` values; the
/// native `Bool`, `Integer` and `Float` variants appear when parameters are
/// supplied as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParamValue>),
    Map(IndexMap<String, ParamValue>),
}

impl ParamValue {
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Borrow the inner string of a `String` value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering of a scalar value; `None` for lists and maps
    #[must_use]
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::Integer(i) => Some(Cow::Owned(i.to_string())),
            Self::Float(f) => Some(Cow::Owned(f.to_string())),
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Integer interpretation: native integers, or strings made only of an
    /// optional sign and digits.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Strict boolean interpretation.
    ///
    /// Only `"true"`, `"false"`, `"1"`, `"0"`, the integers `1`/`0` and native
    /// booleans are recognised. Anything else (including `"yes"`, `""` or
    /// `2`) is not a boolean.
    #[must_use]
    pub fn as_strict_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Integer(1) => Some(true),
            Self::Integer(0) => Some(false),
            Self::String(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<V: Into<ParamValue>> From<Vec<V>> for ParamValue {
    fn from(values: Vec<V>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered request parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParameterMap(IndexMap<String, ParamValue>);

impl RawParameterMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// - `key=value` sets a string (the last occurrence wins)
    /// - `key[]=value` appends to a list
    /// - `key[name]=value` inserts into a map
    ///
    /// Only the first bracket segment is interpreted; `a[b][c]=v` is stored
    /// as `a => {b: v}`. Keys with an unterminated bracket are kept verbatim.
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        let mut params = Self::new();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params.push_encoded(&key, value.into_owned());
        }
        params
    }

    fn push_encoded(&mut self, key: &str, value: String) {
        let value = ParamValue::String(value);
        let Some((base, segment)) = split_bracket(key) else {
            self.0.insert(key.to_string(), value);
            return;
        };

        let slot = self
            .0
            .entry(base.to_string())
            .or_insert_with(|| ParamValue::List(Vec::new()));

        if segment.is_empty() {
            match slot {
                ParamValue::List(items) => items.push(value),
                ParamValue::Map(map) => {
                    let index = map.len().to_string();
                    map.insert(index, value);
                }
                other => *other = ParamValue::List(vec![value]),
            }
            return;
        }

        // A named segment turns any list collected so far into an indexed map
        if let ParamValue::List(items) = slot {
            let map = std::mem::take(items)
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect();
            *slot = ParamValue::Map(map);
        }

        match slot {
            ParamValue::Map(map) => {
                map.insert(segment.to_string(), value);
            }
            other => {
                let mut map = IndexMap::new();
                map.insert(segment.to_string(), value);
                *other = ParamValue::Map(map);
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for RawParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Split `base[segment]...` into `(base, segment)`
fn split_bracket(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let base = &key[..open];
    if base.is_empty() {
        return None;
    }
    let rest = &key[open + 1..];
    let close = rest.find(']')?;
    Some((base, &rest[..close]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pairs_keep_order() {
        let params = RawParameterMap::from_query_str("status=active&search=phone&page=2");
        let keys: Vec<&String> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["status", "search", "page"]);
        assert_eq!(params.get("status"), Some(&ParamValue::from("active")));
    }

    #[test]
    fn test_leading_question_mark_is_ignored() {
        let params = RawParameterMap::from_query_str("?page=3");
        assert_eq!(params.get("page").and_then(ParamValue::as_integer), Some(3));
    }

    #[test]
    fn test_last_plain_value_wins() {
        let params = RawParameterMap::from_query_str("status=a&status=b");
        assert_eq!(params.get("status"), Some(&ParamValue::from("b")));
    }

    #[test]
    fn test_bracket_map() {
        let params = RawParameterMap::from_query_str("price%5Bmin%5D=100&price%5Bmax%5D=500");
        let Some(ParamValue::Map(map)) = params.get("price") else {
            panic!("expected map, got {:?}", params.get("price"));
        };
        assert_eq!(map.get("min"), Some(&ParamValue::from("100")));
        assert_eq!(map.get("max"), Some(&ParamValue::from("500")));
    }

    #[test]
    fn test_unencoded_brackets_are_parsed_too() {
        let params = RawParameterMap::from_query_str("price[min]=1");
        assert!(matches!(params.get("price"), Some(ParamValue::Map(_))));
    }

    #[test]
    fn test_bracket_list() {
        let params = RawParameterMap::from_query_str("status[]=active&status[]=pending");
        assert_eq!(
            params.get("status"),
            Some(&ParamValue::from(vec!["active", "pending"]))
        );
    }

    #[test]
    fn test_mixed_list_then_named_segment_becomes_map() {
        let params = RawParameterMap::from_query_str("tag[]=a&tag[extra]=b");
        let Some(ParamValue::Map(map)) = params.get("tag") else {
            panic!("expected map");
        };
        assert_eq!(map.get("0"), Some(&ParamValue::from("a")));
        assert_eq!(map.get("extra"), Some(&ParamValue::from("b")));
    }

    #[test]
    fn test_malformed_bracket_kept_verbatim() {
        let params = RawParameterMap::from_query_str("price[min=5&[x]=1");
        assert_eq!(params.get("price[min"), Some(&ParamValue::from("5")));
        assert_eq!(params.get("[x]"), Some(&ParamValue::from("1")));
    }

    #[test]
    fn test_percent_decoding() {
        let params = RawParameterMap::from_query_str("search=a%20b%25&email=x%40example.com");
        assert_eq!(params.get("search"), Some(&ParamValue::from("a b%")));
        assert_eq!(params.get("email"), Some(&ParamValue::from("x@example.com")));
    }

    #[test]
    fn test_json_deserialization_keeps_native_types() {
        let params: RawParameterMap = serde_json::from_str(
            r#"{"featured": true, "count": 1, "ratio": 0.5, "price": {"min": 100}, "ids": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(params.get("featured"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("count"), Some(&ParamValue::Integer(1)));
        assert_eq!(params.get("ratio"), Some(&ParamValue::Float(0.5)));
        assert!(matches!(params.get("price"), Some(ParamValue::Map(_))));
        assert!(matches!(params.get("ids"), Some(ParamValue::List(_))));
    }

    #[test]
    fn test_strict_bool() {
        assert_eq!(ParamValue::from("true").as_strict_bool(), Some(true));
        assert_eq!(ParamValue::from("1").as_strict_bool(), Some(true));
        assert_eq!(ParamValue::Integer(1).as_strict_bool(), Some(true));
        assert_eq!(ParamValue::Bool(false).as_strict_bool(), Some(false));
        assert_eq!(ParamValue::from("0").as_strict_bool(), Some(false));
        assert_eq!(ParamValue::Integer(0).as_strict_bool(), Some(false));
        assert_eq!(ParamValue::from("TRUE").as_strict_bool(), None);
        assert_eq!(ParamValue::from("").as_strict_bool(), None);
        assert_eq!(ParamValue::Integer(2).as_strict_bool(), None);
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(ParamValue::from("15").as_integer(), Some(15));
        assert_eq!(ParamValue::from("-3").as_integer(), Some(-3));
        assert_eq!(ParamValue::from("1.5").as_integer(), None);
        assert_eq!(ParamValue::from("abc").as_integer(), None);
        assert_eq!(ParamValue::Float(2.0).as_integer(), None);
    }
}
