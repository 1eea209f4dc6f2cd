use chrono::NaiveDate;
use std::fmt;

use crate::params::ParamValue;

/// A typed filter operand.
///
/// Query-string values arrive as `Text`; the storage layer coerces them to
/// the column's type. `Date` operands compare against the date part of the
/// column only.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl FilterValue {
    /// Convert a scalar parameter; lists and maps have no single operand
    #[must_use]
    pub fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::String(s) => Some(Self::Text(s.clone())),
            ParamValue::Integer(i) => Some(Self::Integer(*i)),
            ParamValue::Float(f) => Some(Self::Float(*f)),
            ParamValue::Bool(b) => Some(Self::Bool(*b)),
            ParamValue::List(_) | ParamValue::Map(_) => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "DATE '{d}'"),
        }
    }
}

/// A single query condition, independent of any storage engine.
///
/// `Contains` and `RelatedContains` carry a term whose `\`, `%` and `_` are
/// already escaped; the storage layer must match it literally.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals { field: String, value: FilterValue },
    In { field: String, values: Vec<FilterValue> },
    /// Inclusive on both ends
    Between { field: String, min: FilterValue, max: FilterValue },
    GreaterEq { field: String, value: FilterValue },
    LessEq { field: String, value: FilterValue },
    IsNull { field: String },
    IsNotNull { field: String },
    Contains { field: String, term: String },
    /// Some row of `relation` has `field` containing `term`
    RelatedContains { relation: String, field: String, term: String },
    /// OR group; used for search across several fields
    Any(Vec<Predicate>),
}

impl Predicate {
    /// The column a predicate applies to; `None` for OR groups.
    /// For related predicates this is the column on the related table.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Equals { field, .. }
            | Self::In { field, .. }
            | Self::Between { field, .. }
            | Self::GreaterEq { field, .. }
            | Self::LessEq { field, .. }
            | Self::IsNull { field }
            | Self::IsNotNull { field }
            | Self::Contains { field, .. }
            | Self::RelatedContains { field, .. } => Some(field),
            Self::Any(_) => None,
        }
    }

    /// Whether this is a text match (search) rather than a filter
    #[must_use]
    pub fn is_search(&self) -> bool {
        match self {
            Self::Contains { .. } | Self::RelatedContains { .. } => true,
            Self::Any(children) => !children.is_empty() && children.iter().all(Self::is_search),
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { field, value } => write!(f, "{field} = {value}"),
            Self::In { field, values } => {
                write!(f, "{field} IN (")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Self::Between { field, min, max } => write!(f, "{field} BETWEEN {min} AND {max}"),
            Self::GreaterEq { field, value } => write!(f, "{field} >= {value}"),
            Self::LessEq { field, value } => write!(f, "{field} <= {value}"),
            Self::IsNull { field } => write!(f, "{field} IS NULL"),
            Self::IsNotNull { field } => write!(f, "{field} IS NOT NULL"),
            Self::Contains { field, term } => write!(f, "{field} CONTAINS '{term}'"),
            Self::RelatedContains {
                relation,
                field,
                term,
            } => write!(f, "{relation}.{field} CONTAINS '{term}'"),
            Self::Any(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
