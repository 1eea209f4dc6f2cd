//! Parameter validation
//!
//! Rejects malformed pagination and sort parameters before any predicate is
//! built. Absent parameters are never an error; defaults for those are applied
//! later by the sort and pagination policies.
//!
//! ```rust,ignore
//! use querycrate::validation::validate_params;
//!
//! let params = RawParameterMap::from_query_str("per_page=abc&sort_direction=up");
//! let errors = validate_params(&params, &config).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{FilterConfiguration, SortDirection};
use crate::filtering::sort::MAX_SORT_COLUMN_LENGTH;
use crate::params::RawParameterMap;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The parameter that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if there are any errors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get all errors
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Whether any error concerns `field`
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages grouped by field, the shape sent to clients
    #[must_use]
    pub fn by_field(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            grouped
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was collected.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// Page size parameter names, in precedence order
pub const PAGE_SIZE_PARAMS: [&str; 2] = ["per_page", "page_size"];

/// Validate the reserved list parameters.
///
/// - `per_page` / `page_size`: integer between 1 and the configured maximum
/// - `page`: integer of at least 1
/// - `sort_by`: string of at most 50 characters
/// - `sort_direction`: `asc` or `desc`, any letter case
/// - `search`: a single value (overlong terms are truncated later, not rejected)
/// - `all`: `true`, `false`, `1` or `0`
///
/// # Errors
///
/// Returns every problem found, keyed by parameter name.
pub fn validate_params(
    params: &RawParameterMap,
    config: &FilterConfiguration,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for name in PAGE_SIZE_PARAMS {
        if let Some(value) = params.get(name) {
            collect(
                &mut errors,
                validators::validate_integer(name, value, 1, Some(config.max_page_size())),
            );
        }
    }

    if let Some(value) = params.get("page") {
        collect(&mut errors, validators::validate_integer("page", value, 1, None));
    }

    if let Some(value) = params.get("sort_by") {
        let result = validators::validate_string("sort_by", value)
            .and_then(|s| validators::validate_length("sort_by", s, None, Some(MAX_SORT_COLUMN_LENGTH)));
        collect(&mut errors, result);
    }

    if let Some(value) = params.get("sort_direction") {
        let valid = value.as_str().and_then(SortDirection::parse).is_some();
        if !valid {
            errors.add(ValidationError::new(
                "sort_direction",
                "The selected sort_direction is invalid. Use asc or desc.",
            ));
        }
    }

    if let Some(value) = params.get("search")
        && !value.is_scalar()
    {
        errors.add(ValidationError::new("search", "The search field must be a string."));
    }

    if let Some(value) = params.get("all")
        && value.as_strict_bool().is_none()
    {
        errors.add(ValidationError::new("all", "The all field must be true or false."));
    }

    errors.result()
}

fn collect<T>(errors: &mut ValidationErrors, result: Result<T, ValidationError>) {
    if let Err(error) = result {
        errors.add(error);
    }
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;
    use crate::params::ParamValue;

    /// Validate string length (in characters) is within range
    ///
    /// # Errors
    ///
    /// Returns an error naming `field` when the length is outside the bounds.
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.chars().count();

        if let Some(min_len) = min
            && len < min_len
        {
            return Err(ValidationError::new(
                field,
                format!("The {field} field must be at least {min_len} characters."),
            ));
        }

        if let Some(max_len) = max
            && len > max_len
        {
            return Err(ValidationError::new(
                field,
                format!("The {field} field must not be greater than {max_len} characters."),
            ));
        }

        Ok(())
    }

    /// Validate that a value is a single string
    ///
    /// # Errors
    ///
    /// Returns an error for native numbers, booleans, lists and maps.
    pub fn validate_string<'a>(field: &str, value: &'a ParamValue) -> Result<&'a str, ValidationError> {
        value
            .as_str()
            .ok_or_else(|| ValidationError::new(field, format!("The {field} field must be a string.")))
    }

    /// Validate that a value is an integer within range
    ///
    /// # Errors
    ///
    /// Returns an error for non-integers and out-of-range integers.
    pub fn validate_integer(
        field: &str,
        value: &ParamValue,
        min: i64,
        max: Option<u64>,
    ) -> Result<i64, ValidationError> {
        let Some(number) = value.as_integer() else {
            return Err(ValidationError::new(
                field,
                format!("The {field} field must be an integer."),
            ));
        };

        if number < min {
            return Err(ValidationError::new(
                field,
                format!("The {field} field must be at least {min}."),
            ));
        }

        if let Some(max) = max
            && u64::try_from(number).is_ok_and(|n| n > max)
        {
            return Err(ValidationError::new(
                field,
                format!("The {field} field must not be greater than {max}."),
            ));
        }

        Ok(number)
    }
}
