use super::predicate::Predicate;

/// Separator between a relation name and its column in a searchable field
pub const RELATION_SEPARATOR: char = '.';

/// Escape LIKE wildcards to prevent wildcard injection attacks
/// Escapes: \ (the escape character itself), % (match any) and _ (match single char)
#[must_use]
pub fn escape_like_wildcards(input: &str) -> String {
    // Backslash first, so the escapes added below are not doubled
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Trim, truncate to `max_chars` characters and escape a raw search term.
///
/// Truncation happens before escaping so an escape sequence is never cut in
/// half. Returns an empty string when nothing searchable remains.
#[must_use]
pub fn sanitize_search_term(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    let truncated = match trimmed.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &trimmed[..byte_index],
        None => trimmed,
    };
    escape_like_wildcards(truncated)
}

/// Build the OR group matching an already-sanitized term against every
/// searchable field.
///
/// Plain fields produce `Contains`; `relation.column` fields produce
/// `RelatedContains`. Fields nested deeper than one relation are ignored.
#[must_use]
pub fn build_search_predicate(term: &str, searchable_fields: &[String]) -> Option<Predicate> {
    if term.is_empty() || searchable_fields.is_empty() {
        return None;
    }

    let matches: Vec<Predicate> = searchable_fields
        .iter()
        .filter_map(|field| field_match(field, term))
        .collect();

    if matches.is_empty() {
        None
    } else {
        Some(Predicate::Any(matches))
    }
}

fn field_match(field: &str, term: &str) -> Option<Predicate> {
    match field.split_once(RELATION_SEPARATOR) {
        None if !field.is_empty() => Some(Predicate::Contains {
            field: field.to_string(),
            term: term.to_string(),
        }),
        Some((relation, column))
            if !relation.is_empty()
                && !column.is_empty()
                && !column.contains(RELATION_SEPARATOR) =>
        {
            Some(Predicate::RelatedContains {
                relation: relation.to_string(),
                field: column.to_string(),
                term: term.to_string(),
            })
        }
        _ => {
            tracing::debug!(field = %field, "Ignoring unsupported searchable field");
            None
        }
    }
}
