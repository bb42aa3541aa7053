//! Allow-list validation for identifiers interpolated into statement text.
//!
//! Labels, relationship types and property keys are structural syntax in
//! Cypher and cannot be bound as parameters, so every one of them passes
//! through [`validate`] before it reaches a statement.

use crate::error::{IdentifierKind, ValidationError};

/// Longest identifier accepted.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Keywords that may not be used as a label or relationship type.
const RESERVED: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "ASCENDING", "BY", "CALL", "CASE", "CONSTRAINT", "CONTAINS",
    "CREATE", "DELETE", "DESC", "DESCENDING", "DETACH", "DISTINCT", "DROP", "ELSE", "END",
    "ENDS", "EXISTS", "FALSE", "FOREACH", "IN", "INDEX", "IS", "LIMIT", "LOAD", "MATCH",
    "MERGE", "NOT", "NULL", "ON", "OPTIONAL", "OR", "ORDER", "REMOVE", "RETURN", "SET",
    "SKIP", "STARTS", "THEN", "TRUE", "UNION", "UNIQUE", "UNWIND", "USING", "WHEN", "WHERE",
    "WITH", "XOR", "YIELD",
];

/// Check `value` against the identifier charset and length bound, and for
/// labels and relationship types, against the reserved keyword list.
pub fn validate(kind: IdentifierKind, value: &str) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidIdentifier {
        kind,
        value: value.to_string(),
        reason,
    };

    let mut chars = value.chars();
    match chars.next() {
        None => return Err(invalid("must not be empty")),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Err(invalid("must start with a letter or underscore"))
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only ASCII letters, digits and underscores are allowed"));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(invalid("longer than 64 characters"));
    }

    if kind != IdentifierKind::PropertyKey && is_reserved(value) {
        return Err(ValidationError::ReservedKeyword {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Whether `value` collides with a reserved statement keyword (case-insensitive).
pub fn is_reserved(value: &str) -> bool {
    RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(value))
}
