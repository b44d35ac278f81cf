//! Query criteria
//!
//! Explicit query model used in place of method-name query derivation.
//! Criteria render to Solr standard query syntax for the HTTP backend and
//! evaluate directly against `Product` values for the in-memory backend.

use crate::types::Product;

/// Characters with meaning in the Solr standard query parser
const SOLR_SPECIAL_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// A query over product fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    /// Every document
    All,
    /// Field value equals `value` exactly
    Equals { field: String, value: String },
    /// Field value contains `value` as a substring
    Contains { field: String, value: String },
    /// At least one of the inner criteria matches
    Any(Vec<Criteria>),
}

impl Criteria {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Criteria::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Criteria::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Combine with another criteria using OR, flattening nested disjunctions
    pub fn or(self, other: Criteria) -> Self {
        let mut clauses = match self {
            Criteria::Any(clauses) => clauses,
            single => vec![single],
        };
        match other {
            Criteria::Any(more) => clauses.extend(more),
            single => clauses.push(single),
        }
        Criteria::Any(clauses)
    }

    /// Evaluate against a product
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Criteria::All => true,
            Criteria::Equals { field, value } => product.field(field) == Some(value.as_str()),
            Criteria::Contains { field, value } => product
                .field(field)
                .is_some_and(|actual| actual.contains(value.as_str())),
            Criteria::Any(clauses) => clauses.iter().any(|c| c.matches(product)),
        }
    }

    /// Render as a Solr `q` parameter
    pub fn to_solr_query(&self) -> String {
        match self {
            Criteria::All => "*:*".to_string(),
            Criteria::Equals { field, value } => {
                format!("{}:\"{}\"", field, escape_phrase(value))
            }
            Criteria::Contains { field, value } if value.is_empty() => format!("{}:*", field),
            Criteria::Contains { field, value } => {
                format!("{}:*{}*", field, escape_term(value))
            }
            Criteria::Any(clauses) if clauses.is_empty() => "-*:*".to_string(),
            Criteria::Any(clauses) => clauses
                .iter()
                .map(|c| match c {
                    Criteria::Any(_) => format!("({})", c.to_solr_query()),
                    _ => c.to_solr_query(),
                })
                .collect::<Vec<_>>()
                .join(" OR "),
        }
    }
}

/// Escape a bare term so every character is taken literally
pub fn escape_term(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if SOLR_SPECIAL_CHARS.contains(&ch) || ch.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape the inside of a quoted phrase
pub fn escape_phrase(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
