//! Declarative query templates
//!
//! A template is a small query string such as
//! `name:*?0* OR category:*?0*` where `?N` is replaced by the N-th call
//! argument. Templates are parsed once, when they are registered, so a
//! malformed template fails at construction rather than on first use.
//!
//! Supported clause forms, joined by ` OR `:
//! - `field:*value*`: substring match
//! - `field:"value"` or `field:value`: exact match
//! - `*:*`: every document
//!
//! A field clause must have a value: `name:*`, `name:**` and `name:""` are
//! rejected, and an exact clause whose arguments bind to nothing fails.

use crate::errors::{RepositoryError, Result};
use crate::query::criteria::Criteria;
use crate::types::{FIELD_CATEGORY, FIELD_DESCRIPTION, FIELD_ID, FIELD_NAME};
use std::collections::BTreeMap;
use std::fmt;

/// Name under which the predefined free-text query is registered
pub const FIND_BY_NAMED_QUERY: &str = "Product.findByNamedQuery";

/// Free-text match over every descriptive field
pub const FREE_TEXT_TEMPLATE: &str = "name:*?0* OR category:*?0* OR description:*?0*";

const SEARCHABLE_FIELDS: &[&str] = &[FIELD_ID, FIELD_NAME, FIELD_CATEGORY, FIELD_DESCRIPTION];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Arg(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Exact,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    All,
    Field {
        field: String,
        kind: MatchKind,
        value: Vec<Segment>,
    },
}

/// A parsed, reusable query template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    source: String,
    clauses: Vec<Clause>,
    arity: usize,
}

impl QueryTemplate {
    /// Parse a template string
    pub fn parse(source: &str) -> Result<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(RepositoryError::Template("template is empty".to_string()));
        }

        let clauses = trimmed
            .split(" OR ")
            .map(|raw| parse_clause(raw.trim(), source))
            .collect::<Result<Vec<_>>>()?;

        let arity = clauses
            .iter()
            .flat_map(|clause| match clause {
                Clause::All => Vec::new(),
                Clause::Field { value, .. } => value
                    .iter()
                    .filter_map(|s| match s {
                        Segment::Arg(i) => Some(i + 1),
                        Segment::Literal(_) => None,
                    })
                    .collect::<Vec<usize>>(),
            })
            .max()
            .unwrap_or(0);

        Ok(Self {
            source: source.to_string(),
            clauses,
            arity,
        })
    }

    /// Number of positional arguments the template consumes
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute arguments and produce criteria
    pub fn bind(&self, args: &[&str]) -> Result<Criteria> {
        if args.len() < self.arity {
            return Err(RepositoryError::Template(format!(
                "template '{}' needs {} argument(s), got {}",
                self.source,
                self.arity,
                args.len()
            )));
        }

        let mut bound = self
            .clauses
            .iter()
            .map(|clause| match clause {
                Clause::All => Ok(Criteria::All),
                Clause::Field { field, kind, value } => {
                    let value: String = value
                        .iter()
                        .map(|segment| match segment {
                            Segment::Literal(text) => text.as_str(),
                            Segment::Arg(i) => args[*i],
                        })
                        .collect();
                    match kind {
                        MatchKind::Exact if value.is_empty() => Err(RepositoryError::Template(
                            format!("exact match on '{}' in '{}' bound to an empty value", field, self.source),
                        )),
                        MatchKind::Exact => Ok(Criteria::equals(field.clone(), value)),
                        MatchKind::Substring => Ok(Criteria::contains(field.clone(), value)),
                    }
                }
            })
            .collect::<Result<Vec<Criteria>>>()?;

        Ok(if bound.len() == 1 {
            bound.remove(0)
        } else {
            Criteria::Any(bound)
        })
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_clause(raw: &str, source: &str) -> Result<Clause> {
    if raw == "*:*" {
        return Ok(Clause::All);
    }

    let (field, pattern) = raw.split_once(':').ok_or_else(|| {
        RepositoryError::Template(format!("clause '{}' in '{}' has no field", raw, source))
    })?;

    let field = field.trim();
    if !SEARCHABLE_FIELDS.contains(&field) {
        return Err(RepositoryError::Template(format!(
            "unknown field '{}' in '{}'",
            field, source
        )));
    }

    let (kind, body) = if pattern.len() >= 2 && pattern.starts_with('*') && pattern.ends_with('*')
    {
        (MatchKind::Substring, &pattern[1..pattern.len() - 1])
    } else if pattern.len() >= 2 && pattern.starts_with('"') && pattern.ends_with('"') {
        (MatchKind::Exact, &pattern[1..pattern.len() - 1])
    } else {
        (MatchKind::Exact, pattern)
    };

    let value = parse_segments(body, source)?;
    if value.is_empty() || body.chars().all(|c| c == '*') {
        return Err(RepositoryError::Template(format!(
            "clause '{}' in '{}' has no value",
            raw, source
        )));
    }

    Ok(Clause::Field {
        field: field.to_string(),
        kind,
        value,
    })
}

fn parse_segments(body: &str, source: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '?' {
            literal.push(ch);
            continue;
        }

        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        if digits.is_empty() {
            return Err(RepositoryError::Template(format!(
                "placeholder without index in '{}'",
                source
            )));
        }

        let index = digits.parse::<usize>().map_err(|e| {
            RepositoryError::Template(format!("bad placeholder index in '{}': {}", source, e))
        })?;
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Arg(index));
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Table of templates referenced by symbolic name
#[derive(Debug, Clone, Default)]
pub struct NamedQueries {
    queries: BTreeMap<String, QueryTemplate>,
}

impl NamedQueries {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table containing the predefined product queries
    pub fn with_defaults() -> Result<Self> {
        let mut table = Self::new();
        table.register(FIND_BY_NAMED_QUERY, FREE_TEXT_TEMPLATE)?;
        Ok(table)
    }

    /// Build from `name -> template` pairs on top of the defaults
    pub fn from_map<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = Self::with_defaults()?;
        for (name, template) in entries {
            table.register(name, template)?;
        }
        Ok(table)
    }

    /// Parse and register a template, replacing any previous one
    pub fn register(&mut self, name: &str, template: &str) -> Result<()> {
        let parsed = QueryTemplate::parse(template)?;
        self.queries.insert(name.to_string(), parsed);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&QueryTemplate> {
        self.queries
            .get(name)
            .ok_or_else(|| RepositoryError::Config(format!("no named query '{}'", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
