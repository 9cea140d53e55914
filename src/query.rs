//! Directory query predicates.
//!
//! The reconciler and selector express what they need as structured
//! [`Predicate`] trees: an assignability filter, field-equality clauses, and
//! AND/OR combinators. The predicate grammar itself is owned by the
//! directory service; this module only builds predicates and renders them
//! to the service's FIQL-style textual form at the REST boundary. The
//! in-memory directory interprets the structured tree directly.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::QueryError;
use crate::group::GroupKey;

/// Result type for query construction.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

static RE_NAME_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9 ._@-]+$").unwrap()
});

/// A group field usable in equality clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Key,
    Name,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Key => "key",
            Field::Name => "name",
        }
    }
}

/// A search predicate, consumed by [`GroupDirectory`](crate::directory::GroupDirectory)
/// implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches groups assignable within the searched scope.
    Assignable,
    /// Matches groups whose `field` equals `value` exactly.
    Equals { field: Field, value: String },
    /// Matches when every sub-predicate matches.
    And(Vec<Predicate>),
    /// Matches when any sub-predicate matches.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// The assignability scope filter.
    pub fn assignable() -> Self {
        Predicate::Assignable
    }

    /// Key-equality clause.
    pub fn key_equals(key: &GroupKey) -> Self {
        Predicate::Equals {
            field: Field::Key,
            value: key.as_str().to_string(),
        }
    }

    /// Name-equality clause.
    pub fn name_equals(name: &str) -> Self {
        Predicate::Equals {
            field: Field::Name,
            value: name.to_string(),
        }
    }

    /// Conjoin with another predicate, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut parts) => {
                parts.push(other);
                Predicate::And(parts)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    /// "key in {k1, k2, …}" as an OR of key-equality clauses.
    pub fn key_in(keys: &[GroupKey]) -> QueryResult<Self> {
        if keys.is_empty() {
            return Err(QueryError::EmptyKeyList);
        }
        Ok(Predicate::Or(keys.iter().map(Predicate::key_equals).collect()))
    }

    /// Render to the directory's FIQL-style textual form.
    ///
    /// `;` joins conjunctions, `,` joins disjunctions, and nested combinators
    /// are parenthesized.
    pub fn to_fiql(&self) -> String {
        match self {
            Predicate::Assignable => "$assignable==true".to_string(),
            Predicate::Equals { field, value } => format!("{}=={}", field.as_str(), value),
            Predicate::And(parts) => parts
                .iter()
                .map(Predicate::fiql_operand)
                .collect::<Vec<_>>()
                .join(";"),
            Predicate::Or(parts) => parts
                .iter()
                .map(Predicate::fiql_operand)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    fn fiql_operand(&self) -> String {
        match self {
            Predicate::And(_) | Predicate::Or(_) => format!("({})", self.to_fiql()),
            leaf => leaf.to_fiql(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder glue: the queries reconciliation actually issues
// ---------------------------------------------------------------------------

/// Predicate for the bounded candidate sampling: every assignable group.
pub fn candidates() -> Predicate {
    Predicate::assignable()
}

/// Predicate resolving static membership keys: assignable in scope AND any
/// of the referenced keys.
pub fn static_resolution(keys: &[GroupKey]) -> QueryResult<Predicate> {
    Ok(Predicate::assignable().and(Predicate::key_in(keys)?))
}

/// Predicate resolving dynamic membership keys. No assignability filter:
/// dynamic groups may live anywhere reachable from the root scope.
pub fn dynamic_resolution(keys: &[GroupKey]) -> QueryResult<Predicate> {
    Predicate::key_in(keys)
}

/// Predicate for an interactive name search: assignable AND name equality.
///
/// The filter is validated first; the wildcard token `"*"` is not a name
/// and is rejected here; callers answer it from the cached candidate list
/// instead (see [`is_unfiltered`]).
pub fn name_filter(filter: &str) -> QueryResult<Predicate> {
    validate_name_filter(filter)?;
    Ok(Predicate::assignable().and(Predicate::name_equals(filter)))
}

/// Whether a selector filter means "no filtering": empty or the wildcard
/// token `"*"`.
pub fn is_unfiltered(filter: &str) -> bool {
    filter.is_empty() || filter == "*"
}

/// Validate a caller-supplied name filter before any query is built.
pub fn validate_name_filter(filter: &str) -> QueryResult<()> {
    if RE_NAME_FILTER.is_match(filter) {
        Ok(())
    } else {
        Err(QueryError::InvalidFilter {
            filter: filter.to_string(),
        })
    }
}
