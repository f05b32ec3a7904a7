//! Relay pagination arguments and validation
//!
//! Follows the Relay Cursor Connections Specification:
//! https://relay.dev/graphql/connections.htm

use async_graphql::{Enum, InputObject};
use serde_json::Value;

use crate::{PaginationError, Result, MAX_PAGE_SIZE};

/// Sort direction for an orderable field.
#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Which end of the ordered sequence a page is taken from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    /// `first`/`after` pagination.
    Forward,
    /// `last`/`before` pagination.
    Backward,
}

/// Requested ordering: a registered field name plus a direction.
#[derive(InputObject, Debug, Clone)]
pub struct OrderByInput {
    pub field: String,
    pub direction: OrderDirection,
}

/// Pagination input for connection queries.
#[derive(InputObject, Debug, Clone, Default)]
pub struct PageRequest {
    /// Number of items to return (forward pagination)
    pub first: Option<i32>,

    /// Cursor to start after (forward pagination)
    pub after: Option<String>,

    /// Number of items to return (backward pagination)
    pub last: Option<i32>,

    /// Cursor to end before (backward pagination)
    pub before: Option<String>,

    /// Ordering to apply; defaults to the unique key when absent
    pub order_by: Option<OrderByInput>,
}

/// Normalized pagination bounds after validation.
#[derive(Debug, Clone, Copy)]
pub struct PageBounds {
    pub direction: Direction,
    pub limit: i32,
}

/// Validates `first`/`last` combinations and bounds.
///
/// The ceiling is fixed per instance; a caller that needs a different
/// page-size ceiling gets its own validator rather than a mutated constant.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentValidator {
    ceiling: i32,
}

impl Default for ArgumentValidator {
    fn default() -> Self {
        Self {
            ceiling: MAX_PAGE_SIZE,
        }
    }
}

impl ArgumentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ceiling(ceiling: i32) -> Self {
        Self { ceiling }
    }

    /// Validate typed limits, returning the pagination direction and limit.
    ///
    /// `caller` identifies the call site in diagnostics only; it never
    /// affects the outcome.
    pub fn validate(&self, caller: &str, first: Option<i32>, last: Option<i32>) -> Result<PageBounds> {
        self.validate_i64(caller, first.map(i64::from), last.map(i64::from))
    }

    /// Validate loosely-typed limits, e.g. from a JSON transport.
    ///
    /// This is the only path that can produce `InvalidLimitType`; the typed
    /// path rules it out by construction.
    pub fn validate_value(
        &self,
        caller: &str,
        first: Option<&Value>,
        last: Option<&Value>,
    ) -> Result<PageBounds> {
        let first = first
            .map(|v| self.coerce(caller, "first", v))
            .transpose()?;
        let last = last.map(|v| self.coerce(caller, "last", v)).transpose()?;
        self.validate_i64(caller, first, last)
    }

    fn validate_i64(&self, caller: &str, first: Option<i64>, last: Option<i64>) -> Result<PageBounds> {
        let (direction, limit) = match (first, last) {
            (None, None) => {
                return Err(self.reject(caller, "missing-limit", PaginationError::MissingLimit))
            }
            (Some(_), Some(_)) => {
                return Err(self.reject(
                    caller,
                    "conflicting-limits",
                    PaginationError::ConflictingLimits,
                ))
            }
            (Some(n), None) => (Direction::Forward, n),
            (None, Some(n)) => (Direction::Backward, n),
        };

        if limit < 0 {
            return Err(self.reject(
                caller,
                "negative-limit",
                PaginationError::NegativeLimit(limit),
            ));
        }

        if limit > i64::from(self.ceiling) {
            return Err(self.reject(
                caller,
                "limit-exceeded",
                PaginationError::LimitExceeded {
                    requested: limit,
                    max: self.ceiling,
                },
            ));
        }

        Ok(PageBounds {
            direction,
            // limit <= ceiling <= i32::MAX at this point
            limit: limit as i32,
        })
    }

    fn coerce(&self, caller: &str, name: &str, value: &Value) -> Result<i64> {
        value.as_i64().ok_or_else(|| {
            self.reject(
                caller,
                "invalid-limit-type",
                PaginationError::InvalidLimitType(format!("{name}={value}")),
            )
        })
    }

    // Diagnostic only; callers must not parse it.
    fn reject(&self, caller: &str, rule: &str, err: PaginationError) -> PaginationError {
        tracing::warn!(caller, rule, "rejected pagination arguments: {err}");
        err
    }
}
