//! # relay-keyset
//!
//! Keyset (cursor-based) pagination engine implementing the Relay Connection
//! specification on top of an arbitrary backing store.
//!
//! ## Features
//!
//! - **Argument Validation** - `first`/`last`/`after`/`before` normalization
//!   with a configurable page-size ceiling
//! - **Order Specs** - per-collection registries of orderable fields,
//!   including derived/aggregate fields
//! - **Boundary Predicates** - composite "strictly after/before" comparison
//!   trees with a unique-key tie-break, so pagination over non-unique fields
//!   never drops or duplicates rows at page boundaries
//! - **Existence Probes** - `hasNextPage`/`hasPreviousPage` answered by
//!   bounded LIMIT-1 queries, never by scanning the full result set
//! - **Connection Assembly** - Relay `edges`/`pageInfo`/`totalCount` output
//!   types ready to expose through async-graphql
//!
//! ## Usage
//!
//! ```rust
//! use relay_keyset::ArgumentValidator;
//!
//! // Normalize raw Relay arguments into a direction and a limit
//! let bounds = ArgumentValidator::new()
//!     .validate("domains.connection", Some(10), None)
//!     .unwrap();
//! assert_eq!(bounds.limit, 10);
//! ```

pub mod args;
pub mod connection;
pub mod cursor;
pub mod engine;
pub mod order;
pub mod predicate;

pub use args::{ArgumentValidator, Direction, OrderByInput, OrderDirection, PageBounds, PageRequest};
pub use connection::{Connection, Edge, PageInfo};
pub use cursor::{CursorCodec, ItemKey};
pub use engine::{PaginationEngine, SortTerm, Storage, WindowQuery};
pub use order::{FieldResolver, Node, OrderSpec, Ordering, SortValue};
pub use predicate::{boundary_predicate, CompareOp, Predicate, Target};

use thiserror::Error;

/// Hard ceiling on page size. Callers needing a different ceiling construct
/// their own [`ArgumentValidator`] instead of overriding this.
pub const MAX_PAGE_SIZE: i32 = 100;

/// Pagination errors
#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("either 'first' or 'last' must be provided")]
    MissingLimit,

    #[error("cannot specify both 'first' and 'last'")]
    ConflictingLimits,

    #[error("page limit must be an integer, got {0}")]
    InvalidLimitType(String),

    #[error("page limit must be non-negative, got {0}")]
    NegativeLimit(i64),

    #[error("page limit {requested} exceeds the maximum of {max}")]
    LimitExceeded { requested: i64, max: i32 },

    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("storage query failed: {0}")]
    StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("storage result iteration failed: {0}")]
    StorageCursor(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PaginationError {
    /// Whether this error was caused by caller input (bad arguments or a bad
    /// cursor) rather than a storage failure. Transport layers map input
    /// errors to user-facing messages and storage errors to a generic
    /// "try again" without leaking the underlying cause.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::StorageUnavailable(_) | Self::StorageCursor(_))
    }
}

/// Result type for pagination operations
pub type Result<T> = std::result::Result<T, PaginationError>;
