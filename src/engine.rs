//! The pagination pipeline
//!
//! [`PaginationEngine::paginate`] runs one request end to end: validate the
//! arguments, resolve the cursor into a boundary predicate, fetch one window,
//! probe for neighboring pages, and assemble the Relay connection. The engine
//! is stateless; every call derives everything from its own arguments, so
//! concurrent calls never interfere.
//!
//! The window fetch, the two existence probes, and the total count are
//! logically independent reads. The probes and the count are issued
//! concurrently; a collaborator that wants the page flags to be exactly
//! consistent with the edges under concurrent writes can serve them from one
//! snapshot behind its [`Storage`] implementation. Without that, the flags
//! can lag the edges by a narrow window - accepted staleness, not an engine
//! bug.

use async_trait::async_trait;

use crate::args::{ArgumentValidator, Direction, OrderDirection, PageRequest};
use crate::connection::Connection;
use crate::cursor::{CursorCodec, ItemKey};
use crate::order::{Node, OrderSpec, Ordering};
use crate::predicate::{boundary_predicate, Predicate, Target};
use crate::{PaginationError, Result};

/// One term of a window ordering; adapters translate this into their own
/// ORDER BY equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct SortTerm {
    pub target: Target,
    pub direction: OrderDirection,
}

/// Backend-agnostic description of a single page fetch.
#[derive(Debug, Clone)]
pub struct WindowQuery {
    pub predicate: Predicate,
    pub sort: Vec<SortTerm>,
    pub limit: usize,
}

impl WindowQuery {
    /// Comparator matching `sort`, for in-memory adapters.
    pub fn compare<N: Node>(
        &self,
        spec: &OrderSpec<N>,
        a: &N,
        b: &N,
    ) -> std::cmp::Ordering {
        for term in &self.sort {
            let ord = match &term.target {
                Target::Field(field) => spec
                    .resolve(field, a)
                    .total_cmp(&spec.resolve(field, b)),
                Target::Key => a.key().cmp(&b.key()),
            };
            let ord = match term.direction {
                OrderDirection::Asc => ord,
                OrderDirection::Desc => ord.reverse(),
            };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    }
}

/// The fetch ordering for one call: the ordered field (if any) and the
/// unique-key tie-break. Backward pagination fetches from the far end, so
/// every term flips; the engine reverses the slice back afterwards.
pub fn sort_terms(ordering: &Ordering, fetch: Direction) -> Vec<SortTerm> {
    let flip = fetch == Direction::Backward;
    let apply = |direction: OrderDirection| {
        if flip {
            direction.reversed()
        } else {
            direction
        }
    };

    let mut terms = Vec::with_capacity(2);
    if let Some(field) = &ordering.field {
        terms.push(SortTerm {
            target: Target::Field(field.clone()),
            direction: apply(ordering.direction),
        });
    }
    // Tie-break: ascending by key in display order, always.
    terms.push(SortTerm {
        target: Target::Key,
        direction: apply(OrderDirection::Asc),
    });
    terms
}

/// Storage collaborator contract.
///
/// Any ordered-query-capable store qualifies; implementations translate the
/// [`Predicate`] tree and [`SortTerm`]s into their own query language.
/// `count_candidates` may reflect a pre-pagination filter (search, ownership,
/// access scope) applied by the caller before the engine is invoked - the
/// same filter must then scope the other three reads.
#[async_trait]
pub trait Storage<N: Node>: Send + Sync {
    /// Load a single item by key. Used to resolve a request cursor into its
    /// anchor item, since cursors carry no field values.
    async fn load(&self, key: &ItemKey) -> Result<Option<N>>;

    /// Apply predicate, sort, and limit; return at most `limit` items in the
    /// requested order.
    async fn fetch_window(&self, query: &WindowQuery) -> Result<Vec<N>>;

    /// Bounded existence check (LIMIT 1 semantics): does any item match?
    async fn probe_exists(&self, predicate: &Predicate) -> Result<bool>;

    /// Count of the filtered candidate set, independent of pagination.
    async fn count_candidates(&self) -> Result<i64>;
}

/// Keyset pagination engine for one collection.
pub struct PaginationEngine<N, S> {
    spec: OrderSpec<N>,
    store: S,
    validator: ArgumentValidator,
    caller: String,
}

impl<N, S> PaginationEngine<N, S>
where
    N: Node,
    S: Storage<N>,
{
    pub fn new(spec: OrderSpec<N>, store: S) -> Self {
        let caller = spec.collection().to_owned();
        Self {
            spec,
            store,
            validator: ArgumentValidator::default(),
            caller,
        }
    }

    /// Replace the default validator (e.g. for a different page-size ceiling).
    #[must_use]
    pub fn with_validator(mut self, validator: ArgumentValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Set the caller context identifier used in diagnostics.
    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = caller.into();
        self
    }

    /// Run one pagination request.
    pub async fn paginate(&self, request: &PageRequest) -> Result<Connection<N>> {
        let bounds = self
            .validator
            .validate(&self.caller, request.first, request.last)?;

        let ordering = match &request.order_by {
            Some(order_by) => {
                // Unknown names are a schema/registry mismatch; fail loudly
                // here rather than deep inside the fetch.
                let _ = self.spec.resolver(&order_by.field);
                Ordering::by_field(order_by.field.clone(), order_by.direction)
            }
            None => Ordering::by_key(),
        };

        // `after` pairs with forward pagination, `before` with backward; a
        // mismatched cursor is ignored.
        let cursor = match bounds.direction {
            Direction::Forward => request.after.as_ref(),
            Direction::Backward => request.before.as_ref(),
        };

        let predicate = match cursor {
            None => Predicate::All,
            Some(token) => {
                let anchor = self.resolve_anchor(token).await?;
                boundary_predicate(&self.spec, &ordering, bounds.direction, &anchor)
            }
        };

        let query = WindowQuery {
            predicate,
            sort: sort_terms(&ordering, bounds.direction),
            limit: bounds.limit as usize,
        };
        let mut nodes = self
            .store
            .fetch_window(&query)
            .await
            .map_err(|e| self.storage_failure("fetch_window", e))?;

        // Backward windows come from the far end; restore display order.
        if bounds.direction == Direction::Backward {
            nodes.reverse();
        }

        let (next_predicate, prev_predicate) = match (nodes.first(), nodes.last()) {
            (Some(first), Some(last)) => (
                boundary_predicate(&self.spec, &ordering, Direction::Forward, last),
                boundary_predicate(&self.spec, &ordering, Direction::Backward, first),
            ),
            _ => {
                // Empty window: both probes are skipped and both flags are
                // false by definition.
                let total = self
                    .store
                    .count_candidates()
                    .await
                    .map_err(|e| self.storage_failure("count_candidates", e))?;
                return Ok(Connection::empty(total));
            }
        };

        let (has_next, has_previous, total) = tokio::join!(
            self.store.probe_exists(&next_predicate),
            self.store.probe_exists(&prev_predicate),
            self.store.count_candidates(),
        );
        let has_next = has_next.map_err(|e| self.storage_failure("probe_exists(next)", e))?;
        let has_previous =
            has_previous.map_err(|e| self.storage_failure("probe_exists(previous)", e))?;
        let total = total.map_err(|e| self.storage_failure("count_candidates", e))?;

        Connection::assemble(self.spec.collection(), nodes, has_next, has_previous, total)
    }

    async fn resolve_anchor(&self, token: &str) -> Result<N> {
        let (collection, key) = CursorCodec::decode(token)?;
        if collection != self.spec.collection() {
            return Err(PaginationError::InvalidCursor(format!(
                "cursor was issued for collection `{collection}`, expected `{}`",
                self.spec.collection()
            )));
        }
        self.store
            .load(&key)
            .await
            .map_err(|e| self.storage_failure("load", e))?
            .ok_or_else(|| {
                PaginationError::InvalidCursor(format!(
                    "cursor references a missing item: {key}"
                ))
            })
    }

    // Operability logging only; the error itself is surfaced unchanged.
    fn storage_failure(&self, operation: &str, err: PaginationError) -> PaginationError {
        match &err {
            PaginationError::StorageUnavailable(cause) => {
                tracing::error!(caller = %self.caller, operation, cause = %cause, "storage query failed");
            }
            PaginationError::StorageCursor(cause) => {
                tracing::error!(caller = %self.caller, operation, cause = %cause, "storage result iteration failed");
            }
            _ => {}
        }
        err
    }
}
