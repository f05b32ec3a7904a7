//! Per-collection order specifications
//!
//! An [`OrderSpec`] is a registry of the nameable sort fields of one
//! collection. Each field resolves to a directly comparable [`SortValue`];
//! resolvers are arbitrary pure functions, so derived and aggregate values
//! (edge counts, locale-translated labels) are orderable like stored scalars.
//! The registry replaces per-field branching at call sites: only registered
//! names are orderable, and the schema layer enumerates those names.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::args::OrderDirection;
use crate::cursor::ItemKey;

/// An item that can be paginated: anything with a stable unique orderable key.
pub trait Node: Send + Sync {
    fn key(&self) -> ItemKey;
}

/// A directly comparable value produced by a field resolver.
///
/// Values of different variants order by variant (bool < int < float < text),
/// which keeps the comparison total even if a resolver is inconsistent about
/// its output type.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SortValue {
    /// Total-order comparison; floats use IEEE `total_cmp`.
    pub fn total_cmp(&self, other: &Self) -> CmpOrdering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl From<ItemKey> for SortValue {
    fn from(key: ItemKey) -> Self {
        match key {
            ItemKey::Int(n) => Self::Int(n),
            ItemKey::Text(s) => Self::Text(s),
        }
    }
}

impl From<&ItemKey> for SortValue {
    fn from(key: &ItemKey) -> Self {
        key.clone().into()
    }
}

/// Computes the comparable sort value of one field for any item.
pub type FieldResolver<N> = Arc<dyn Fn(&N) -> SortValue + Send + Sync>;

/// The active ordering of one pagination call.
#[derive(Debug, Clone)]
pub struct Ordering {
    /// Registered field name; `None` orders purely by the unique key.
    pub field: Option<String>,
    pub direction: OrderDirection,
}

impl Ordering {
    /// The stable default when no `orderBy` is given.
    pub fn by_key() -> Self {
        Self {
            field: None,
            direction: OrderDirection::Asc,
        }
    }

    pub fn by_field(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: Some(field.into()),
            direction,
        }
    }
}

/// Registry of the orderable fields of one collection.
pub struct OrderSpec<N> {
    collection: &'static str,
    fields: HashMap<String, FieldResolver<N>>,
}

impl<N: Node> OrderSpec<N> {
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            fields: HashMap::new(),
        }
    }

    /// Register a nameable sort field.
    #[must_use]
    pub fn field(
        mut self,
        name: &str,
        resolve: impl Fn(&N) -> SortValue + Send + Sync + 'static,
    ) -> Self {
        self.fields.insert(name.to_owned(), Arc::new(resolve));
        self
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Look up the resolver for a registered field.
    ///
    /// # Panics
    ///
    /// Panics on an unregistered name. The schema layer enumerates the
    /// orderable fields, so a miss here means the registry and the schema
    /// disagree - a programming error, not a runtime input error.
    pub fn resolver(&self, name: &str) -> &FieldResolver<N> {
        self.fields.get(name).unwrap_or_else(|| {
            panic!(
                "order field `{name}` is not registered for collection `{}`",
                self.collection
            )
        })
    }

    /// Resolve the sort value of a registered field for one item.
    pub fn resolve(&self, name: &str, node: &N) -> SortValue {
        (self.resolver(name))(node)
    }

    /// Display-order comparator: the ordered field in its requested
    /// direction, then the unique key ascending as the tie-break.
    pub fn compare(&self, ordering: &Ordering, a: &N, b: &N) -> CmpOrdering {
        if let Some(field) = &ordering.field {
            let by_field = self.resolve(field, a).total_cmp(&self.resolve(field, b));
            let by_field = match ordering.direction {
                OrderDirection::Asc => by_field,
                OrderDirection::Desc => by_field.reverse(),
            };
            if by_field != CmpOrdering::Equal {
                return by_field;
            }
        }
        a.key().cmp(&b.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: i64,
        name: &'static str,
        hits: i64,
    }

    impl Node for Row {
        fn key(&self) -> ItemKey {
            ItemKey::Int(self.id)
        }
    }

    fn spec() -> OrderSpec<Row> {
        OrderSpec::new("rows")
            .field("name", |r: &Row| SortValue::Text(r.name.to_owned()))
            .field("hits", |r: &Row| SortValue::Int(r.hits))
    }

    #[test]
    fn test_sort_value_total_order() {
        assert_eq!(
            SortValue::Int(1).total_cmp(&SortValue::Int(2)),
            CmpOrdering::Less
        );
        assert_eq!(
            SortValue::Text("b".into()).total_cmp(&SortValue::Text("a".into())),
            CmpOrdering::Greater
        );
        // Cross-variant comparisons stay total
        assert_eq!(
            SortValue::Bool(true).total_cmp(&SortValue::Int(0)),
            CmpOrdering::Less
        );
        // NaN has a fixed position under total_cmp
        assert_eq!(
            SortValue::Float(f64::NAN).total_cmp(&SortValue::Float(f64::NAN)),
            CmpOrdering::Equal
        );
    }

    #[test]
    fn test_resolve_registered_field() {
        let row = Row {
            id: 1,
            name: "example.org",
            hits: 7,
        };
        assert_eq!(
            spec().resolve("name", &row),
            SortValue::Text("example.org".into())
        );
        assert_eq!(spec().resolve("hits", &row), SortValue::Int(7));
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_unknown_field_is_a_programming_error() {
        let row = Row {
            id: 1,
            name: "a",
            hits: 0,
        };
        spec().resolve("nope", &row);
    }

    #[test]
    fn test_compare_falls_back_to_key_on_ties() {
        let a = Row {
            id: 2,
            name: "same",
            hits: 0,
        };
        let b = Row {
            id: 1,
            name: "same",
            hits: 0,
        };
        let ordering = Ordering::by_field("name", OrderDirection::Asc);
        assert_eq!(spec().compare(&ordering, &a, &b), CmpOrdering::Greater);
    }

    #[test]
    fn test_compare_descending_keeps_key_tiebreak_ascending() {
        let a = Row {
            id: 1,
            name: "same",
            hits: 0,
        };
        let b = Row {
            id: 2,
            name: "same",
            hits: 0,
        };
        let ordering = Ordering::by_field("name", OrderDirection::Desc);
        // Field values tie, so the ascending key decides even under DESC.
        assert_eq!(spec().compare(&ordering, &a, &b), CmpOrdering::Less);
    }

    #[test]
    fn test_default_ordering_is_key_only() {
        let a = Row {
            id: 1,
            name: "z",
            hits: 9,
        };
        let b = Row {
            id: 2,
            name: "a",
            hits: 0,
        };
        assert_eq!(
            spec().compare(&Ordering::by_key(), &a, &b),
            CmpOrdering::Less
        );
    }
}
