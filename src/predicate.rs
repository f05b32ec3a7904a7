//! Backend-agnostic boundary predicates
//!
//! [`boundary_predicate`] builds the composite "strictly after/before the
//! anchor" condition used to resume a sequence from a cursor and to probe for
//! neighboring pages. The output is an intermediate comparison tree: a thin
//! adapter translates it into whatever query language the storage
//! collaborator speaks, and [`Predicate::matches`] evaluates it directly for
//! in-memory stores.

use crate::args::{Direction, OrderDirection};
use crate::order::{Node, OrderSpec, Ordering, SortValue};

/// What a comparison reads from an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A field registered in the active [`OrderSpec`].
    Field(String),
    /// The item's unique key.
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
    Eq,
}

/// Intermediate comparison-expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every item (no cursor given).
    All,
    Compare {
        target: Target,
        op: CompareOp,
        value: SortValue,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate the tree against one item.
    pub fn matches<N: Node>(&self, spec: &OrderSpec<N>, node: &N) -> bool {
        match self {
            Self::All => true,
            Self::Compare { target, op, value } => {
                let actual = match target {
                    Target::Field(field) => spec.resolve(field, node),
                    Target::Key => SortValue::from(node.key()),
                };
                let ord = actual.total_cmp(value);
                match op {
                    CompareOp::Gt => ord == std::cmp::Ordering::Greater,
                    CompareOp::Lt => ord == std::cmp::Ordering::Less,
                    CompareOp::Eq => ord == std::cmp::Ordering::Equal,
                }
            }
            Self::And(parts) => parts.iter().all(|p| p.matches(spec, node)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(spec, node)),
        }
    }
}

/// Build the predicate matching exactly the items strictly after
/// ([`Direction::Forward`]) or strictly before ([`Direction::Backward`]) the
/// anchor item in the requested total order.
///
/// The shape is:
///
/// ```text
/// field <op> anchor_field
///   OR (field == anchor_field AND key <key_op> anchor_key)
/// ```
///
/// where `<op>` flips with both the sort direction and the pagination
/// direction, while `<key_op>` follows the pagination direction alone: the
/// unique-key tie-break is always ascending-by-value for "after" and
/// descending for "before", regardless of the field's direction. The
/// tie-break is what turns a sort over duplicate field values into a strict
/// total order; without it, rows at page boundaries are silently dropped or
/// duplicated.
pub fn boundary_predicate<N: Node>(
    spec: &OrderSpec<N>,
    ordering: &Ordering,
    direction: Direction,
    anchor: &N,
) -> Predicate {
    let key_op = match direction {
        Direction::Forward => CompareOp::Gt,
        Direction::Backward => CompareOp::Lt,
    };
    let key_cmp = Predicate::Compare {
        target: Target::Key,
        op: key_op,
        value: anchor.key().into(),
    };

    let Some(field) = &ordering.field else {
        return key_cmp;
    };

    let field_op = match (ordering.direction, direction) {
        (OrderDirection::Asc, Direction::Forward) | (OrderDirection::Desc, Direction::Backward) => {
            CompareOp::Gt
        }
        (OrderDirection::Asc, Direction::Backward) | (OrderDirection::Desc, Direction::Forward) => {
            CompareOp::Lt
        }
    };
    let anchor_value = spec.resolve(field, anchor);

    Predicate::Or(vec![
        Predicate::Compare {
            target: Target::Field(field.clone()),
            op: field_op,
            value: anchor_value.clone(),
        },
        Predicate::And(vec![
            Predicate::Compare {
                target: Target::Field(field.clone()),
                op: CompareOp::Eq,
                value: anchor_value,
            },
            key_cmp,
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::ItemKey;

    #[derive(Clone)]
    struct Row {
        id: i64,
        score: i64,
    }

    impl Node for Row {
        fn key(&self) -> ItemKey {
            ItemKey::Int(self.id)
        }
    }

    fn spec() -> OrderSpec<Row> {
        OrderSpec::new("rows").field("score", |r: &Row| SortValue::Int(r.score))
    }

    fn row(id: i64, score: i64) -> Row {
        Row { id, score }
    }

    #[test]
    fn test_key_only_boundary() {
        let spec = spec();
        let p = boundary_predicate(&spec, &Ordering::by_key(), Direction::Forward, &row(5, 0));
        assert_eq!(
            p,
            Predicate::Compare {
                target: Target::Key,
                op: CompareOp::Gt,
                value: SortValue::Int(5),
            }
        );
        assert!(p.matches(&spec, &row(6, 0)));
        assert!(!p.matches(&spec, &row(5, 0)));
        assert!(!p.matches(&spec, &row(4, 0)));
    }

    #[test]
    fn test_ascending_after_shape() {
        let spec = spec();
        let ordering = Ordering::by_field("score", OrderDirection::Asc);
        let p = boundary_predicate(&spec, &ordering, Direction::Forward, &row(5, 10));

        // Strictly greater score qualifies
        assert!(p.matches(&spec, &row(1, 11)));
        // Equal score falls to the key tie-break
        assert!(p.matches(&spec, &row(6, 10)));
        assert!(!p.matches(&spec, &row(4, 10)));
        // Smaller score never qualifies, regardless of key
        assert!(!p.matches(&spec, &row(99, 9)));
    }

    #[test]
    fn test_descending_after_flips_field_but_not_key() {
        let spec = spec();
        let ordering = Ordering::by_field("score", OrderDirection::Desc);
        let p = boundary_predicate(&spec, &ordering, Direction::Forward, &row(5, 10));

        // DESC + after means smaller score comes later in the sequence
        assert!(p.matches(&spec, &row(1, 9)));
        assert!(!p.matches(&spec, &row(1, 11)));
        // Tie-break stays ascending-by-key for "after"
        assert!(p.matches(&spec, &row(6, 10)));
        assert!(!p.matches(&spec, &row(4, 10)));
    }

    #[test]
    fn test_before_is_the_mirror_of_after() {
        let spec = spec();
        let ordering = Ordering::by_field("score", OrderDirection::Asc);
        let after = boundary_predicate(&spec, &ordering, Direction::Forward, &row(5, 10));
        let before = boundary_predicate(&spec, &ordering, Direction::Backward, &row(5, 10));

        for candidate in [row(1, 9), row(4, 10), row(5, 10), row(6, 10), row(1, 11)] {
            let is_anchor = candidate.id == 5 && candidate.score == 10;
            let covered =
                after.matches(&spec, &candidate) || before.matches(&spec, &candidate);
            // Every non-anchor item is on exactly one side of the anchor
            assert_eq!(covered, !is_anchor);
            assert!(!(after.matches(&spec, &candidate) && before.matches(&spec, &candidate)));
        }
    }
}
