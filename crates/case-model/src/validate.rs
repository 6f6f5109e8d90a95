//! Ingest validation
//!
//! The engine assumes a tree: unique `(kind, id)` pairs and parent fields
//! that agree with where a node actually sits. [`validate`] checks those
//! assumptions and reports; it never rejects a document.

use crate::document::AssuranceCase;
use crate::kind::{NodeKey, NodeKind};
use crate::node::ParentRef;
use crate::path::NodePath;
use std::collections::HashMap;

/// A broken structural assumption
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// More than one top-level goal
    #[error("document has {count} goals, expected at most one")]
    MultipleGoals { count: usize },

    /// Same kind and id at two positions
    #[error("{key} appears at both {first} and {second}")]
    DuplicateNode {
        key: NodeKey,
        first: NodePath,
        second: NodePath,
    },

    /// `type` field disagrees with the collection holding the node
    #[error("node at {path} is tagged {tag} but sits in a {expected} collection")]
    TagMismatch {
        path: NodePath,
        tag: NodeKind,
        expected: NodeKind,
    },

    /// Not exactly one non-null parent reference
    #[error("{key} has {count} parent references, expected exactly one")]
    ParentReferenceCount { key: NodeKey, count: usize },

    /// Declared parent is not the structural parent
    #[error("{key} declares parent {declared} but sits under {actual}")]
    ParentMismatch {
        key: NodeKey,
        declared: ParentRef,
        actual: ParentRef,
    },
}

/// Findings from [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }
}

/// Check a document against the tree invariants
#[must_use]
pub fn validate(case: &AssuranceCase) -> ValidationReport {
    let mut violations = Vec::new();

    if case.goals.len() > 1 {
        violations.push(Violation::MultipleGoals {
            count: case.goals.len(),
        });
    }

    let mut seen: HashMap<NodeKey, NodePath> = HashMap::new();

    for (path, node) in case.walk() {
        let key = node.key();

        if let Some(first) = seen.get(&key) {
            violations.push(Violation::DuplicateNode {
                key,
                first: first.clone(),
                second: path.clone(),
            });
        } else {
            seen.insert(key, path.clone());
        }

        if node.tag() != node.kind() {
            violations.push(Violation::TagMismatch {
                path: path.clone(),
                tag: node.tag(),
                expected: node.kind(),
            });
        }

        if node.kind() == NodeKind::Goal {
            continue;
        }

        let count = node.parent_reference_count();
        if count != 1 {
            violations.push(Violation::ParentReferenceCount { key, count });
            continue;
        }

        let actual = path
            .parent()
            .and_then(|parent| case.node_at(&parent))
            .and_then(|parent| ParentRef::of(parent.key()));

        if let (Some(declared), Some(actual)) = (node.parent(), actual) {
            if declared != actual {
                violations.push(Violation::ParentMismatch {
                    key,
                    declared,
                    actual,
                });
            }
        }
    }

    ValidationReport { violations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::NodeId;
    use crate::node::{Evidence, Goal, PropertyClaim, Strategy};
    use std::sync::Arc;

    fn well_formed() -> AssuranceCase {
        AssuranceCase::new(1, "case").with_goal(
            Goal::new(1, "G1")
                .with_property_claim(PropertyClaim::new(2, "1").with_evidence(Evidence::new(3, "E0")))
                .with_strategy(Strategy::new(4, "S1").with_property_claim(PropertyClaim::new(5, "2"))),
        )
    }

    #[test]
    fn builders_produce_valid_tree() {
        let report = validate(&well_formed());
        assert!(report.is_valid(), "{:?}", report.violations());
    }

    #[test]
    fn detects_multiple_goals() {
        let case = well_formed().with_goal(Goal::new(9, "G2"));
        let report = validate(&case);
        assert!(report
            .iter()
            .any(|v| matches!(v, Violation::MultipleGoals { count: 2 })));
    }

    #[test]
    fn detects_duplicate_keys() {
        let mut case = well_formed();
        let goal = Arc::make_mut(&mut case.goals[0]);
        let mut clash = PropertyClaim::new(2, "dup");
        clash.goal_id = Some(NodeId(1));
        goal.property_claims.push(Arc::new(clash));

        let report = validate(&case);
        assert!(report.iter().any(|v| matches!(
            v,
            Violation::DuplicateNode { key, .. } if key.id == NodeId(2)
        )));
    }

    #[test]
    fn detects_parent_reference_count() {
        let mut case = well_formed();
        let goal = Arc::make_mut(&mut case.goals[0]);
        let claim = Arc::make_mut(&mut goal.property_claims[0]);
        claim.strategy_id = Some(NodeId(4));

        let report = validate(&case);
        assert_eq!(
            report.violations(),
            &[Violation::ParentReferenceCount {
                key: NodeKey::new(NodeKind::PropertyClaim, 2),
                count: 2,
            }]
        );
    }

    #[test]
    fn detects_stale_parent() {
        let mut case = well_formed();
        let goal = Arc::make_mut(&mut case.goals[0]);
        let strategy = Arc::make_mut(&mut goal.strategies[0]);
        let claim = Arc::make_mut(&mut strategy.property_claims[0]);
        claim.set_parent(ParentRef::Goal(NodeId(1)));

        let report = validate(&case);
        assert_eq!(
            report.violations(),
            &[Violation::ParentMismatch {
                key: NodeKey::new(NodeKind::PropertyClaim, 5),
                declared: ParentRef::Goal(NodeId(1)),
                actual: ParentRef::Strategy(NodeId(4)),
            }]
        );
    }

    #[test]
    fn detects_tag_mismatch() {
        let mut case = well_formed();
        let goal = Arc::make_mut(&mut case.goals[0]);
        Arc::make_mut(&mut goal.strategies[0]).tag = NodeKind::Evidence;

        let report = validate(&case);
        assert!(report
            .iter()
            .any(|v| matches!(v, Violation::TagMismatch { tag: NodeKind::Evidence, .. })));
    }
}
