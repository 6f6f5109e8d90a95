//! Inserting freshly created nodes
//!
//! After the backend assigns an id to a new node, the UI hangs it under its
//! parent. The `add_*` functions edit a document the caller owns outright;
//! [`insert_child`] is the copy-on-write equivalent for shared versions.
//! Every insert rewrites the child's parent reference to match where it
//! lands.

use crate::locate::path_of;
use case_model::{AssuranceCase, Evidence, Node, NodeId, ParentRef, PropertyClaim, Strategy};
use std::sync::Arc;

/// Append `child` under `parent` in place
///
/// Returns `false` when the parent is missing or cannot hold this kind.
fn attach(case: &mut AssuranceCase, parent: ParentRef, mut child: Node) -> bool {
    let key = child.key();
    if !child.set_parent(parent) {
        tracing::debug!(%key, %parent, "parent kind cannot hold child");
        return false;
    }
    let Some(path) = path_of(case, parent.key()) else {
        tracing::debug!(%key, %parent, "insert parent not found");
        return false;
    };
    let Some(mut node) = case.node_at_mut(&path) else {
        return false;
    };

    tracing::debug!(%key, %parent, "inserting node");
    node.push_child(child).is_ok()
}

/// Append evidence to a property claim
pub fn add_evidence_to_claim(case: &mut AssuranceCase, claim_id: NodeId, evidence: Evidence) -> bool {
    attach(case, ParentRef::PropertyClaim(claim_id), evidence.into())
}

/// Append a property claim under a goal, strategy or another claim
pub fn add_property_claim(case: &mut AssuranceCase, parent: ParentRef, claim: PropertyClaim) -> bool {
    attach(case, parent, claim.into())
}

/// Append a strategy under a goal or a property claim
pub fn add_strategy(case: &mut AssuranceCase, parent: ParentRef, strategy: Strategy) -> bool {
    attach(case, parent, strategy.into())
}

/// New document with `child` appended under `parent`
///
/// Returns `Arc::clone(case)` when the parent is missing or cannot hold the
/// child.
#[must_use]
pub fn insert_child(case: &Arc<AssuranceCase>, parent: ParentRef, child: Node) -> Arc<AssuranceCase> {
    if path_of(case, parent.key()).is_none() {
        tracing::debug!(%parent, "insert parent not found");
        return Arc::clone(case);
    }

    let mut next = Arc::clone(case);
    if attach(Arc::make_mut(&mut next), parent, child) {
        next
    } else {
        Arc::clone(case)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_test_utils::{sample_case, single_claim_case};
    use pretty_assertions::assert_eq;

    #[test]
    fn evidence_lands_on_claim() {
        let mut case = single_claim_case();
        assert!(add_evidence_to_claim(&mut case, NodeId(2), Evidence::new(10, "E0")));

        let evidence = &case.goals[0].property_claims[0].evidence;
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].id, NodeId(10));
        assert_eq!(evidence[0].name, "E0");
        assert_eq!(evidence[0].property_claim_id, vec![NodeId(2)]);
    }

    #[test]
    fn evidence_needs_existing_claim() {
        let mut case = single_claim_case();
        assert!(!add_evidence_to_claim(&mut case, NodeId(3), Evidence::new(10, "E0")));
        assert_eq!(case, single_claim_case());
    }

    #[test]
    fn claim_under_strategy() {
        let mut case = sample_case();
        let added = add_property_claim(
            &mut case,
            ParentRef::Strategy(NodeId(30)),
            PropertyClaim::new(40, "5"),
        );

        assert!(added);
        let claim = &case.goals[0].strategies[1].property_claims[0];
        assert_eq!(claim.strategy_id, Some(NodeId(30)));
        assert_eq!(claim.parent_reference_count(), 1);
    }

    #[test]
    fn strategy_cannot_nest_in_strategy() {
        let mut case = sample_case();
        let added = add_strategy(&mut case, ParentRef::Strategy(NodeId(20)), Strategy::new(41, "S3"));
        assert!(!added);
    }

    #[test]
    fn strategy_under_claim() {
        let mut case = sample_case();
        assert!(add_strategy(
            &mut case,
            ParentRef::PropertyClaim(NodeId(12)),
            Strategy::new(41, "S1"),
        ));
        let strategy = &case.goals[0].property_claims[1].strategies[0];
        assert_eq!(strategy.property_claim_id, Some(NodeId(12)));
        assert_eq!(strategy.goal_id, None);
    }

    #[test]
    fn insert_child_shares_untouched_branches() {
        let case = Arc::new(sample_case());
        let next = insert_child(
            &case,
            ParentRef::PropertyClaim(NodeId(12)),
            Evidence::new(103, "E0").into(),
        );

        assert_eq!(next.goals[0].property_claims[1].evidence.len(), 1);
        assert!(case.goals[0].property_claims[1].evidence.is_empty());
        assert!(Arc::ptr_eq(&case.goals[0].strategies[0], &next.goals[0].strategies[0]));
    }

    #[test]
    fn insert_child_rejects_bad_parent() {
        let case = Arc::new(sample_case());
        let next = insert_child(&case, ParentRef::Goal(NodeId(1)), Evidence::new(103, "E0").into());
        assert!(Arc::ptr_eq(&case, &next));
    }
}
