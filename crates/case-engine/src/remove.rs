//! Local pruning after a REST delete

use crate::locate::paths_of;
use case_model::{AssuranceCase, NodeId, NodeKey, NodeKind};
use std::sync::Arc;

/// New document with every node matching `kind` and `id` pruned, subtree
/// included
///
/// Kind is required because legacy ids are only unique per kind. Returns
/// `Arc::clone(case)` when nothing matches.
#[must_use]
pub fn remove_node(case: &Arc<AssuranceCase>, id: NodeId, kind: NodeKind) -> Arc<AssuranceCase> {
    let key = NodeKey::new(kind, id);
    let paths = paths_of(case, key);
    if paths.is_empty() {
        tracing::debug!(%key, "nothing to remove");
        return Arc::clone(case);
    }

    tracing::debug!(%key, copies = paths.len(), "removing node");
    let mut next = Arc::clone(case);
    let doc = Arc::make_mut(&mut next);
    for path in paths.iter().rev() {
        doc.remove_at(path);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_test_utils::{sample_case, single_claim_case};

    #[test]
    fn removes_only_claim() {
        let case = Arc::new(single_claim_case());
        let next = remove_node(&case, NodeId(2), NodeKind::PropertyClaim);

        assert!(next.goals[0].property_claims.is_empty());
        assert_eq!(case.goals[0].property_claims.len(), 1);
    }

    #[test]
    fn kind_disambiguates() {
        let case = Arc::new(single_claim_case());
        let next = remove_node(&case, NodeId(2), NodeKind::Evidence);
        assert!(Arc::ptr_eq(&case, &next));
    }

    #[test]
    fn removes_subtree_and_keeps_siblings_shared() {
        let case = Arc::new(sample_case());
        let next = remove_node(&case, NodeId(20), NodeKind::Strategy);

        let goal = &next.goals[0];
        assert_eq!(goal.strategies.len(), 1);
        assert_eq!(goal.strategies[0].id, NodeId(30));
        assert_eq!(next.node_count(), case.node_count() - 3);
        assert!(Arc::ptr_eq(&goal.property_claims[0], &case.goals[0].property_claims[0]));
    }

    #[test]
    fn removes_goal() {
        let case = Arc::new(sample_case());
        let next = remove_node(&case, NodeId(1), NodeKind::Goal);
        assert!(next.goals.is_empty());
    }
}
