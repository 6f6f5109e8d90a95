//! Testing utilities for the assurance case workspace
//!
//! Shared fixtures, a random-document strategy and tracing setup.

#![allow(missing_docs)]

use case_model::{
    AssuranceCase, Evidence, Goal, Node, NodeKind, NodePath, ParentRef, PropertyClaim, Slot,
    Strategy,
};
use proptest::prelude::any;
use proptest::strategy::Strategy as PropStrategy;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber honouring `RUST_LOG`, once per process
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One goal with a single empty property claim named "1"
pub fn single_claim_case() -> AssuranceCase {
    AssuranceCase::new(1, "single claim")
        .with_goal(Goal::new(1, "G1").with_property_claim(PropertyClaim::new(2, "1")))
}

/// A representative document:
///
/// ```text
/// G1 (1)
/// ├── claim "1" (10)
/// │   ├── claim "1.1" (11)
/// │   │   └── evidence "E0" (101)
/// │   ├── evidence "E0" (100)
/// │   └── evidence "E1" (102)
/// ├── claim "2" (12)
/// ├── strategy "S1" (20)
/// │   ├── claim "3" (21)
/// │   └── claim "4" (22)
/// └── strategy "S2" (30)
/// ```
pub fn sample_case() -> AssuranceCase {
    AssuranceCase::new(7, "sample").with_goal(
        Goal::new(1, "G1")
            .with_context("Deployment context")
            .with_property_claim(
                PropertyClaim::new(10, "1")
                    .with_property_claim(
                        PropertyClaim::new(11, "1.1").with_evidence(Evidence::new(101, "E0")),
                    )
                    .with_evidence(Evidence::new(100, "E0"))
                    .with_evidence(Evidence::new(102, "E1")),
            )
            .with_property_claim(PropertyClaim::new(12, "2"))
            .with_strategy(
                Strategy::new(20, "S1")
                    .with_property_claim(PropertyClaim::new(21, "3"))
                    .with_property_claim(PropertyClaim::new(22, "4")),
            )
            .with_strategy(Strategy::new(30, "S2")),
    )
}

/// Goal → Strategy → Claim chain plus a sibling claim, every node hidden
pub fn hidden_chain_case() -> AssuranceCase {
    let mut goal = Goal::new(1, "G1").with_strategy(
        Strategy::new(2, "S1")
            .hidden(true)
            .with_property_claim(PropertyClaim::new(3, "1").hidden(true))
            .with_property_claim(PropertyClaim::new(4, "2").hidden(true)),
    );
    goal.visibility.hidden = true;
    AssuranceCase::new(1, "hidden chain").with_goal(goal)
}

/// Instruction for growing a random document: node kind selector, parent
/// selector and initial `hidden` flag
pub type GrowStep = (u8, usize, bool);

/// Build a document by appending nodes under previously created containers.
///
/// Ids are unique and sequential from 2; parent references are kept
/// consistent with placement.
pub fn grow_case(steps: &[GrowStep]) -> AssuranceCase {
    let mut case = AssuranceCase::new(1, "generated").with_goal(Goal::new(1, "G1"));
    let mut containers: Vec<(NodePath, NodeKind, i64)> =
        vec![(NodePath::goal(0), NodeKind::Goal, 1)];
    let mut next_id = 2_i64;

    for &(selector, parent_pick, hidden) in steps {
        let kind = match selector % 3 {
            0 => NodeKind::Strategy,
            1 => NodeKind::PropertyClaim,
            _ => NodeKind::Evidence,
        };

        let candidates: Vec<&(NodePath, NodeKind, i64)> = containers
            .iter()
            .filter(|(_, parent_kind, _)| match kind {
                NodeKind::Strategy => {
                    matches!(parent_kind, NodeKind::Goal | NodeKind::PropertyClaim)
                }
                NodeKind::PropertyClaim => true,
                NodeKind::Evidence => *parent_kind == NodeKind::PropertyClaim,
                NodeKind::Goal => false,
            })
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let (parent_path, parent_kind, parent_id) = candidates[parent_pick % candidates.len()].clone();
        let id = next_id;
        next_id += 1;

        let mut node: Node = match kind {
            NodeKind::Strategy => Strategy::new(id, format!("S{id}")).hidden(hidden).into(),
            NodeKind::PropertyClaim => PropertyClaim::new(id, id.to_string()).hidden(hidden).into(),
            _ => Evidence::new(id, format!("E{id}")).hidden(hidden).into(),
        };
        let parent = match parent_kind {
            NodeKind::Goal => ParentRef::Goal(parent_id.into()),
            NodeKind::Strategy => ParentRef::Strategy(parent_id.into()),
            _ => ParentRef::PropertyClaim(parent_id.into()),
        };
        node.set_parent(parent);

        let Some(index) = case
            .node_at(&parent_path)
            .map(|p| p.child_count(Slot::for_kind(kind)))
        else {
            continue;
        };
        let Some(mut parent_node) = case.node_at_mut(&parent_path) else {
            continue;
        };
        if parent_node.push_child(node).is_err() {
            continue;
        }

        if kind.is_container() {
            containers.push((parent_path.child(Slot::for_kind(kind), index), kind, id));
        }
    }

    case
}

/// Strategy producing random well-formed documents
pub fn arb_case() -> impl PropStrategy<Value = AssuranceCase> {
    proptest::collection::vec((any::<u8>(), any::<usize>(), any::<bool>()), 0..40)
        .prop_map(|steps| grow_case(&steps))
}
