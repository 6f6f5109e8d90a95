//! End-to-end editing scenarios against JSON documents

use case_engine::identifier::next_identifier;
use case_engine::insert::add_evidence_to_claim;
use case_engine::locate::{find_node_by_key, paths_of};
use case_engine::mutate::{apply_update, update_node};
use case_engine::remove::remove_node;
use case_engine::visibility::{reveal_ancestors, toggle_subtree_visibility};
use case_engine::{ChildKind, IdentifierScheme, NodePatch, UpdateKind};
use case_model::{AssuranceCase, Evidence, NodeId, NodeKey, NodeKind, ParentRef};
use case_test_utils::{hidden_chain_case, init_tracing, sample_case};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

const SINGLE_CLAIM: &str = r#"{
    "id": 1,
    "goals": [{
        "id": 1,
        "property_claims": [{
            "id": 2,
            "type": "PropertyClaim",
            "name": "1",
            "property_claims": [],
            "evidence": [],
            "strategies": []
        }],
        "strategies": []
    }]
}"#;

#[test]
fn evidence_added_to_claim() {
    let mut case = AssuranceCase::from_json(SINGLE_CLAIM).unwrap();
    assert!(add_evidence_to_claim(&mut case, NodeId(2), Evidence::new(10, "E0")));

    let value = case.to_value().unwrap();
    let evidence = &value["goals"][0]["property_claims"][0]["evidence"];
    assert_eq!(evidence[0]["id"], json!(10));
    assert_eq!(evidence[0]["name"], json!("E0"));
    assert_eq!(evidence.as_array().map(Vec::len), Some(1));
}

#[test]
fn claim_removed_by_kind_and_id() {
    let case = Arc::new(AssuranceCase::from_json(SINGLE_CLAIM).unwrap());
    let next = remove_node(&case, NodeId(2), NodeKind::PropertyClaim);

    let value = next.to_value().unwrap();
    assert_eq!(value["goals"][0]["property_claims"], json!([]));
}

#[test]
fn no_op_update_returns_input() {
    let case = Arc::new(sample_case());
    for kind in [
        UpdateKind::Goal,
        UpdateKind::Strategy,
        UpdateKind::Property,
        UpdateKind::Evidence,
    ] {
        let next = update_node(&case, kind, NodeId(4040), &NodePatch::new().with_name("x"));
        assert!(Arc::ptr_eq(&case, &next), "{kind:?}");
        assert_eq!(*next, *case);
    }
}

#[test]
fn untouched_branches_keep_their_allocation() {
    let case = Arc::new(sample_case());
    let patch = NodePatch::new().with_description("checked");
    let next = update_node(&case, UpdateKind::Property, NodeId(11), &patch);

    let (old_goal, new_goal) = (&case.goals[0], &next.goals[0]);
    assert!(!Arc::ptr_eq(old_goal, new_goal));
    assert!(!Arc::ptr_eq(&old_goal.property_claims[0], &new_goal.property_claims[0]));
    assert!(Arc::ptr_eq(&old_goal.property_claims[1], &new_goal.property_claims[1]));
    assert!(Arc::ptr_eq(&old_goal.strategies[0], &new_goal.strategies[0]));
    assert!(Arc::ptr_eq(&old_goal.strategies[1], &new_goal.strategies[1]));
    assert!(Arc::ptr_eq(
        &old_goal.property_claims[0].evidence[0],
        &new_goal.property_claims[0].evidence[0]
    ));
    assert_eq!(new_goal.property_claims[0].property_claims[0].description, "checked");
}

#[test]
fn legacy_tag_matches_on_update() {
    let json = SINGLE_CLAIM.replace("\"PropertyClaim\"", "\"property_claim\"");
    let case = Arc::new(AssuranceCase::from_json(&json).unwrap());
    let next = update_node(
        &case,
        UpdateKind::parse("property"),
        NodeId(2),
        &NodePatch::new().with_name("1a"),
    );
    assert_eq!(next.goals[0].property_claims[0].name, "1a");
}

#[test]
fn claim_moved_under_sibling() {
    init_tracing();
    let case = Arc::new(sample_case());
    let patch = NodePatch::from_json_object(
        json!({"property_claim_id": 12, "goal_id": null})
            .as_object()
            .unwrap(),
    );
    let next = apply_update(&case, UpdateKind::Property, NodeId(10), &patch, true);

    let key = NodeKey::new(NodeKind::PropertyClaim, 10);
    assert_eq!(paths_of(&next, key).len(), 1);
    let goal = &next.goals[0];
    assert!(goal.property_claims.iter().all(|c| c.id != NodeId(10)));
    assert_eq!(goal.property_claims[0].id, NodeId(12));
    assert_eq!(goal.property_claims[0].property_claims[0].id, NodeId(10));
}

#[test]
fn next_claim_label_after_three() {
    let mut case = AssuranceCase::from_json(SINGLE_CLAIM).unwrap();
    let goal = Arc::make_mut(&mut case.goals[0]);
    goal.property_claims.clear();
    for (id, name) in [(2, "1"), (3, "2"), (4, "3")] {
        assert!(case_engine::insert::add_property_claim(
            &mut case,
            ParentRef::Goal(NodeId(1)),
            case_model::PropertyClaim::new(id, name),
        ));
    }

    let goal = find_node_by_key(&case, NodeKey::new(NodeKind::Goal, 1)).unwrap();
    let scheme = IdentifierScheme::default();
    assert_eq!(next_identifier(goal, ChildKind::PropertyClaim, &scheme), "4");
    assert_eq!(next_identifier(goal, ChildKind::Strategy, &scheme), "S1");
}

#[test]
fn reveal_leaves_sibling_hidden() {
    let case = Arc::new(hidden_chain_case());
    let next = reveal_ancestors(&case, NodeKey::new(NodeKind::PropertyClaim, 3));

    let hidden: Vec<(i64, bool)> = next
        .walk()
        .map(|(_, node)| (node.id().get(), node.visibility().hidden))
        .collect();
    assert_eq!(hidden, vec![(1, false), (2, false), (3, false), (4, true)]);
}

#[test]
fn toggle_round_trip_restores_document() {
    let mut case = sample_case();
    let claim = Arc::make_mut(&mut Arc::make_mut(&mut case.goals[0]).property_claims[0]);
    Arc::make_mut(&mut claim.evidence[1]).visibility.hidden = true;
    let case = Arc::new(case);

    let collapsed = toggle_subtree_visibility(&case, NodeId(1));
    assert!(collapsed.walk().skip(1).all(|(_, node)| node.visibility().hidden));

    let expanded = toggle_subtree_visibility(&collapsed, NodeId(1));
    assert_eq!(*expanded, *case);
    assert!(expanded.goals[0].property_claims[0].evidence[1].visibility.hidden);
}
