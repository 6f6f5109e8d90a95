use case_model::{validate, AssuranceCase, NodeId, NodeKind, NodePath, Violation};
use pretty_assertions::assert_eq;

const LEGACY_DOCUMENT: &str = r#"{
    "id": 12,
    "name": "Pump controller",
    "permissions": "edit",
    "published": false,
    "goals": [{
        "id": 1,
        "type": "TopLevelNormativeGoal",
        "name": "G1",
        "description": "The pump is acceptably safe",
        "context": ["Operating envelope", "Maintenance regime"],
        "property_claims": [{
            "id": 2,
            "type": "property_claim",
            "name": "1",
            "goal_id": 1,
            "strategy_id": null,
            "property_claim_id": null,
            "evidence": [{
                "id": 10,
                "type": "Evidence",
                "name": "E0",
                "property_claim_id": [2],
                "URL": "https://example.org/report.pdf"
            }]
        }],
        "strategies": [{
            "id": 3,
            "type": "Strategy",
            "name": "S1",
            "goal_id": 1,
            "property_claims": [{
                "id": 4,
                "type": "PropertyClaim",
                "name": "2",
                "strategy_id": 3,
                "property_claims": [{
                    "id": 5,
                    "type": "propertyclaim",
                    "name": "2.1",
                    "property_claim_id": 4
                }]
            }]
        }]
    }],
    "comments": [{"id": 1, "author": "reviewer", "content": "Check E0"}]
}"#;

#[test]
fn legacy_document_loads_and_validates() {
    let case = AssuranceCase::from_json(LEGACY_DOCUMENT).unwrap();

    assert_eq!(case.node_count(), 6);
    assert_eq!(case.goals[0].context.len(), 2);
    assert_eq!(case.comments[0].content, "Check E0");

    let report = validate(&case);
    assert!(report.is_valid(), "{:?}", report.violations());
}

#[test]
fn nested_claim_is_addressable() {
    let case = AssuranceCase::from_json(LEGACY_DOCUMENT).unwrap();
    let path: NodePath = "goals.0.strategies.0.property_claims.0.property_claims.0"
        .parse()
        .unwrap();

    let node = case.node_at(&path).unwrap();
    assert_eq!(node.kind(), NodeKind::PropertyClaim);
    assert_eq!(node.id(), NodeId(5));
    assert_eq!(node.name(), "2.1");
}

#[test]
fn evidence_extra_fields_survive_round_trip() {
    let case = AssuranceCase::from_json(LEGACY_DOCUMENT).unwrap();
    let json = case.to_json().unwrap();
    let reparsed = AssuranceCase::from_json(&json).unwrap();

    let evidence = &reparsed.goals[0].property_claims[0].evidence[0];
    assert_eq!(evidence.extra["URL"], "https://example.org/report.pdf");
    assert_eq!(reparsed, case);
}

#[test]
fn evidence_with_two_parents_is_reported() {
    let json = LEGACY_DOCUMENT.replace("\"property_claim_id\": [2]", "\"property_claim_id\": [2, 4]");
    let case = AssuranceCase::from_json(&json).unwrap();

    let report = validate(&case);
    assert_eq!(report.len(), 1);
    assert!(matches!(
        report.violations()[0],
        Violation::ParentReferenceCount { count: 2, .. }
    ));
}

#[test]
fn null_collections_load_as_empty() {
    let json = r#"{
        "id": 1,
        "name": null,
        "comments": null,
        "goals": [{
            "id": 1,
            "context": null,
            "strategies": null,
            "property_claims": [{
                "id": 2,
                "name": "1",
                "goal_id": 1,
                "property_claims": null,
                "strategies": null,
                "evidence": [{"id": 3, "name": "E0", "property_claim_id": [2]}]
            }]
        }]
    }"#;
    let case = AssuranceCase::from_json(json).unwrap();

    assert_eq!(case.name, "");
    assert!(case.comments.is_empty());
    assert!(case.goals[0].strategies.is_empty());
    assert!(case.goals[0].context.is_empty());
    assert!(case.goals[0].property_claims[0].property_claims.is_empty());
    assert_eq!(case.node_count(), 3);
    assert!(validate(&case).is_valid());
}

#[test]
fn null_strings_load_as_empty() {
    let json = r#"{
        "id": 1,
        "description": null,
        "goals": [{
            "id": 1,
            "name": null,
            "description": null,
            "hidden": null,
            "property_claims": [{
                "id": 2,
                "description": null,
                "goal_id": 1,
                "evidence": [{"id": 3, "description": null, "property_claim_id": null}]
            }]
        }],
        "comments": [{"id": 1, "content": null}]
    }"#;
    let case = AssuranceCase::from_json(json).unwrap();
    let goal = &case.goals[0];

    assert_eq!(goal.name, "");
    assert_eq!(goal.description, "");
    assert!(!goal.visibility.hidden);
    assert_eq!(goal.property_claims[0].description, "");
    assert!(goal.property_claims[0].evidence[0].property_claim_id.is_empty());
    assert_eq!(case.comments[0].content, "");

    let reparsed = AssuranceCase::from_json(&case.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, case);
}
