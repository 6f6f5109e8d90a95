//! Engine facade
//!
//! Bundles an [`EngineConfig`] with the tree operations so UI code can hold
//! one handle instead of threading the identifier scheme and API prefix
//! through every call.

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::gateway::{self, ElementRequest, ParentPayload};
use crate::identifier::{self, ChildKind};
use crate::mutate::{self, NodePatch, UpdateKind};
use crate::{insert, relocate, remove, visibility};
use case_model::{validate, AssuranceCase, Node, NodeId, NodeKey, NodeKind, NodeRef, ParentRef};
use std::sync::Arc;

/// Assurance-case tree engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create engine with configuration
    #[inline]
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a document received from the backend
    ///
    /// With `validate_on_load` set, tree-invariant violations are logged as
    /// warnings; they never fail the load.
    ///
    /// # Errors
    /// Returns error on malformed JSON or an unknown type tag
    pub fn load(&self, json: &str) -> EngineResult<Arc<AssuranceCase>> {
        let case = AssuranceCase::from_json(json)?;
        tracing::info!(case = case.id, nodes = case.node_count(), "loaded assurance case");

        if self.config.validate_on_load {
            let report = validate(&case);
            for violation in report.iter() {
                tracing::warn!(case = case.id, %violation, "document violates tree invariant");
            }
        }
        Ok(Arc::new(case))
    }

    /// Patch a node, or move it when `moving` is set
    #[must_use]
    pub fn update(
        &self,
        case: &Arc<AssuranceCase>,
        kind: UpdateKind,
        id: NodeId,
        patch: &NodePatch,
        moving: bool,
    ) -> Arc<AssuranceCase> {
        mutate::apply_update(case, kind, id, patch, moving)
    }

    #[must_use]
    pub fn move_node(
        &self,
        case: &Arc<AssuranceCase>,
        kind: UpdateKind,
        id: NodeId,
        patch: &NodePatch,
    ) -> Arc<AssuranceCase> {
        relocate::move_node(case, kind, id, patch)
    }

    #[must_use]
    pub fn remove(&self, case: &Arc<AssuranceCase>, id: NodeId, kind: NodeKind) -> Arc<AssuranceCase> {
        remove::remove_node(case, id, kind)
    }

    #[must_use]
    pub fn insert(&self, case: &Arc<AssuranceCase>, parent: ParentRef, child: Node) -> Arc<AssuranceCase> {
        insert::insert_child(case, parent, child)
    }

    #[must_use]
    pub fn reveal(&self, case: &Arc<AssuranceCase>, target: NodeKey) -> Arc<AssuranceCase> {
        visibility::reveal_ancestors(case, target)
    }

    #[must_use]
    pub fn toggle(&self, case: &Arc<AssuranceCase>, id: NodeId) -> Arc<AssuranceCase> {
        visibility::toggle_subtree_visibility(case, id)
    }

    /// Label for a new child using the configured scheme
    #[must_use]
    pub fn next_identifier(&self, parent: NodeRef<'_>, child: ChildKind) -> String {
        identifier::next_identifier(parent, child, &self.config.identifiers)
    }

    /// Attach request for an orphan element
    ///
    /// # Errors
    /// Returns error if the orphan cannot hang under `parent`
    pub fn attach(
        &self,
        element: NodeId,
        orphan_type: &str,
        parent: NodeRef<'_>,
    ) -> EngineResult<ElementRequest> {
        let payload = gateway::build_attach_payload(orphan_type, parent)?;
        gateway::attach_request(&self.config.api_prefix, element, &payload)
    }

    /// Detach request for a node
    ///
    /// # Errors
    /// Returns error if the type does not match or the node has no parent
    pub fn detach(&self, node: NodeRef<'_>, element_type: &str) -> EngineResult<ElementRequest> {
        let payload: ParentPayload = gateway::build_detach_payload(node, element_type)?;
        gateway::detach_request(&self.config.api_prefix, node.id(), &payload)
    }

    /// Request persisting the whole document
    ///
    /// # Errors
    /// Returns error if the document cannot be encoded
    pub fn save(&self, case: &AssuranceCase) -> EngineResult<ElementRequest> {
        gateway::update_case_request(&self.config.api_prefix, case)
    }

    #[must_use]
    pub fn delete(&self, element: NodeId) -> ElementRequest {
        gateway::delete_element_request(&self.config.api_prefix, element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentifierScheme;
    use crate::gateway::Method;
    use crate::locate::find_node_by_key;
    use case_test_utils::init_tracing;

    const DOCUMENT: &str = r#"{
        "id": 3,
        "name": "engine",
        "goals": [{
            "id": 1,
            "type": "TopLevelNormativeGoal",
            "name": "G1",
            "property_claims": [{
                "id": 2,
                "type": "property_claim",
                "name": "1",
                "goal_id": 1,
                "strategy_id": 9
            }]
        }]
    }"#;

    #[test]
    fn load_tolerates_violations() {
        init_tracing();
        let engine = Engine::default();
        let case = engine.load(DOCUMENT).unwrap();
        assert_eq!(case.node_count(), 2);
        assert!(!validate(&case).is_valid());
    }

    #[test]
    fn load_rejects_unknown_tag() {
        let engine = Engine::default();
        assert!(engine.load(r#"{"id": 1, "goals": [{"id": 1, "type": "Context"}]}"#).is_err());
    }

    #[test]
    fn configured_prefixes_flow_through() {
        let config = EngineConfig::new()
            .with_api_prefix("/backend")
            .with_identifiers(IdentifierScheme {
                strategy_prefix: "Str".to_string(),
                ..IdentifierScheme::default()
            });
        let engine = Engine::new(config);
        let case = engine.load(DOCUMENT).unwrap();
        let goal = find_node_by_key(&case, NodeKey::new(NodeKind::Goal, 1)).unwrap();

        assert_eq!(engine.next_identifier(goal, ChildKind::Strategy), "Str1");

        let request = engine.attach(NodeId(8), "strategy", goal).unwrap();
        assert_eq!(request.path, "/backend/elements/8/attach");

        let claim = find_node_by_key(&case, NodeKey::new(NodeKind::PropertyClaim, 2)).unwrap();
        let request = engine.detach(claim, "PropertyClaim").unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/backend/elements/2/detach");
        assert_eq!(request.body, Some(serde_json::json!({"goal_id": 1})));

        assert_eq!(engine.delete(NodeId(2)).path, "/backend/elements/2");
        assert_eq!(engine.save(&case).unwrap().path, "/backend/cases/3/");
    }

    #[test]
    fn edit_cycle() {
        let engine = Engine::default();
        let case = engine.load(DOCUMENT).unwrap();

        let next = engine.insert(&case, ParentRef::PropertyClaim(NodeId(2)), case_model::Evidence::new(5, "E0").into());
        let next = engine.toggle(&next, NodeId(2));
        assert!(next.goals[0].property_claims[0].evidence[0].visibility.hidden);

        let next = engine.reveal(&next, NodeKey::new(NodeKind::Evidence, 5));
        assert!(!next.goals[0].property_claims[0].evidence[0].visibility.hidden);

        let next = engine.update(
            &next,
            UpdateKind::Evidence,
            NodeId(5),
            &NodePatch::new().with_name("E7"),
            false,
        );
        assert_eq!(next.goals[0].property_claims[0].evidence[0].name, "E7");

        let next = engine.remove(&next, NodeId(5), NodeKind::Evidence);
        assert!(next.goals[0].property_claims[0].evidence.is_empty());
        assert_eq!(case.goals[0].property_claims[0].evidence.len(), 0);
    }
}
