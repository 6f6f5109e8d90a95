//! Immutable mutator
//!
//! Produces a new document version with one node's fields changed. The
//! input document is never touched; the nodes on the path from root to the
//! changed node are copied, every other subtree is shared with the input.

use crate::locate::path_of;
use crate::relocate::move_node;
use case_model::{
    AssuranceCase, Extra, NodeId, NodeKey, NodeKind, NodeMut, ParentRef, RESERVED_KEYS,
};
use serde_json::Value;
use std::sync::Arc;

/// Which collection an update targets
///
/// Unrecognised names fall back to [`UpdateKind::Goal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// The top-level goal
    Goal,
    /// A strategy at any depth
    Strategy,
    /// A property claim at any depth
    Property,
    /// An evidence leaf
    Evidence,
}

impl UpdateKind {
    /// Interpret a UI kind name, case-insensitively
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.parse::<NodeKind>() {
            Ok(kind) => Self::from(kind),
            Err(_) => UpdateKind::Goal,
        }
    }

    /// Node kind this update targets
    #[inline]
    #[must_use]
    pub fn node_kind(self) -> NodeKind {
        match self {
            UpdateKind::Goal => NodeKind::Goal,
            UpdateKind::Strategy => NodeKind::Strategy,
            UpdateKind::Property => NodeKind::PropertyClaim,
            UpdateKind::Evidence => NodeKind::Evidence,
        }
    }

    /// Key of the target node
    #[inline]
    #[must_use]
    pub fn key(self, id: NodeId) -> NodeKey {
        NodeKey::new(self.node_kind(), id)
    }
}

impl From<NodeKind> for UpdateKind {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Goal => UpdateKind::Goal,
            NodeKind::Strategy => UpdateKind::Strategy,
            NodeKind::PropertyClaim => UpdateKind::Property,
            NodeKind::Evidence => UpdateKind::Evidence,
        }
    }
}

/// Partial update to a node
///
/// `None` leaves a field alone. Parent references use a nested option so a
/// patch can both set (`Some(Some(id))`) and clear (`Some(None)`) them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    /// New display identifier
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Goal context tags
    pub context: Option<Vec<String>>,
    /// Goal parent reference
    pub goal_id: Option<Option<NodeId>>,
    /// Strategy parent reference
    pub strategy_id: Option<Option<NodeId>>,
    /// Property-claim parent reference of a claim or strategy
    pub property_claim_id: Option<Option<NodeId>>,
    /// Evidence's list-valued `property_claim_id`
    pub evidence_claims: Option<Vec<NodeId>>,
    /// New `hidden` flag
    pub hidden: Option<bool>,
    /// New `childrenHidden` flag
    pub children_hidden: Option<bool>,
    /// Saved pre-collapse `hidden`; `Some(None)` clears it
    pub original_hidden: Option<Option<bool>>,
    /// Unmodelled fields, merged key by key; reserved keys are skipped
    pub extra: Extra,
}

impl NodePatch {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = Some(context);
        self
    }

    /// Point at a new parent, clearing the other references
    #[must_use]
    pub fn with_parent(mut self, parent: ParentRef) -> Self {
        self.goal_id = Some(None);
        self.strategy_id = Some(None);
        self.property_claim_id = Some(None);
        match parent {
            ParentRef::Goal(id) => self.goal_id = Some(Some(id)),
            ParentRef::Strategy(id) => self.strategy_id = Some(Some(id)),
            ParentRef::PropertyClaim(id) => {
                self.property_claim_id = Some(Some(id));
                self.evidence_claims = Some(vec![id]);
            }
        }
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Carry an unmodelled field; keys the typed fields own are dropped
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !is_reserved(&key) {
            self.extra.insert(key, value);
        }
        self
    }

    /// Build a patch from a JSON object sent by the UI.
    ///
    /// Known keys become typed fields; `property_claim_id` is read as a list
    /// when it is an array (evidence) and as a scalar otherwise. Identity and
    /// child collections are dropped. Everything else lands in
    /// [`NodePatch::extra`].
    #[must_use]
    pub fn from_json_object(object: &serde_json::Map<String, Value>) -> Self {
        let mut patch = Self::new();
        for (key, value) in object {
            match key.as_str() {
                "name" => patch.name = value.as_str().map(str::to_string),
                "description" => patch.description = value.as_str().map(str::to_string),
                "context" => {
                    patch.context = value.as_array().map(|items| {
                        items
                            .iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect()
                    });
                }
                "goal_id" => patch.goal_id = Some(value.as_i64().map(NodeId)),
                "strategy_id" => patch.strategy_id = Some(value.as_i64().map(NodeId)),
                "property_claim_id" => match value.as_array() {
                    Some(items) => {
                        patch.evidence_claims =
                            Some(items.iter().filter_map(Value::as_i64).map(NodeId).collect());
                    }
                    None => patch.property_claim_id = Some(value.as_i64().map(NodeId)),
                },
                "hidden" => patch.hidden = value.as_bool(),
                "childrenHidden" => patch.children_hidden = value.as_bool(),
                "originalHidden" => patch.original_hidden = Some(value.as_bool()),
                // Identity and structure are never patched
                other if is_reserved(other) => {}
                _ => {
                    patch.extra.insert(key.clone(), value.clone());
                }
            }
        }
        patch
    }

    /// Parent the patch assigns, in priority goal, strategy, property claim
    #[must_use]
    pub fn parent(&self) -> Option<ParentRef> {
        ParentRef::from_fields(
            self.goal_id.flatten(),
            self.strategy_id.flatten(),
            self.property_claim_id.flatten(),
        )
    }

    /// Evidence destination: first element of the list, else the scalar
    #[must_use]
    pub fn evidence_parent(&self) -> Option<NodeId> {
        self.evidence_claims
            .as_ref()
            .and_then(|claims| claims.first().copied())
            .or_else(|| self.property_claim_id.flatten())
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn merge_extra(target: &mut Extra, patch: &Extra) {
    for (key, value) in patch.iter().filter(|(key, _)| !is_reserved(key)) {
        target.insert(key.clone(), value.clone());
    }
}

/// Merge `patch` into a node in place; fields the node lacks are ignored
pub fn apply_patch(node: NodeMut<'_>, patch: &NodePatch) {
    match node {
        NodeMut::Goal(goal) => {
            if let Some(name) = &patch.name {
                goal.name.clone_from(name);
            }
            if let Some(description) = &patch.description {
                goal.description.clone_from(description);
            }
            if let Some(context) = &patch.context {
                goal.context.clone_from(context);
            }
            apply_visibility(&mut goal.visibility, patch);
            merge_extra(&mut goal.extra, &patch.extra);
        }
        NodeMut::Strategy(strategy) => {
            if let Some(name) = &patch.name {
                strategy.name.clone_from(name);
            }
            if let Some(description) = &patch.description {
                strategy.description.clone_from(description);
            }
            if let Some(goal_id) = patch.goal_id {
                strategy.goal_id = goal_id;
            }
            if let Some(claim_id) = patch.property_claim_id {
                strategy.property_claim_id = claim_id;
            }
            apply_visibility(&mut strategy.visibility, patch);
            merge_extra(&mut strategy.extra, &patch.extra);
        }
        NodeMut::PropertyClaim(claim) => {
            if let Some(name) = &patch.name {
                claim.name.clone_from(name);
            }
            if let Some(description) = &patch.description {
                claim.description.clone_from(description);
            }
            if let Some(goal_id) = patch.goal_id {
                claim.goal_id = goal_id;
            }
            if let Some(strategy_id) = patch.strategy_id {
                claim.strategy_id = strategy_id;
            }
            if let Some(claim_id) = patch.property_claim_id {
                claim.property_claim_id = claim_id;
            }
            apply_visibility(&mut claim.visibility, patch);
            merge_extra(&mut claim.extra, &patch.extra);
        }
        NodeMut::Evidence(evidence) => {
            if let Some(name) = &patch.name {
                evidence.name.clone_from(name);
            }
            if let Some(description) = &patch.description {
                evidence.description.clone_from(description);
            }
            if let Some(claims) = &patch.evidence_claims {
                evidence.property_claim_id.clone_from(claims);
            } else if let Some(Some(claim_id)) = patch.property_claim_id {
                evidence.property_claim_id = vec![claim_id];
            }
            apply_visibility(&mut evidence.visibility, patch);
            merge_extra(&mut evidence.extra, &patch.extra);
        }
    }
}

fn apply_visibility(visibility: &mut case_model::Visibility, patch: &NodePatch) {
    if let Some(hidden) = patch.hidden {
        visibility.hidden = hidden;
    }
    if let Some(children_hidden) = patch.children_hidden {
        visibility.children_hidden = children_hidden;
    }
    if let Some(original_hidden) = patch.original_hidden {
        visibility.original_hidden = original_hidden;
    }
}

/// New document with the first `kind` node whose id is `id` patched
///
/// Property claims and evidence are searched under the goal's own claims
/// first, then under each strategy. Returns `Arc::clone(case)` when nothing
/// matches, so callers can detect the no-op with [`Arc::ptr_eq`].
#[must_use]
pub fn update_node(
    case: &Arc<AssuranceCase>,
    kind: UpdateKind,
    id: NodeId,
    patch: &NodePatch,
) -> Arc<AssuranceCase> {
    let key = kind.key(id);
    let Some(path) = path_of(case, key) else {
        tracing::debug!(%key, "update target not found");
        return Arc::clone(case);
    };

    tracing::debug!(%key, %path, "updating node");
    let mut next = Arc::clone(case);
    if let Some(node) = Arc::make_mut(&mut next).node_at_mut(&path) {
        apply_patch(node, patch);
    }
    next
}

/// Update in place, or reparent when `moving` is set
///
/// Only property claims and evidence can move; other kinds are updated in
/// place regardless of the flag.
#[must_use]
pub fn apply_update(
    case: &Arc<AssuranceCase>,
    kind: UpdateKind,
    id: NodeId,
    patch: &NodePatch,
    moving: bool,
) -> Arc<AssuranceCase> {
    if moving && matches!(kind, UpdateKind::Property | UpdateKind::Evidence) {
        move_node(case, kind, id, patch)
    } else {
        update_node(case, kind, id, patch)
    }
}
