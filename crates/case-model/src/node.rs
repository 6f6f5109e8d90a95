//! Typed assurance-case nodes
//!
//! Provides the four node structs plus three views over them:
//! - [`NodeRef`]: borrowed, kind-erased view used by traversal
//! - [`NodeMut`]: mutable view that copies-on-write as it descends
//! - [`Node`]: owned, detached node (an [`Arc`] of one of the structs)
//!
//! Children are held behind [`Arc`] so two document versions share every
//! subtree an edit did not touch.

use crate::kind::{NodeId, NodeKey, NodeKind};
use crate::path::Slot;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Backend fields the model does not name, kept verbatim
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Wire keys owned by typed node fields; these never belong in [`Extra`]
pub const RESERVED_KEYS: &[&str] = &[
    "id",
    "type",
    "name",
    "description",
    "context",
    "goal_id",
    "strategy_id",
    "property_claim_id",
    "strategies",
    "property_claims",
    "evidence",
    "hidden",
    "childrenHidden",
    "originalHidden",
];

/// Read an explicit `null` as the field's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Runtime-only collapse state grafted onto every node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    /// Node is hidden in the tree view
    #[serde(default, deserialize_with = "null_as_default")]
    pub hidden: bool,

    /// Node's subtree is collapsed
    #[serde(default, deserialize_with = "null_as_default")]
    pub children_hidden: bool,

    /// `hidden` as it was before an ancestor collapsed the subtree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_hidden: Option<bool>,
}

/// Current parent of a non-goal node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Parent is a goal (`goal_id`)
    Goal(NodeId),
    /// Parent is a strategy (`strategy_id`)
    Strategy(NodeId),
    /// Parent is a property claim (`property_claim_id`)
    PropertyClaim(NodeId),
}

impl ParentRef {
    /// Parent's id
    #[inline]
    #[must_use]
    pub fn id(self) -> NodeId {
        match self {
            ParentRef::Goal(id) | ParentRef::Strategy(id) | ParentRef::PropertyClaim(id) => id,
        }
    }

    /// Parent's kind
    #[inline]
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            ParentRef::Goal(_) => NodeKind::Goal,
            ParentRef::Strategy(_) => NodeKind::Strategy,
            ParentRef::PropertyClaim(_) => NodeKind::PropertyClaim,
        }
    }

    /// Parent's key
    #[inline]
    #[must_use]
    pub fn key(self) -> NodeKey {
        NodeKey::new(self.kind(), self.id())
    }

    /// Reference to the node identified by `key`, if that kind can parent
    #[inline]
    #[must_use]
    pub fn of(key: NodeKey) -> Option<Self> {
        match key.kind {
            NodeKind::Goal => Some(ParentRef::Goal(key.id)),
            NodeKind::Strategy => Some(ParentRef::Strategy(key.id)),
            NodeKind::PropertyClaim => Some(ParentRef::PropertyClaim(key.id)),
            NodeKind::Evidence => None,
        }
    }

    /// First non-null reference, in priority goal, strategy, property claim
    #[inline]
    #[must_use]
    pub fn from_fields(
        goal_id: Option<NodeId>,
        strategy_id: Option<NodeId>,
        property_claim_id: Option<NodeId>,
    ) -> Option<Self> {
        goal_id
            .map(ParentRef::Goal)
            .or_else(|| strategy_id.map(ParentRef::Strategy))
            .or_else(|| property_claim_id.map(ParentRef::PropertyClaim))
    }
}

impl Display for ParentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

fn goal_tag() -> NodeKind {
    NodeKind::Goal
}

fn strategy_tag() -> NodeKind {
    NodeKind::Strategy
}

fn claim_tag() -> NodeKind {
    NodeKind::PropertyClaim
}

fn evidence_tag() -> NodeKind {
    NodeKind::Evidence
}

/// Top-level claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Backend id, unique among goals
    pub id: NodeId,

    /// Type tag as read from the wire
    #[serde(rename = "type", default = "goal_tag")]
    pub tag: NodeKind,

    /// Display identifier such as `G1`
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Claim text
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Context tags (plain strings, not nodes)
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: Vec<String>,

    /// Strategies decomposing the goal
    #[serde(default, deserialize_with = "null_as_default")]
    pub strategies: Vec<Arc<Strategy>>,

    /// Claims attached directly to the goal
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_claims: Vec<Arc<PropertyClaim>>,

    /// Collapse state
    #[serde(flatten)]
    pub visibility: Visibility,

    /// Unmodelled backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Goal {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: NodeKind::Goal,
            name: name.into(),
            description: String::new(),
            context: Vec::new(),
            strategies: Vec::new(),
            property_claims: Vec::new(),
            visibility: Visibility::default(),
            extra: Extra::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::new(NodeKind::Goal, self.id)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Append a strategy, pointing its `goal_id` here
    #[must_use]
    pub fn with_strategy(mut self, mut strategy: Strategy) -> Self {
        strategy.set_parent(ParentRef::Goal(self.id));
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Append a property claim, pointing its `goal_id` here
    #[must_use]
    pub fn with_property_claim(mut self, mut claim: PropertyClaim) -> Self {
        claim.set_parent(ParentRef::Goal(self.id));
        self.property_claims.push(Arc::new(claim));
        self
    }
}

/// Intermediate reasoning step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Backend id, unique among strategies
    pub id: NodeId,

    /// Type tag as read from the wire
    #[serde(rename = "type", default = "strategy_tag")]
    pub tag: NodeKind,

    /// Display identifier such as `S1`
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Reasoning text
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Set when the strategy hangs under a goal
    #[serde(default)]
    pub goal_id: Option<NodeId>,

    /// Set when the strategy hangs under a property claim
    #[serde(default)]
    pub property_claim_id: Option<NodeId>,

    /// Claims the strategy decomposes into
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_claims: Vec<Arc<PropertyClaim>>,

    /// Collapse state
    #[serde(flatten)]
    pub visibility: Visibility,

    /// Unmodelled backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Strategy {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: NodeKind::Strategy,
            name: name.into(),
            description: String::new(),
            goal_id: None,
            property_claim_id: None,
            property_claims: Vec::new(),
            visibility: Visibility::default(),
            extra: Extra::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::new(NodeKind::Strategy, self.id)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<ParentRef> {
        ParentRef::from_fields(self.goal_id, None, self.property_claim_id)
    }

    /// Number of non-null parent references
    #[inline]
    #[must_use]
    pub fn parent_reference_count(&self) -> usize {
        usize::from(self.goal_id.is_some()) + usize::from(self.property_claim_id.is_some())
    }

    /// Point the strategy at a new parent, clearing the other reference.
    /// Returns `false` (and changes nothing) for a strategy parent.
    pub fn set_parent(&mut self, parent: ParentRef) -> bool {
        match parent {
            ParentRef::Goal(id) => {
                self.goal_id = Some(id);
                self.property_claim_id = None;
            }
            ParentRef::PropertyClaim(id) => {
                self.goal_id = None;
                self.property_claim_id = Some(id);
            }
            ParentRef::Strategy(_) => return false,
        }
        true
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a property claim, pointing its `strategy_id` here
    #[must_use]
    pub fn with_property_claim(mut self, mut claim: PropertyClaim) -> Self {
        claim.set_parent(ParentRef::Strategy(self.id));
        self.property_claims.push(Arc::new(claim));
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.visibility.hidden = hidden;
        self
    }
}

/// Sub-claim, nestable under a goal, strategy or another claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyClaim {
    /// Backend id, unique among property claims
    pub id: NodeId,

    /// Type tag as read from the wire
    #[serde(rename = "type", default = "claim_tag")]
    pub tag: NodeKind,

    /// Display identifier such as `1` or `1.2`
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Claim text
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Set when the claim hangs under a goal
    #[serde(default)]
    pub goal_id: Option<NodeId>,

    /// Set when the claim hangs under a strategy
    #[serde(default)]
    pub strategy_id: Option<NodeId>,

    /// Set when the claim hangs under another claim
    #[serde(default)]
    pub property_claim_id: Option<NodeId>,

    /// Nested claims
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_claims: Vec<Arc<PropertyClaim>>,

    /// Sub-strategies
    #[serde(default, deserialize_with = "null_as_default")]
    pub strategies: Vec<Arc<Strategy>>,

    /// Supporting evidence
    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence: Vec<Arc<Evidence>>,

    /// Collapse state
    #[serde(flatten)]
    pub visibility: Visibility,

    /// Unmodelled backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl PropertyClaim {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: NodeKind::PropertyClaim,
            name: name.into(),
            description: String::new(),
            goal_id: None,
            strategy_id: None,
            property_claim_id: None,
            property_claims: Vec::new(),
            strategies: Vec::new(),
            evidence: Vec::new(),
            visibility: Visibility::default(),
            extra: Extra::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::new(NodeKind::PropertyClaim, self.id)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<ParentRef> {
        ParentRef::from_fields(self.goal_id, self.strategy_id, self.property_claim_id)
    }

    /// Number of non-null parent references
    #[inline]
    #[must_use]
    pub fn parent_reference_count(&self) -> usize {
        usize::from(self.goal_id.is_some())
            + usize::from(self.strategy_id.is_some())
            + usize::from(self.property_claim_id.is_some())
    }

    /// Point the claim at a new parent, clearing the other references
    pub fn set_parent(&mut self, parent: ParentRef) -> bool {
        self.goal_id = None;
        self.strategy_id = None;
        self.property_claim_id = None;
        match parent {
            ParentRef::Goal(id) => self.goal_id = Some(id),
            ParentRef::Strategy(id) => self.strategy_id = Some(id),
            ParentRef::PropertyClaim(id) => self.property_claim_id = Some(id),
        }
        true
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a nested claim, pointing its `property_claim_id` here
    #[must_use]
    pub fn with_property_claim(mut self, mut claim: PropertyClaim) -> Self {
        claim.set_parent(ParentRef::PropertyClaim(self.id));
        self.property_claims.push(Arc::new(claim));
        self
    }

    /// Append a sub-strategy, pointing its `property_claim_id` here
    #[must_use]
    pub fn with_strategy(mut self, mut strategy: Strategy) -> Self {
        strategy.set_parent(ParentRef::PropertyClaim(self.id));
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Append evidence, pointing its `property_claim_id` here
    #[must_use]
    pub fn with_evidence(mut self, mut evidence: Evidence) -> Self {
        evidence.set_parent(self.id);
        self.evidence.push(Arc::new(evidence));
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.visibility.hidden = hidden;
        self
    }
}

/// Leaf node supporting a property claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Backend id, unique among evidence
    pub id: NodeId,

    /// Type tag as read from the wire
    #[serde(rename = "type", default = "evidence_tag")]
    pub tag: NodeKind,

    /// Display identifier such as `E0`
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Evidence summary
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Owning claim; a list on the wire, only the first element is read
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_claim_id: Vec<NodeId>,

    /// Collapse state
    #[serde(flatten)]
    pub visibility: Visibility,

    /// Unmodelled backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Evidence {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: NodeKind::Evidence,
            name: name.into(),
            description: String::new(),
            property_claim_id: Vec::new(),
            visibility: Visibility::default(),
            extra: Extra::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::new(NodeKind::Evidence, self.id)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<ParentRef> {
        self.property_claim_id
            .first()
            .copied()
            .map(ParentRef::PropertyClaim)
    }

    pub fn set_parent(&mut self, claim_id: NodeId) {
        self.property_claim_id = vec![claim_id];
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.visibility.hidden = hidden;
        self
    }
}

/// Owned node detached from any document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Owned goal
    Goal(Arc<Goal>),
    /// Owned strategy
    Strategy(Arc<Strategy>),
    /// Owned property claim
    PropertyClaim(Arc<PropertyClaim>),
    /// Owned evidence
    Evidence(Arc<Evidence>),
}

impl Node {
    /// Borrowed view of this node
    #[inline]
    #[must_use]
    pub fn view(&self) -> NodeRef<'_> {
        match self {
            Node::Goal(g) => NodeRef::Goal(g),
            Node::Strategy(s) => NodeRef::Strategy(s),
            Node::PropertyClaim(c) => NodeRef::PropertyClaim(c),
            Node::Evidence(e) => NodeRef::Evidence(e),
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.view().kind()
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.view().id()
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        self.view().key()
    }

    /// Mutable access, cloning the node if it is shared
    #[inline]
    pub fn make_mut(&mut self) -> NodeMut<'_> {
        match self {
            Node::Goal(g) => NodeMut::Goal(Arc::make_mut(g)),
            Node::Strategy(s) => NodeMut::Strategy(Arc::make_mut(s)),
            Node::PropertyClaim(c) => NodeMut::PropertyClaim(Arc::make_mut(c)),
            Node::Evidence(e) => NodeMut::Evidence(Arc::make_mut(e)),
        }
    }

    /// Rewrite the parent reference fields.
    /// Returns `false` if this node cannot live under `parent`.
    pub fn set_parent(&mut self, parent: ParentRef) -> bool {
        match (self, parent) {
            (Node::Goal(_), _) => false,
            (Node::Strategy(s), parent) => Arc::make_mut(s).set_parent(parent),
            (Node::PropertyClaim(c), parent) => Arc::make_mut(c).set_parent(parent),
            (Node::Evidence(e), ParentRef::PropertyClaim(id)) => {
                Arc::make_mut(e).set_parent(id);
                true
            }
            (Node::Evidence(_), _) => false,
        }
    }
}

impl From<Goal> for Node {
    fn from(goal: Goal) -> Self {
        Node::Goal(Arc::new(goal))
    }
}

impl From<Strategy> for Node {
    fn from(strategy: Strategy) -> Self {
        Node::Strategy(Arc::new(strategy))
    }
}

impl From<PropertyClaim> for Node {
    fn from(claim: PropertyClaim) -> Self {
        Node::PropertyClaim(Arc::new(claim))
    }
}

impl From<Evidence> for Node {
    fn from(evidence: Evidence) -> Self {
        Node::Evidence(Arc::new(evidence))
    }
}

/// Borrowed, kind-erased view of a node inside a document
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// Borrowed goal
    Goal(&'a Arc<Goal>),
    /// Borrowed strategy
    Strategy(&'a Arc<Strategy>),
    /// Borrowed property claim
    PropertyClaim(&'a Arc<PropertyClaim>),
    /// Borrowed evidence
    Evidence(&'a Arc<Evidence>),
}

impl<'a> NodeRef<'a> {
    /// Kind given by the node's position in the type system
    #[inline]
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Goal(_) => NodeKind::Goal,
            NodeRef::Strategy(_) => NodeKind::Strategy,
            NodeRef::PropertyClaim(_) => NodeKind::PropertyClaim,
            NodeRef::Evidence(_) => NodeKind::Evidence,
        }
    }

    /// Kind recorded in the node's `type` field
    #[inline]
    #[must_use]
    pub fn tag(self) -> NodeKind {
        match self {
            NodeRef::Goal(g) => g.tag,
            NodeRef::Strategy(s) => s.tag,
            NodeRef::PropertyClaim(c) => c.tag,
            NodeRef::Evidence(e) => e.tag,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(self) -> NodeId {
        match self {
            NodeRef::Goal(g) => g.id,
            NodeRef::Strategy(s) => s.id,
            NodeRef::PropertyClaim(c) => c.id,
            NodeRef::Evidence(e) => e.id,
        }
    }

    #[inline]
    #[must_use]
    pub fn key(self) -> NodeKey {
        NodeKey::new(self.kind(), self.id())
    }

    #[inline]
    #[must_use]
    pub fn name(self) -> &'a str {
        match self {
            NodeRef::Goal(g) => &g.name,
            NodeRef::Strategy(s) => &s.name,
            NodeRef::PropertyClaim(c) => &c.name,
            NodeRef::Evidence(e) => &e.name,
        }
    }

    #[inline]
    #[must_use]
    pub fn visibility(self) -> &'a Visibility {
        match self {
            NodeRef::Goal(g) => &g.visibility,
            NodeRef::Strategy(s) => &s.visibility,
            NodeRef::PropertyClaim(c) => &c.visibility,
            NodeRef::Evidence(e) => &e.visibility,
        }
    }

    /// Declared parent (goals have none)
    #[inline]
    #[must_use]
    pub fn parent(self) -> Option<ParentRef> {
        match self {
            NodeRef::Goal(_) => None,
            NodeRef::Strategy(s) => s.parent(),
            NodeRef::PropertyClaim(c) => c.parent(),
            NodeRef::Evidence(e) => e.parent(),
        }
    }

    /// Number of non-null parent references (list length for evidence)
    #[inline]
    #[must_use]
    pub fn parent_reference_count(self) -> usize {
        match self {
            NodeRef::Goal(_) => 0,
            NodeRef::Strategy(s) => s.parent_reference_count(),
            NodeRef::PropertyClaim(c) => c.parent_reference_count(),
            NodeRef::Evidence(e) => e.property_claim_id.len(),
        }
    }

    /// Whether both views point at the same shared allocation
    #[inline]
    #[must_use]
    pub fn ptr_eq(self, other: NodeRef<'_>) -> bool {
        match (self, other) {
            (NodeRef::Goal(a), NodeRef::Goal(b)) => Arc::ptr_eq(a, b),
            (NodeRef::Strategy(a), NodeRef::Strategy(b)) => Arc::ptr_eq(a, b),
            (NodeRef::PropertyClaim(a), NodeRef::PropertyClaim(b)) => Arc::ptr_eq(a, b),
            (NodeRef::Evidence(a), NodeRef::Evidence(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Detached handle sharing the same allocation
    #[inline]
    #[must_use]
    pub fn to_node(self) -> Node {
        match self {
            NodeRef::Goal(g) => Node::Goal(Arc::clone(g)),
            NodeRef::Strategy(s) => Node::Strategy(Arc::clone(s)),
            NodeRef::PropertyClaim(c) => Node::PropertyClaim(Arc::clone(c)),
            NodeRef::Evidence(e) => Node::Evidence(Arc::clone(e)),
        }
    }

    /// Child collections in document order
    #[inline]
    #[must_use]
    pub fn child_slots(self) -> &'static [Slot] {
        match self {
            NodeRef::Goal(_) => &[Slot::PropertyClaims, Slot::Strategies],
            NodeRef::Strategy(_) => &[Slot::PropertyClaims],
            NodeRef::PropertyClaim(_) => &[Slot::PropertyClaims, Slot::Evidence, Slot::Strategies],
            NodeRef::Evidence(_) => &[],
        }
    }

    /// Length of a child collection (zero if the node has no such slot)
    #[must_use]
    pub fn child_count(self, slot: Slot) -> usize {
        match (self, slot) {
            (NodeRef::Goal(g), Slot::Strategies) => g.strategies.len(),
            (NodeRef::Goal(g), Slot::PropertyClaims) => g.property_claims.len(),
            (NodeRef::Strategy(s), Slot::PropertyClaims) => s.property_claims.len(),
            (NodeRef::PropertyClaim(c), Slot::PropertyClaims) => c.property_claims.len(),
            (NodeRef::PropertyClaim(c), Slot::Evidence) => c.evidence.len(),
            (NodeRef::PropertyClaim(c), Slot::Strategies) => c.strategies.len(),
            _ => 0,
        }
    }

    /// Child at `index` of `slot`
    #[must_use]
    pub fn child(self, slot: Slot, index: usize) -> Option<NodeRef<'a>> {
        match (self, slot) {
            (NodeRef::Goal(g), Slot::Strategies) => g.strategies.get(index).map(NodeRef::Strategy),
            (NodeRef::Goal(g), Slot::PropertyClaims) => {
                g.property_claims.get(index).map(NodeRef::PropertyClaim)
            }
            (NodeRef::Strategy(s), Slot::PropertyClaims) => {
                s.property_claims.get(index).map(NodeRef::PropertyClaim)
            }
            (NodeRef::PropertyClaim(c), Slot::PropertyClaims) => {
                c.property_claims.get(index).map(NodeRef::PropertyClaim)
            }
            (NodeRef::PropertyClaim(c), Slot::Evidence) => {
                c.evidence.get(index).map(NodeRef::Evidence)
            }
            (NodeRef::PropertyClaim(c), Slot::Strategies) => {
                c.strategies.get(index).map(NodeRef::Strategy)
            }
            _ => None,
        }
    }

    /// Direct children in document order, with their slot and index
    pub fn children(self) -> impl Iterator<Item = (Slot, usize, NodeRef<'a>)> + 'a {
        self.child_slots().iter().flat_map(move |&slot| {
            (0..self.child_count(slot))
                .filter_map(move |index| self.child(slot, index).map(|c| (slot, index, c)))
        })
    }
}

/// Mutable view of a node inside a document
#[derive(Debug)]
pub enum NodeMut<'a> {
    /// Goal, already unshared
    Goal(&'a mut Goal),
    /// Strategy, already unshared
    Strategy(&'a mut Strategy),
    /// Property claim, already unshared
    PropertyClaim(&'a mut PropertyClaim),
    /// Evidence, already unshared
    Evidence(&'a mut Evidence),
}

fn take_child<T>(children: &mut Vec<Arc<T>>, index: usize) -> Option<Arc<T>> {
    (index < children.len()).then(|| children.remove(index))
}

impl<'a> NodeMut<'a> {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeMut::Goal(_) => NodeKind::Goal,
            NodeMut::Strategy(_) => NodeKind::Strategy,
            NodeMut::PropertyClaim(_) => NodeKind::PropertyClaim,
            NodeMut::Evidence(_) => NodeKind::Evidence,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            NodeMut::Goal(g) => g.id,
            NodeMut::Strategy(s) => s.id,
            NodeMut::PropertyClaim(c) => c.id,
            NodeMut::Evidence(e) => e.id,
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.kind(), self.id())
    }

    #[inline]
    pub fn visibility_mut(&mut self) -> &mut Visibility {
        match self {
            NodeMut::Goal(g) => &mut g.visibility,
            NodeMut::Strategy(s) => &mut s.visibility,
            NodeMut::PropertyClaim(c) => &mut c.visibility,
            NodeMut::Evidence(e) => &mut e.visibility,
        }
    }

    /// Shorter-lived view of the same node
    #[inline]
    pub fn reborrow(&mut self) -> NodeMut<'_> {
        match self {
            NodeMut::Goal(g) => NodeMut::Goal(&mut **g),
            NodeMut::Strategy(s) => NodeMut::Strategy(&mut **s),
            NodeMut::PropertyClaim(c) => NodeMut::PropertyClaim(&mut **c),
            NodeMut::Evidence(e) => NodeMut::Evidence(&mut **e),
        }
    }

    /// Descend into a child, cloning it first if it is shared
    pub fn child_mut(self, slot: Slot, index: usize) -> Option<NodeMut<'a>> {
        match (self, slot) {
            (NodeMut::Goal(g), Slot::Strategies) => g
                .strategies
                .get_mut(index)
                .map(|s| NodeMut::Strategy(Arc::make_mut(s))),
            (NodeMut::Goal(g), Slot::PropertyClaims) => g
                .property_claims
                .get_mut(index)
                .map(|c| NodeMut::PropertyClaim(Arc::make_mut(c))),
            (NodeMut::Strategy(s), Slot::PropertyClaims) => s
                .property_claims
                .get_mut(index)
                .map(|c| NodeMut::PropertyClaim(Arc::make_mut(c))),
            (NodeMut::PropertyClaim(p), Slot::PropertyClaims) => p
                .property_claims
                .get_mut(index)
                .map(|c| NodeMut::PropertyClaim(Arc::make_mut(c))),
            (NodeMut::PropertyClaim(p), Slot::Evidence) => p
                .evidence
                .get_mut(index)
                .map(|e| NodeMut::Evidence(Arc::make_mut(e))),
            (NodeMut::PropertyClaim(p), Slot::Strategies) => p
                .strategies
                .get_mut(index)
                .map(|s| NodeMut::Strategy(Arc::make_mut(s))),
            _ => None,
        }
    }

    /// Every direct child, each cloned first if shared
    pub fn into_children(self) -> Vec<NodeMut<'a>> {
        match self {
            NodeMut::Goal(Goal {
                property_claims,
                strategies,
                ..
            }) => property_claims
                .iter_mut()
                .map(|c| NodeMut::PropertyClaim(Arc::make_mut(c)))
                .chain(
                    strategies
                        .iter_mut()
                        .map(|s| NodeMut::Strategy(Arc::make_mut(s))),
                )
                .collect(),
            NodeMut::Strategy(s) => s
                .property_claims
                .iter_mut()
                .map(|c| NodeMut::PropertyClaim(Arc::make_mut(c)))
                .collect(),
            NodeMut::PropertyClaim(PropertyClaim {
                property_claims,
                evidence,
                strategies,
                ..
            }) => property_claims
                .iter_mut()
                .map(|c| NodeMut::PropertyClaim(Arc::make_mut(c)))
                .chain(evidence.iter_mut().map(|e| NodeMut::Evidence(Arc::make_mut(e))))
                .chain(
                    strategies
                        .iter_mut()
                        .map(|s| NodeMut::Strategy(Arc::make_mut(s))),
                )
                .collect(),
            NodeMut::Evidence(_) => Vec::new(),
        }
    }

    /// Detach the child at `index` of `slot`
    pub fn remove_child(&mut self, slot: Slot, index: usize) -> Option<Node> {
        match (self, slot) {
            (NodeMut::Goal(g), Slot::Strategies) => {
                take_child(&mut g.strategies, index).map(Node::Strategy)
            }
            (NodeMut::Goal(g), Slot::PropertyClaims) => {
                take_child(&mut g.property_claims, index).map(Node::PropertyClaim)
            }
            (NodeMut::Strategy(s), Slot::PropertyClaims) => {
                take_child(&mut s.property_claims, index).map(Node::PropertyClaim)
            }
            (NodeMut::PropertyClaim(p), Slot::PropertyClaims) => {
                take_child(&mut p.property_claims, index).map(Node::PropertyClaim)
            }
            (NodeMut::PropertyClaim(p), Slot::Evidence) => {
                take_child(&mut p.evidence, index).map(Node::Evidence)
            }
            (NodeMut::PropertyClaim(p), Slot::Strategies) => {
                take_child(&mut p.strategies, index).map(Node::Strategy)
            }
            _ => None,
        }
    }

    /// Append `child` to the collection matching its kind.
    ///
    /// # Errors
    /// Hands the child back if this node cannot hold it
    pub fn push_child(&mut self, child: Node) -> Result<(), Node> {
        match (self, child) {
            (NodeMut::Goal(g), Node::Strategy(s)) => g.strategies.push(s),
            (NodeMut::Goal(g), Node::PropertyClaim(c)) => g.property_claims.push(c),
            (NodeMut::Strategy(s), Node::PropertyClaim(c)) => s.property_claims.push(c),
            (NodeMut::PropertyClaim(p), Node::PropertyClaim(c)) => p.property_claims.push(c),
            (NodeMut::PropertyClaim(p), Node::Evidence(e)) => p.evidence.push(e),
            (NodeMut::PropertyClaim(p), Node::Strategy(s)) => p.strategies.push(s),
            (_, child) => return Err(child),
        }
        Ok(())
    }
}
