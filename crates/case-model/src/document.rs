//! The assurance-case document root
//!
//! [`AssuranceCase`] owns the goal tree plus case-level metadata. Positional
//! access goes through [`NodePath`]; [`AssuranceCase::walk`] yields every node
//! in document order using an explicit stack, so arbitrarily deep documents
//! never exhaust the call stack.

use crate::error::ModelResult;
use crate::node::{null_as_default, Extra, Goal, Node, NodeMut, NodeRef};
use crate::path::{NodePath, Slot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Access level the current user holds on a case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access
    #[default]
    View,
    /// May change the document
    Edit,
    /// May change the document and its sharing
    Manage,
}

impl Permission {
    /// Whether the holder may change the document
    #[inline]
    #[must_use]
    pub fn can_edit(self) -> bool {
        matches!(self, Permission::Edit | Permission::Manage)
    }
}

/// Case-level comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Backend id, absent on comments not yet saved
    #[serde(default)]
    pub id: Option<i64>,

    /// Author's username
    #[serde(default)]
    pub author: Option<String>,

    /// Comment text
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,

    /// Unmodelled backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Root document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssuranceCase {
    /// Backend id of the case
    pub id: i64,

    /// Case title
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Case summary
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Current user's access level
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Permission,

    /// Whether a published snapshot exists
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,

    /// Timestamp of the last publication
    #[serde(default)]
    pub published_date: Option<String>,

    /// Zero or one top-level goal
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: Vec<Arc<Goal>>,

    /// Case-level comments
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,

    /// Unmodelled backend fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl AssuranceCase {
    /// Create an empty case
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            permissions: Permission::default(),
            published: false,
            published_date: None,
            goals: Vec::new(),
            comments: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Add the top-level goal
    #[must_use]
    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goals.push(Arc::new(goal));
        self
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: Permission) -> Self {
        self.permissions = permissions;
        self
    }

    /// Parse a document, canonicalising legacy type tags
    ///
    /// # Errors
    /// Returns error on malformed JSON or an unknown type tag
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build from an already-parsed JSON value
    ///
    /// # Errors
    /// Returns error if the value does not match the document shape
    pub fn from_value(value: serde_json::Value) -> ModelResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    /// Returns error if serialization fails
    pub fn to_value(&self) -> ModelResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The top-level goal, if any
    #[inline]
    #[must_use]
    pub fn goal(&self) -> Option<&Arc<Goal>> {
        self.goals.first()
    }

    /// Node at `path`
    #[must_use]
    pub fn node_at(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        let (first, rest) = path.steps().split_first()?;
        if first.slot != Slot::Goals {
            return None;
        }

        let mut node = NodeRef::Goal(self.goals.get(first.index)?);
        for step in rest {
            node = node.child(step.slot, step.index)?;
        }
        Some(node)
    }

    /// Mutable node at `path`
    ///
    /// Every node on the path is cloned if shared with another document
    /// version; nodes off the path keep their allocation.
    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<NodeMut<'_>> {
        let (first, rest) = path.steps().split_first()?;
        if first.slot != Slot::Goals {
            return None;
        }

        let goal = self.goals.get_mut(first.index)?;
        let mut node = NodeMut::Goal(Arc::make_mut(goal));
        for step in rest {
            node = node.child_mut(step.slot, step.index)?;
        }
        Some(node)
    }

    /// Detach the node at `path`
    pub fn remove_at(&mut self, path: &NodePath) -> Option<Node> {
        let step = path.last()?;
        let parent = path.parent()?;

        if parent.is_empty() {
            if step.slot != Slot::Goals || step.index >= self.goals.len() {
                return None;
            }
            return Some(Node::Goal(self.goals.remove(step.index)));
        }

        self.node_at_mut(&parent)?.remove_child(step.slot, step.index)
    }

    /// Every node with its path, in document order
    ///
    /// Order: each goal, then recursively its property claims and
    /// strategies; under a property claim, nested claims, then evidence,
    /// then sub-strategies.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        let stack = self
            .goals
            .iter()
            .enumerate()
            .rev()
            .map(|(index, goal)| (NodePath::goal(index), NodeRef::Goal(goal)))
            .collect();
        Walk { stack }
    }

    /// Total number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

/// Depth-first, pre-order iterator over a document
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(NodePath, NodeRef<'a>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (NodePath, NodeRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        let children: Vec<_> = node.children().collect();
        for (slot, index, child) in children.into_iter().rev() {
            self.stack.push((path.child(slot, index), child));
        }
        Some((path, node))
    }
}
