//! Node locator
//!
//! Finds nodes anywhere in a document. Every search follows document order
//! (goal, then property claims depth-first, then evidence, then strategies)
//! and returns the first match.

use case_model::{AssuranceCase, NodeId, NodeKey, NodePath, NodeRef};

/// First node with `id`, of any kind
#[must_use]
pub fn find_node_by_id(case: &AssuranceCase, id: NodeId) -> Option<NodeRef<'_>> {
    case.walk()
        .find(|(_, node)| node.id() == id)
        .map(|(_, node)| node)
}

/// First node with matching kind and id
#[must_use]
pub fn find_node_by_key(case: &AssuranceCase, key: NodeKey) -> Option<NodeRef<'_>> {
    case.walk()
        .find(|(_, node)| node.key() == key)
        .map(|(_, node)| node)
}

/// Path of the first node satisfying `predicate`
pub fn find_path<F>(case: &AssuranceCase, mut predicate: F) -> Option<NodePath>
where
    F: FnMut(NodeRef<'_>) -> bool,
{
    case.walk()
        .find(|(_, node)| predicate(*node))
        .map(|(path, _)| path)
}

/// Path of the first node with matching kind and id
#[inline]
#[must_use]
pub fn path_of(case: &AssuranceCase, key: NodeKey) -> Option<NodePath> {
    find_path(case, |node| node.key() == key)
}

/// Paths of every copy of a node, in document order
///
/// A well-formed document yields at most one path; stale parent bookkeeping
/// can leave several.
#[must_use]
pub fn paths_of(case: &AssuranceCase, key: NodeKey) -> Vec<NodePath> {
    case.walk()
        .filter(|(_, node)| node.key() == key)
        .map(|(path, _)| path)
        .collect()
}

/// Structural parent of the first copy of a node
#[must_use]
pub fn find_parent(case: &AssuranceCase, key: NodeKey) -> Option<NodeRef<'_>> {
    let path = path_of(case, key)?;
    case.node_at(&path.parent()?)
}
