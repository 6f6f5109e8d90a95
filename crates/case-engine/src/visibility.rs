//! Visibility propagator
//!
//! Collapse and reveal for the tree view. Both operations copy only the
//! nodes whose visibility they change (plus the path down to them); the
//! rest of the document stays shared with the input.

use crate::locate::find_path;
use case_model::{AssuranceCase, NodeId, NodeKey, NodeMut, NodePath, NodeRef};
use std::collections::VecDeque;
use std::sync::Arc;

/// Breadth-first search for the first node matching `key`
fn breadth_first(case: &AssuranceCase, key: NodeKey) -> Option<NodePath> {
    let mut queue: VecDeque<(NodePath, NodeRef<'_>)> = case
        .goals
        .iter()
        .enumerate()
        .map(|(index, goal)| (NodePath::goal(index), NodeRef::Goal(goal)))
        .collect();

    while let Some((path, node)) = queue.pop_front() {
        tracing::trace!(%path, node = %node.key(), "visiting");
        if node.key() == key {
            return Some(path);
        }
        queue.extend(
            node.children()
                .map(|(slot, index, child)| (path.child(slot, index), child)),
        );
    }
    None
}

/// New document where `target` and each of its ancestors is un-hidden
///
/// Siblings along the way keep their state. Returns `Arc::clone(case)` when
/// the target is missing or the whole path is already visible.
#[must_use]
pub fn reveal_ancestors(case: &Arc<AssuranceCase>, target: NodeKey) -> Arc<AssuranceCase> {
    let Some(path) = breadth_first(case, target) else {
        tracing::debug!(%target, "reveal target not found");
        return Arc::clone(case);
    };

    let already_visible = path
        .prefixes()
        .filter_map(|prefix| case.node_at(&prefix))
        .all(|node| !node.visibility().hidden);
    if already_visible {
        return Arc::clone(case);
    }

    tracing::debug!(%target, %path, "revealing ancestors");
    let mut next = Arc::clone(case);
    let doc = Arc::make_mut(&mut next);
    let Some((first, rest)) = path.steps().split_first() else {
        return Arc::clone(case);
    };
    let Some(goal) = doc.goals.get_mut(first.index) else {
        return Arc::clone(case);
    };

    let mut node = NodeMut::Goal(Arc::make_mut(goal));
    node.visibility_mut().hidden = false;
    for step in rest {
        let Some(child) = node.child_mut(step.slot, step.index) else {
            break;
        };
        node = child;
        node.visibility_mut().hidden = false;
    }
    next
}

/// Collapse or expand the subtree under the first node with `id`
///
/// Flips the root's `children_hidden`. Collapsing hides every declared
/// descendant, remembering its previous `hidden` in `original_hidden`
/// (an earlier saved value is kept). Expanding restores `hidden` from
/// `original_hidden`, or `false` when nothing was saved. Descendants'
/// own `children_hidden` flags are cleared either way.
#[must_use]
pub fn toggle_subtree_visibility(case: &Arc<AssuranceCase>, id: NodeId) -> Arc<AssuranceCase> {
    let Some(path) = find_path(case, |node| node.id() == id) else {
        tracing::debug!(%id, "toggle root not found");
        return Arc::clone(case);
    };

    let mut next = Arc::clone(case);
    let Some(mut root) = Arc::make_mut(&mut next).node_at_mut(&path) else {
        return Arc::clone(case);
    };

    let visibility = root.visibility_mut();
    let hide = !visibility.children_hidden;
    visibility.children_hidden = hide;
    tracing::debug!(root = %root.key(), %path, hide, "toggling subtree");

    let mut stack = root.into_children();
    while let Some(mut node) = stack.pop() {
        let visibility = node.visibility_mut();
        if hide {
            visibility.original_hidden.get_or_insert(visibility.hidden);
            visibility.hidden = true;
        } else {
            visibility.hidden = visibility.original_hidden.take().unwrap_or(false);
        }
        visibility.children_hidden = false;
        stack.extend(node.into_children());
    }
    next
}
