//! Relocator
//!
//! Drag-and-drop reparenting of property claims and evidence. A move
//! captures the node, merges the patch into it, sweeps every copy of it out
//! of the tree (parent bookkeeping is denormalised and may be stale), then
//! appends the merged node under the destination named by the patch.

use crate::locate::{path_of, paths_of};
use crate::mutate::{apply_patch, update_node, NodePatch, UpdateKind};
use case_model::{AssuranceCase, NodeId, ParentRef};
use std::sync::Arc;

/// Destination named by a patch for a node of `kind`
fn destination(kind: UpdateKind, patch: &NodePatch) -> Option<ParentRef> {
    match kind {
        UpdateKind::Evidence => patch.evidence_parent().map(ParentRef::PropertyClaim),
        _ => patch.parent(),
    }
}

/// New document with a property claim or evidence moved under the parent
/// named in `patch`
///
/// Goals and strategies are not movable; for them this is
/// [`update_node`]. Returns `Arc::clone(case)` if the node or destination
/// is missing, or if the destination lies inside the moved subtree.
#[must_use]
pub fn move_node(
    case: &Arc<AssuranceCase>,
    kind: UpdateKind,
    id: NodeId,
    patch: &NodePatch,
) -> Arc<AssuranceCase> {
    if !matches!(kind, UpdateKind::Property | UpdateKind::Evidence) {
        return update_node(case, kind, id, patch);
    }

    let key = kind.key(id);
    let copies = paths_of(case, key);
    let Some(first) = copies.first() else {
        tracing::warn!(%key, "move target not found");
        return Arc::clone(case);
    };

    let Some(parent) = destination(kind, patch) else {
        tracing::warn!(%key, "move patch names no destination");
        return Arc::clone(case);
    };
    let Some(target) = path_of(case, parent.key()) else {
        tracing::warn!(%key, %parent, "move destination not found");
        return Arc::clone(case);
    };
    if copies.iter().any(|path| path.is_prefix_of(&target)) {
        tracing::warn!(%key, %parent, "cannot move a node beneath itself");
        return Arc::clone(case);
    }

    let Some(mut moved) = case.node_at(first).map(|node| node.to_node()) else {
        return Arc::clone(case);
    };
    apply_patch(moved.make_mut(), patch);
    if !moved.set_parent(parent) {
        tracing::warn!(%key, %parent, "destination cannot hold this node");
        return Arc::clone(case);
    }

    tracing::debug!(%key, from = %first, %parent, copies = copies.len(), "moving node");
    let mut next = Arc::clone(case);
    let doc = Arc::make_mut(&mut next);

    // Later paths first so earlier indices stay valid
    for path in copies.iter().rev() {
        tracing::trace!(%path, "removing copy");
        doc.remove_at(path);
    }

    // Removal may have shifted the destination's position
    let Some(target) = path_of(doc, parent.key()) else {
        return Arc::clone(case);
    };
    let inserted = doc
        .node_at_mut(&target)
        .is_some_and(|mut node| node.push_child(moved).is_ok());
    if !inserted {
        tracing::warn!(%key, %parent, "destination rejected moved node");
        return Arc::clone(case);
    }
    next
}
