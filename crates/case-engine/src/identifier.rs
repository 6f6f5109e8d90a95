//! Identifier allocator
//!
//! Display labels for new children. The next number comes from the last
//! sibling's own numeric suffix, so labels freed by deletions are not
//! reused; when that label does not parse, the sibling count is used
//! instead.

use crate::config::IdentifierScheme;
use case_model::{NodeKind, NodeRef, Slot};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Kind of child a label is being allocated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    /// Labelled `S<n>`
    Strategy,
    /// Labelled `<n>`, or `<parent>.<n>` under another claim
    PropertyClaim,
    /// Labelled `E<n>`, counting from zero
    Evidence,
}

impl ChildKind {
    /// Collection the child will be appended to
    #[inline]
    #[must_use]
    pub fn slot(self) -> Slot {
        match self {
            ChildKind::Strategy => Slot::Strategies,
            ChildKind::PropertyClaim => Slot::PropertyClaims,
            ChildKind::Evidence => Slot::Evidence,
        }
    }

    #[inline]
    #[must_use]
    pub fn node_kind(self) -> NodeKind {
        self.slot().holds()
    }
}

impl Display for ChildKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.node_kind(), f)
    }
}

impl FromStr for ChildKind {
    type Err = case_model::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<NodeKind>()? {
            NodeKind::Strategy => Ok(ChildKind::Strategy),
            NodeKind::PropertyClaim => Ok(ChildKind::PropertyClaim),
            NodeKind::Evidence => Ok(ChildKind::Evidence),
            NodeKind::Goal => Err(case_model::ModelError::UnknownKind(s.to_string())),
        }
    }
}

/// Trailing number of a label: prefix stripped, last dotted component
fn trailing_number(label: &str, prefix: &str) -> Option<u64> {
    let body = label.trim().strip_prefix(prefix).unwrap_or(label.trim());
    body.rsplit('.').next()?.trim().parse().ok()
}

/// Number following the last of `count` siblings
fn next_number(parent: NodeRef<'_>, slot: Slot, prefix: &str, first: u32) -> u64 {
    let count = parent.child_count(slot);
    let Some(last) = count.checked_sub(1).and_then(|i| parent.child(slot, i)) else {
        return u64::from(first);
    };

    match trailing_number(last.name(), prefix).and_then(|n| n.checked_add(1)) {
        Some(n) => n,
        None => {
            tracing::trace!(label = last.name(), "unusable sibling label, using count");
            count as u64 + u64::from(first)
        }
    }
}

/// Next display label for a `child` appended under `parent`
///
/// - strategies: `S1`, `S2`, ...
/// - evidence: `E0`, `E1`, ...
/// - claims under a goal or strategy: `1`, `2`, ...
/// - claims under a claim named `1.2`: `1.2.1`, `1.2.2`, ...
#[must_use]
pub fn next_identifier(parent: NodeRef<'_>, child: ChildKind, scheme: &IdentifierScheme) -> String {
    let label = match child {
        ChildKind::Strategy => {
            let n = next_number(parent, Slot::Strategies, &scheme.strategy_prefix, scheme.first_index);
            format!("{}{n}", scheme.strategy_prefix)
        }
        ChildKind::Evidence => {
            let n = next_number(
                parent,
                Slot::Evidence,
                &scheme.evidence_prefix,
                scheme.evidence_first_index,
            );
            format!("{}{n}", scheme.evidence_prefix)
        }
        ChildKind::PropertyClaim => {
            let prefix = &scheme.claim_prefix;
            let n = next_number(parent, Slot::PropertyClaims, prefix, scheme.first_index);
            match parent {
                NodeRef::PropertyClaim(claim) => {
                    let base = claim.name.trim();
                    let base = base.strip_prefix(prefix.as_str()).unwrap_or(base);
                    format!("{prefix}{base}.{n}")
                }
                _ => format!("{prefix}{n}"),
            }
        }
    };

    tracing::debug!(parent = %parent.key(), %child, %label, "allocated identifier");
    label
}
