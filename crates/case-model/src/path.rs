//! Node paths for addressing within a case document
//!
//! Provides [`NodePath`], the positional address of a node: the sequence of
//! child collections and indices walked from the document root.

use crate::error::ModelError;
use crate::kind::NodeKind;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Child collection a node lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// `AssuranceCase::goals`
    Goals,
    /// `strategies` of a goal or property claim
    Strategies,
    /// `property_claims` of a goal, strategy or property claim
    PropertyClaims,
    /// `evidence` of a property claim
    Evidence,
}

impl Slot {
    /// Field name as it appears in the document
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Goals => "goals",
            Slot::Strategies => "strategies",
            Slot::PropertyClaims => "property_claims",
            Slot::Evidence => "evidence",
        }
    }

    /// Kind of node held by this collection
    #[inline]
    #[must_use]
    pub fn holds(self) -> NodeKind {
        match self {
            Slot::Goals => NodeKind::Goal,
            Slot::Strategies => NodeKind::Strategy,
            Slot::PropertyClaims => NodeKind::PropertyClaim,
            Slot::Evidence => NodeKind::Evidence,
        }
    }

    /// Collection that holds nodes of `kind`
    #[inline]
    #[must_use]
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Goal => Slot::Goals,
            NodeKind::Strategy => Slot::Strategies,
            NodeKind::PropertyClaim => Slot::PropertyClaims,
            NodeKind::Evidence => Slot::Evidence,
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goals" => Ok(Slot::Goals),
            "strategies" => Ok(Slot::Strategies),
            "property_claims" => Ok(Slot::PropertyClaims),
            "evidence" => Ok(Slot::Evidence),
            other => Err(ModelError::InvalidPath(format!("unknown slot '{other}'"))),
        }
    }
}

/// One step of a path: a collection and an index into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Step {
    /// Collection
    pub slot: Slot,
    /// Position within the collection
    pub index: usize,
}

impl Step {
    /// Create a step
    #[inline]
    #[must_use]
    pub fn new(slot: Slot, index: usize) -> Self {
        Self { slot, index }
    }
}

/// Positional address of a node
///
/// The first step always indexes `goals`. Paths are only meaningful against
/// the document version they were computed on.
///
/// # Examples
/// - `goals.0` → the top-level goal
/// - `goals.0.strategies.1.property_claims.0` → first claim of the second strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<Step>);

impl NodePath {
    /// Create path from steps
    #[inline]
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    /// Empty path (the document itself)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path to the goal at `index`
    #[inline]
    #[must_use]
    pub fn goal(index: usize) -> Self {
        Self(vec![Step::new(Slot::Goals, index)])
    }

    /// Get path steps
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    /// Number of steps, which is also the node's depth
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the parent node (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Last step (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<Step> {
        self.0.last().copied()
    }

    /// Append a step, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, slot: Slot, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(Step::new(slot, index));
        new
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Check if this path is an ancestor of another (strict prefix)
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Every non-empty prefix, from the goal down to this path itself
    pub fn prefixes(&self) -> impl Iterator<Item = NodePath> + '_ {
        (1..=self.0.len()).map(move |n| Self(self.0[..n].to_vec()))
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for step in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}.{}", step.slot, step.index)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() % 2 != 0 {
            return Err(ModelError::InvalidPath(s.to_string()));
        }

        let steps = parts
            .chunks(2)
            .map(|pair| {
                let slot = pair[0].parse::<Slot>()?;
                let index = pair[1]
                    .parse::<usize>()
                    .map_err(|_| ModelError::InvalidPath(s.to_string()))?;
                Ok(Step::new(slot, index))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_display_and_parse() {
        let path = NodePath::goal(0)
            .child(Slot::Strategies, 1)
            .child(Slot::PropertyClaims, 0);
        assert_eq!(path.to_string(), "goals.0.strategies.1.property_claims.0");

        let parsed: NodePath = "goals.0.strategies.1.property_claims.0".parse().unwrap();
        assert_eq!(parsed, path);
    }

    #[test]
    fn path_parse_rejects_odd_segments() {
        let result: Result<NodePath, _> = "goals.0.strategies".parse();
        assert!(matches!(result, Err(ModelError::InvalidPath(_))));
    }

    #[test]
    fn path_parse_rejects_unknown_slot() {
        let result: Result<NodePath, _> = "goals.0.context.1".parse();
        assert!(matches!(result, Err(ModelError::InvalidPath(_))));
    }

    #[test]
    fn path_parent_and_last() {
        let path = NodePath::goal(0).child(Slot::PropertyClaims, 2);
        assert_eq!(path.parent().unwrap(), NodePath::goal(0));
        assert_eq!(path.last(), Some(Step::new(Slot::PropertyClaims, 2)));
        assert!(NodePath::root().parent().is_none());
    }

    #[test]
    fn path_ancestry() {
        let goal = NodePath::goal(0);
        let claim = goal.child(Slot::PropertyClaims, 0);
        let other = goal.child(Slot::PropertyClaims, 1);

        assert!(goal.is_ancestor_of(&claim));
        assert!(!claim.is_ancestor_of(&claim));
        assert!(claim.is_prefix_of(&claim));
        assert!(!claim.is_prefix_of(&other));
    }

    #[test]
    fn path_prefixes() {
        let path = NodePath::goal(0)
            .child(Slot::Strategies, 0)
            .child(Slot::PropertyClaims, 3);
        let prefixes: Vec<String> = path.prefixes().map(|p| p.to_string()).collect();
        assert_eq!(
            prefixes,
            vec![
                "goals.0",
                "goals.0.strategies.0",
                "goals.0.strategies.0.property_claims.3",
            ]
        );
    }
}
