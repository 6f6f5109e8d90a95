//! Node identity: ids, kinds and the historical tag spellings
//!
//! Backends disagree on how node types are spelled (`PropertyClaim` versus
//! `property_claim`, `Goal` versus `TopLevelNormativeGoal`). [`NodeKind`]
//! accepts all of them on the way in and always writes the canonical form, so
//! nothing past the document boundary ever compares raw tag strings.

use crate::error::ModelError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Backend-assigned node identifier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    /// Raw integer value
    #[inline]
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four node kinds of an assurance case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// Top-level claim
    Goal,
    /// Intermediate reasoning step
    Strategy,
    /// Sub-claim, nestable
    PropertyClaim,
    /// Leaf supporting a property claim
    Evidence,
}

impl NodeKind {
    /// Every kind, in document order of appearance
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Goal,
        NodeKind::Strategy,
        NodeKind::PropertyClaim,
        NodeKind::Evidence,
    ];

    /// Canonical tag spelling
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Goal => "Goal",
            NodeKind::Strategy => "Strategy",
            NodeKind::PropertyClaim => "PropertyClaim",
            NodeKind::Evidence => "Evidence",
        }
    }

    /// Whether nodes of this kind may hold children
    #[inline]
    #[must_use]
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Evidence)
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "goal" | "toplevelnormativegoal" => Ok(NodeKind::Goal),
            "strategy" => Ok(NodeKind::Strategy),
            "propertyclaim" | "property" => Ok(NodeKind::PropertyClaim),
            "evidence" => Ok(NodeKind::Evidence),
            _ => Err(ModelError::UnknownKind(s.to_string())),
        }
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Joint identity of a node
///
/// Legacy backends only guarantee id uniqueness per kind, so removal and
/// reveal address nodes by kind and id together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    /// Node kind
    pub kind: NodeKind,
    /// Node id
    pub id: NodeId,
}

impl NodeKey {
    /// Create a key
    #[inline]
    #[must_use]
    pub fn new(kind: NodeKind, id: impl Into<NodeId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accepts_legacy_spellings() {
        assert_eq!("PropertyClaim".parse::<NodeKind>().unwrap(), NodeKind::PropertyClaim);
        assert_eq!("property_claim".parse::<NodeKind>().unwrap(), NodeKind::PropertyClaim);
        assert_eq!("propertyclaim".parse::<NodeKind>().unwrap(), NodeKind::PropertyClaim);
        assert_eq!("TopLevelNormativeGoal".parse::<NodeKind>().unwrap(), NodeKind::Goal);
        assert_eq!("EVIDENCE".parse::<NodeKind>().unwrap(), NodeKind::Evidence);
    }

    #[test]
    fn kind_rejects_unknown() {
        let result = "Context".parse::<NodeKind>();
        assert!(matches!(result, Err(ModelError::UnknownKind(tag)) if tag == "Context"));
    }

    #[test]
    fn kind_serializes_canonical() {
        let kind: NodeKind = serde_json::from_str("\"property_claim\"").unwrap();
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"PropertyClaim\"");
    }

    #[test]
    fn key_display() {
        let key = NodeKey::new(NodeKind::Strategy, 4);
        assert_eq!(key.to_string(), "Strategy#4");
    }
}
