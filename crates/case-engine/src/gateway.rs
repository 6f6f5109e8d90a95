//! Attach/detach gateway
//!
//! Translates UI element-type strings into the parent-reference payloads
//! the backend expects, and describes the REST calls that persist tree
//! edits. Nothing here performs I/O; callers hand the [`ElementRequest`]
//! to whatever HTTP client they use.

use crate::error::{EngineError, EngineResult};
use case_model::{AssuranceCase, NodeId, NodeKind, NodeRef, ParentRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Element type named by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Context tag on a goal
    Context,
    /// Strategy under a goal or claim
    Strategy,
    /// Property claim under any container
    PropertyClaim,
    /// Evidence under a property claim
    Evidence,
}

impl ElementType {
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Context => "Context",
            ElementType::Strategy => "Strategy",
            ElementType::PropertyClaim => "PropertyClaim",
            ElementType::Evidence => "Evidence",
        }
    }

    /// Node kind this element type describes (`None` for context)
    #[inline]
    #[must_use]
    pub fn node_kind(self) -> Option<NodeKind> {
        match self {
            ElementType::Context => None,
            ElementType::Strategy => Some(NodeKind::Strategy),
            ElementType::PropertyClaim => Some(NodeKind::PropertyClaim),
            ElementType::Evidence => Some(NodeKind::Evidence),
        }
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = EngineError;

    /// Case-insensitive; `_`, `-` and spaces are ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        if folded == "context" {
            return Ok(ElementType::Context);
        }
        match s.parse::<NodeKind>() {
            Ok(NodeKind::Strategy) => Ok(ElementType::Strategy),
            Ok(NodeKind::PropertyClaim) => Ok(ElementType::PropertyClaim),
            Ok(NodeKind::Evidence) => Ok(ElementType::Evidence),
            Ok(NodeKind::Goal) | Err(_) => Err(EngineError::UnknownElementType(s.to_string())),
        }
    }
}

/// Parent-reference fields sent to the attach and detach endpoints
///
/// Exactly one field is set by the builders in this module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentPayload {
    /// Goal the element hangs under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<NodeId>,

    /// Strategy the element hangs under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<NodeId>,

    /// Property claim the element hangs under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_claim_id: Option<NodeId>,
}

impl ParentPayload {
    /// Parent the payload names, in priority goal, strategy, property claim
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<ParentRef> {
        ParentRef::from_fields(self.goal_id, self.strategy_id, self.property_claim_id)
    }
}

impl From<ParentRef> for ParentPayload {
    fn from(parent: ParentRef) -> Self {
        let mut payload = Self::default();
        match parent {
            ParentRef::Goal(id) => payload.goal_id = Some(id),
            ParentRef::Strategy(id) => payload.strategy_id = Some(id),
            ParentRef::PropertyClaim(id) => payload.property_claim_id = Some(id),
        }
        payload
    }
}

/// Payload attaching an orphan of `orphan_type` beneath `parent`
///
/// Context attaches to goals only, strategies to goals or property claims,
/// property claims to anything but evidence, evidence to property claims.
///
/// # Errors
/// `UnknownElementType` for an unrecognised type string,
/// `InvalidAttachment` when the parent cannot hold the orphan
pub fn build_attach_payload(orphan_type: &str, parent: NodeRef<'_>) -> EngineResult<ParentPayload> {
    let element: ElementType = orphan_type.parse()?;
    let key = parent.key();

    let allowed = match element {
        ElementType::Context => key.kind == NodeKind::Goal,
        ElementType::Strategy => matches!(key.kind, NodeKind::Goal | NodeKind::PropertyClaim),
        ElementType::PropertyClaim => key.kind.is_container(),
        ElementType::Evidence => key.kind == NodeKind::PropertyClaim,
    };
    let reference = ParentRef::of(key).filter(|_| allowed).ok_or_else(|| {
        EngineError::InvalidAttachment {
            element: element.to_string(),
            parent: key,
        }
    })?;

    tracing::debug!(%element, parent = %key, "attach payload");
    Ok(reference.into())
}

/// Payload detaching `node` from its current parent
///
/// A context element given with its goal detaches from that goal.
///
/// # Errors
/// `UnknownElementType` for an unrecognised type string, `TypeMismatch`
/// when the type does not describe `node`, `NoParent` when `node` records
/// no parent
pub fn build_detach_payload(node: NodeRef<'_>, element_type: &str) -> EngineResult<ParentPayload> {
    let element: ElementType = element_type.parse()?;
    let key = node.key();

    let parent = match (element, key.kind) {
        (ElementType::Context, NodeKind::Goal) => ParentRef::Goal(key.id),
        (element, kind) if element.node_kind() == Some(kind) => {
            node.parent().ok_or(EngineError::NoParent(key))?
        }
        (element, _) => {
            return Err(EngineError::TypeMismatch {
                element: element.to_string(),
                node: key,
            })
        }
    };

    tracing::debug!(%element, node = %key, %parent, "detach payload");
    Ok(parent.into())
}

/// HTTP method of a request descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// REST call that persists a tree edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRequest {
    /// HTTP verb
    pub method: Method,
    /// Path under the API prefix
    pub path: String,
    /// JSON body, absent for bodiless requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Display for ElementRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

fn join(prefix: &str, rest: &str) -> String {
    format!("{}/{rest}", prefix.trim_end_matches('/'))
}

/// `POST {prefix}/elements/{id}/attach`
///
/// # Errors
/// Returns error if the payload cannot be encoded
pub fn attach_request(
    prefix: &str,
    element: NodeId,
    payload: &ParentPayload,
) -> EngineResult<ElementRequest> {
    Ok(ElementRequest {
        method: Method::Post,
        path: join(prefix, &format!("elements/{element}/attach")),
        body: Some(serde_json::to_value(payload)?),
    })
}

/// `POST {prefix}/elements/{id}/detach`
///
/// # Errors
/// Returns error if the payload cannot be encoded
pub fn detach_request(
    prefix: &str,
    element: NodeId,
    payload: &ParentPayload,
) -> EngineResult<ElementRequest> {
    Ok(ElementRequest {
        method: Method::Post,
        path: join(prefix, &format!("elements/{element}/detach")),
        body: Some(serde_json::to_value(payload)?),
    })
}

/// `PUT {prefix}/cases/{id}/` with the whole document as body
///
/// # Errors
/// Returns error if the document cannot be encoded
pub fn update_case_request(prefix: &str, case: &AssuranceCase) -> EngineResult<ElementRequest> {
    Ok(ElementRequest {
        method: Method::Put,
        path: join(prefix, &format!("cases/{}/", case.id)),
        body: Some(case.to_value()?),
    })
}

/// `DELETE {prefix}/elements/{id}`
#[must_use]
pub fn delete_element_request(prefix: &str, element: NodeId) -> ElementRequest {
    ElementRequest {
        method: Method::Delete,
        path: join(prefix, &format!("elements/{element}")),
        body: None,
    }
}
