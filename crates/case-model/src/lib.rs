//! Assurance Case Model
//!
//! Typed document model for assurance cases: goals, strategies, property
//! claims and evidence arranged in a tree whose subtrees are shared between
//! document versions.
//!
//! # Core Concepts
//!
//! - [`AssuranceCase`]: Root document holding the single top-level goal
//! - [`NodeKind`]: Node type with legacy tag spellings canonicalised on ingest
//! - [`NodeRef`] / [`NodeMut`] / [`Node`]: Borrowed, mutable and owned node views
//! - [`NodePath`]: Positional address of a node within a document
//! - [`validate`]: Tree-invariant checks run at ingest
//!
//! # Example
//!
//! ```rust,ignore
//! use case_model::{AssuranceCase, NodePath};
//!
//! let case = AssuranceCase::from_json(json)?;
//! let claim = case.node_at(&"goals.0.property_claims.0".parse()?);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod document;
mod error;
mod kind;
mod node;
mod path;
mod validate;

pub use document::{AssuranceCase, Comment, Permission, Walk};
pub use error::{ModelError, ModelResult};
pub use kind::{NodeId, NodeKey, NodeKind};
pub use node::{
    Evidence, Extra, Goal, Node, NodeMut, NodeRef, ParentRef, PropertyClaim, Strategy, Visibility,
    RESERVED_KEYS,
};
pub use path::{NodePath, Slot, Step};
pub use validate::{validate, ValidationReport, Violation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
