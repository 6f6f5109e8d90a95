//! Assurance Case Engine
//!
//! Copy-on-write tree mutation and visibility propagation for assurance-case
//! documents. Every operation takes an `Arc<AssuranceCase>` and returns a new
//! one; untouched subtrees keep their allocation, and a no-op hands back the
//! input so callers can compare with [`Arc::ptr_eq`].
//!
//! # Core Concepts
//!
//! - [`locate`]: Find nodes by id, by kind and id, or by predicate
//! - [`mutate`]: Patch node fields ([`NodePatch`], [`UpdateKind`])
//! - [`relocate`]: Reparent property claims and evidence
//! - [`remove`] / [`insert`]: Prune and graft nodes
//! - [`identifier`]: Display labels for new children
//! - [`visibility`]: Reveal a path, collapse or expand a subtree
//! - [`gateway`]: Attach/detach payloads and REST request descriptors
//! - [`Engine`]: Configured handle over all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use case_engine::{Engine, EngineConfig, NodePatch, UpdateKind};
//!
//! let engine = Engine::new(EngineConfig::default());
//! let case = engine.load(json)?;
//! let next = engine.update(&case, UpdateKind::Property, id, &NodePatch::new().with_name("1.2"), false);
//! assert!(!Arc::ptr_eq(&case, &next));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod engine;
mod error;

pub mod gateway;
pub mod identifier;
pub mod insert;
pub mod locate;
pub mod mutate;
pub mod relocate;
pub mod remove;
pub mod visibility;

pub use config::{EngineConfig, IdentifierScheme};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use gateway::{ElementRequest, ElementType, Method, ParentPayload};
pub use identifier::ChildKind;
pub use mutate::{NodePatch, UpdateKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
