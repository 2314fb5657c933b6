// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node-proxy graph engine for node program documents.
//!
//! This crate edits flat project documents (an array of nodes whose input
//! slots hold either a literal or a reference to another node's output)
//! without a GUI:
//! - Connection wiring and rewiring
//! - Upstream/downstream traversal
//! - Relative and absolute moves
//! - Automatic left-growing grid layout of a node's producer chain
//!
//! ## Architecture
//!
//! A [`Project`] owns the node list, a primary id index and an identity
//! cache of [`NodeProxy`] handles. Resolving the same id twice yields the
//! same proxy, and proxies share the node value with the document, so every
//! operation mutates the document in place.

pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod input;
mod layout;
pub mod node;
pub mod nodes;
pub mod project;
pub mod proxy;
pub mod registry;
pub mod selector;

pub use config::GridConfig;
pub use connection::{Connection, UNCONNECTED};
pub use document::ProjectDocument;
pub use error::{GraphError, Result};
pub use input::{Input, RawValue};
pub use node::{Node, NodeId, SharedNode};
pub use project::Project;
pub use proxy::{NodeProxy, NodeRef};
pub use registry::ProxyRegistry;
pub use selector::NodeSelector;
