// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for graph operations.

use crate::node::NodeId;
use thiserror::Error;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by the project container and node proxies
#[derive(Debug, Error)]
pub enum GraphError {
    /// No node with this id exists in the project
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The selector is the "unconnected" sentinel and names no node
    #[error("Selector is disconnected and does not name a node")]
    Disconnected,

    /// Input slot index outside the node's input list
    #[error("Input index {index} out of range for node {node} ({len} inputs)")]
    IndexOutOfRange {
        /// Node whose inputs were addressed
        node: NodeId,
        /// Requested input index
        index: usize,
        /// Number of input slots on the node
        len: usize,
    },

    /// A position or delta was NaN or infinite
    #[error("Invalid coordinate ({x}, {y})")]
    InvalidCoordinate {
        /// Horizontal component
        x: f64,
        /// Vertical component
        y: f64,
    },

    /// The project this proxy belongs to has been dropped
    #[error("Project is closed")]
    ProjectClosed,

    /// The proxy was created before the project was reset
    #[error("Proxy for node {0} belongs to a previous document")]
    StaleProxy(NodeId),

    /// Grid configuration is unusable
    #[error("Invalid grid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The project document is not valid JSON for this format
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    /// The configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

impl GraphError {
    /// Whether this error means a selector could not be resolved to a node
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::Disconnected)
    }
}

/// Reject NaN and infinite coordinates
pub(crate) fn ensure_finite(x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(GraphError::InvalidCoordinate { x, y })
    }
}
