// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) references stored on input slots.
//!
//! Connections are not stored as separate entities. An input slot either
//! holds a [`Connection`] to a producer's output or nothing at all.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Sentinel written to `from node` / `from index` for unconnected inputs
pub const UNCONNECTED: i64 = -1;

/// Reference from an input slot to a producer's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Producing node
    pub node: NodeId,
    /// Output index on the producing node
    pub output: u32,
}

impl Connection {
    /// Create a new connection reference
    pub fn new(node: NodeId, output: u32) -> Self {
        Self { node, output }
    }

    /// Check if this connection comes from a specific node
    pub fn is_from(&self, node_id: NodeId) -> bool {
        self.node == node_id
    }

    /// Persisted `(from node, from index)` pair for an optional connection
    pub fn to_persisted(connection: Option<Connection>) -> (i64, i64) {
        match connection {
            Some(c) => (i64::from(c.node.0), i64::from(c.output)),
            None => (UNCONNECTED, UNCONNECTED),
        }
    }

    /// Decode a persisted `(from node, from index)` pair.
    ///
    /// Only a pair where both halves are valid is a connection. Anything
    /// else, including a half-connected pair, decodes as unconnected.
    pub fn from_persisted(from_node: i64, from_index: i64) -> Option<Connection> {
        let node = u32::try_from(from_node).ok()?;
        let output = u32::try_from(from_index).ok()?;
        Some(Self::new(NodeId(node), output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_pairs() {
        let connection = Connection::new(NodeId(7), 2);
        assert_eq!(Connection::to_persisted(Some(connection)), (7, 2));
        assert_eq!(Connection::to_persisted(None), (UNCONNECTED, UNCONNECTED));
        assert_eq!(Connection::from_persisted(7, 2), Some(connection));
    }

    #[test]
    fn test_partial_pairs_are_unconnected() {
        assert_eq!(Connection::from_persisted(-1, -1), None);
        assert_eq!(Connection::from_persisted(3, -1), None);
        assert_eq!(Connection::from_persisted(-1, 0), None);
    }
}
