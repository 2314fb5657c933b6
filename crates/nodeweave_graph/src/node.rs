// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph document.

use crate::input::Input;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Unique, stable identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The id following this one
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Node value shared between the project document and its proxy
pub type SharedNode = Rc<RefCell<Node>>;

/// A node in the project document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind tag, opaque to the engine
    #[serde(rename = "type")]
    pub node_type: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Horizontal grid position
    #[serde(default)]
    pub x: f64,
    /// Vertical grid position
    #[serde(default)]
    pub y: f64,
    /// Editor group the node belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<i64>,
    /// Input slots, addressed by index
    #[serde(default)]
    pub inputs: Vec<Input>,
    /// Persisted fields the engine does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Create a node with no inputs at the origin
    pub fn new(id: NodeId, node_type: impl Into<String>) -> Self {
        Self {
            id,
            node_type: node_type.into(),
            name: String::new(),
            x: 0.0,
            y: 0.0,
            group: None,
            inputs: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the group
    pub fn with_group(mut self, group: i64) -> Self {
        self.group = Some(group);
        self
    }

    /// Set the input slots
    pub fn with_inputs(mut self, inputs: Vec<Input>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Get an input slot by index
    pub fn input(&self, index: usize) -> Option<&Input> {
        self.inputs.get(index)
    }

    /// Ids of connected producers, in input-slot order
    pub fn producer_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs
            .iter()
            .filter_map(|input| input.connection.map(|c| c.node))
    }

    /// Check whether any input is fed by `producer`
    pub fn consumes(&self, producer: NodeId) -> bool {
        self.inputs
            .iter()
            .any(|input| input.connection.is_some_and(|c| c.is_from(producer)))
    }

    /// Current position as `(x, y)`
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Wrap the node for sharing with a project
    pub fn into_shared(self) -> SharedNode {
        Rc::new(RefCell::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use serde_json::json;

    #[test]
    fn test_producer_ids_in_slot_order() {
        let node = Node::new(NodeId(9), "Node_Logic").with_inputs(vec![
            Input::from_node(0, NodeId(3)),
            Input::literal(true),
            Input::new(false, Some(Connection::new(NodeId(1), 2))),
        ]);

        let producers: Vec<NodeId> = node.producer_ids().collect();
        assert_eq!(producers, vec![NodeId(3), NodeId(1)]);
        assert!(node.consumes(NodeId(1)));
        assert!(!node.consumes(NodeId(9)));
    }

    #[test]
    fn test_node_document_shape() {
        let source = json!({
            "id": 5,
            "type": "Node_Boolean",
            "name": "enable",
            "x": 200.0,
            "y": 100.0,
            "group": -4,
            "inputs": [{ "raw value": [[0, true]], "from node": -1, "from index": -1 }],
            "collapsed": false
        });

        let node: Node = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(node.id, NodeId(5));
        assert_eq!(node.node_type, "Node_Boolean");
        assert_eq!(node.group, Some(-4));
        assert_eq!(node.extra.get("collapsed"), Some(&json!(false)));
        assert_eq!(serde_json::to_value(&node).unwrap(), source);
    }

    #[test]
    fn test_missing_optional_fields() {
        let node: Node = serde_json::from_value(json!({ "id": 1, "type": "Node_Boolean" })).unwrap();
        assert_eq!(node.position(), (0.0, 0.0));
        assert!(node.inputs.is_empty());
        assert!(node.name.is_empty());
    }
}
