// SPDX-License-Identifier: MIT OR Apache-2.0
//! Boolean constant node.

use super::LOGIC_GROUP;
use crate::connection::Connection;
use crate::input::Input;
use crate::node::{Node, NodeId};
use crate::project::Project;
use crate::proxy::NodeRef;

/// Type tag of boolean constant nodes
pub const BOOLEAN_NODE_TYPE: &str = "Node_Boolean";

/// Add a boolean constant node with one input, optionally fed from `from`
pub fn boolean_node(project: &Project, value: bool, from: Option<NodeId>) -> NodeRef {
    let node = Node::new(project.next_id(), BOOLEAN_NODE_TYPE)
        .with_group(LOGIC_GROUP)
        .with_inputs(vec![Input::new(value, from.map(|id| Connection::new(id, 0)))]);
    project.add_node(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_node_shape() {
        let project = Project::default();
        let node = boolean_node(&project, true, None);

        assert_eq!(node.id(), NodeId(0));
        assert_eq!(node.node_type(), BOOLEAN_NODE_TYPE);
        assert_eq!(node.input_count(), 1);
        assert_eq!(node.input(0).unwrap().value(), &json!(true));
        node.with_node(|n| assert_eq!(n.group, Some(LOGIC_GROUP)));
    }

    #[test]
    fn test_boolean_node_from_producer() {
        let project = Project::default();
        let source = boolean_node(&project, false, None);
        let copy = boolean_node(&project, false, Some(source.id()));

        assert_eq!(copy.id(), NodeId(1));
        let producers = copy.in_connections().unwrap();
        assert_eq!(producers.len(), 1);
        assert_eq!(producers[0].id(), source.id());
    }
}
