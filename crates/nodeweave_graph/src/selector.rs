// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ways of naming a node when resolving or wiring.

use crate::node::{NodeId, SharedNode};
use crate::proxy::NodeRef;
use std::rc::Rc;

/// Selects a node by id, by shared value or by an existing proxy
#[derive(Debug, Clone)]
pub enum NodeSelector {
    /// Look the node up by id
    ById(NodeId),
    /// Use this node value directly
    ByValue(SharedNode),
    /// Use an existing proxy
    ByProxy(NodeRef),
    /// No node. Clears a connection when passed to `connect_from`.
    Disconnected,
}

impl From<NodeId> for NodeSelector {
    fn from(id: NodeId) -> Self {
        Self::ById(id)
    }
}

impl From<Option<NodeId>> for NodeSelector {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Self::Disconnected, Self::ById)
    }
}

impl From<SharedNode> for NodeSelector {
    fn from(node: SharedNode) -> Self {
        Self::ByValue(node)
    }
}

impl From<&SharedNode> for NodeSelector {
    fn from(node: &SharedNode) -> Self {
        Self::ByValue(Rc::clone(node))
    }
}

impl From<NodeRef> for NodeSelector {
    fn from(proxy: NodeRef) -> Self {
        Self::ByProxy(proxy)
    }
}

impl From<&NodeRef> for NodeSelector {
    fn from(proxy: &NodeRef) -> Self {
        Self::ByProxy(Rc::clone(proxy))
    }
}
