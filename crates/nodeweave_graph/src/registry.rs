// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identity cache mapping node ids to their live proxies.

use crate::node::NodeId;
use crate::proxy::NodeRef;
use indexmap::IndexMap;
use std::rc::Rc;

/// Registry holding at most one proxy per node id
#[derive(Default)]
pub struct ProxyRegistry {
    /// Live proxies by node id
    proxies: IndexMap<NodeId, NodeRef>,
}

impl ProxyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached proxy for a node id
    pub fn get(&self, id: NodeId) -> Option<NodeRef> {
        self.proxies.get(&id).cloned()
    }

    /// Record the proxy for its node id. The last write wins.
    pub fn register(&mut self, proxy: NodeRef) {
        let id = proxy.id();
        if let Some(previous) = self.proxies.insert(id, proxy) {
            if !Rc::ptr_eq(&previous, &self.proxies[&id]) {
                tracing::warn!("Replaced cached proxy for node {}", id);
            }
        }
    }

    /// Remove the proxy for a node id
    pub fn unregister(&mut self, id: NodeId) -> Option<NodeRef> {
        self.proxies.shift_remove(&id)
    }

    /// Drop every cached proxy
    pub fn clear(&mut self) {
        self.proxies.clear();
    }

    /// Number of cached proxies
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
