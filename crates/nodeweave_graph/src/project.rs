// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project container owning the node list, the node index and the proxy cache.
//!
//! A [`Project`] is a cheap handle; clones share the same document. Proxies
//! keep a weak reference back to the project state so that the identity
//! cache, which owns the proxies, does not keep the project alive.

use crate::config::GridConfig;
use crate::document::ProjectDocument;
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId, SharedNode};
use crate::proxy::{NodeProxy, NodeRef};
use crate::registry::ProxyRegistry;
use crate::selector::NodeSelector;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};

/// Shared state behind a [`Project`] handle
pub(crate) struct ProjectState {
    /// Nodes in document order
    nodes: RefCell<Vec<SharedNode>>,
    /// Primary lookup index by id
    index: RefCell<IndexMap<NodeId, SharedNode>>,
    /// Identity cache
    registry: RefCell<ProxyRegistry>,
    /// Top-level document fields the engine does not interpret
    extra: RefCell<Map<String, Value>>,
    /// Layout grid
    grid: Cell<GridConfig>,
    /// Bumped on every reset so older proxies can be detected
    generation: Cell<u64>,
    /// Lowest id never used by a node or referenced by an input
    next_id: Cell<u32>,
}

/// An open node program document
#[derive(Clone)]
pub struct Project {
    state: Rc<ProjectState>,
}

impl Project {
    /// Create an empty project
    pub fn new(grid: GridConfig) -> Self {
        Self::from_document(ProjectDocument::default(), grid)
    }

    /// Open a project over an in-memory document
    pub fn from_document(document: ProjectDocument, grid: GridConfig) -> Self {
        let project = Self {
            state: Rc::new(ProjectState {
                nodes: RefCell::new(Vec::new()),
                index: RefCell::new(IndexMap::new()),
                registry: RefCell::new(ProxyRegistry::new()),
                extra: RefCell::new(Map::new()),
                grid: Cell::new(grid),
                generation: Cell::new(0),
                next_id: Cell::new(0),
            }),
        };
        project.install(document);
        project
    }

    /// Load a project document from a JSON file
    pub fn load(path: &Path, grid: GridConfig) -> Result<Self> {
        let document = ProjectDocument::load(path)?;
        let project = Self::from_document(document, grid);
        tracing::info!("Opened project with {} nodes from {:?}", project.node_count(), path);
        Ok(project)
    }

    /// Save the project document as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_document().save(path)?;
        tracing::info!("Saved project with {} nodes to {:?}", self.node_count(), path);
        Ok(())
    }

    /// Snapshot the current document
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            nodes: self
                .state
                .nodes
                .borrow()
                .iter()
                .map(|node| node.borrow().clone())
                .collect(),
            extra: self.state.extra.borrow().clone(),
        }
    }

    /// Replace the document and drop every cached proxy.
    ///
    /// Proxies obtained before the reset fail with [`GraphError::StaleProxy`].
    pub fn reset(&self, document: ProjectDocument) {
        self.state.generation.set(self.state.generation.get() + 1);
        self.install(document);
        tracing::debug!(
            "Project reset to generation {} with {} nodes",
            self.generation(),
            self.node_count()
        );
    }

    fn install(&self, document: ProjectDocument) {
        self.state.registry.borrow_mut().clear();

        let nodes: Vec<SharedNode> = document.nodes.into_iter().map(Node::into_shared).collect();
        let mut index = IndexMap::with_capacity(nodes.len());
        for node in &nodes {
            let id = node.borrow().id;
            self.reserve_id(id);
            for producer in node.borrow().producer_ids() {
                self.reserve_id(producer);
            }
            if index.contains_key(&id) {
                tracing::warn!("Duplicate node id {} in document, keeping the first", id);
                continue;
            }
            index.insert(id, Rc::clone(node));
        }

        *self.state.nodes.borrow_mut() = nodes;
        *self.state.index.borrow_mut() = index;
        *self.state.extra.borrow_mut() = document.extra;
    }

    pub(crate) fn from_state(state: Rc<ProjectState>) -> Self {
        Self { state }
    }

    pub(crate) fn downgrade(&self) -> Weak<ProjectState> {
        Rc::downgrade(&self.state)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.state.generation.get()
    }

    /// Check if two handles refer to the same project
    pub fn same_project(&self, other: &Project) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Layout grid
    pub fn grid(&self) -> GridConfig {
        self.state.grid.get()
    }

    /// Id for the next new node.
    ///
    /// Ids are never handed out twice, so dangling references left by a
    /// removed node cannot be picked up by a later one.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.state.next_id.get())
    }

    fn reserve_id(&self, id: NodeId) {
        let next = id.next().0;
        if next > self.state.next_id.get() {
            self.state.next_id.set(next);
        }
    }

    /// Add a node to the document and return its proxy.
    ///
    /// If the node's id is already taken, it is given [`Project::next_id`].
    pub fn add_node(&self, mut node: Node) -> NodeRef {
        if self.find_node(node.id).is_some() {
            let id = self.next_id();
            tracing::debug!("Node id {} is taken, assigning {}", node.id, id);
            node.id = id;
        }

        let id = node.id;
        self.reserve_id(id);
        for producer in node.producer_ids() {
            self.reserve_id(producer);
        }
        let shared = node.into_shared();
        self.state.nodes.borrow_mut().push(Rc::clone(&shared));
        self.state.index.borrow_mut().insert(id, Rc::clone(&shared));
        tracing::debug!("Added node {}", id);
        self.wrap(shared)
    }

    /// Resolve a selector to the node's unique proxy
    pub fn get_node(&self, selector: impl Into<NodeSelector>) -> Result<NodeRef> {
        match selector.into() {
            NodeSelector::ById(id) => {
                if let Some(proxy) = self.cached_proxy(id) {
                    return Ok(proxy);
                }
                let node = self.find_node(id).ok_or(GraphError::NodeNotFound(id))?;
                Ok(self.wrap(node))
            }
            NodeSelector::ByValue(node) => {
                let id = node.borrow().id;
                self.ensure_live(id, &node)?;
                if let Some(proxy) = self.cached_proxy(id) {
                    return Ok(proxy);
                }
                Ok(self.wrap(node))
            }
            NodeSelector::ByProxy(proxy) => {
                if !proxy.is_attached_to(self) {
                    return self.get_node(proxy.id());
                }
                proxy.project()?;
                self.ensure_live(proxy.id(), &proxy.node())?;
                Ok(proxy)
            }
            NodeSelector::Disconnected => Err(GraphError::Disconnected),
        }
    }

    /// Fail unless `node` is the document's node for `id`
    fn ensure_live(&self, id: NodeId, node: &SharedNode) -> Result<()> {
        match self.find_node(id) {
            Some(found) if Rc::ptr_eq(&found, node) => Ok(()),
            _ => Err(GraphError::NodeNotFound(id)),
        }
    }

    /// Look up a node value by id.
    ///
    /// Uses the primary index first and falls back to scanning the node list,
    /// repairing the index on a hit.
    pub fn find_node(&self, id: NodeId) -> Option<SharedNode> {
        if let Some(node) = self.state.index.borrow().get(&id) {
            return Some(Rc::clone(node));
        }

        let found = self
            .state
            .nodes
            .borrow()
            .iter()
            .find(|node| node.borrow().id == id)
            .cloned();

        if let Some(node) = &found {
            tracing::debug!("Node {} missing from index, found by scan", id);
            self.state.index.borrow_mut().insert(id, Rc::clone(node));
        }
        found
    }

    /// Nodes within `tolerance` of `(x, y)` on both axes
    pub fn nodes_at(&self, x: f64, y: f64, tolerance: f64) -> Vec<SharedNode> {
        self.state
            .nodes
            .borrow()
            .iter()
            .filter(|node| {
                let node = node.borrow();
                (node.x - x).abs() <= tolerance && (node.y - y).abs() <= tolerance
            })
            .cloned()
            .collect()
    }

    /// Record a proxy in the identity cache
    pub fn register_node(&self, proxy: NodeRef) {
        self.state.registry.borrow_mut().register(proxy);
    }

    /// Drop a node's proxy from the identity cache
    pub fn unregister_node(&self, id: NodeId) -> Option<NodeRef> {
        self.state.registry.borrow_mut().unregister(id)
    }

    /// Cached proxy for an id, without resolving the node
    pub fn cached_proxy(&self, id: NodeId) -> Option<NodeRef> {
        self.state.registry.borrow().get(id)
    }

    /// Number of proxies in the identity cache
    pub fn cached_proxy_count(&self) -> usize {
        self.state.registry.borrow().len()
    }

    /// Delete a node from the document and drop its cached proxy.
    ///
    /// Inputs on other nodes that referenced it are left untouched. When the
    /// document holds several nodes with this id, only the indexed one goes.
    pub fn remove_node(&self, id: NodeId) -> Option<SharedNode> {
        let removed = self.find_node(id)?;
        self.unregister_node(id);
        self.state.index.borrow_mut().shift_remove(&id);
        self.state
            .nodes
            .borrow_mut()
            .retain(|node| !Rc::ptr_eq(node, &removed));
        tracing::debug!("Removed node {}", id);
        Some(removed)
    }

    /// All nodes in document order
    pub fn nodes(&self) -> Vec<SharedNode> {
        self.state.nodes.borrow().clone()
    }

    /// All node ids in document order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.state
            .nodes
            .borrow()
            .iter()
            .map(|node| node.borrow().id)
            .collect()
    }

    /// Number of nodes in the document
    pub fn node_count(&self) -> usize {
        self.state.nodes.borrow().len()
    }

    fn wrap(&self, node: SharedNode) -> NodeRef {
        let proxy = NodeProxy::attach(self, node);
        self.register_node(Rc::clone(&proxy));
        proxy
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}
