// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node proxies: the operational surface over one node of a project.
//!
//! A proxy never copies node data. It holds the same shared node value as the
//! project's node list, so every mutation is visible through the document.
//! Proxies are created and cached by [`Project::get_node`]; there is at most
//! one live proxy per node id.

use crate::connection::Connection;
use crate::error::{ensure_finite, GraphError, Result};
use crate::input::Input;
use crate::node::{Node, NodeId, SharedNode};
use crate::project::{Project, ProjectState};
use crate::selector::NodeSelector;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a node proxy
pub type NodeRef = Rc<NodeProxy>;

/// Which way a traversal follows connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Towards producers
    Upstream,
    /// Towards consumers
    Downstream,
}

/// Operational wrapper over one node
pub struct NodeProxy {
    id: NodeId,
    node: SharedNode,
    project: Weak<ProjectState>,
    generation: u64,
}

impl fmt::Debug for NodeProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeProxy")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl NodeProxy {
    pub(crate) fn attach(project: &Project, node: SharedNode) -> NodeRef {
        let id = node.borrow().id;
        Rc::new(Self {
            id,
            node,
            project: project.downgrade(),
            generation: project.generation(),
        })
    }

    /// Node id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The shared node value
    pub fn node(&self) -> SharedNode {
        Rc::clone(&self.node)
    }

    /// Run `f` with a borrow of the node
    pub fn with_node<R>(&self, f: impl FnOnce(&Node) -> R) -> R {
        f(&self.node.borrow())
    }

    /// Display name
    pub fn name(&self) -> String {
        self.node.borrow().name.clone()
    }

    /// Node kind tag
    pub fn node_type(&self) -> String {
        self.node.borrow().node_type.clone()
    }

    /// Current position as `(x, y)`
    pub fn position(&self) -> (f64, f64) {
        self.node.borrow().position()
    }

    /// Number of input slots
    pub fn input_count(&self) -> usize {
        self.node.borrow().inputs.len()
    }

    /// Copy of an input slot
    pub fn input(&self, index: usize) -> Result<Input> {
        let node = self.node.borrow();
        node.input(index)
            .cloned()
            .ok_or(GraphError::IndexOutOfRange {
                node: self.id,
                index,
                len: node.inputs.len(),
            })
    }

    /// The project this proxy belongs to
    pub fn project(&self) -> Result<Project> {
        let state = self.project.upgrade().ok_or(GraphError::ProjectClosed)?;
        let project = Project::from_state(state);
        if project.generation() != self.generation {
            return Err(GraphError::StaleProxy(self.id));
        }
        Ok(project)
    }

    pub(crate) fn is_attached_to(&self, project: &Project) -> bool {
        Weak::ptr_eq(&self.project, &project.downgrade())
    }

    fn with_input_mut<R>(&self, index: usize, f: impl FnOnce(&mut Input) -> R) -> Result<R> {
        let mut node = self.node.borrow_mut();
        let len = node.inputs.len();
        let input = node.inputs.get_mut(index).ok_or(GraphError::IndexOutOfRange {
            node: self.id,
            index,
            len,
        })?;
        Ok(f(input))
    }

    fn check_input(&self, index: usize) -> Result<()> {
        let len = self.input_count();
        if index < len {
            Ok(())
        } else {
            Err(GraphError::IndexOutOfRange {
                node: self.id,
                index,
                len,
            })
        }
    }

    /// Overwrite the literal value of an input slot. The connection is kept.
    pub fn set_input_value(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.with_input_mut(index, |input| input.raw_value.set_value(value))
    }

    /// Feed input `index` from output `from_output` of the selected node.
    ///
    /// [`NodeSelector::Disconnected`] clears the connection instead, ignoring
    /// `from_output`.
    pub fn connect_from(
        &self,
        index: usize,
        from: impl Into<NodeSelector>,
        from_output: u32,
    ) -> Result<()> {
        self.check_input(index)?;

        let selector: NodeSelector = from.into();
        let connection = match selector {
            NodeSelector::Disconnected => None,
            selector => {
                let producer = self.project()?.get_node(selector)?;
                Some(Connection::new(producer.id(), from_output))
            }
        };

        self.with_input_mut(index, |input| input.connection = connection)?;
        match connection {
            Some(c) => tracing::debug!(
                "Connected node {} output {} to node {} input {}",
                c.node,
                c.output,
                self.id,
                index
            ),
            None => tracing::debug!("Disconnected node {} input {}", self.id, index),
        }
        Ok(())
    }

    /// Feed input `index` of the selected node from output `from_output` of this node
    pub fn connect_to(
        &self,
        index: usize,
        to: impl Into<NodeSelector>,
        from_output: u32,
    ) -> Result<()> {
        let target = self.project()?.get_node(to)?;
        target.connect_from(index, self.id, from_output)
    }

    /// Clear the connection on an input slot
    pub fn remove_connection(&self, index: usize) -> Result<()> {
        self.connect_from(index, NodeSelector::Disconnected, 0)
    }

    /// Rename the node
    pub fn set_name(&self, name: impl Into<String>) {
        self.node.borrow_mut().name = name.into();
    }

    /// Direct producers, in input-slot order.
    ///
    /// Inputs whose producer no longer exists are skipped.
    pub fn in_connections(&self) -> Result<Vec<NodeRef>> {
        let project = self.project()?;
        let producers: Vec<NodeId> = self.node.borrow().producer_ids().collect();

        let mut proxies = Vec::with_capacity(producers.len());
        for id in producers {
            match project.get_node(id) {
                Ok(proxy) => proxies.push(proxy),
                Err(GraphError::NodeNotFound(missing)) => {
                    tracing::debug!("Node {} has a dangling input from node {}", self.id, missing);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(proxies)
    }

    /// Every node upstream of this one, depth-first pre-order.
    ///
    /// A node reachable by several paths appears once per path.
    pub fn all_in_connections(&self) -> Result<Vec<NodeRef>> {
        self.closure(Direction::Upstream)
    }

    /// Nodes with at least one input fed by this node, in document order
    pub fn out_connections(&self) -> Result<Vec<NodeRef>> {
        let project = self.project()?;
        let consumers: Vec<SharedNode> = project
            .nodes()
            .into_iter()
            .filter(|node| node.borrow().consumes(self.id))
            .collect();

        consumers
            .into_iter()
            .map(|node| project.get_node(node))
            .collect()
    }

    /// Every node downstream of this one, depth-first pre-order.
    ///
    /// A node reachable by several paths appears once per path.
    pub fn all_out_connections(&self) -> Result<Vec<NodeRef>> {
        self.closure(Direction::Downstream)
    }

    fn neighbours(&self, direction: Direction) -> Result<Vec<NodeRef>> {
        match direction {
            Direction::Upstream => self.in_connections(),
            Direction::Downstream => self.out_connections(),
        }
    }

    fn closure(&self, direction: Direction) -> Result<Vec<NodeRef>> {
        let mut path = HashSet::from([self.id]);
        let mut found = Vec::new();
        self.walk(direction, &mut path, &mut found)?;
        Ok(found)
    }

    // Nodes already on the current path are cycle edges: not emitted, not expanded.
    fn walk(
        &self,
        direction: Direction,
        path: &mut HashSet<NodeId>,
        found: &mut Vec<NodeRef>,
    ) -> Result<()> {
        for next in self.neighbours(direction)? {
            if !path.insert(next.id) {
                tracing::trace!("Cycle edge {} -> {} skipped", self.id, next.id);
                continue;
            }
            found.push(Rc::clone(&next));
            let result = next.walk(direction, path, found);
            path.remove(&next.id);
            result?;
        }
        Ok(())
    }

    /// Shift the node by `(dx, dy)`, and optionally every upstream node with it
    pub fn move_by(&self, dx: f64, dy: f64, move_upstream: bool) -> Result<()> {
        self.translate(dx, dy)?;
        if move_upstream {
            self.shift_upstream(dx, dy)?;
        }
        Ok(())
    }

    /// Place the node at `(x, y)`. Upstream nodes, if moved, keep their offset.
    pub fn move_absolute(&self, x: f64, y: f64, move_upstream: bool) -> Result<()> {
        ensure_finite(x, y)?;
        let (previous_x, previous_y) = self.position();
        self.set_position(x, y);
        if move_upstream {
            self.shift_upstream(x - previous_x, y - previous_y)?;
        }
        Ok(())
    }

    fn translate(&self, dx: f64, dy: f64) -> Result<()> {
        ensure_finite(dx, dy)?;
        let (x, y) = self.position();
        let (x, y) = (x + dx, y + dy);
        ensure_finite(x, y)?;
        self.set_position(x, y);
        Ok(())
    }

    // Each distinct upstream node moves once, however many paths reach it.
    fn shift_upstream(&self, dx: f64, dy: f64) -> Result<()> {
        let mut moved = HashSet::from([self.id]);
        for node in self.all_in_connections()? {
            if moved.insert(node.id) {
                node.translate(dx, dy)?;
            }
        }
        Ok(())
    }

    pub(crate) fn set_position(&self, x: f64, y: f64) {
        let mut node = self.node.borrow_mut();
        node.x = x;
        node.y = y;
    }

    /// Delete the node from its project.
    ///
    /// Other nodes that referenced it keep their dangling inputs.
    pub fn remove(&self) -> Result<()> {
        let project = self.project()?;
        if project
            .find_node(self.id)
            .is_some_and(|node| Rc::ptr_eq(&node, &self.node))
        {
            project.remove_node(self.id);
        }
        Ok(())
    }
}
