// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automatic grid layout.
//!
//! [`NodeProxy::put_node`] places a node and its whole producer chain on the
//! grid. Producers grow leftward one column per level, each search starting
//! at its consumer's row and stepping down one row at a time until the cell
//! is free. Once its producers are placed, a consumer is realigned with the
//! row of its topmost producer.

use crate::error::{ensure_finite, GraphError, Result};
use crate::node::NodeId;
use crate::project::Project;
use crate::proxy::NodeProxy;
use std::collections::HashSet;

impl NodeProxy {
    /// Place this node at the first free cell at or below `(x, y)` and lay
    /// out its producers to the left. Returns the node's final y.
    pub fn put_node(&self, x: f64, y: f64) -> Result<f64> {
        ensure_finite(x, y)?;
        let project = self.project()?;
        let mut path = HashSet::new();
        let final_y = self.place(&project, x, y, &mut path)?;
        tracing::debug!("Laid out node {} at ({}, {})", self.id(), x, final_y);
        Ok(final_y)
    }

    fn place(
        &self,
        project: &Project,
        x: f64,
        mut y: f64,
        path: &mut HashSet<NodeId>,
    ) -> Result<f64> {
        path.insert(self.id());
        let producers = self.in_connections()?;
        let grid = project.grid();
        let tolerance = grid.probe_tolerance();

        while is_occupied(project, self.id(), x, y, tolerance) {
            tracing::trace!("Cell ({}, {}) taken, stepping down", x, y);
            let below = y + grid.grid_size_y;
            if below == y || !below.is_finite() {
                return Err(GraphError::InvalidCoordinate { x, y: below });
            }
            y = below;
        }
        self.set_position(x, y);

        let mut top: Option<f64> = None;
        for producer in producers {
            if path.contains(&producer.id()) {
                tracing::debug!(
                    "Skipping producer {} of node {}: already on the layout path",
                    producer.id(),
                    self.id()
                );
                continue;
            }
            let producer_y = producer.place(project, x - grid.grid_size_x, y, path)?;
            top = Some(top.map_or(producer_y, |t| t.min(producer_y)));
        }

        if let Some(top) = top {
            self.set_position(x, top);
            y = top;
        }

        path.remove(&self.id());
        Ok(y)
    }
}

/// Whether any node other than `id` sits within `tolerance` of `(x, y)`
fn is_occupied(project: &Project, id: NodeId, x: f64, y: f64, tolerance: f64) -> bool {
    project
        .nodes_at(x, y, tolerance)
        .iter()
        .any(|node| node.borrow().id != id)
}
