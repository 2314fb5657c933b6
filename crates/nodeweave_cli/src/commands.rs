// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document commands run by the CLI.
//!
//! Each command operates on an open [`Project`]; loading and saving are left
//! to the caller.

use nodeweave_graph::nodes::{boolean_node, gate_node, GateOptions, LogicGate};
use nodeweave_graph::{GraphError, NodeId, NodeRef, NodeSelector, Project};
use serde::Serialize;

/// Error type for command execution
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Graph operation failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Argument outside the accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Summary of one node for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    /// Node id
    pub id: u32,
    /// Node kind tag
    #[serde(rename = "type")]
    pub node_type: String,
    /// Display name
    pub name: String,
    /// Position as `[x, y]`
    pub position: [f64; 2],
}

impl NodeSummary {
    fn of(node: &NodeRef) -> Self {
        let (x, y) = node.position();
        Self {
            id: node.id().0,
            node_type: node.node_type(),
            name: node.name(),
            position: [x, y],
        }
    }

    fn list(nodes: &[NodeRef]) -> Vec<Self> {
        nodes.iter().map(Self::of).collect()
    }
}

/// Connections around one node
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    /// The inspected node
    pub node: NodeSummary,
    /// Direct producers, in input-slot order
    pub inputs: Vec<NodeSummary>,
    /// All upstream nodes
    pub upstream: Vec<NodeSummary>,
    /// Direct consumers
    pub outputs: Vec<NodeSummary>,
    /// All downstream nodes
    pub downstream: Vec<NodeSummary>,
}

/// Convert a CLI producer id, where `-1` means "unconnected"
pub fn producer_selector(from: i64) -> Result<NodeSelector, CommandError> {
    if from == -1 {
        return Ok(NodeSelector::Disconnected);
    }
    u32::try_from(from)
        .map(|id| NodeSelector::ById(NodeId(id)))
        .map_err(|_| CommandError::InvalidArgument(format!("node id {from} is out of range")))
}

/// Lay out a node and its producers, returning the node's final y
pub fn layout(project: &Project, node: NodeId, x: f64, y: f64) -> Result<f64, CommandError> {
    let node = project.get_node(node)?;
    Ok(node.put_node(x, y)?)
}

/// Collect direct and transitive connections of a node
pub fn inspect(project: &Project, node: NodeId) -> Result<NodeReport, CommandError> {
    let node = project.get_node(node)?;
    Ok(NodeReport {
        node: NodeSummary::of(&node),
        inputs: NodeSummary::list(&node.in_connections()?),
        upstream: NodeSummary::list(&node.all_in_connections()?),
        outputs: NodeSummary::list(&node.out_connections()?),
        downstream: NodeSummary::list(&node.all_out_connections()?),
    })
}

/// Wire input `input` of `to` from output `output` of `from` (`-1` clears it)
pub fn connect(
    project: &Project,
    to: NodeId,
    input: usize,
    from: i64,
    output: u32,
) -> Result<(), CommandError> {
    let target = project.get_node(to)?;
    target.connect_from(input, producer_selector(from)?, output)?;
    Ok(())
}

/// Clear the connection on an input slot
pub fn disconnect(project: &Project, node: NodeId, input: usize) -> Result<(), CommandError> {
    project.get_node(node)?.remove_connection(input)?;
    Ok(())
}

/// Move a node by a delta
pub fn move_node(
    project: &Project,
    node: NodeId,
    dx: f64,
    dy: f64,
    upstream: bool,
) -> Result<(), CommandError> {
    project.get_node(node)?.move_by(dx, dy, upstream)?;
    Ok(())
}

/// Delete a node, leaving references to it dangling
pub fn remove(project: &Project, node: NodeId) -> Result<(), CommandError> {
    project.get_node(node)?.remove()?;
    Ok(())
}

/// Build `(a AND b) OR c` from constants and lay it out.
///
/// New nodes start at the origin, so the output gate is put three columns to
/// the right to keep the laid-out chain clear of them. Returns the output gate.
pub fn build_demo(project: &Project) -> Result<NodeRef, CommandError> {
    let a = boolean_node(project, true, None);
    let b = boolean_node(project, false, None);
    let c = boolean_node(project, true, None);
    a.set_name("a");
    b.set_name("b");
    c.set_name("c");

    let and = gate_node(
        project,
        GateOptions::new(LogicGate::And).with_producers(a.id(), b.id()),
    );
    and.set_name("a AND b");

    let or = gate_node(project, GateOptions::new(LogicGate::Or));
    or.connect_from(1, &and, 0)?;
    c.connect_to(2, &or, 0)?;
    or.set_name("(a AND b) OR c");

    let x = 3.0 * project.grid().grid_size_x;
    let y = or.put_node(x, 0.0)?;
    tracing::info!("Demo circuit laid out with output at ({}, {})", x, y);
    Ok(or)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeweave_graph::nodes::LOGIC_NODE_TYPE;
    use nodeweave_graph::{GridConfig, ProjectDocument};

    fn demo() -> (Project, NodeRef) {
        let project = Project::new(GridConfig::default());
        let output = build_demo(&project).unwrap();
        (project, output)
    }

    #[test]
    fn test_demo_layout() {
        let (project, output) = demo();
        let grid = project.grid();
        let (gx, gy) = (grid.grid_size_x, grid.grid_size_y);

        assert_eq!(project.node_count(), 5);
        assert_eq!(output.position(), (3.0 * gx, 0.0));

        // and gate sits one column left on the top row, c stacks below it
        let and = project.get_node(NodeId(3)).unwrap();
        let c = project.get_node(NodeId(2)).unwrap();
        assert_eq!(and.position(), (2.0 * gx, 0.0));
        assert_eq!(c.position(), (2.0 * gx, gy));

        let a = project.get_node(NodeId(0)).unwrap();
        let b = project.get_node(NodeId(1)).unwrap();
        assert_eq!(a.position(), (gx, 0.0));
        assert_eq!(b.position(), (gx, gy));
    }

    #[test]
    fn test_inspect_report() {
        let (project, output) = demo();
        let report = inspect(&project, output.id()).unwrap();

        assert_eq!(report.node.node_type, LOGIC_NODE_TYPE);
        let inputs: Vec<u32> = report.inputs.iter().map(|n| n.id).collect();
        let upstream: Vec<u32> = report.upstream.iter().map(|n| n.id).collect();
        assert_eq!(inputs, vec![3, 2]);
        assert_eq!(upstream, vec![3, 0, 1, 2]);
        assert!(report.outputs.is_empty());

        let report = inspect(&project, NodeId(0)).unwrap();
        let downstream: Vec<u32> = report.downstream.iter().map(|n| n.id).collect();
        assert_eq!(downstream, vec![3, 4]);
    }

    #[test]
    fn test_connect_and_disconnect() {
        let (project, output) = demo();

        connect(&project, output.id(), 1, 0, 0).unwrap();
        assert_eq!(output.in_connections().unwrap()[0].id(), NodeId(0));

        connect(&project, output.id(), 1, -1, 5).unwrap();
        assert!(!output.input(1).unwrap().is_connected());

        disconnect(&project, output.id(), 2).unwrap();
        assert!(output.in_connections().unwrap().is_empty());

        assert!(matches!(
            connect(&project, output.id(), 1, -7, 0),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!(
            connect(&project, output.id(), 9, 0, 0),
            Err(CommandError::Graph(GraphError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_move_and_remove() {
        let (project, output) = demo();

        let gx = project.grid().grid_size_x;
        move_node(&project, output.id(), 50.0, 25.0, true).unwrap();
        assert_eq!(output.position(), (3.0 * gx + 50.0, 25.0));
        let a = project.get_node(NodeId(0)).unwrap();
        assert_eq!(a.position(), (gx + 50.0, 25.0));

        remove(&project, NodeId(3)).unwrap();
        assert!(matches!(
            layout(&project, NodeId(3), 0.0, 0.0),
            Err(CommandError::Graph(GraphError::NodeNotFound(_)))
        ));
        let upstream: Vec<NodeId> = output
            .all_in_connections()
            .unwrap()
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(upstream, vec![NodeId(2)]);
    }

    #[test]
    fn test_saved_demo_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        let (project, _) = demo();
        project.save(&path).unwrap();

        let loaded = Project::load(&path, GridConfig::default()).unwrap();
        assert_eq!(loaded.to_document(), project.to_document());
        assert_eq!(
            ProjectDocument::load(&path).unwrap().nodes[4].name,
            "(a AND b) OR c"
        );
    }
}
