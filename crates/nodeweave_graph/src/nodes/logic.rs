// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logic gate node.

use super::LOGIC_GROUP;
use crate::connection::Connection;
use crate::input::Input;
use crate::node::{Node, NodeId};
use crate::project::Project;
use crate::proxy::NodeRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Type tag of logic gate nodes
pub const LOGIC_NODE_TYPE: &str = "Node_Logic";

/// Gate operation, persisted as its integer discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LogicGate {
    /// Both inputs true
    And = 0,
    /// Either input true
    Or = 1,
    /// Exactly one input true
    Xor = 2,
    /// Not both inputs true
    Nand = 3,
    /// Neither input true
    Nor = 4,
    /// Both inputs equal
    Xnor = 5,
}

impl LogicGate {
    /// Get all gates
    pub fn all() -> &'static [LogicGate] {
        &[
            LogicGate::And,
            LogicGate::Or,
            LogicGate::Xor,
            LogicGate::Nand,
            LogicGate::Nor,
            LogicGate::Xnor,
        ]
    }

    /// Get display name for this gate
    pub fn display_name(&self) -> &'static str {
        match self {
            LogicGate::And => "AND",
            LogicGate::Or => "OR",
            LogicGate::Xor => "XOR",
            LogicGate::Nand => "NAND",
            LogicGate::Nor => "NOR",
            LogicGate::Xnor => "XNOR",
        }
    }
}

impl fmt::Display for LogicGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<LogicGate> for u8 {
    fn from(gate: LogicGate) -> Self {
        gate as u8
    }
}

impl TryFrom<u8> for LogicGate {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LogicGate::all()
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| format!("unknown logic gate {value}"))
    }
}

impl FromStr for LogicGate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicGate::all()
            .iter()
            .copied()
            .find(|gate| gate.display_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown logic gate '{s}'"))
    }
}

impl From<LogicGate> for Value {
    fn from(gate: LogicGate) -> Self {
        Value::from(u8::from(gate))
    }
}

/// Inputs of a logic gate node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateOptions {
    /// Gate operation
    pub gate: LogicGate,
    /// Literal for the first operand
    pub value1: bool,
    /// Producer of the first operand
    pub from1: Option<NodeId>,
    /// Literal for the second operand
    pub value2: bool,
    /// Producer of the second operand
    pub from2: Option<NodeId>,
}

impl GateOptions {
    /// Gate with both operands as `false` literals
    pub fn new(gate: LogicGate) -> Self {
        Self {
            gate,
            value1: false,
            from1: None,
            value2: false,
            from2: None,
        }
    }

    /// Feed both operands from producers
    pub fn with_producers(mut self, from1: NodeId, from2: NodeId) -> Self {
        self.from1 = Some(from1);
        self.from2 = Some(from2);
        self
    }
}

/// Add a logic gate node with inputs `[gate, operand 1, operand 2]`
pub fn gate_node(project: &Project, options: GateOptions) -> NodeRef {
    let operand = |value: bool, from: Option<NodeId>| {
        Input::new(value, from.map(|id| Connection::new(id, 0)))
    };

    let node = Node::new(project.next_id(), LOGIC_NODE_TYPE)
        .with_group(LOGIC_GROUP)
        .with_inputs(vec![
            Input::literal(options.gate),
            operand(options.value1, options.from1),
            operand(options.value2, options.from2),
        ]);
    project.add_node(node)
}
