// SPDX-License-Identifier: MIT OR Apache-2.0
//! Factories for the node kinds used by generated logic programs.
//!
//! Each factory builds a node's inputs, adds it to the project under a fresh
//! id and returns its proxy.

pub mod boolean;
pub mod logic;

pub use boolean::{boolean_node, BOOLEAN_NODE_TYPE};
pub use logic::{gate_node, GateOptions, LogicGate, LOGIC_NODE_TYPE};

/// Editor group shared by the logic node kinds
pub const LOGIC_GROUP: i64 = -4;
