// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted project document.
//!
//! The document is a JSON object with a `nodes` array. Any other top-level
//! fields are carried through untouched.

use crate::error::Result;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Flat project document as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Nodes in document order
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Top-level fields the engine does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectDocument {
    /// Parse a document from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize the document as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save the document to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
