// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input slot definitions.
//!
//! In memory an [`Input`] carries an explicit optional [`Connection`]. The
//! persisted form keeps the document's sentinel encoding:
//!
//! ```json
//! { "raw value": [[0, true]], "from node": -1, "from index": -1 }
//! ```

use crate::connection::{Connection, UNCONNECTED};
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Literal fallback value of an input slot.
///
/// Persisted as an array of entries, normally a single `[kind, value]` pair.
/// The engine only reads and writes the second element of the first entry;
/// every other element is kept as loaded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawValue(pub Vec<Value>);

/// Position of the literal inside an entry
const VALUE_INDEX: usize = 1;

static NULL: Value = Value::Null;

impl RawValue {
    /// Create a raw value holding one `[0, value]` entry
    pub fn new(value: impl Into<Value>) -> Self {
        Self(vec![Value::Array(vec![Value::from(0), value.into()])])
    }

    /// First element of the first entry, if present
    pub fn kind(&self) -> Option<&Value> {
        self.0.first().and_then(|entry| entry.get(0))
    }

    /// The literal, or `null` when the entry has no value slot
    pub fn value(&self) -> &Value {
        self.0
            .first()
            .and_then(|entry| entry.get(VALUE_INDEX))
            .unwrap_or(&NULL)
    }

    /// Replace the literal, leaving the rest of the entries untouched
    pub fn set_value(&mut self, value: Value) {
        match self.0.first_mut() {
            Some(Value::Array(entry)) => {
                if entry.len() <= VALUE_INDEX {
                    entry.resize(VALUE_INDEX + 1, Value::Null);
                }
                entry[VALUE_INDEX] = value;
            }
            Some(other) => {
                tracing::warn!("Replacing malformed raw value entry {}", other);
                *other = Value::Array(vec![Value::from(0), value]);
            }
            None => self.0.push(Value::Array(vec![Value::from(0), value])),
        }
    }
}

/// One input slot of a node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PersistedInput", into = "PersistedInput")]
pub struct Input {
    /// Literal fallback value
    pub raw_value: RawValue,
    /// Producer feeding this slot, if any
    pub connection: Option<Connection>,
    /// Persisted fields the engine does not interpret
    pub extra: Map<String, Value>,
}

impl Input {
    /// Create an input with the given literal value and optional producer
    pub fn new(value: impl Into<Value>, connection: Option<Connection>) -> Self {
        Self {
            raw_value: RawValue::new(value),
            connection,
            extra: Map::new(),
        }
    }

    /// Create an unconnected input holding a literal
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::new(value, None)
    }

    /// Create an input fed from output 0 of `producer`
    pub fn from_node(value: impl Into<Value>, producer: NodeId) -> Self {
        Self::new(value, Some(Connection::new(producer, 0)))
    }

    /// The literal fallback value
    pub fn value(&self) -> &Value {
        self.raw_value.value()
    }

    /// Check whether this slot is fed by another node
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
}

/// Wire representation of an input slot
#[derive(Serialize, Deserialize)]
struct PersistedInput {
    #[serde(rename = "raw value", default)]
    raw_value: RawValue,
    #[serde(rename = "from node", default = "unconnected")]
    from_node: i64,
    #[serde(rename = "from index", default = "unconnected")]
    from_index: i64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn unconnected() -> i64 {
    UNCONNECTED
}

impl From<PersistedInput> for Input {
    fn from(persisted: PersistedInput) -> Self {
        let connection = Connection::from_persisted(persisted.from_node, persisted.from_index);
        if connection.is_none()
            && (persisted.from_node != UNCONNECTED || persisted.from_index != UNCONNECTED)
        {
            tracing::warn!(
                "Normalizing input with from node {} / from index {} to unconnected",
                persisted.from_node,
                persisted.from_index
            );
        }

        Self {
            raw_value: persisted.raw_value,
            connection,
            extra: persisted.extra,
        }
    }
}

impl From<Input> for PersistedInput {
    fn from(input: Input) -> Self {
        let (from_node, from_index) = Connection::to_persisted(input.connection);
        Self {
            raw_value: input.raw_value,
            from_node,
            from_index,
            extra: input.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_unconnected_input() {
        let input: Input = serde_json::from_value(json!({
            "raw value": [[0, true]],
            "from node": -1,
            "from index": -1
        }))
        .unwrap();

        assert_eq!(input.value(), &json!(true));
        assert!(!input.is_connected());
    }

    #[test]
    fn test_parse_connected_input() {
        let input: Input = serde_json::from_value(json!({
            "raw value": [[0, false]],
            "from node": 4,
            "from index": 1
        }))
        .unwrap();

        assert_eq!(input.connection, Some(Connection::new(NodeId(4), 1)));
    }

    #[test]
    fn test_half_connected_input_is_normalized() {
        let input: Input = serde_json::from_value(json!({
            "raw value": [[0, 1]],
            "from node": 4,
            "from index": -1
        }))
        .unwrap();
        assert!(!input.is_connected());

        let written = serde_json::to_value(&input).unwrap();
        assert_eq!(written["from node"], json!(-1));
        assert_eq!(written["from index"], json!(-1));
    }

    #[test]
    fn test_sentinel_written_for_unconnected() {
        let written = serde_json::to_value(Input::literal("abc")).unwrap();
        assert_eq!(
            written,
            json!({ "raw value": [[0, "abc"]], "from node": -1, "from index": -1 })
        );
    }

    #[test]
    fn test_unknown_fields_survive() {
        let source = json!({
            "raw value": [["bool", true]],
            "from node": 2,
            "from index": 0,
            "label": "enable"
        });
        let input: Input = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(input.raw_value.kind(), Some(&json!("bool")));
        assert_eq!(serde_json::to_value(&input).unwrap(), source);
    }

    #[test]
    fn test_irregular_raw_value_round_trips() {
        let source = json!({
            "raw value": [["int", 3, "extra"], [1, 4], "note"],
            "from node": -1,
            "from index": -1
        });
        let mut input: Input = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(input.value(), &json!(3));
        assert_eq!(serde_json::to_value(&input).unwrap(), source);

        input.raw_value.set_value(json!(7));
        let written = serde_json::to_value(&input).unwrap();
        assert_eq!(written["raw value"], json!([["int", 7, "extra"], [1, 4], "note"]));
    }

    #[test]
    fn test_empty_raw_value_stays_empty() {
        let source = json!({ "raw value": [], "from node": -1, "from index": -1 });
        let mut input: Input = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(input.value(), &Value::Null);
        assert_eq!(input.raw_value.kind(), None);
        assert_eq!(serde_json::to_value(&input).unwrap(), source);

        input.raw_value.set_value(json!(true));
        assert_eq!(input.raw_value, RawValue::new(true));

        let mut short = RawValue(vec![json!(["bool"])]);
        short.set_value(json!(false));
        assert_eq!(short, RawValue(vec![json!(["bool", false])]));
    }
}
