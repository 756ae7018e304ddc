//! Clipboard payloads: copying a block subtree out of a graph and
//! materializing it back as a fresh fragment.
//!
//! The payload is position-free. Where it lands is decided at paste time.

use crate::geometry::GraphPoint;
use crate::id::BlockId;
use crate::model::{Block, BlockGraph, Connector, InputDef, Link};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A copied block and everything plugged into its inputs.
///
/// Blocks hanging below it (its `next` chain) are not part of the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
    #[serde(default)]
    pub connector: Connector,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputDef>,
    #[serde(default)]
    pub next_offset: GraphPoint,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ClipboardChild>,
}

/// A block plugged into input `input` of its parent payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardChild {
    pub input: usize,
    pub block: ClipboardBlock,
}

impl ClipboardBlock {
    /// Check that every child names a distinct, existing input.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for child in &self.children {
            if child.input >= self.inputs.len() {
                return Err(format!(
                    "`{}` has no input {} (it declares {})",
                    self.block_type,
                    child.input,
                    self.inputs.len()
                ));
            }
            if !seen.insert(child.input) {
                return Err(format!(
                    "`{}` input {} is filled twice",
                    self.block_type, child.input
                ));
            }
            child.block.validate()?;
        }
        Ok(())
    }

    fn to_block(&self, id: BlockId) -> Block {
        let mut block = Block::new(id, &self.block_type, self.connector.clone())
            .with_next_offset(self.next_offset);
        block.inputs.extend(self.inputs.iter().cloned());
        block.placeholder = self.placeholder;
        block
    }
}

/// Serialize a payload as JSON clipboard text.
pub fn encode_clipboard(block: &ClipboardBlock) -> Result<String, String> {
    serde_json::to_string_pretty(block).map_err(|e| e.to_string())
}

/// Parse and validate JSON clipboard text.
pub fn decode_clipboard(text: &str) -> Result<ClipboardBlock, String> {
    let block: ClipboardBlock =
        serde_json::from_str(text).map_err(|e| format!("invalid clipboard data: {e}"))?;
    block.validate()?;
    Ok(block)
}

impl BlockGraph {
    /// Build `payload` as a new free-floating fragment with fresh ids, its
    /// root at `at`. Emits no structural events.
    ///
    /// # Panics
    /// If the payload does not pass `ClipboardBlock::validate`.
    pub fn materialize(&mut self, payload: &ClipboardBlock, at: GraphPoint) -> BlockId {
        let root = self.build_payload(payload, None);
        if let Some(block) = self.get_by_id_mut(root) {
            block.position = at;
        }
        log::debug!("materialized `{}` as {root} at ({}, {})", payload.block_type, at.x, at.y);
        root
    }

    fn build_payload(&mut self, payload: &ClipboardBlock, parent: Option<(BlockId, usize)>) -> BlockId {
        let id = BlockId::with_prefix(&payload.block_type);
        let block = payload.to_block(id);
        match parent {
            Some((parent, input)) => {
                self.add_child(parent, Link::Input(input), block);
            }
            None => {
                self.add_block(block);
            }
        }
        for child in &payload.children {
            self.build_payload(&child.block, Some((id, child.input)));
        }
        id
    }

    /// Snapshot `id` and the blocks in its inputs as a clipboard payload.
    pub fn copy_block(&self, id: BlockId) -> Option<ClipboardBlock> {
        self.index_of(id).map(|idx| self.copy_subtree(idx))
    }

    fn copy_subtree(&self, idx: NodeIndex) -> ClipboardBlock {
        let block = &self.graph[idx];
        let children = (0..block.inputs.len())
            .filter_map(|input| {
                self.child_at(idx, Link::Input(input))
                    .map(|child| ClipboardChild {
                        input,
                        block: self.copy_subtree(child),
                    })
            })
            .collect();
        ClipboardBlock {
            block_type: block.block_type.clone(),
            placeholder: block.placeholder,
            connector: block.connector.clone(),
            inputs: block.inputs.to_vec(),
            next_offset: block.next_offset,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectorEnd, TagSet};
    use pretty_assertions::assert_eq;

    fn number_payload(placeholder: bool) -> ClipboardBlock {
        ClipboardBlock {
            block_type: "math_number".into(),
            placeholder,
            connector: Connector {
                output: Some(ConnectorEnd::of(&["Number"])),
                ..Connector::default()
            },
            inputs: Vec::new(),
            next_offset: GraphPoint::ORIGIN,
            children: Vec::new(),
        }
    }

    fn repeat_payload() -> ClipboardBlock {
        ClipboardBlock {
            block_type: "controls_repeat".into(),
            placeholder: false,
            connector: Connector {
                previous: Some(ConnectorEnd::any()),
                next: Some(ConnectorEnd::any()),
                ..Connector::default()
            },
            inputs: vec![
                InputDef::value("TIMES", GraphPoint::new(60.0, 0.0), TagSet::of(&["Number"])),
                InputDef::statement("DO", GraphPoint::new(16.0, 24.0), TagSet::any()),
            ],
            next_offset: GraphPoint::new(0.0, 60.0),
            children: vec![ClipboardChild {
                input: 0,
                block: number_payload(true),
            }],
        }
    }

    #[test]
    fn materialize_builds_a_free_floating_tree() {
        let mut graph = BlockGraph::new();
        let root = graph.materialize(&repeat_payload(), GraphPoint::new(40.0, 40.0));

        assert!(graph.is_top_level(root));
        assert_eq!(graph.len(), 2);
        assert!(root.as_str().starts_with("controls_repeat_"));
        let socket = &graph.sockets(root)[0];
        assert_eq!(socket.position, GraphPoint::new(100.0, 40.0));
        assert!(socket.occupant.is_some());
        assert!(graph.events().is_empty());
    }

    #[test]
    fn pasting_twice_yields_distinct_ids() {
        let mut graph = BlockGraph::new();
        let a = graph.materialize(&number_payload(false), GraphPoint::ORIGIN);
        let b = graph.materialize(&number_payload(false), GraphPoint::ORIGIN);
        assert_ne!(a, b);
        assert_eq!(graph.top_blocks(), vec![a, b]);
    }

    #[test]
    fn copy_captures_inputs_but_not_position() {
        let mut graph = BlockGraph::new();
        let root = graph.materialize(&repeat_payload(), GraphPoint::new(7.0, 9.0));
        assert_eq!(graph.copy_block(root), Some(repeat_payload()));
    }

    #[test]
    fn decode_rejects_out_of_range_children() {
        let text = r#"{
            "type": "logic_negate",
            "inputs": [{ "name": "BOOL", "kind": "value" }],
            "children": [{ "input": 3, "block": { "type": "logic_boolean" } }]
        }"#;
        let err = decode_clipboard(text).unwrap_err();
        assert!(err.contains("no input 3"), "unexpected error: {err}");
    }

    #[test]
    fn decode_rejects_duplicate_children() {
        let text = r#"{
            "type": "logic_negate",
            "inputs": [{ "name": "BOOL", "kind": "value" }],
            "children": [
                { "input": 0, "block": { "type": "logic_boolean" } },
                { "input": 0, "block": { "type": "logic_boolean" } }
            ]
        }"#;
        assert!(decode_clipboard(text).unwrap_err().contains("filled twice"));
    }

    #[test]
    fn decode_reports_malformed_json() {
        let err = decode_clipboard("{ not json").unwrap_err();
        assert!(err.starts_with("invalid clipboard data"));
    }

    #[test]
    fn encoded_payload_decodes_to_the_same_block() {
        let text = encode_clipboard(&repeat_payload()).unwrap();
        assert_eq!(decode_clipboard(&text).unwrap(), repeat_payload());
    }
}
