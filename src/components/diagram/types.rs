//! Graph data structures produced by the edge parser.

use serde::{Deserialize, Serialize};

/// Number of entries in the node colour palette. Colour groups cycle through it.
pub const PALETTE_SIZE: usize = 6;

/// Index into the node colour palette, assigned in first-seen order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorGroup(pub usize);

impl ColorGroup {
	/// Colour group for the `seq`-th node to be created.
	pub fn for_sequence(seq: usize) -> Self {
		Self(seq % PALETTE_SIZE)
	}
}

/// A node in the diagram. Its identity is the trimmed name text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
	/// Unique identifier, the literal name from the input text.
	pub id: String,
	/// Palette slot used to colour this node.
	pub color_group: ColorGroup,
}

/// A directed edge between two nodes, referenced by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

/// Complete parse result: nodes in first-seen order and edges in line order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedGraph {
	/// Unique nodes, first-seen order.
	pub nodes: Vec<Node>,
	/// Every valid line, duplicates and self-loops included.
	pub edges: Vec<Edge>,
}

impl ParsedGraph {
	/// True when no node was produced, which means the diagram should be cleared.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
