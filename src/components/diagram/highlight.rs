//! Hover highlight state machine.
//!
//! Two states: `Idle`, or `Highlighted` around a single hovered node. Moving
//! from one node to another goes through a full rebuild rather than a diff.

use std::collections::HashSet;

use super::adjacency::AdjacencyIndex;
use super::binder::ResolvedEdge;

/// Visual state written onto nodes and links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElementState {
	/// No hover active.
	#[default]
	Normal,
	/// Hovered node, its neighbours, or an edge touching it.
	Highlighted,
	/// Everything else while a node is hovered.
	Faded,
}

/// Current hover highlight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
	/// Nothing hovered.
	#[default]
	Idle,
	/// A node is hovered.
	Highlighted {
		/// The hovered node.
		node: String,
		/// Hovered node plus its neighbours.
		nodes: HashSet<String>,
		/// Indices of edges touching the hovered node.
		edges: HashSet<usize>,
	},
}

impl Highlight {
	/// Highlight `node`, its neighbours, and every edge touching it.
	pub fn enter(node: &str, index: &AdjacencyIndex, edges: &[ResolvedEdge]) -> Self {
		let mut nodes: HashSet<String> = index.neighbors(node).cloned().unwrap_or_default();
		nodes.insert(node.to_string());

		let edges = edges
			.iter()
			.filter(|e| e.source_id == node || e.target_id == node)
			.map(|e| e.index)
			.collect();

		Self::Highlighted {
			node: node.to_string(),
			nodes,
			edges,
		}
	}

	/// The hovered node, if any.
	pub fn active(&self) -> Option<&str> {
		match self {
			Self::Idle => None,
			Self::Highlighted { node, .. } => Some(node),
		}
	}

	/// Whether nothing is hovered.
	pub fn is_idle(&self) -> bool {
		matches!(self, Self::Idle)
	}

	/// State for node `id`.
	pub fn node_state(&self, id: &str) -> ElementState {
		match self {
			Self::Idle => ElementState::Normal,
			Self::Highlighted { nodes, .. } if nodes.contains(id) => ElementState::Highlighted,
			Self::Highlighted { .. } => ElementState::Faded,
		}
	}

	/// State for the edge at `index` in the parsed edge list.
	pub fn edge_state(&self, index: usize) -> ElementState {
		match self {
			Self::Idle => ElementState::Normal,
			Self::Highlighted { edges, .. } if edges.contains(&index) => {
				ElementState::Highlighted
			}
			Self::Highlighted { .. } => ElementState::Faded,
		}
	}

	/// Labels of nodes outside the highlighted set are faded.
	pub fn label_faded(&self, id: &str) -> bool {
		self.node_state(id) == ElementState::Faded
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::binder::resolve_edges;
	use crate::components::diagram::parser::parse;

	fn highlight(text: &str, node: &str) -> Highlight {
		let graph = parse(text);
		let index = AdjacencyIndex::build(&graph.edges);
		Highlight::enter(node, &index, &resolve_edges(&graph))
	}

	fn highlighted_nodes(h: &Highlight, all: &[&str]) -> Vec<String> {
		all.iter()
			.filter(|id| h.node_state(id) == ElementState::Highlighted)
			.map(|id| id.to_string())
			.collect()
	}

	#[test]
	fn middle_node_highlights_everything() {
		let h = highlight("A -> B\nB -> C", "B");
		assert_eq!(h.active(), Some("B"));
		assert_eq!(highlighted_nodes(&h, &["A", "B", "C"]), ["A", "B", "C"]);
		assert_eq!(h.edge_state(0), ElementState::Highlighted);
		assert_eq!(h.edge_state(1), ElementState::Highlighted);
	}

	#[test]
	fn leaf_node_fades_the_rest() {
		let h = highlight("A -> B\nB -> C", "A");
		assert_eq!(highlighted_nodes(&h, &["A", "B", "C"]), ["A", "B"]);
		assert_eq!(h.node_state("C"), ElementState::Faded);
		assert_eq!(h.edge_state(0), ElementState::Highlighted);
		assert_eq!(h.edge_state(1), ElementState::Faded);
		assert!(h.label_faded("C"));
		assert!(!h.label_faded("B"));
	}

	#[test]
	fn idle_is_neutral() {
		let h = Highlight::Idle;
		assert!(h.is_idle());
		assert_eq!(h.active(), None);
		assert_eq!(h.node_state("A"), ElementState::Normal);
		assert_eq!(h.edge_state(0), ElementState::Normal);
		assert!(!h.label_faded("A"));
	}

	#[test]
	fn isolated_self_loop_highlights_itself() {
		let h = highlight("X -> X\nY -> Z", "X");
		assert_eq!(h.node_state("X"), ElementState::Highlighted);
		assert_eq!(h.node_state("Y"), ElementState::Faded);
		assert_eq!(h.edge_state(0), ElementState::Highlighted);
		assert_eq!(h.edge_state(1), ElementState::Faded);
	}

	#[test]
	fn switching_nodes_rebuilds_sets() {
		let graph = parse("A -> B\nB -> C\nC -> D");
		let index = AdjacencyIndex::build(&graph.edges);
		let resolved = resolve_edges(&graph);
		let first = Highlight::enter("A", &index, &resolved);
		let second = Highlight::enter("D", &index, &resolved);
		assert_eq!(first.node_state("D"), ElementState::Faded);
		assert_eq!(second.node_state("A"), ElementState::Faded);
		assert_eq!(second.node_state("C"), ElementState::Highlighted);
		assert_eq!(second.edge_state(2), ElementState::Highlighted);
		assert_eq!(second.edge_state(0), ElementState::Faded);
	}
}
