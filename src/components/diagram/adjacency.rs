//! Undirected neighbour index used for hover highlighting.

use std::collections::{HashMap, HashSet};

use super::types::Edge;

/// Neighbour sets derived from an edge list.
///
/// Direction is ignored: `A -> B` makes each a neighbour of the other. The
/// index is rebuilt from scratch on every render and never patched.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	neighbors: HashMap<String, HashSet<String>>,
}

impl AdjacencyIndex {
	/// Index every edge in both directions.
	pub fn build(edges: &[Edge]) -> Self {
		let mut neighbors: HashMap<String, HashSet<String>> = HashMap::new();
		for edge in edges {
			neighbors
				.entry(edge.source.clone())
				.or_default()
				.insert(edge.target.clone());
			if edge.source != edge.target {
				neighbors
					.entry(edge.target.clone())
					.or_default()
					.insert(edge.source.clone());
			}
		}
		Self { neighbors }
	}

	/// Neighbours of `id`, or `None` if it has no edges.
	pub fn neighbors(&self, id: &str) -> Option<&HashSet<String>> {
		self.neighbors.get(id)
	}

	/// Whether an edge joins `a` and `b` in either direction.
	pub fn is_linked(&self, a: &str, b: &str) -> bool {
		self.neighbors.get(a).is_some_and(|set| set.contains(b))
	}

	/// Number of nodes with at least one edge.
	pub fn len(&self) -> usize {
		self.neighbors.len()
	}

	/// True when no edge was indexed.
	pub fn is_empty(&self) -> bool {
		self.neighbors.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::parser::parse;

	fn set(items: &[&str]) -> HashSet<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn neighbours_are_symmetric() {
		let graph = parse("A -> B\nB -> C");
		let index = AdjacencyIndex::build(&graph.edges);
		assert_eq!(index.neighbors("A"), Some(&set(&["B"])));
		assert_eq!(index.neighbors("B"), Some(&set(&["A", "C"])));
		assert_eq!(index.neighbors("C"), Some(&set(&["B"])));
		assert_eq!(index.neighbors("D"), None);
		assert_eq!(index.len(), 3);
	}

	#[test]
	fn linked_ignores_direction() {
		let graph = parse("A -> B\nB -> C");
		let index = AdjacencyIndex::build(&graph.edges);
		assert!(index.is_linked("A", "B"));
		assert!(index.is_linked("B", "A"));
		assert!(!index.is_linked("A", "C"));
		assert!(!index.is_linked("A", "A"));
	}

	#[test]
	fn self_loop_is_its_own_neighbour() {
		let graph = parse("X -> X");
		let index = AdjacencyIndex::build(&graph.edges);
		assert_eq!(index.neighbors("X"), Some(&set(&["X"])));
		assert!(index.is_linked("X", "X"));
	}

	#[test]
	fn duplicate_edges_are_harmless() {
		let graph = parse("A -> B\nA -> B\nB -> A");
		let index = AdjacencyIndex::build(&graph.edges);
		assert_eq!(index.neighbors("A"), Some(&set(&["B"])));
		assert_eq!(index.neighbors("B"), Some(&set(&["A"])));
	}

	#[test]
	fn empty_edge_list() {
		let index = AdjacencyIndex::build(&[]);
		assert!(index.is_empty());
		assert!(!index.is_linked("A", "B"));
	}

	#[test]
	fn linked_agrees_with_neighbour_sets() {
		let graph = parse("A -> B\nC -> A\nC -> D\nE -> E");
		let index = AdjacencyIndex::build(&graph.edges);
		let names = ["A", "B", "C", "D", "E", "F"];
		for a in names {
			for b in names {
				let expected = index.neighbors(a).is_some_and(|n| n.contains(b));
				assert_eq!(index.is_linked(a, b), expected, "{a} / {b}");
				assert_eq!(index.is_linked(a, b), index.is_linked(b, a), "{a} / {b}");
			}
		}
		assert!(index.is_linked("C", "A"));
		assert!(!index.is_linked("B", "D"));
	}
}
