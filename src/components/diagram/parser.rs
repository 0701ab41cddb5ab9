//! Parser for `A -> B` edge lists.
//!
//! One edge per line. Lines that do not split into exactly two non-empty names
//! around `->` are dropped without complaint; the only trace is a debug log.

use std::collections::HashSet;

use log::debug;

use super::types::{ColorGroup, Edge, Node, ParsedGraph};

/// Separator between source and target names.
pub const SEPARATOR: &str = "->";

/// Parse edge-list text into nodes (first-seen order) and edges (line order).
///
/// Edges are never deduplicated and self-loops are kept.
pub fn parse(text: &str) -> ParsedGraph {
	let mut graph = ParsedGraph::default();
	let mut seen: HashSet<&str> = HashSet::new();
	let mut skipped = 0usize;

	for line in text.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		let Some((source, target)) = split_edge(line) else {
			skipped += 1;
			continue;
		};

		for name in [source, target] {
			if seen.insert(name) {
				graph.nodes.push(Node {
					id: name.to_string(),
					color_group: ColorGroup::for_sequence(graph.nodes.len()),
				});
			}
		}

		graph.edges.push(Edge {
			source: source.to_string(),
			target: target.to_string(),
		});
	}

	if skipped > 0 {
		debug!("parser: skipped {} malformed line(s)", skipped);
	}
	graph
}

/// Split a trimmed line into its two trimmed endpoint names.
fn split_edge(line: &str) -> Option<(&str, &str)> {
	let mut parts = line.split(SEPARATOR);
	let (source, target) = (parts.next()?, parts.next()?);
	if parts.next().is_some() {
		return None;
	}

	let (source, target) = (source.trim(), target.trim());
	if source.is_empty() || target.is_empty() {
		return None;
	}
	Some((source, target))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(graph: &ParsedGraph) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	fn pairs(graph: &ParsedGraph) -> Vec<(&str, &str)> {
		graph
			.edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str()))
			.collect()
	}

	#[test]
	fn default_example_keeps_first_seen_order() {
		let graph = parse(crate::DEFAULT_SOURCE);
		assert_eq!(
			ids(&graph),
			["App", "Web", "API", "Database", "Auth Service"]
		);
		assert_eq!(graph.edges.len(), 6);
		assert_eq!(pairs(&graph)[4], ("Web", "Auth Service"));
	}

	#[test]
	fn colour_groups_cycle_through_palette() {
		let text = "a -> b\nc -> d\ne -> f\ng -> h";
		let graph = parse(text);
		let groups: Vec<usize> = graph.nodes.iter().map(|n| n.color_group.0).collect();
		assert_eq!(groups, [0, 1, 2, 3, 4, 5, 0, 1]);
	}

	#[test]
	fn malformed_lines_are_skipped() {
		let text = "\
			lonely\n\
			a -> b -> c\n\
			-> b\n\
			a ->\n\
			   ->   \n\
			x => y\n\
			p -> q";
		let graph = parse(text);
		assert_eq!(ids(&graph), ["p", "q"]);
		assert_eq!(pairs(&graph), [("p", "q")]);
	}

	#[test]
	fn names_are_trimmed_but_case_sensitive() {
		let graph = parse("  Auth  Service ->db \n auth  service -> DB");
		assert_eq!(ids(&graph), ["Auth  Service", "db", "auth  service", "DB"]);
	}

	#[test]
	fn separator_without_spaces() {
		let graph = parse("a->b");
		assert_eq!(pairs(&graph), [("a", "b")]);
	}

	#[test]
	fn self_loop_yields_one_node_and_one_edge() {
		let graph = parse("X -> X");
		assert_eq!(ids(&graph), ["X"]);
		assert_eq!(pairs(&graph), [("X", "X")]);
	}

	#[test]
	fn duplicate_edges_are_kept() {
		let graph = parse("a -> b\na -> b\nb -> a");
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(pairs(&graph), [("a", "b"), ("a", "b"), ("b", "a")]);
	}

	#[test]
	fn empty_and_blank_input_produce_nothing() {
		assert!(parse("").is_empty());
		assert!(parse("   \n\t\n  ").is_empty());
		assert!(parse("nonsense\n->\n").is_empty());
	}

	#[test]
	fn crlf_line_endings() {
		let graph = parse("a -> b\r\nb -> c\r\n");
		assert_eq!(ids(&graph), ["a", "b", "c"]);
	}

	#[test]
	fn edges_only_reference_known_nodes() {
		let text = "a -> b\n-> c\nb -> d -> e\nd -> a\n f ->  \ng -> g";
		let graph = parse(text);
		let known: HashSet<&str> = ids(&graph).into_iter().collect();
		for (s, t) in pairs(&graph) {
			assert!(known.contains(s) && known.contains(t));
		}
		assert!(!known.contains("c"));
		assert!(!known.contains("e"));
		assert!(!known.contains("f"));
	}

	#[test]
	fn parsing_is_repeatable() {
		assert_eq!(parse(crate::DEFAULT_SOURCE), parse(crate::DEFAULT_SOURCE));
	}
}
