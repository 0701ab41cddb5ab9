//! Retained scene of visual elements bound to graph data by key.
//!
//! Nodes and labels are keyed by node ID, links by [`LinkKey`]. Rebinding
//! reconciles instead of rebuilding: retained elements are updated in place,
//! new keys enter, vanished keys exit. Geometry is only ever written by
//! [`Scene::apply_positions`].

use std::collections::HashMap;
use std::hash::Hash;

use super::config::DiagramConfig;
use super::highlight::{ElementState, Highlight};
use super::simulation::PositionUpdate;
use super::theme::{Color, Theme};
use super::types::ParsedGraph;

/// Identity of a link element. Parallel edges are told apart by `ordinal`,
/// the number of earlier edges with the same endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkKey {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Earlier edges with the same endpoints.
	pub ordinal: usize,
}

/// An edge with both endpoints resolved to node slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedEdge {
	/// Position of the edge in the parsed edge list.
	pub index: usize,
	/// Source slot.
	pub source: usize,
	/// Target slot.
	pub target: usize,
	/// Source node ID.
	pub source_id: String,
	/// Target node ID.
	pub target_id: String,
	/// Element identity.
	pub key: LinkKey,
}

/// Resolve every edge's endpoints to slots (indices into `graph.nodes`).
pub fn resolve_edges(graph: &ParsedGraph) -> Vec<ResolvedEdge> {
	let slots: HashMap<&str, usize> = graph
		.nodes
		.iter()
		.enumerate()
		.map(|(slot, node)| (node.id.as_str(), slot))
		.collect();
	let mut ordinals: HashMap<(&str, &str), usize> = HashMap::new();

	graph
		.edges
		.iter()
		.enumerate()
		.filter_map(|(index, edge)| {
			let source = *slots.get(edge.source.as_str())?;
			let target = *slots.get(edge.target.as_str())?;
			let ordinal = ordinals
				.entry((edge.source.as_str(), edge.target.as_str()))
				.or_insert(0);
			let key = LinkKey {
				source: edge.source.clone(),
				target: edge.target.clone(),
				ordinal: *ordinal,
			};
			*ordinal += 1;
			Some(ResolvedEdge {
				index,
				source,
				target,
				source_id: edge.source.clone(),
				target_id: edge.target.clone(),
				key,
			})
		})
		.collect()
}

/// Which arrowhead terminates a link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Marker {
	/// Regular arrowhead.
	#[default]
	Default,
	/// Larger arrowhead in the highlight colour.
	Highlight,
}

/// Circle drawn for a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeElement {
	/// Node ID, the join key.
	pub id: String,
	/// Engine slot.
	pub slot: usize,
	/// Palette fill.
	pub color: Color,
	/// Centre x, world units.
	pub cx: f64,
	/// Centre y, world units.
	pub cy: f64,
	/// Grows while highlighted.
	pub radius: f64,
	/// Highlight state.
	pub state: ElementState,
}

/// Line drawn for an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkElement {
	/// Join key.
	pub key: LinkKey,
	/// Index of the bound edge in the parsed edge list.
	pub edge: usize,
	/// Source slot.
	pub source: usize,
	/// Target slot.
	pub target: usize,
	/// Source end x, world units.
	pub x1: f64,
	/// Source end y.
	pub y1: f64,
	/// Target end x.
	pub x2: f64,
	/// Target end y.
	pub y2: f64,
	/// Arrowhead at the target end.
	pub marker: Marker,
	/// Highlight state.
	pub state: ElementState,
}

/// Text drawn beside a node.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelElement {
	/// Node ID, also the text.
	pub id: String,
	/// Engine slot.
	pub slot: usize,
	/// Anchor, i.e. the node centre.
	pub x: f64,
	/// Anchor y.
	pub y: f64,
	/// Text offset from the anchor.
	pub dx: f64,
	/// Vertical text offset.
	pub dy: f64,
	/// Drawn at reduced opacity.
	pub faded: bool,
}

/// Counts produced by a keyed join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinSummary {
	/// New keys.
	pub entered: usize,
	/// Retained keys.
	pub updated: usize,
	/// Removed keys.
	pub exited: usize,
}

/// Join summaries for each element layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindSummary {
	/// Node layer.
	pub nodes: JoinSummary,
	/// Link layer.
	pub links: JoinSummary,
	/// Label layer.
	pub labels: JoinSummary,
}

/// Reconcile `elements` against `data` by key. The result follows data order.
pub fn join<E, D, K>(
	elements: &mut Vec<E>,
	data: &[D],
	element_key: impl Fn(&E) -> K,
	data_key: impl Fn(&D) -> K,
	mut enter: impl FnMut(&D) -> E,
	mut update: impl FnMut(&mut E, &D),
) -> JoinSummary
where
	K: Eq + Hash,
{
	let mut existing: HashMap<K, E> = elements
		.drain(..)
		.map(|e| (element_key(&e), e))
		.collect();
	let mut summary = JoinSummary::default();
	let mut joined = Vec::with_capacity(data.len());

	for datum in data {
		match existing.remove(&data_key(datum)) {
			Some(mut element) => {
				update(&mut element, datum);
				summary.updated += 1;
				joined.push(element);
			}
			None => {
				joined.push(enter(datum));
				summary.entered += 1;
			}
		}
	}

	summary.exited = existing.len();
	*elements = joined;
	summary
}

/// Move elements matching `raised` to the end, keeping relative order.
fn raise_where<E>(elements: &mut Vec<E>, raised: impl Fn(&E) -> bool) {
	let (mut top, bottom): (Vec<E>, Vec<E>) = elements.drain(..).partition(|e| raised(e));
	let mut ordered = bottom;
	ordered.append(&mut top);
	*elements = ordered;
}

/// All bound visual elements, in paint order within each layer.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	/// Node layer.
	pub nodes: Vec<NodeElement>,
	/// Link layer.
	pub links: Vec<LinkElement>,
	/// Label layer.
	pub labels: Vec<LabelElement>,
}

impl Scene {
	/// True when no element is bound.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty() && self.labels.is_empty()
	}

	/// Bind graph data to elements. Attributes reset to their defaults; geometry
	/// is left for the next position update.
	pub fn bind(
		&mut self,
		graph: &ParsedGraph,
		resolved: &[ResolvedEdge],
		theme: &Theme,
		config: &DiagramConfig,
	) -> BindSummary {
		let radius = config.node.radius;
		let slotted: Vec<(usize, &str, Color)> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(slot, n)| (slot, n.id.as_str(), theme.palette.get(n.color_group)))
			.collect();

		let nodes = join(
			&mut self.nodes,
			&slotted,
			|e| e.id.clone(),
			|&(_, id, _)| id.to_string(),
			|&(slot, id, color)| NodeElement {
				id: id.to_string(),
				slot,
				color,
				cx: 0.0,
				cy: 0.0,
				radius,
				state: ElementState::Normal,
			},
			|e, &(slot, _, color)| {
				e.slot = slot;
				e.color = color;
				e.radius = radius;
				e.state = ElementState::Normal;
			},
		);

		let links = join(
			&mut self.links,
			resolved,
			|e| e.key.clone(),
			|r| r.key.clone(),
			|r| LinkElement {
				key: r.key.clone(),
				edge: r.index,
				source: r.source,
				target: r.target,
				x1: 0.0,
				y1: 0.0,
				x2: 0.0,
				y2: 0.0,
				marker: Marker::Default,
				state: ElementState::Normal,
			},
			|e, r| {
				e.edge = r.index;
				e.source = r.source;
				e.target = r.target;
				e.marker = Marker::Default;
				e.state = ElementState::Normal;
			},
		);

		let (dx, dy) = (config.node.label_dx, config.node.label_dy);
		let labels = join(
			&mut self.labels,
			&slotted,
			|e| e.id.clone(),
			|&(_, id, _)| id.to_string(),
			|&(slot, id, _)| LabelElement {
				id: id.to_string(),
				slot,
				x: 0.0,
				y: 0.0,
				dx,
				dy,
				faded: false,
			},
			|e, &(slot, _, _)| {
				e.slot = slot;
				e.dx = dx;
				e.dy = dy;
				e.faded = false;
			},
		);

		BindSummary {
			nodes,
			links,
			labels,
		}
	}

	/// Write positions from the layout engine onto every element.
	pub fn apply_positions(&mut self, update: &PositionUpdate) {
		let at = |slot: usize| update.positions.get(slot).copied();
		for node in &mut self.nodes {
			if let Some((x, y)) = at(node.slot) {
				node.cx = x;
				node.cy = y;
			}
		}
		for label in &mut self.labels {
			if let Some((x, y)) = at(label.slot) {
				label.x = x;
				label.y = y;
			}
		}
		for link in &mut self.links {
			if let (Some((x1, y1)), Some((x2, y2))) = (at(link.source), at(link.target)) {
				link.x1 = x1;
				link.y1 = y1;
				link.x2 = x2;
				link.y2 = y2;
			}
		}
	}

	/// Write highlight states, radii and markers; raise highlighted nodes and
	/// labels above the rest.
	pub fn apply_highlight(&mut self, highlight: &Highlight, config: &DiagramConfig) {
		for node in &mut self.nodes {
			node.state = highlight.node_state(&node.id);
			node.radius = match node.state {
				ElementState::Highlighted => config.highlight_radius(),
				_ => config.node.radius,
			};
		}
		for link in &mut self.links {
			link.state = highlight.edge_state(link.edge);
			link.marker = match link.state {
				ElementState::Highlighted => Marker::Highlight,
				_ => Marker::Default,
			};
		}
		for label in &mut self.labels {
			label.faded = highlight.label_faded(&label.id);
		}

		if !highlight.is_idle() {
			raise_where(&mut self.nodes, |n| n.state == ElementState::Highlighted);
			raise_where(&mut self.labels, |l| !l.faded);
		}
	}

	/// Move a node to the top of the paint order.
	pub fn raise_node(&mut self, id: &str) {
		raise_where(&mut self.nodes, |n| n.id == id);
	}

	/// Node element by ID.
	pub fn node(&self, id: &str) -> Option<&NodeElement> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Topmost node whose circle contains the world point `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&NodeElement> {
		self.nodes.iter().rev().find(|n| {
			let (dx, dy) = (n.cx - x, n.cy - y);
			dx * dx + dy * dy <= n.radius * n.radius
		})
	}

	/// Remove every element.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.links.clear();
		self.labels.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::adjacency::AdjacencyIndex;
	use crate::components::diagram::parser::parse;

	fn bound(text: &str) -> (Scene, ParsedGraph, Vec<ResolvedEdge>) {
		let graph = parse(text);
		let resolved = resolve_edges(&graph);
		let mut scene = Scene::default();
		scene.bind(&graph, &resolved, &Theme::default(), &DiagramConfig::default());
		(scene, graph, resolved)
	}

	fn rebind(scene: &mut Scene, text: &str) -> BindSummary {
		let graph = parse(text);
		let resolved = resolve_edges(&graph);
		scene.bind(&graph, &resolved, &Theme::default(), &DiagramConfig::default())
	}

	#[test]
	fn parallel_edges_get_distinct_keys() {
		let graph = parse("a -> b\na -> b\nb -> a");
		let resolved = resolve_edges(&graph);
		let ordinals: Vec<usize> = resolved.iter().map(|r| r.key.ordinal).collect();
		assert_eq!(ordinals, [0, 1, 0]);
		assert_eq!((resolved[2].source, resolved[2].target), (1, 0));
	}

	#[test]
	fn first_bind_enters_everything() {
		let mut scene = Scene::default();
		let summary = rebind(&mut scene, crate::DEFAULT_SOURCE);
		assert_eq!(summary.nodes.entered, 5);
		assert_eq!(summary.links.entered, 6);
		assert_eq!(summary.labels.entered, 5);
		assert_eq!(summary.nodes.updated + summary.nodes.exited, 0);
		assert_eq!(scene.nodes[0].color, Theme::default().palette.colors[0]);
		assert_eq!(scene.nodes[0].radius, 18.0);
	}

	#[test]
	fn rebind_reconciles_by_key() {
		let (mut scene, _, _) = bound("a -> b\nb -> c");
		scene.apply_positions(&PositionUpdate {
			positions: vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)],
		});

		let summary = rebind(&mut scene, "b -> c\nc -> d");
		assert_eq!(
			summary.nodes,
			JoinSummary {
				entered: 1,
				updated: 2,
				exited: 1
			}
		);
		assert_eq!(
			summary.links,
			JoinSummary {
				entered: 1,
				updated: 1,
				exited: 1
			}
		);

		let ids: Vec<&str> = scene.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["b", "c", "d"]);
		// Retained element keeps its geometry and picks up its new slot.
		let b = scene.node("b").expect("b retained");
		assert_eq!((b.slot, b.cx, b.cy), (0, 2.0, 2.0));
	}

	#[test]
	fn positions_reach_every_layer() {
		let (mut scene, _, _) = bound("a -> b");
		scene.apply_positions(&PositionUpdate {
			positions: vec![(10.0, 20.0), (30.0, 40.0)],
		});
		assert_eq!((scene.nodes[1].cx, scene.nodes[1].cy), (30.0, 40.0));
		assert_eq!((scene.labels[0].x, scene.labels[0].y), (10.0, 20.0));
		let link = &scene.links[0];
		assert_eq!((link.x1, link.y1, link.x2, link.y2), (10.0, 20.0, 30.0, 40.0));
	}

	#[test]
	fn highlight_writes_states_and_raises() {
		let (mut scene, graph, resolved) = bound("A -> B\nB -> C\nD -> E");
		let config = DiagramConfig::default();
		let index = AdjacencyIndex::build(&graph.edges);
		scene.apply_highlight(&Highlight::enter("A", &index, &resolved), &config);

		let order: Vec<&str> = scene.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(order, ["C", "D", "E", "A", "B"]);
		let a = scene.node("A").expect("A bound");
		assert_eq!((a.state, a.radius), (ElementState::Highlighted, 23.0));
		assert_eq!(scene.node("C").map(|n| n.state), Some(ElementState::Faded));
		assert_eq!(scene.links[0].marker, Marker::Highlight);
		assert_eq!(scene.links[1].marker, Marker::Default);
		assert_eq!(scene.links[1].state, ElementState::Faded);
		assert!(scene.labels.iter().filter(|l| l.faded).count() == 3);

		scene.apply_highlight(&Highlight::Idle, &config);
		assert!(scene.nodes.iter().all(|n| n.state == ElementState::Normal && n.radius == 18.0));
		assert!(scene.links.iter().all(|l| l.marker == Marker::Default));
		assert!(scene.labels.iter().all(|l| !l.faded));
	}

	#[test]
	fn hit_testing_prefers_topmost() {
		let (mut scene, _, _) = bound("a -> b");
		scene.apply_positions(&PositionUpdate {
			positions: vec![(0.0, 0.0), (10.0, 0.0)],
		});
		assert_eq!(scene.node_at(5.0, 0.0).map(|n| n.id.as_str()), Some("b"));
		scene.raise_node("a");
		assert_eq!(scene.node_at(5.0, 0.0).map(|n| n.id.as_str()), Some("a"));
		assert!(scene.node_at(100.0, 100.0).is_none());
	}

	#[test]
	fn clear_removes_everything() {
		let (mut scene, _, _) = bound("a -> b");
		assert!(!scene.is_empty());
		scene.clear();
		assert!(scene.is_empty());
	}
}
