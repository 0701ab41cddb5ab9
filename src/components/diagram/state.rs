//! Diagram controller: session lifecycle, gestures and frame stepping.
//!
//! A [`Diagram`] owns the layout engine, the bound [`Scene`], the zoom state
//! and at most one [`DiagramSession`]. A session holds everything derived from
//! one parse: the graph, resolved edges, the adjacency index and the current
//! highlight. Each render replaces it wholesale; clearing drops it.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, info};

use super::adjacency::AdjacencyIndex;
use super::binder::{BindSummary, ResolvedEdge, Scene, resolve_edges};
use super::config::DiagramConfig;
use super::highlight::Highlight;
use super::parser;
use super::simulation::{LayoutEngine, NodeSeed, PositionUpdate};
use super::theme::Theme;
use super::types::ParsedGraph;
use super::zoom::{Zoom, ZoomTransform};

/// Everything derived from a single render.
#[derive(Clone, Debug)]
pub struct DiagramSession {
	/// Parse result this session renders.
	pub graph: ParsedGraph,
	/// Edges with endpoints resolved to slots.
	pub resolved: Vec<ResolvedEdge>,
	/// Neighbour lookup for highlighting.
	pub index: AdjacencyIndex,
	/// Hover state, reset to idle on every render.
	pub highlight: Highlight,
	slots: HashMap<String, usize>,
}

impl DiagramSession {
	fn new(graph: ParsedGraph, resolved: Vec<ResolvedEdge>) -> Self {
		let index = AdjacencyIndex::build(&graph.edges);
		let slots = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(slot, n)| (n.id.clone(), slot))
			.collect();
		Self {
			graph,
			resolved,
			index,
			highlight: Highlight::Idle,
			slots,
		}
	}

	/// Engine slot of node `id`.
	pub fn slot_of(&self, id: &str) -> Option<usize> {
		self.slots.get(id).copied()
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Whether a node is held.
	pub active: bool,
	/// Name of the held node.
	pub node: Option<String>,
	/// Engine slot of the held node.
	pub slot: usize,
	/// Node position minus the grab point, in world units.
	pub offset_x: f64,
	/// Vertical grab offset, world units.
	pub offset_y: f64,
	/// Last pointer x, screen units.
	pub pointer_x: f64,
	/// Last pointer y, screen units.
	pub pointer_y: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether the background is held.
	pub active: bool,
	/// Last pointer x, screen units.
	pub last_x: f64,
	/// Last pointer y, screen units.
	pub last_y: f64,
}

/// Initial position of the `i`-th new node: a phyllotaxis spiral around the
/// centring target, so fresh nodes never start stacked.
fn spiral_seed(i: usize, (cx, cy): (f64, f64)) -> NodeSeed {
	let radius = 10.0 * (0.5 + i as f64).sqrt();
	let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
	NodeSeed {
		x: cx + radius * angle.cos(),
		y: cy + radius * angle.sin(),
	}
}

/// Interactive diagram over a layout engine `E`.
pub struct Diagram<E: LayoutEngine> {
	engine: E,
	scene: Scene,
	session: Option<DiagramSession>,
	zoom: Zoom,
	/// Node drag in progress, if any.
	pub drag: DragState,
	/// Background pan in progress, if any.
	pub pan: PanState,
	config: DiagramConfig,
	theme: Theme,
	width: f64,
	height: f64,
}

impl<E: LayoutEngine> Diagram<E> {
	/// Empty diagram filling a `width` x `height` viewport.
	pub fn new(mut engine: E, config: DiagramConfig, theme: Theme, width: f64, height: f64) -> Self {
		engine.set_center(width / 2.0, height / 2.0);
		Self {
			engine,
			scene: Scene::default(),
			session: None,
			zoom: Zoom::new(config.zoom.clone()),
			drag: DragState::default(),
			pan: PanState::default(),
			config,
			theme,
			width,
			height,
		}
	}

	/// Layout engine.
	pub fn engine(&self) -> &E {
		&self.engine
	}

	/// Bound visual elements.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// Current session, `None` while cleared.
	pub fn session(&self) -> Option<&DiagramSession> {
		self.session.as_ref()
	}

	/// Highlight of the current session.
	pub fn highlight(&self) -> Option<&Highlight> {
		self.session.as_ref().map(|s| &s.highlight)
	}

	/// Current pan/zoom transform.
	pub fn transform(&self) -> ZoomTransform {
		self.zoom.transform()
	}

	/// Colours used when painting.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Geometry, force and zoom parameters.
	pub fn config(&self) -> &DiagramConfig {
		&self.config
	}

	/// Viewport size in screen units.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn viewport_center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Parse `text` and render it, or clear the diagram if nothing parsed.
	pub fn generate(&mut self, text: &str) -> Option<BindSummary> {
		let graph = parser::parse(text);
		if graph.is_empty() {
			self.clear();
			return None;
		}
		Some(self.render(graph))
	}

	/// Replace the session with `graph` and restart the layout at full energy.
	pub fn render(&mut self, graph: ParsedGraph) -> BindSummary {
		if graph.is_empty() {
			self.clear();
			return BindSummary::default();
		}

		let seeds = self.seed_positions(&graph);
		let resolved = resolve_edges(&graph);
		let session = DiagramSession::new(graph, resolved);

		let links: Vec<(usize, usize)> = session
			.resolved
			.iter()
			.map(|r| (r.source, r.target))
			.collect();
		self.engine.load(&seeds, &links);

		let summary = self
			.scene
			.bind(&session.graph, &session.resolved, &self.theme, &self.config);
		self.scene.apply_positions(&PositionUpdate {
			positions: seeds.iter().map(|s| (s.x, s.y)).collect(),
		});

		info!(
			"diagram: rendered {} nodes, {} edges",
			session.graph.nodes.len(),
			session.graph.edges.len()
		);
		debug!("diagram: bind {:?}", summary);

		self.session = Some(session);
		self.drag = DragState::default();
		self.engine
			.energy_mut()
			.set_alpha(1.0)
			.set_target(0.0)
			.restart();
		summary
	}

	/// Retained nodes start where the previous layout left them.
	fn seed_positions(&self, graph: &ParsedGraph) -> Vec<NodeSeed> {
		let center = self.viewport_center();
		let previous = self.session.as_ref();
		graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				previous
					.and_then(|s| s.slot_of(&node.id))
					.and_then(|slot| self.engine.position(slot))
					.map(|(x, y)| NodeSeed { x, y })
					.unwrap_or_else(|| spiral_seed(i, center))
			})
			.collect()
	}

	/// Remove every element and halt the layout.
	pub fn clear(&mut self) {
		self.scene.clear();
		self.engine.clear();
		self.engine.energy_mut().set_alpha(0.0).set_target(0.0).stop();
		self.session = None;
		self.drag = DragState::default();
		info!("diagram: cleared");
	}

	/// Advance one animation frame of `dt_ms` milliseconds.
	pub fn tick(&mut self, dt_ms: f64) {
		if self.zoom.is_animating() {
			self.zoom.tick(dt_ms);
			self.follow_pointer();
		}
		if let Some(update) = self.engine.step(self.config.force.frame_dt) {
			self.scene.apply_positions(&update);
		}
	}

	/// Highlight `id` and its neighbours. Returns false for unknown nodes.
	pub fn pointer_enter(&mut self, id: &str) -> bool {
		let Some(session) = self.session.as_mut() else {
			return false;
		};
		if session.slot_of(id).is_none() {
			return false;
		}
		if session.highlight.active() == Some(id) {
			return true;
		}
		session.highlight = Highlight::enter(id, &session.index, &session.resolved);
		self.scene.apply_highlight(&session.highlight, &self.config);
		true
	}

	/// Return to idle, restoring every element.
	pub fn pointer_leave(&mut self) {
		let Some(session) = self.session.as_mut() else {
			return;
		};
		if session.highlight.is_idle() {
			return;
		}
		session.highlight = Highlight::Idle;
		self.scene.apply_highlight(&session.highlight, &self.config);
	}

	/// Topmost node under a screen point.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<String> {
		let (x, y) = self.zoom.transform().invert(sx, sy);
		self.scene.node_at(x, y).map(|n| n.id.clone())
	}

	/// Issue enter/leave transitions for the node under a screen point.
	pub fn hover_at(&mut self, sx: f64, sy: f64) -> Option<String> {
		let hit = self.node_at(sx, sy);
		match &hit {
			Some(id) => {
				self.pointer_enter(id);
			}
			None => self.pointer_leave(),
		}
		hit
	}

	/// Pin `id` where it is and raise the layout energy. Returns false for
	/// unknown nodes.
	pub fn drag_start(&mut self, id: &str, sx: f64, sy: f64) -> bool {
		let Some(slot) = self.session.as_ref().and_then(|s| s.slot_of(id)) else {
			return false;
		};
		let Some((x, y)) = self.engine.position(slot) else {
			return false;
		};
		let (wx, wy) = self.zoom.transform().invert(sx, sy);
		self.engine.pin(slot, x, y);
		if !self.drag.active {
			self.engine
				.energy_mut()
				.set_target(self.config.force.drag_alpha_target)
				.restart();
		}
		self.scene.raise_node(id);
		self.drag = DragState {
			active: true,
			node: Some(id.to_string()),
			slot,
			offset_x: x - wx,
			offset_y: y - wy,
			pointer_x: sx,
			pointer_y: sy,
		};
		true
	}

	/// Pin the dragged node under the pointer.
	pub fn drag_move(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			return;
		}
		self.drag.pointer_x = sx;
		self.drag.pointer_y = sy;
		self.follow_pointer();
	}

	/// Re-project the last drag pointer through the current transform.
	fn follow_pointer(&mut self) {
		if !self.drag.active {
			return;
		}
		let (wx, wy) = self
			.zoom
			.transform()
			.invert(self.drag.pointer_x, self.drag.pointer_y);
		self.engine.pin(
			self.drag.slot,
			wx + self.drag.offset_x,
			wy + self.drag.offset_y,
		);
	}

	/// Release the energy boost. The node stays pinned where it was dropped.
	pub fn drag_end(&mut self) {
		if !self.drag.active {
			return;
		}
		self.engine.energy_mut().set_target(0.0);
		self.drag = DragState::default();
	}

	/// Whether a node is held.
	pub fn is_dragging(&self) -> bool {
		self.drag.active
	}

	/// CSS cursor for the canvas.
	pub fn cursor(&self) -> &'static str {
		if self.drag.active { "grabbing" } else { "grab" }
	}

	/// Hold the background at a screen point.
	pub fn pan_start(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			last_x: sx,
			last_y: sy,
		};
	}

	/// Move the view by the pointer delta since the last pan event.
	pub fn pan_move(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		self.zoom.pan_by(sx - self.pan.last_x, sy - self.pan.last_y);
		self.pan.last_x = sx;
		self.pan.last_y = sy;
	}

	/// Release the background.
	pub fn pan_end(&mut self) {
		self.pan = PanState::default();
	}

	/// Mouse down: drag a node if one is under the pointer, else pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		match self.node_at(sx, sy) {
			Some(id) => {
				self.drag_start(&id, sx, sy);
			}
			None => self.pan_start(sx, sy),
		}
	}

	/// Mouse move: continue the active gesture, or update hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			self.drag_move(sx, sy);
		} else if self.pan.active {
			self.pan_move(sx, sy);
		} else {
			self.hover_at(sx, sy);
		}
	}

	/// Mouse up: end whichever gesture is active.
	pub fn pointer_up(&mut self) {
		self.drag_end();
		self.pan_end();
	}

	/// Pointer left the canvas: end gestures and drop the highlight.
	pub fn pointer_out(&mut self) {
		self.pointer_up();
		self.pointer_leave();
	}

	/// Wheel zoom around a screen point. A held node stays under the pointer.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.zoom.wheel(delta_y, (sx, sy));
		self.follow_pointer();
	}

	/// Animated zoom in around the viewport centre.
	pub fn zoom_in(&mut self) {
		let center = self.viewport_center();
		self.zoom.zoom_in(center);
	}

	/// Animated zoom out around the viewport centre.
	pub fn zoom_out(&mut self) {
		let center = self.viewport_center();
		self.zoom.zoom_out(center);
	}

	/// Animate back to the identity transform.
	pub fn recenter(&mut self) {
		let center = self.viewport_center();
		self.zoom.recenter(center);
	}

	/// Move the centring target to the new midpoint and gently re-energise.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.engine.set_center(width / 2.0, height / 2.0);
		if self.session.is_some() {
			self.engine
				.energy_mut()
				.set_alpha(self.config.force.resize_alpha)
				.restart();
		}
	}
}
