//! Layout engine seam and the `force_graph` backed implementation.
//!
//! The engine owns node positions. Each frame it may emit a [`PositionUpdate`],
//! which the scene consumes as the only source of geometry. Motion is governed
//! by an [`Energy`] scalar (alpha) that decays towards a target and halts the
//! engine once it drops below a floor.

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::config::ForceConfig;

/// Decaying scalar that drives how far nodes move per frame.
#[derive(Clone, Debug)]
pub struct Energy {
	alpha: f64,
	target: f64,
	min: f64,
	decay: f64,
	running: bool,
}

impl Default for Energy {
	fn default() -> Self {
		Self {
			alpha: 1.0,
			target: 0.0,
			min: 0.001,
			// Reaches `min` from 1.0 in 300 frames.
			decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
			running: false,
		}
	}
}

impl Energy {
	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Level alpha decays towards.
	pub fn target(&self) -> f64 {
		self.target
	}

	/// Floor below which the engine halts.
	pub fn min(&self) -> f64 {
		self.min
	}

	/// Whether the engine still emits frames.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Clamped to `[0, 1]`.
	pub fn set_alpha(&mut self, alpha: f64) -> &mut Self {
		self.alpha = alpha.clamp(0.0, 1.0);
		self
	}

	/// Clamped to `[0, 1]`.
	pub fn set_target(&mut self, target: f64) -> &mut Self {
		self.target = target.clamp(0.0, 1.0);
		self
	}

	/// Resume frame emission.
	pub fn restart(&mut self) -> &mut Self {
		self.running = true;
		self
	}

	/// Halt without touching alpha.
	pub fn stop(&mut self) -> &mut Self {
		self.running = false;
		self
	}

	/// Move alpha one step towards the target.
	///
	/// Returns the alpha to use for this frame. The engine halts after this
	/// frame if alpha fell below the floor.
	pub fn advance(&mut self) -> f64 {
		self.alpha += (self.target - self.alpha) * self.decay;
		if self.alpha < self.min {
			self.running = false;
		}
		self.alpha
	}
}

/// Positions of every node after a frame, indexed by slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionUpdate {
	/// `(x, y)` in world units.
	pub positions: Vec<(f64, f64)>,
}

/// Initial placement for a node handed to the engine. Its slot is its index
/// in the seed slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSeed {
	/// World x.
	pub x: f64,
	/// World y.
	pub y: f64,
}

/// Physics collaborator driving the layout.
pub trait LayoutEngine {
	/// Replace the node and link sets. Links are pairs of slots.
	fn load(&mut self, seeds: &[NodeSeed], links: &[(usize, usize)]);
	/// Drop every node and link.
	fn clear(&mut self);
	/// Current position of `slot`, `None` if out of range.
	fn position(&self, slot: usize) -> Option<(f64, f64)>;
	/// Fix a node at `(x, y)`. Pinned nodes are never moved by forces.
	fn pin(&mut self, slot: usize, x: f64, y: f64);
	/// Move the point free nodes are centred on.
	fn set_center(&mut self, x: f64, y: f64);
	/// Energy governing motion.
	fn energy(&self) -> &Energy;
	/// Mutable energy, for restarts and drag boosts.
	fn energy_mut(&mut self) -> &mut Energy;
	/// Advance one frame of `dt` seconds. `None` while halted.
	fn step(&mut self, dt: f64) -> Option<PositionUpdate>;
}

/// Per-node data stored inside the physics graph.
#[derive(Clone, Copy, Debug, Default)]
struct SlotInfo {
	slot: usize,
}

/// [`LayoutEngine`] over `force_graph`: spring attraction along links, charge
/// repulsion between all nodes, and a centring pass over free nodes.
pub struct ForceSimulation {
	graph: ForceGraph<SlotInfo, ()>,
	slots: Vec<DefaultNodeIdx>,
	energy: Energy,
	center: (f64, f64),
	mass: f32,
}

impl ForceSimulation {
	/// Empty simulation centred on `center`. Halted until a restart.
	pub fn new(config: &ForceConfig, center: (f64, f64)) -> Self {
		Self {
			graph: ForceGraph::new(SimulationParameters {
				force_charge: config.charge,
				force_spring: config.spring,
				force_max: config.max_force,
				node_speed: config.node_speed,
				damping_factor: config.damping,
			}),
			slots: Vec::new(),
			energy: Energy::default(),
			center,
			mass: config.mass,
		}
	}

	/// Whether `slot` is fixed by a drag.
	pub fn is_pinned(&self, slot: usize) -> bool {
		let Some(&idx) = self.slots.get(slot) else {
			return false;
		};
		let mut pinned = false;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pinned = node.data.is_anchor;
			}
		});
		pinned
	}

	/// Translate free nodes so their centroid lands on the centring target.
	fn recenter_free_nodes(&mut self) {
		let (mut sx, mut sy, mut n) = (0.0f64, 0.0f64, 0usize);
		self.graph.visit_nodes(|node| {
			if !node.data.is_anchor {
				sx += node.x() as f64;
				sy += node.y() as f64;
				n += 1;
			}
		});
		if n == 0 {
			return;
		}
		let (dx, dy) = (
			(self.center.0 - sx / n as f64) as f32,
			(self.center.1 - sy / n as f64) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x += dx;
				node.data.y += dy;
			}
		});
	}

	fn snapshot(&self) -> PositionUpdate {
		let mut positions = vec![(0.0, 0.0); self.slots.len()];
		self.graph.visit_nodes(|node| {
			if let Some(p) = positions.get_mut(node.data.user_data.slot) {
				*p = (node.x() as f64, node.y() as f64);
			}
		});
		PositionUpdate { positions }
	}
}

impl LayoutEngine for ForceSimulation {
	fn load(&mut self, seeds: &[NodeSeed], links: &[(usize, usize)]) {
		self.graph.clear();
		self.slots = seeds
			.iter()
			.enumerate()
			.map(|(slot, seed)| {
				self.graph.add_node(NodeData {
					x: seed.x as f32,
					y: seed.y as f32,
					mass: self.mass,
					is_anchor: false,
					user_data: SlotInfo { slot },
				})
			})
			.collect();

		for &(s, t) in links {
			// force_graph cannot integrate a node against itself.
			if s == t {
				continue;
			}
			if let (Some(&src), Some(&tgt)) = (self.slots.get(s), self.slots.get(t)) {
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
		}
	}

	fn clear(&mut self) {
		self.graph.clear();
		self.slots.clear();
	}

	fn position(&self, slot: usize) -> Option<(f64, f64)> {
		let &idx = self.slots.get(slot)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	fn pin(&mut self, slot: usize, x: f64, y: f64) {
		let Some(&idx) = self.slots.get(slot) else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
	}

	fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	fn energy(&self) -> &Energy {
		&self.energy
	}

	fn energy_mut(&mut self) -> &mut Energy {
		&mut self.energy
	}

	fn step(&mut self, dt: f64) -> Option<PositionUpdate> {
		if !self.energy.is_running() {
			return None;
		}
		let alpha = self.energy.advance();
		self.graph.update((dt * alpha) as f32);
		self.recenter_free_nodes();
		Some(self.snapshot())
	}
}
