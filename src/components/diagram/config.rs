//! Tunable parameters for layout, geometry and zoom.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON document only
//! needs the fields it wants to override:
//!
//! ```json
//! { "theme": "light", "node": { "radius": 12 }, "zoom": { "max_scale": 4 } }
//! ```

use serde::Deserialize;

/// Node and label geometry in world units.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeStyleConfig {
	/// Resting node radius.
	pub radius: f64,
	/// Added to `radius` while a node is highlighted.
	pub hover_increase: f64,
	/// Label anchor offset from the node centre.
	pub label_dx: f64,
	/// Vertical label offset.
	pub label_dy: f64,
	/// Canvas font for labels.
	pub label_font: String,
}

impl Default for NodeStyleConfig {
	fn default() -> Self {
		Self {
			radius: 18.0,
			hover_increase: 5.0,
			label_dx: 25.0,
			label_dy: 5.0,
			label_font: "12px sans-serif".to_string(),
		}
	}
}

/// Arrowhead terminating each link.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArrowConfig {
	/// Arrowhead length.
	pub size: f64,
	/// Extra size of the highlighted arrowhead.
	pub highlight_increase: f64,
	/// Gap between the arrow tip and the node outline.
	pub gap: f64,
}

impl Default for ArrowConfig {
	fn default() -> Self {
		Self {
			size: 5.0,
			highlight_increase: 1.0,
			gap: 2.0,
		}
	}
}

/// Physics parameters handed to `force_graph`, plus energy levels used by
/// interactions.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForceConfig {
	/// Repulsion between every pair of nodes.
	pub charge: f32,
	/// Spring stiffness along links.
	pub spring: f32,
	/// Cap on the force applied to one node per step.
	pub max_force: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Velocity kept per step.
	pub damping: f32,
	/// Node mass.
	pub mass: f32,
	/// Fixed integration step per frame, in seconds.
	pub frame_dt: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
	/// Alpha applied when the viewport is resized.
	pub resize_alpha: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			// Pair equilibrium sits near 100 world units with mass 10.
			charge: 250.0,
			spring: 0.05,
			max_force: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			mass: 10.0,
			frame_dt: 0.016,
			drag_alpha_target: 0.3,
			resize_alpha: 0.3,
		}
	}
}

/// Zoom extent, button step and animation timing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
	/// Smallest zoom factor.
	pub min_scale: f64,
	/// Largest zoom factor.
	pub max_scale: f64,
	/// Factor applied by the zoom-in button and divided by zoom-out.
	pub step: f64,
	/// Zoom button animation length.
	pub step_duration_ms: f64,
	/// Recenter animation length.
	pub recenter_duration_ms: f64,
	/// Exponent per wheel pixel: factor = 2^(-delta_y * sensitivity).
	pub wheel_sensitivity: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 8.0,
			step: 1.3,
			step_duration_ms: 250.0,
			recenter_duration_ms: 600.0,
			wheel_sensitivity: 0.002,
		}
	}
}

/// Complete diagram configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagramConfig {
	/// Theme name, see `Theme::by_name`.
	pub theme: String,
	/// Node and label geometry.
	pub node: NodeStyleConfig,
	/// Arrowheads.
	pub arrow: ArrowConfig,
	/// Layout physics.
	pub force: ForceConfig,
	/// Zoom extent and timing.
	pub zoom: ZoomConfig,
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self {
			theme: "dark".to_string(),
			node: NodeStyleConfig::default(),
			arrow: ArrowConfig::default(),
			force: ForceConfig::default(),
			zoom: ZoomConfig::default(),
		}
	}
}

impl DiagramConfig {
	/// Parse a (possibly partial) JSON override document.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Node radius while highlighted.
	pub fn highlight_radius(&self) -> f64 {
		self.node.radius + self.node.hover_increase
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config =
			DiagramConfig::from_json(r#"{ "node": { "radius": 12 }, "zoom": { "max_scale": 4 } }"#)
				.expect("valid config");
		assert_eq!(config.node.radius, 12.0);
		assert_eq!(config.node.hover_increase, 5.0);
		assert_eq!(config.zoom.max_scale, 4.0);
		assert_eq!(config.zoom.step, 1.3);
		assert_eq!(config.force, ForceConfig::default());
		assert_eq!(config.highlight_radius(), 17.0);
		assert_eq!(config.theme, "dark");
	}

	#[test]
	fn empty_object_is_default() {
		let config = DiagramConfig::from_json("{}").expect("valid config");
		assert_eq!(config, DiagramConfig::default());
		assert_eq!(config.highlight_radius(), 23.0);
	}

	#[test]
	fn malformed_json_is_rejected() {
		assert!(DiagramConfig::from_json("{ node: ").is_err());
		assert!(DiagramConfig::from_json(r#"{ "zoom": { "step": "fast" } }"#).is_err());
	}
}
