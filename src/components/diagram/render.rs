//! Canvas rendering for the diagram.
//!
//! Paints the bound [`Scene`] under the zoom transform. Passes, in order:
//! 1. Background (screen space)
//! 2. Links and their arrowheads (world space)
//! 3. Nodes in scene order, so raised nodes land on top
//! 4. Labels

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::binder::{LabelElement, LinkElement, Marker, NodeElement, Scene};
use super::config::DiagramConfig;
use super::highlight::ElementState;
use super::simulation::LayoutEngine;
use super::state::Diagram;
use super::theme::Theme;

/// Renders the complete diagram to the canvas.
pub fn render<E: LayoutEngine>(diagram: &Diagram<E>, ctx: &CanvasRenderingContext2d) {
	let (width, height) = diagram.size();
	let theme = diagram.theme();
	let config = diagram.config();
	let scene = diagram.scene();
	let t = diagram.transform();

	draw_background(ctx, theme, width, height);

	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	let radii = radii_by_slot(scene);
	for link in &scene.links {
		let target_radius = radii.get(link.target).copied().unwrap_or(config.node.radius);
		draw_link(ctx, link, target_radius, theme, config);
	}
	for node in &scene.nodes {
		draw_node(ctx, node, theme);
	}
	for label in &scene.labels {
		draw_label(ctx, label, theme, config);
	}

	ctx.restore();
}

fn radii_by_slot(scene: &Scene) -> Vec<f64> {
	let mut radii = vec![0.0; scene.nodes.len()];
	for node in &scene.nodes {
		if let Some(r) = radii.get_mut(node.slot) {
			*r = node.radius;
		}
	}
	radii
}

fn draw_background(ctx: &CanvasRenderingContext2d, theme: &Theme, width: f64, height: f64) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn state_alpha(state: ElementState, theme: &Theme) -> f64 {
	match state {
		ElementState::Faded => theme.faded_alpha,
		_ => 1.0,
	}
}

fn draw_link(
	ctx: &CanvasRenderingContext2d,
	link: &LinkElement,
	target_radius: f64,
	theme: &Theme,
	config: &DiagramConfig,
) {
	let (dx, dy) = (link.x2 - link.x1, link.y2 - link.y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);

	let (color, width, arrow) = match link.marker {
		Marker::Highlight => (
			theme.highlight,
			theme.highlight_link_width,
			config.arrow.size + config.arrow.highlight_increase,
		),
		Marker::Default => (theme.link, theme.link_width, config.arrow.size),
	};
	// Arrowheads scale with stroke width, like SVG markers.
	let arrow = arrow * width;
	let tip_back = target_radius + config.arrow.gap;

	// Nothing left to draw once the nodes overlap.
	if dist <= tip_back + arrow {
		return;
	}

	ctx.set_global_alpha(state_alpha(link.state, theme));
	let css = color.to_css();
	ctx.set_stroke_style_str(&css);
	ctx.set_line_width(width);

	ctx.begin_path();
	ctx.move_to(link.x1, link.y1);
	ctx.line_to(
		link.x2 - ux * (tip_back + arrow),
		link.y2 - uy * (tip_back + arrow),
	);
	ctx.stroke();

	let (tip_x, tip_y) = (link.x2 - ux * tip_back, link.y2 - uy * tip_back);
	let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);
	let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);

	ctx.set_fill_style_str(&css);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	ctx.set_global_alpha(1.0);
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeElement, theme: &Theme) {
	let (x, y, radius) = (node.cx, node.cy, node.radius);

	ctx.set_global_alpha(state_alpha(node.state, theme));

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	if theme.node_gradient {
		match ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius) {
			Ok(gradient) => {
				let _ = gradient.add_color_stop(0.0, &node.color.lighten(0.4).to_css());
				let _ = gradient.add_color_stop(0.7, &node.color.to_css());
				let _ = gradient.add_color_stop(1.0, &node.color.darken(0.15).to_css());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			Err(_) => ctx.set_fill_style_str(&node.color.to_css()),
		}
	} else {
		ctx.set_fill_style_str(&node.color.to_css());
	}
	ctx.fill();

	let (stroke, stroke_width) = match node.state {
		ElementState::Highlighted => (theme.highlight, theme.node_stroke_width * 2.0),
		_ => (theme.node_stroke, theme.node_stroke_width),
	};
	ctx.set_stroke_style_str(&stroke.to_css());
	ctx.set_line_width(stroke_width);
	ctx.stroke();

	ctx.set_global_alpha(1.0);
}

fn draw_label(
	ctx: &CanvasRenderingContext2d,
	label: &LabelElement,
	theme: &Theme,
	config: &DiagramConfig,
) {
	let alpha = if label.faded {
		theme.faded_label_alpha
	} else {
		1.0
	};
	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str(&theme.label.to_css());
	ctx.set_font(&config.node.label_font);
	let _ = ctx.fill_text(&label.id, label.x + label.dx, label.y + label.dy);
	ctx.set_global_alpha(1.0);
}
