//! Visual theming for the diagram.
//!
//! Provides the node palette and the colours used for links, highlights and
//! faded elements.

use super::types::{ColorGroup, PALETTE_SIZE};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour, different opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// CSS colour string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node fill colours, one per [`ColorGroup`].
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Fill per colour group.
	pub colors: [Color; PALETTE_SIZE],
}

impl NodePalette {
	/// Soft pastels with one saturated accent (default)
	pub fn pastel() -> Self {
		Self {
			colors: [
				Color::rgb(0xa6, 0xce, 0xe3), // Light blue
				Color::rgb(0xb2, 0xdf, 0x8a), // Light green
				Color::rgb(0xfd, 0xbf, 0x6f), // Apricot
				Color::rgb(0xca, 0xb2, 0xd6), // Lilac
				Color::rgb(0xff, 0xff, 0x99), // Pale yellow
				Color::rgb(0xe3, 0x1a, 0x1c), // Red
			],
		}
	}

	/// Muted slate blues and teals
	pub fn slate() -> Self {
		Self {
			colors: [
				Color::rgb(94, 129, 172),
				Color::rgb(129, 161, 193),
				Color::rgb(100, 148, 160),
				Color::rgb(136, 160, 175),
				Color::rgb(108, 142, 173),
				Color::rgb(143, 163, 180),
			],
		}
	}

	/// Fill for `group`.
	pub fn get(&self, group: ColorGroup) -> Color {
		self.colors[group.0 % PALETTE_SIZE]
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Name accepted by [`Theme::by_name`].
	pub name: &'static str,
	/// Canvas fill.
	pub background: Color,
	/// Link stroke and arrowhead.
	pub link: Color,
	/// Highlighted links, arrowheads and node outlines.
	pub highlight: Color,
	/// Node outline.
	pub node_stroke: Color,
	/// Label text.
	pub label: Color,
	/// Opacity of nodes and links outside the highlighted set.
	pub faded_alpha: f64,
	/// Opacity of labels outside the highlighted set.
	pub faded_label_alpha: f64,
	/// Node outline width.
	pub node_stroke_width: f64,
	/// Link width.
	pub link_width: f64,
	/// Highlighted link width.
	pub highlight_link_width: f64,
	/// Inner radial gradient on node fills.
	pub node_gradient: bool,
	/// Node fills.
	pub palette: NodePalette,
}

impl Theme {
	/// Dark canvas with pastel nodes (default)
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: Color::rgb(30, 30, 36),
			link: Color::rgba(150, 150, 160, 0.8),
			highlight: Color::rgb(255, 165, 0),
			node_stroke: Color::rgb(240, 240, 240),
			label: Color::rgb(230, 230, 230),
			faded_alpha: 0.15,
			faded_label_alpha: 0.2,
			node_stroke_width: 1.5,
			link_width: 1.5,
			highlight_link_width: 2.5,
			node_gradient: true,
			palette: NodePalette::pastel(),
		}
	}

	/// Light canvas with slate nodes
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(248, 249, 250),
			link: Color::rgba(110, 110, 120, 0.7),
			highlight: Color::rgb(214, 96, 0),
			node_stroke: Color::rgb(60, 60, 70),
			label: Color::rgb(33, 37, 41),
			faded_alpha: 0.15,
			faded_label_alpha: 0.25,
			node_stroke_width: 1.5,
			link_width: 1.5,
			highlight_link_width: 2.5,
			node_gradient: false,
			palette: NodePalette::slate(),
		}
	}

	/// Look a theme up by name, falling back to the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"light" => Self::light(),
			_ => Self::dark(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_cycles_by_group() {
		let palette = NodePalette::pastel();
		assert_eq!(palette.get(ColorGroup(0)), palette.get(ColorGroup(6)));
		assert_eq!(palette.get(ColorGroup(5)).to_css(), "#e31a1c");
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(166, 206, 227).to_css(), "#a6cee3");
		assert_eq!(
			Color::rgb(10, 20, 30).with_alpha(0.5).to_css(),
			"rgba(10, 20, 30, 0.5)"
		);
		assert_eq!(Color::rgb(0, 0, 0).lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(Color::rgb(200, 100, 50).darken(1.0), Color::rgb(0, 0, 0));
	}

	#[test]
	fn theme_lookup_falls_back() {
		assert_eq!(Theme::by_name("light").name, "light");
		assert_eq!(Theme::by_name("neon").name, "dark");
	}
}
