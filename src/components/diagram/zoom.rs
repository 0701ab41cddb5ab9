//! Pan and zoom transform with animated transitions.
//!
//! Screen = world * k + (x, y). Every write clamps `k` to the configured
//! extent. Button-driven changes animate; wheel and drag gestures apply
//! immediately and interrupt any running animation.

use super::config::ZoomConfig;

/// Uniform scale plus translation applied to the whole diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
	/// Screen-space translation.
	pub x: f64,
	/// Screen-space translation.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ZoomTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ZoomTransform {
	/// No scale, no translation.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// World to screen.
	pub fn apply(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Screen to world.
	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Rescale to `k` while keeping the world point under `(px, py)` fixed.
	pub fn scale_to(&self, k: f64, (px, py): (f64, f64)) -> Self {
		let (wx, wy) = self.invert(px, py);
		Self {
			x: px - wx * k,
			y: py - wy * k,
			k,
		}
	}

	/// Shift by a screen-space delta.
	pub fn translate_by(&self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			..*self
		}
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// An in-flight animation between two transforms.
#[derive(Clone, Debug)]
struct Transition {
	from: ZoomTransform,
	to: ZoomTransform,
	/// Screen point whose world position is interpolated.
	focus: (f64, f64),
	elapsed_ms: f64,
	duration_ms: f64,
}

impl Transition {
	/// Transform at eased progress `t`: the world point under the focus moves
	/// linearly while the scale moves geometrically.
	fn sample(&self, t: f64) -> ZoomTransform {
		if t >= 1.0 {
			return self.to;
		}
		let (fx, fy) = self.focus;
		let (w0x, w0y) = self.from.invert(fx, fy);
		let (w1x, w1y) = self.to.invert(fx, fy);
		let k = self.from.k * (self.to.k / self.from.k).powf(t);
		let (wx, wy) = (w0x + (w1x - w0x) * t, w0y + (w1y - w0y) * t);
		ZoomTransform {
			x: fx - wx * k,
			y: fy - wy * k,
			k,
		}
	}
}

/// Transform state plus the optional running transition.
#[derive(Clone, Debug)]
pub struct Zoom {
	config: ZoomConfig,
	transform: ZoomTransform,
	transition: Option<Transition>,
}

impl Zoom {
	/// Identity transform, nothing animating.
	pub fn new(config: ZoomConfig) -> Self {
		Self {
			config,
			transform: ZoomTransform::IDENTITY,
			transition: None,
		}
	}

	/// Current (possibly mid-transition) transform.
	pub fn transform(&self) -> ZoomTransform {
		self.transform
	}

	/// Whether a button transition is running.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	fn clamp_k(&self, k: f64) -> f64 {
		k.clamp(self.config.min_scale, self.config.max_scale)
	}

	/// Set the transform immediately, cancelling any animation.
	pub fn set(&mut self, transform: ZoomTransform) {
		self.transition = None;
		self.transform = ZoomTransform {
			k: self.clamp_k(transform.k),
			..transform
		};
	}

	/// Wheel gesture at screen point `at`. Positive `delta_y` zooms out.
	pub fn wheel(&mut self, delta_y: f64, at: (f64, f64)) {
		let factor = 2f64.powf(-delta_y * self.config.wheel_sensitivity);
		let k = self.clamp_k(self.transform.k * factor);
		let next = self.transform.scale_to(k, at);
		self.set(next);
	}

	/// Background drag by a screen-space delta. Interrupts any animation.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		let next = self.transform.translate_by(dx, dy);
		self.set(next);
	}

	/// Animate a scale change by `factor` around `center`.
	pub fn scale_by(&mut self, factor: f64, center: (f64, f64)) {
		let k = self.clamp_k(self.transform.k * factor);
		let to = self.transform.scale_to(k, center);
		self.animate(to, center, self.config.step_duration_ms);
	}

	/// Animate one step in around `center`.
	pub fn zoom_in(&mut self, center: (f64, f64)) {
		self.scale_by(self.config.step, center);
	}

	/// Animate one step out around `center`.
	pub fn zoom_out(&mut self, center: (f64, f64)) {
		self.scale_by(1.0 / self.config.step, center);
	}

	/// Animate back to the identity transform.
	pub fn recenter(&mut self, center: (f64, f64)) {
		self.animate(
			ZoomTransform::IDENTITY,
			center,
			self.config.recenter_duration_ms,
		);
	}

	/// Start a transition from the current transform, replacing any running one.
	fn animate(&mut self, to: ZoomTransform, focus: (f64, f64), duration_ms: f64) {
		if duration_ms <= 0.0 {
			self.set(to);
			return;
		}
		self.transition = Some(Transition {
			from: self.transform,
			to,
			focus,
			elapsed_ms: 0.0,
			duration_ms,
		});
	}

	/// Advance the running transition by `dt_ms`.
	pub fn tick(&mut self, dt_ms: f64) {
		let Some(transition) = self.transition.as_mut() else {
			return;
		};
		transition.elapsed_ms += dt_ms;
		let t = (transition.elapsed_ms / transition.duration_ms).min(1.0);
		self.transform = transition.sample(ease_cubic_in_out(t));
		if t >= 1.0 {
			self.transition = None;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const CENTER: (f64, f64) = (400.0, 300.0);

	fn zoom() -> Zoom {
		Zoom::new(ZoomConfig::default())
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn zoom_in_then_out_restores_scale() {
		let mut z = zoom();
		z.zoom_in(CENTER);
		z.tick(1000.0);
		assert!(close(z.transform().k, 1.3));
		z.zoom_out(CENTER);
		z.tick(1000.0);
		let t = z.transform();
		assert!(close(t.k, 1.0));
		assert!(close(t.x, 0.0) && close(t.y, 0.0));
	}

	#[test]
	fn zoom_keeps_focus_point_fixed() {
		let mut z = zoom();
		z.set(ZoomTransform {
			x: 35.0,
			y: -20.0,
			k: 2.0,
		});
		let before = z.transform().invert(CENTER.0, CENTER.1);
		z.zoom_in(CENTER);
		for _ in 0..5 {
			z.tick(40.0);
			let mid = z.transform().invert(CENTER.0, CENTER.1);
			assert!((mid.0 - before.0).abs() < 1e-6);
			assert!((mid.1 - before.1).abs() < 1e-6);
		}
	}

	#[test]
	fn recenter_always_restores_identity() {
		let mut z = zoom();
		z.wheel(-300.0, (10.0, 10.0));
		z.pan_by(-250.0, 80.0);
		z.recenter(CENTER);
		assert!(z.is_animating());
		z.tick(300.0);
		assert!(z.is_animating());
		z.tick(300.0);
		assert!(!z.is_animating());
		assert_eq!(z.transform(), ZoomTransform::IDENTITY);
	}

	#[test]
	fn scale_is_clamped() {
		let mut z = zoom();
		for _ in 0..40 {
			z.zoom_in(CENTER);
			z.tick(1000.0);
		}
		assert!(close(z.transform().k, 8.0));
		for _ in 0..80 {
			z.zoom_out(CENTER);
			z.tick(1000.0);
		}
		assert!(close(z.transform().k, 0.1));
		z.wheel(-10_000.0, CENTER);
		assert!(close(z.transform().k, 8.0));
	}

	#[test]
	fn new_transition_supersedes_running_one() {
		let mut z = zoom();
		z.zoom_in(CENTER);
		z.tick(125.0);
		let mid = z.transform().k;
		assert!(mid > 1.0 && mid < 1.3);
		z.recenter(CENTER);
		z.tick(600.0);
		assert_eq!(z.transform(), ZoomTransform::IDENTITY);
	}

	#[test]
	fn wheel_interrupts_animation() {
		let mut z = zoom();
		z.zoom_in(CENTER);
		z.tick(50.0);
		z.wheel(100.0, CENTER);
		assert!(!z.is_animating());
		assert!(z.transform().k < 1.3);
	}

	#[test]
	fn wheel_zooms_around_pointer() {
		let mut z = zoom();
		let at = (120.0, 45.0);
		let before = z.transform().invert(at.0, at.1);
		z.wheel(-120.0, at);
		let after = z.transform().invert(at.0, at.1);
		assert!(z.transform().k > 1.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn easing_endpoints() {
		assert_eq!(ease_cubic_in_out(0.0), 0.0);
		assert_eq!(ease_cubic_in_out(1.0), 1.0);
		assert!(close(ease_cubic_in_out(0.5), 0.5));
	}
}
