//! Leptos component wrapping the diagram canvas.
//!
//! The component creates an HTML canvas sized to its parent, wires mouse and
//! wheel handlers to the [`Diagram`] controller, listens for window resizes,
//! and drives an animation loop via `requestAnimationFrame` that steps the
//! layout and repaints each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent, Window,
};

use super::config::DiagramConfig;
use super::render;
use super::simulation::ForceSimulation;
use super::state::Diagram;
use super::theme::Theme;

/// Longest frame step fed to transitions, so a backgrounded tab does not
/// skip a whole animation on return.
const MAX_FRAME_MS: f64 = 100.0;

/// Bundles the diagram controller with the canvas it paints on.
struct DiagramContext {
	diagram: Diagram<ForceSimulation>,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	last_frame_ms: f64,
}

impl DiagramContext {
	/// Pointer position relative to the canvas.
	fn local_point(&self, ev: &MouseEvent) -> (f64, f64) {
		let rect = self.canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	}

	/// Apply the controller's cursor. `HtmlElement::style` is named explicitly
	/// because leptos' `ElementExt::style` shadows it.
	fn sync_cursor(&self) {
		let _ = HtmlElement::style(&self.canvas).set_property("cursor", self.diagram.cursor());
	}

	/// Mirror the hovered node's name into the canvas tooltip.
	fn sync_tooltip(&self) {
		let hovered = self.diagram.highlight().and_then(|h| h.active());
		self.canvas.set_title(hovered.unwrap_or_default());
	}
}

/// Canvas size from its parent element, with a fallback for detached canvases.
fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Renders an interactive node-link diagram on a canvas element.
///
/// Every time `source` is set, its text is parsed and the diagram re-rendered;
/// text that yields no edges clears the canvas. The canvas fills its parent
/// container and follows window resizes.
#[component]
pub fn DiagramCanvas(
	#[prop(into)] source: Signal<String>,
	#[prop(optional)] config: Option<DiagramConfig>,
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<DiagramContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let config = config.unwrap_or_default();
	let theme = theme.unwrap_or_default();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			warn!("link-diagram: no window, diagram disabled");
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			warn!("link-diagram: canvas 2d context unavailable");
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let engine = ForceSimulation::new(&config.force, (w / 2.0, h / 2.0));
		let mut diagram = Diagram::new(engine, config.clone(), theme.clone(), w, h);
		diagram.generate(&source.get_untracked());
		info!("link-diagram: canvas ready at {}x{}", w, h);

		*context_init.borrow_mut() = Some(DiagramContext {
			diagram,
			canvas: canvas.clone(),
			ctx,
			last_frame_ms: js_sys::Date::now(),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.diagram.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let now = js_sys::Date::now();
				let dt = (now - c.last_frame_ms).clamp(0.0, MAX_FRAME_MS);
				c.last_frame_ms = now;
				c.diagram.tick(dt);
				render::render(&c.diagram, &c.ctx);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_src = context.clone();
	Effect::watch(
		move || source.get(),
		move |text, _, _| {
			if let Some(ref mut c) = *context_src.borrow_mut() {
				c.diagram.generate(text);
				c.sync_tooltip();
			}
		},
		false,
	);

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let (x, y) = c.local_point(&ev);
			c.diagram.pointer_down(x, y);
			c.sync_cursor();
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let (x, y) = c.local_point(&ev);
			c.diagram.pointer_move(x, y);
			c.sync_tooltip();
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.diagram.pointer_up();
			c.sync_cursor();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.diagram.pointer_out();
			c.sync_cursor();
			c.sync_tooltip();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let (x, y) = c.local_point(&ev);
			c.diagram.wheel(x, y, ev.delta_y());
		}
	};

	let context_zi = context.clone();
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zi.borrow_mut() {
			c.diagram.zoom_in();
		}
	};

	let context_zo = context.clone();
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zo.borrow_mut() {
			c.diagram.zoom_out();
		}
	};

	let context_rc = context.clone();
	let on_recenter = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_rc.borrow_mut() {
			c.diagram.recenter();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="diagram-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		<div class="zoom-controls">
			<button class="zoom-in" title="Zoom in" on:click=on_zoom_in>"+"</button>
			<button class="zoom-out" title="Zoom out" on:click=on_zoom_out>"−"</button>
			<button class="zoom-recenter" title="Recenter" on:click=on_recenter>"⟲"</button>
		</div>
	}
}
