//! link-diagram: interactive node-link diagrams from plain edge lists.
//!
//! This crate provides a WASM app that turns `A -> B` lines into a
//! force-directed diagram with pan/zoom, node dragging and hover highlighting.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::diagram::{
	Diagram, DiagramCanvas, DiagramConfig, Edge, Node, ParsedGraph, Theme, parse,
};

/// Example shown when the page provides no source of its own.
pub const DEFAULT_SOURCE: &str = "\
App -> Web
Web -> API
API -> Database
App -> API
Web -> Auth Service
Auth Service -> Database";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("link-diagram: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Initial edge list from `<script id="diagram-source" type="text/plain">`,
/// falling back to [`DEFAULT_SOURCE`].
fn load_source() -> String {
	script_text("diagram-source")
		.map(|text| text.trim().to_string())
		.filter(|text| !text.is_empty())
		.unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}

/// Overrides from `<script id="diagram-config" type="application/json">`.
fn load_config() -> DiagramConfig {
	let Some(json) = script_text("diagram-config") else {
		return DiagramConfig::default();
	};
	match DiagramConfig::from_json(&json) {
		Ok(config) => {
			info!("link-diagram: loaded config overrides");
			config
		}
		Err(e) => {
			warn!("link-diagram: failed to parse config: {}", e);
			DiagramConfig::default()
		}
	}
}

/// Main application component: edge-list editor beside the diagram.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let theme = Theme::by_name(&config.theme);
	let theme_name = theme.name;
	let initial = load_source();

	let (draft, set_draft) = signal(initial.clone());
	// Set on every Generate click, even when the text is unchanged.
	let source = RwSignal::new(initial);
	let on_generate = move |_| source.set(draft.get_untracked());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text="Link Diagram" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app">
			<aside class="editor">
				<h1>"Link Diagram"</h1>
				<p class="subtitle">"One connection per line, e.g. " <code>"App -> Web"</code></p>
				<textarea
					id="connections"
					rows="14"
					spellcheck="false"
					prop:value=move || draft.get()
					on:input=move |ev| set_draft.set(event_target_value(&ev))
				/>
				<button id="generate-button" on:click=on_generate>"Generate"</button>
			</aside>
			<main id="graph-container" class="graph-container">
				<DiagramCanvas source=source config=config theme=theme />
				<div class="graph-overlay">
					<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
				</div>
			</main>
		</div>
	}
}
