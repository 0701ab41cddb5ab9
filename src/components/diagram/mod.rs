//! Interactive node-link diagram component.
//!
//! Turns an `A -> B` edge list into a diagram on an HTML canvas with:
//! - Force-directed layout via `force_graph`, restarted on every render
//! - Keyed reconciliation of node, link and label elements across renders
//! - Hover highlighting of a node, its neighbours and its links
//! - Node dragging (dropped nodes stay pinned), pan, wheel zoom and zoom buttons
//!
//! # Example
//!
//! ```ignore
//! use link_diagram::DiagramCanvas;
//!
//! let (source, set_source) = signal("App -> Web\nWeb -> API".to_string());
//! view! { <DiagramCanvas source=source /> }
//! ```

pub mod adjacency;
pub mod binder;
mod component;
pub mod config;
pub mod highlight;
pub mod parser;
mod render;
pub mod simulation;
pub mod state;
pub mod theme;
mod types;
pub mod zoom;

pub use component::DiagramCanvas;
pub use config::DiagramConfig;
pub use parser::parse;
pub use state::{Diagram, DiagramSession};
pub use theme::Theme;
pub use types::{ColorGroup, Edge, Node, PALETTE_SIZE, ParsedGraph};
