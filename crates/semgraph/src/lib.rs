#![forbid(unsafe_code)]

//! `semgraph` draws path diagrams of fitted structural equation models, headless.
//!
//! The pipeline is: parameter table -> node/edge tables ([`extract`]) -> optional styling and
//! editing -> positions ([`layout::layout_graph`]) -> plot geometry and SVG (`render`).
//!
//! # Features
//!
//! - `render` (default): scene preparation and SVG output (`semgraph::render`)

pub use semgraph_core::*;

pub mod error;
pub mod layout;

#[cfg(feature = "render")]
pub mod render;

pub use error::{HeadlessError, HeadlessResult};
pub use layout::{LayoutSpec, layout_graph};

#[cfg(feature = "render")]
pub use render::{GraphOptions, graph_sem, prepare_graph, prepare_sem_graph};
