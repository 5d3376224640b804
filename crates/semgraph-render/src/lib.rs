#![forbid(unsafe_code)]

//! Plot-space geometry and SVG output for positioned SEM graphs.
//!
//! [`prepare`] sizes nodes, anchors each edge on a node side and routes it as a line, an arc
//! or a self-loop. [`render_svg`] draws the result. Neither touches the node/edge tables.

pub mod connect;
pub mod error;
pub mod geom;
pub mod model;
pub mod prepare;
pub mod svg;

pub use connect::{NodeBox, resolve_sides, select_sides};
pub use error::{Error, Result};
pub use model::{Bounds, EdgePath, LayoutPoint, PreparedEdge, PreparedGraph, PreparedNode};
pub use prepare::{PrepareOptions, prepare};
pub use svg::{SvgRenderOptions, render_svg};
