#![forbid(unsafe_code)]

//! Headless node placement for SEM graphs.
//!
//! Two entry points:
//! - [`GridLayout::resolve`] for user-specified grids
//! - [`layout`] for algorithmic placement
//!
//! Both produce unit grid coordinates (neighbours one unit apart, y up); callers scale them.

pub mod algo;
pub mod error;
pub mod graph;
pub mod grid;

pub use algo::{Algorithm, TreeOptions};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, LayoutResult, Node, Point};
pub use grid::GridLayout;

/// Headless layout entry point.
pub fn layout(graph: &Graph, algorithm: &Algorithm) -> Result<LayoutResult> {
    match algorithm {
        Algorithm::Tree(opts) => algo::tree::layout(graph, opts),
        Algorithm::Circle => algo::circle::layout(graph),
        Algorithm::Grid => algo::grid::layout(graph),
    }
}
