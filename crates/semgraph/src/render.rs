//! Model-to-SVG helpers.

use crate::error::HeadlessResult;
use crate::layout::{LayoutSpec, layout_graph};
use semgraph_core::{ExtractOptions, FittedModel, SemGraph, extract};
use serde::{Deserialize, Serialize};

pub use semgraph_render::connect::{NodeBox, resolve_sides, select_sides};
pub use semgraph_render::model::{
    Bounds, EdgePath, LayoutPoint, PreparedEdge, PreparedGraph, PreparedNode,
};
pub use semgraph_render::{PrepareOptions, SvgRenderOptions, prepare, render_svg};

/// All knobs of the model-to-SVG pipeline, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    pub extract: ExtractOptions,
    pub prepare: PrepareOptions,
    pub svg: SvgRenderOptions,
}

/// Lays out an already extracted (and possibly restyled) graph and prepares it for drawing.
pub fn prepare_sem_graph(
    graph: SemGraph,
    layout: &LayoutSpec,
    options: &GraphOptions,
) -> HeadlessResult<PreparedGraph> {
    let positioned = layout_graph(graph, layout)?;
    Ok(prepare(&positioned, &options.prepare)?)
}

/// Extracts, lays out and prepares `model` in one go.
pub fn prepare_graph<M: FittedModel + ?Sized>(
    model: &M,
    layout: &LayoutSpec,
    options: &GraphOptions,
) -> HeadlessResult<PreparedGraph> {
    let graph = extract(model, &options.extract)?;
    prepare_sem_graph(graph, layout, options)
}

/// [`prepare_graph`] followed by SVG output.
pub fn graph_sem<M: FittedModel + ?Sized>(
    model: &M,
    layout: &LayoutSpec,
    options: &GraphOptions,
) -> HeadlessResult<String> {
    let prepared = prepare_graph(model, layout, options)?;
    Ok(render_svg(&prepared, &options.svg))
}
