//! Positions for a [`SemGraph`], from a user grid or a layout algorithm.

use crate::error::HeadlessResult;
use semgraph_core::{Arrow, SemGraph};
use semgraph_layout::{Edge, Graph, LayoutResult, Node};
use std::str::FromStr;

pub use semgraph_layout::{Algorithm, Error as LayoutError, GridLayout, TreeOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSpec {
    /// Every node placed by hand on a grid.
    Grid(GridLayout),
    Algorithm(Algorithm),
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec::Algorithm(Algorithm::default())
    }
}

impl From<GridLayout> for LayoutSpec {
    fn from(grid: GridLayout) -> Self {
        LayoutSpec::Grid(grid)
    }
}

impl From<Algorithm> for LayoutSpec {
    fn from(algorithm: Algorithm) -> Self {
        LayoutSpec::Algorithm(algorithm)
    }
}

impl FromStr for LayoutSpec {
    type Err = LayoutError;

    /// An algorithm name, or grid text when the input spans several lines.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().contains('\n') {
            Ok(LayoutSpec::Grid(GridLayout::parse(s)?))
        } else {
            Ok(LayoutSpec::Algorithm(s.parse()?))
        }
    }
}

/// The layout view of a SEM graph: single-headed arrows are directed, everything else is not.
fn layout_input(graph: &SemGraph) -> Graph {
    Graph {
        nodes: graph.nodes().iter().map(|n| Node::new(n.name.clone())).collect(),
        edges: graph
            .edges()
            .iter()
            .filter(|e| !e.is_self_loop())
            .map(|e| {
                if e.arrow == Arrow::Last {
                    Edge::directed(e.from.clone(), e.to.clone())
                } else {
                    Edge::undirected(e.from.clone(), e.to.clone())
                }
            })
            .collect(),
    }
}

/// Resolves `spec` for every node, hidden ones included, and stores the coordinates.
pub fn layout_graph(graph: SemGraph, spec: &LayoutSpec) -> HeadlessResult<SemGraph> {
    let result: LayoutResult = match spec {
        LayoutSpec::Grid(grid) => {
            let names: Vec<&str> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
            grid.resolve(&names)?
        }
        LayoutSpec::Algorithm(algorithm) => semgraph_layout::layout(&layout_input(&graph), algorithm)?,
    };
    tracing::debug!(placed = result.len(), "layout resolved");
    let positioned = graph.with_positions(
        result
            .positions
            .iter()
            .map(|(name, p)| (name.as_str(), p.x, p.y)),
    )?;
    Ok(positioned)
}
