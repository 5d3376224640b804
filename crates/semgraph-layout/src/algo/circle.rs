use crate::error::Result;
use crate::graph::{Graph, LayoutResult, Point};
use std::f64::consts::PI;

pub fn layout(graph: &Graph) -> Result<LayoutResult> {
    graph.validate()?;

    let n = graph.nodes.len();
    // Chord between neighbours is one unit.
    let radius = if n < 2 { 0.0 } else { 0.5 / (PI / n as f64).sin() };
    let mut out = LayoutResult::default();
    for (i, node) in graph.nodes.iter().enumerate() {
        let theta = PI / 2.0 - 2.0 * PI * i as f64 / n as f64;
        out.positions.insert(
            node.id.clone(),
            Point {
                x: radius * theta.cos(),
                y: radius * theta.sin(),
            },
        );
    }
    Ok(out.normalized())
}
