use crate::error::Result;
use crate::graph::{Graph, LayoutResult, Point};

pub fn layout(graph: &Graph) -> Result<LayoutResult> {
    graph.validate()?;

    let n = graph.nodes.len();
    let columns = ((n as f64).sqrt().ceil() as usize).max(1);
    let rows = n.div_ceil(columns);
    let mut out = LayoutResult::default();
    for (i, node) in graph.nodes.iter().enumerate() {
        out.positions.insert(
            node.id.clone(),
            Point {
                x: (i % columns + 1) as f64,
                y: (rows - i / columns) as f64,
            },
        );
    }
    Ok(out)
}
