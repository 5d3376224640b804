use crate::geom::{Point, point};
use semgraph_core::{Aesthetics, Arrow, NodeShape, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for LayoutPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<LayoutPoint> for Point {
    fn from(p: LayoutPoint) -> Self {
        point(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedNode {
    pub name: String,
    pub label: String,
    pub shape: NodeShape,
    pub center: LayoutPoint,
    pub width: f64,
    pub height: f64,
    pub aes: Aesthetics,
}

/// Edge geometry in plot space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgePath {
    Line {
        start: LayoutPoint,
        end: LayoutPoint,
    },
    Quadratic {
        start: LayoutPoint,
        control: LayoutPoint,
        end: LayoutPoint,
    },
    /// Self-loop drawn outside one side of the node.
    Cubic {
        start: LayoutPoint,
        control1: LayoutPoint,
        control2: LayoutPoint,
        end: LayoutPoint,
    },
}

impl EdgePath {
    pub fn start(&self) -> LayoutPoint {
        match self {
            EdgePath::Line { start, .. }
            | EdgePath::Quadratic { start, .. }
            | EdgePath::Cubic { start, .. } => *start,
        }
    }

    pub fn end(&self) -> LayoutPoint {
        match self {
            EdgePath::Line { end, .. }
            | EdgePath::Quadratic { end, .. }
            | EdgePath::Cubic { end, .. } => *end,
        }
    }

    /// All defining points, control points included.
    pub fn points(&self) -> Vec<LayoutPoint> {
        match self {
            EdgePath::Line { start, end } => vec![*start, *end],
            EdgePath::Quadratic {
                start,
                control,
                end,
            } => vec![*start, *control, *end],
            EdgePath::Cubic {
                start,
                control1,
                control2,
                end,
            } => vec![*start, *control1, *control2, *end],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedEdge {
    pub from: String,
    pub to: String,
    pub from_side: Side,
    pub to_side: Side,
    pub arrow: Arrow,
    pub label: String,
    pub path: EdgePath,
    pub label_position: LayoutPoint,
    pub aes: Aesthetics,
}

/// Everything a renderer needs; nothing here is validated again downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedGraph {
    pub nodes: Vec<PreparedNode>,
    pub edges: Vec<PreparedEdge>,
    pub bounds: Bounds,
}

impl PreparedGraph {
    pub fn node(&self, name: &str) -> Option<&PreparedNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&PreparedEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    pub fn to_json_string(&self, pretty: bool) -> crate::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }
}
