//! Turns a positioned [`SemGraph`] into plot-space geometry.

use crate::connect::{NodeBox, resolve_sides, validate_angle};
use crate::error::{Error, Result};
use crate::geom::{Point, Vector, point, vector};
use crate::model::{Bounds, EdgePath, LayoutPoint, PreparedEdge, PreparedGraph, PreparedNode};
use rustc_hash::FxHashMap;
use semgraph_core::{Aesthetic, Aesthetics, Edge, NodeShape, SemGraph, Side};
use serde::{Deserialize, Serialize};

/// `label_size` aesthetic units per plot unit.
pub(crate) const LABEL_SIZE_PER_UNIT: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareOptions {
    /// Angular threshold for top/bottom connections; `None` picks the nearest sides.
    pub angle: Option<f64>,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub rect_width: f64,
    pub rect_height: f64,
    pub ellipses_width: f64,
    pub ellipses_height: f64,
    /// Reach of a variance self-loop beyond the node side.
    pub variance_diameter: f64,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            angle: None,
            spacing_x: 2.0,
            spacing_y: 2.0,
            rect_width: 1.2,
            rect_height: 0.8,
            ellipses_width: 1.0,
            ellipses_height: 1.0,
            variance_diameter: 0.8,
        }
    }
}

impl PrepareOptions {
    pub fn validate(&self) -> Result<()> {
        validate_angle(self.angle)?;
        for (name, value) in [
            ("spacing_x", self.spacing_x),
            ("spacing_y", self.spacing_y),
            ("rect_width", self.rect_width),
            ("rect_height", self.rect_height),
            ("ellipses_width", self.ellipses_width),
            ("ellipses_height", self.ellipses_height),
            ("variance_diameter", self.variance_diameter),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidOption { name, value });
            }
        }
        Ok(())
    }

    fn node_size(&self, shape: NodeShape) -> (f64, f64) {
        match shape {
            NodeShape::Rect => (self.rect_width, self.rect_height),
            NodeShape::Oval => (self.ellipses_width, self.ellipses_height),
        }
    }
}

/// Font size of a label in plot units.
pub(crate) fn label_font_size(aes: &Aesthetics) -> f64 {
    aes.number_or_default(Aesthetic::LabelSize) / LABEL_SIZE_PER_UNIT
}

/// Width and height of the box a label occupies, in plot units.
pub(crate) fn label_extent(text: &str, aes: &Aesthetics) -> (f64, f64) {
    if text.is_empty() {
        return (0.0, 0.0);
    }
    let size = label_font_size(aes);
    let longest = text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0) as f64;
    let lines = text.split('\n').count() as f64;
    (longest * size * 0.6 + size * 0.4, lines * size * 1.2)
}

fn label_corners(at: LayoutPoint, text: &str, aes: &Aesthetics) -> [(f64, f64); 2] {
    let (w, h) = label_extent(text, aes);
    [
        (at.x - w / 2.0, at.y - h / 2.0),
        (at.x + w / 2.0, at.y + h / 2.0),
    ]
}

fn outward(side: Side) -> Vector {
    match side {
        Side::Top => vector(0.0, 1.0),
        Side::Bottom => vector(0.0, -1.0),
        Side::Left => vector(-1.0, 0.0),
        Side::Right => vector(1.0, 0.0),
    }
}

fn loop_path(anchor: Point, side: Side, diameter: f64) -> (EdgePath, Point) {
    let n = outward(side);
    let t = vector(-n.y, n.x);
    let start = anchor - t * (diameter / 4.0);
    let end = anchor + t * (diameter / 4.0);
    let path = EdgePath::Cubic {
        start: start.into(),
        control1: (start + n * diameter - t * (diameter / 4.0)).into(),
        control2: (end + n * diameter + t * (diameter / 4.0)).into(),
        end: end.into(),
    };
    (path, anchor + n * (0.75 * diameter))
}

fn curved_path(start: Point, end: Point, curvature: f64) -> (EdgePath, Point) {
    let chord = end - start;
    let len = chord.length();
    let mid = start.lerp(end, 0.5);
    if len <= f64::EPSILON || curvature == 0.0 {
        return (
            EdgePath::Line {
                start: start.into(),
                end: end.into(),
            },
            mid,
        );
    }
    let normal = vector(-chord.y, chord.x) / len;
    let bend = len / 2.0 * (curvature.to_radians() / 2.0).tan();
    let control = mid + normal * bend;
    let label = start.lerp(control, 0.5).lerp(control.lerp(end, 0.5), 0.5);
    (
        EdgePath::Quadratic {
            start: start.into(),
            control: control.into(),
            end: end.into(),
        },
        label,
    )
}

fn prepare_edge(
    edge: &Edge,
    from: &NodeBox,
    to: &NodeBox,
    options: &PrepareOptions,
) -> Result<PreparedEdge> {
    let (from_side, to_side) = if edge.is_self_loop() {
        let side = edge.connect_from.or(edge.connect_to).unwrap_or(Side::Top);
        (side, side)
    } else {
        resolve_sides(from, to, options.angle, edge.connect_from, edge.connect_to)?
    };

    if let Some(curvature) = edge.curvature.filter(|_| !edge.is_self_loop()) {
        if !(curvature.is_finite() && curvature.abs() < 180.0) {
            return Err(Error::InvalidCurvature {
                from: edge.from.clone(),
                to: edge.to.clone(),
                curvature,
            });
        }
    }

    let start = from.anchor(from_side);
    let end = to.anchor(to_side);
    let (path, label_at) = if edge.is_self_loop() {
        loop_path(start, from_side, options.variance_diameter)
    } else if let Some(curvature) = edge.curvature {
        curved_path(start, end, curvature)
    } else {
        (
            EdgePath::Line {
                start: start.into(),
                end: end.into(),
            },
            start.lerp(end, 0.5),
        )
    };

    Ok(PreparedEdge {
        from: edge.from.clone(),
        to: edge.to.clone(),
        from_side,
        to_side,
        arrow: edge.arrow,
        label: edge.label.clone(),
        path,
        label_position: label_at.into(),
        aes: edge.aes.clone(),
    })
}

/// Scales positions, sizes nodes and routes every shown edge.
///
/// Hidden nodes and edges touching them are left out. Every shown node needs a position, and
/// curved edges need a curvature strictly between -180 and 180 degrees. Bounds cover node boxes,
/// edge paths and label boxes.
pub fn prepare(graph: &SemGraph, options: &PrepareOptions) -> Result<PreparedGraph> {
    options.validate()?;

    let mut nodes = Vec::new();
    let mut boxes: FxHashMap<&str, NodeBox> = FxHashMap::default();
    for node in graph.nodes().iter().filter(|n| n.show) {
        let Some((x, y)) = node.position() else {
            return Err(Error::MissingPosition {
                name: node.name.clone(),
            });
        };
        let (width, height) = options.node_size(node.shape);
        let center = point(x * options.spacing_x, y * options.spacing_y);
        boxes.insert(node.name.as_str(), NodeBox::new(center, width, height));
        nodes.push(PreparedNode {
            name: node.name.clone(),
            label: node.label.clone(),
            shape: node.shape,
            center: center.into(),
            width,
            height,
            aes: node.aes.clone(),
        });
    }

    let mut edges = Vec::new();
    for edge in graph.edges().iter().filter(|e| e.show) {
        let (Some(from), Some(to)) = (boxes.get(edge.from.as_str()), boxes.get(edge.to.as_str()))
        else {
            continue;
        };
        edges.push(prepare_edge(edge, from, to, options)?);
    }

    let mut corners: Vec<(f64, f64)> = Vec::new();
    for n in &nodes {
        corners.push((n.center.x - n.width / 2.0, n.center.y - n.height / 2.0));
        corners.push((n.center.x + n.width / 2.0, n.center.y + n.height / 2.0));
        corners.extend(label_corners(n.center, &n.label, &n.aes));
    }
    for e in &edges {
        corners.extend(e.path.points().iter().map(|p: &LayoutPoint| (p.x, p.y)));
        corners.extend(label_corners(e.label_position, &e.label, &e.aes));
    }
    let bounds = Bounds::from_points(corners).unwrap_or(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    });

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        angle = ?options.angle,
        "prepared graph"
    );
    Ok(PreparedGraph {
        nodes,
        edges,
        bounds,
    })
}
