//! SVG output for a [`PreparedGraph`].
//!
//! Plot space is y-up; SVG is y-down, so every y is flipped against `bounds.max_y`.

use crate::model::{EdgePath, LayoutPoint, PreparedGraph, PreparedNode};
use crate::prepare::{label_extent, label_font_size};
use indexmap::IndexSet;
use semgraph_core::{Aesthetic, Aesthetics, Arrow, NodeShape};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgRenderOptions {
    /// Pixels per plot unit.
    pub scale: f64,
    pub margin: f64,
    pub font_family: String,
    pub background: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            scale: 60.0,
            margin: 20.0,
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            background: None,
        }
    }
}

fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = (v * 1000.0).round() / 1000.0;
    if v == -0.0 {
        v = 0.0;
    }
    format!("{v}")
}

fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

/// R-style line type names to an SVG dash pattern, in units of stroke width.
fn dasharray(linetype: &str, width: f64) -> Option<String> {
    let pattern: &[f64] = match linetype {
        "dashed" | "2" => &[4.0, 4.0],
        "dotted" | "3" => &[1.0, 3.0],
        "dotdash" | "4" => &[1.0, 3.0, 4.0, 3.0],
        "longdash" | "5" => &[7.0, 3.0],
        "twodash" | "6" => &[2.0, 2.0, 6.0, 2.0],
        _ => return None,
    };
    Some(
        pattern
            .iter()
            .map(|p| fmt(p * width))
            .collect::<Vec<_>>()
            .join(","),
    )
}

struct Canvas<'a> {
    opts: &'a SvgRenderOptions,
    min_x: f64,
    max_y: f64,
}

impl Canvas<'_> {
    fn x(&self, x: f64) -> f64 {
        (x - self.min_x) * self.opts.scale + self.opts.margin
    }

    fn y(&self, y: f64) -> f64 {
        (self.max_y - y) * self.opts.scale + self.opts.margin
    }

    fn pt(&self, p: LayoutPoint) -> String {
        format!("{} {}", fmt(self.x(p.x)), fmt(self.y(p.y)))
    }

    fn path_data(&self, path: &EdgePath) -> String {
        match path {
            EdgePath::Line { start, end } => format!("M{} L{}", self.pt(*start), self.pt(*end)),
            EdgePath::Quadratic {
                start,
                control,
                end,
            } => format!(
                "M{} Q{} {}",
                self.pt(*start),
                self.pt(*control),
                self.pt(*end)
            ),
            EdgePath::Cubic {
                start,
                control1,
                control2,
                end,
            } => format!(
                "M{} C{} {} {}",
                self.pt(*start),
                self.pt(*control1),
                self.pt(*control2),
                self.pt(*end)
            ),
        }
    }
}

fn stroke_attrs(out: &mut String, aes: &Aesthetics) {
    let colour = aes.text_or_default(Aesthetic::Colour);
    let size = aes.number_or_default(Aesthetic::Size);
    let alpha = aes.number_or_default(Aesthetic::Alpha);
    out.push_str(r#" stroke=""#);
    escape_xml_into(out, &colour);
    let _ = write!(out, r#"" stroke-width="{}""#, fmt(size));
    if alpha < 1.0 {
        let _ = write!(out, r#" stroke-opacity="{}""#, fmt(alpha));
    }
    if let Some(dash) = dasharray(&aes.text_or_default(Aesthetic::Linetype), size) {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
}

fn marker_id(index: usize) -> String {
    format!("arrow-{index}")
}

fn write_label(
    out: &mut String,
    canvas: &Canvas<'_>,
    at: LayoutPoint,
    text: &str,
    aes: &Aesthetics,
    boxed: bool,
) {
    if text.is_empty() {
        return;
    }
    let size = label_font_size(aes) * canvas.opts.scale;
    let alpha = aes.number_or_default(Aesthetic::LabelAlpha);
    let lines: Vec<&str> = text.split('\n').collect();
    let (cx, cy) = (canvas.x(at.x), canvas.y(at.y));

    if boxed {
        let (w, h) = label_extent(text, aes);
        let (w, h) = (w * canvas.opts.scale, h * canvas.opts.scale);
        let _ = write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill=""#,
            fmt(cx - w / 2.0),
            fmt(cy - h / 2.0),
            fmt(w),
            fmt(h)
        );
        escape_xml_into(out, &aes.text_or_default(Aesthetic::LabelFill));
        out.push_str(r#""/>"#);
    }

    let first_dy = -(lines.len() as f64 - 1.0) * 0.6;
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central" fill=""#,
        fmt(cx),
        fmt(cy),
        fmt(size)
    );
    escape_xml_into(out, &aes.text_or_default(Aesthetic::LabelColour));
    out.push('"');
    if alpha < 1.0 {
        let _ = write!(out, r#" fill-opacity="{}""#, fmt(alpha));
    }
    out.push('>');
    if lines.len() == 1 {
        escape_xml_into(out, text);
    } else {
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { first_dy } else { 1.2 };
            let _ = write!(out, r#"<tspan x="{}" dy="{}em">"#, fmt(cx), fmt(dy));
            escape_xml_into(out, line);
            out.push_str("</tspan>");
        }
    }
    out.push_str("</text>");
}

fn write_node(out: &mut String, canvas: &Canvas<'_>, node: &PreparedNode) {
    let (cx, cy) = (canvas.x(node.center.x), canvas.y(node.center.y));
    let (w, h) = (node.width * canvas.opts.scale, node.height * canvas.opts.scale);
    out.push_str(r#"<g class="node" id=""#);
    escape_xml_into(out, &node.name);
    out.push_str(r#"">"#);
    match node.shape {
        NodeShape::Rect => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt(cx - w / 2.0),
                fmt(cy - h / 2.0),
                fmt(w),
                fmt(h)
            );
        }
        NodeShape::Oval => {
            let _ = write!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                fmt(cx),
                fmt(cy),
                fmt(w / 2.0),
                fmt(h / 2.0)
            );
        }
    }
    out.push_str(r#" fill=""#);
    escape_xml_into(out, &node.aes.text_or_default(Aesthetic::Fill));
    out.push('"');
    stroke_attrs(out, &node.aes);
    out.push_str("/>");
    write_label(out, canvas, node.center, &node.label, &node.aes, false);
    out.push_str("</g>");
}

/// Renders `graph` as a standalone SVG document.
pub fn render_svg(graph: &PreparedGraph, opts: &SvgRenderOptions) -> String {
    let b = graph.bounds;
    let canvas = Canvas {
        opts,
        min_x: b.min_x,
        max_y: b.max_y,
    };
    let width = b.width() * opts.scale + 2.0 * opts.margin;
    let height = b.height() * opts.scale + 2.0 * opts.margin;

    let mut colours: IndexSet<String> = IndexSet::new();
    for e in graph.edges.iter().filter(|e| e.arrow != Arrow::None) {
        colours.insert(e.aes.text_or_default(Aesthetic::Colour));
    }

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family=""#,
        w = fmt(width),
        h = fmt(height)
    );
    escape_xml_into(&mut out, &opts.font_family);
    out.push_str(r#"">"#);

    if !colours.is_empty() {
        out.push_str("<defs>");
        for (i, colour) in colours.iter().enumerate() {
            let _ = write!(
                out,
                r#"<marker id="{}" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M0 0 L10 5 L0 10 z" fill=""#,
                marker_id(i)
            );
            escape_xml_into(&mut out, colour);
            out.push_str(r#""/></marker>"#);
        }
        out.push_str("</defs>");
    }

    if let Some(bg) = &opts.background {
        out.push_str(r#"<rect width="100%" height="100%" fill=""#);
        escape_xml_into(&mut out, bg);
        out.push_str(r#""/>"#);
    }

    out.push_str(r#"<g class="edges">"#);
    for e in &graph.edges {
        let _ = write!(
            out,
            r#"<path class="edge" d="{}" fill="none""#,
            canvas.path_data(&e.path)
        );
        stroke_attrs(&mut out, &e.aes);
        if e.arrow != Arrow::None {
            let colour = e.aes.text_or_default(Aesthetic::Colour);
            let id = marker_id(colours.get_index_of(&colour).unwrap_or(0));
            let _ = write!(out, r#" marker-end="url(#{id})""#);
            if e.arrow == Arrow::Both {
                let _ = write!(out, r#" marker-start="url(#{id})""#);
            }
        }
        out.push_str("/>");
    }
    for e in &graph.edges {
        write_label(&mut out, &canvas, e.label_position, &e.label, &e.aes, true);
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for n in &graph.nodes {
        write_node(&mut out, &canvas, n);
    }
    out.push_str("</g></svg>");

    tracing::debug!(
        bytes = out.len(),
        markers = colours.len(),
        "rendered svg"
    );
    out
}
