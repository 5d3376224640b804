use semgraph_core::{Aesthetic, Arrow, Edge, Node, NodeShape, SemGraph, Table};
use semgraph_render::{PrepareOptions, SvgRenderOptions, prepare, render_svg};

fn sample() -> SemGraph {
    let mut f = Node::new("f").with_shape(NodeShape::Oval).at(1.0, 2.0);
    f.label = "Factor <1> & co".to_string();
    let nodes = Table::new(vec![f, Node::new("x").at(1.0, 1.0), Node::new("y").at(2.0, 1.0)]);
    let mut fy = Edge::new("f", "y");
    fy.label = "0.80".to_string();
    fy.aes.set(Aesthetic::Colour, "red");
    fy.aes.set(Aesthetic::Linetype, "dashed");
    let edges = Table::new(vec![
        Edge::new("f", "x"),
        fy,
        Edge::new("x", "y").with_arrow(Arrow::Both).with_curvature(60.0),
        Edge::new("x", "x").with_arrow(Arrow::None),
    ]);
    SemGraph::new(nodes, edges).unwrap()
}

fn render() -> String {
    let prepared = prepare(&sample(), &PrepareOptions::default()).unwrap();
    render_svg(&prepared, &SvgRenderOptions::default())
}

#[test]
fn draws_one_shape_per_node() {
    let svg = render();
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("<ellipse ").count(), 1);
    assert_eq!(svg.matches("<g class=\"node\"").count(), 3);
}

#[test]
fn labels_are_escaped() {
    let svg = render();
    assert!(svg.contains("Factor &lt;1&gt; &amp; co"));
    assert!(!svg.contains("<1>"));
}

#[test]
fn markers_are_shared_per_colour() {
    let svg = render();
    assert_eq!(svg.matches("<marker ").count(), 2);
    assert!(svg.contains(r#"marker-start="url(#arrow-0)""#));
    assert!(svg.contains(r#"marker-end="url(#arrow-1)""#));
    assert!(svg.contains(r#"stroke="red""#));
    assert!(svg.contains("stroke-dasharray=\"4,4\""));
    // The self-loop has no arrow at all.
    assert_eq!(svg.matches("marker-end=").count(), 3);
}

#[test]
fn y_axis_points_down_in_svg() {
    let prepared = prepare(&sample(), &PrepareOptions::default()).unwrap();
    let svg = render_svg(&prepared, &SvgRenderOptions::default());
    // f sits above x in plot space, so its ellipse must come out with the smaller cy.
    let f_cy: f64 = attr_after(&svg, "<ellipse ", "cy");
    let x_rect_y: f64 = attr_after(&svg, "<g class=\"node\" id=\"x\"><rect ", "y");
    assert!(f_cy < x_rect_y);
}

#[test]
fn background_is_optional() {
    let prepared = prepare(&sample(), &PrepareOptions::default()).unwrap();
    assert!(!render().contains("height=\"100%\""));
    let opts = SvgRenderOptions {
        background: Some("white".to_string()),
        ..SvgRenderOptions::default()
    };
    assert!(render_svg(&prepared, &opts).contains(r#"<rect width="100%" height="100%" fill="white"/>"#));
}

fn attr_after(svg: &str, anchor: &str, name: &str) -> f64 {
    let rest = &svg[svg.find(anchor).unwrap() + anchor.len()..];
    let key = format!(" {name}=\"");
    let rest = if rest.starts_with(&key[1..]) {
        &rest[key.len() - 1..]
    } else {
        &rest[rest.find(&key).unwrap() + key.len()..]
    };
    rest[..rest.find('"').unwrap()].parse().unwrap()
}
