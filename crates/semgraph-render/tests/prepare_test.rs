use semgraph_core::{Arrow, Edge, Node, NodeShape, SemGraph, Side, Table};
use semgraph_render::{EdgePath, Error, PrepareOptions, prepare};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// One factor over two indicators, a residual covariance and a variance loop.
fn positioned() -> SemGraph {
    let nodes = Table::new(vec![
        Node::new("f").with_shape(NodeShape::Oval).at(1.0, 2.0),
        Node::new("x").at(1.0, 1.0),
        Node::new("y").at(2.0, 1.0),
    ]);
    let edges = Table::new(vec![
        Edge::new("f", "x"),
        Edge::new("f", "y"),
        Edge::new("x", "y")
            .with_arrow(Arrow::Both)
            .with_curvature(60.0),
        Edge::new("x", "x").with_arrow(Arrow::Both),
    ]);
    SemGraph::new(nodes, edges).unwrap()
}

#[test]
fn nodes_are_scaled_and_sized_by_shape() {
    let out = prepare(&positioned(), &PrepareOptions::default()).unwrap();
    let f = out.node("f").unwrap();
    assert_eq!((f.center.x, f.center.y), (2.0, 4.0));
    assert_eq!((f.width, f.height), (1.0, 1.0));
    let y = out.node("y").unwrap();
    assert_eq!((y.center.x, y.center.y), (4.0, 2.0));
    assert_eq!((y.width, y.height), (1.2, 0.8));
}

#[test]
fn straight_edges_run_between_chosen_anchors() {
    let out = prepare(&positioned(), &PrepareOptions::default()).unwrap();
    let e = out.edge("f", "x").unwrap();
    assert_eq!((e.from_side, e.to_side), (Side::Bottom, Side::Top));
    let EdgePath::Line { start, end } = e.path else {
        panic!("expected a line, got {:?}", e.path);
    };
    assert!(approx(start.y, 3.5));
    assert!(approx(end.y, 2.4));
    assert!(approx(e.label_position.y, 2.95));
}

#[test]
fn curved_edges_bend_left_of_the_chord() {
    let out = prepare(&positioned(), &PrepareOptions::default()).unwrap();
    let e = out.edge("x", "y").unwrap();
    assert_eq!((e.from_side, e.to_side), (Side::Right, Side::Left));
    let EdgePath::Quadratic { control, .. } = e.path else {
        panic!("expected a curve, got {:?}", e.path);
    };
    let bend = 0.4 * 30f64.to_radians().tan();
    assert!(approx(control.x, 3.0));
    assert!(approx(control.y, 2.0 + bend));
    assert!(approx(e.label_position.y, 2.0 + bend / 2.0));
}

#[test]
fn variance_loops_sit_outside_the_top_side() {
    let out = prepare(&positioned(), &PrepareOptions::default()).unwrap();
    let e = out.edge("x", "x").unwrap();
    assert_eq!((e.from_side, e.to_side), (Side::Top, Side::Top));
    let EdgePath::Cubic {
        start,
        control1,
        end,
        ..
    } = e.path
    else {
        panic!("expected a loop, got {:?}", e.path);
    };
    assert!(approx(start.y, 2.4) && approx(end.y, 2.4));
    assert!(control1.y > start.y);
    assert!(approx(e.label_position.y, 3.0));
}

#[test]
fn loop_side_follows_connect_override() {
    let g = positioned()
        .edit_edges(|edges| {
            edges.map(|e| {
                if e.is_self_loop() {
                    e.connect(Some(Side::Left), None)
                } else {
                    e
                }
            })
        })
        .unwrap();
    let out = prepare(&g, &PrepareOptions::default()).unwrap();
    let e = out.edge("x", "x").unwrap();
    assert_eq!(e.from_side, Side::Left);
    assert!(e.label_position.x < 1.4);
}

#[test]
fn bounds_cover_boxes_and_paths() {
    let out = prepare(&positioned(), &PrepareOptions::default()).unwrap();
    let b = out.bounds;
    assert!(approx(b.min_x, 1.4));
    assert!(approx(b.min_y, 1.6));
    assert!(approx(b.max_x, 4.6));
    assert!(approx(b.max_y, 4.5));
}

#[test]
fn hidden_nodes_drop_their_edges() {
    let g = positioned().hide_var(&["y"]).unwrap();
    let out = prepare(&g, &PrepareOptions::default()).unwrap();
    assert!(out.node("y").is_none());
    assert!(out.edge("f", "y").is_none());
    assert!(out.edge("x", "y").is_none());
    assert_eq!(out.edges.len(), 2);
}

#[test]
fn angle_option_switches_to_the_angular_rule() {
    let opts = PrepareOptions {
        angle: Some(180.0),
        ..PrepareOptions::default()
    };
    let out = prepare(&positioned(), &opts).unwrap();
    let e = out.edge("f", "y").unwrap();
    assert_eq!((e.from_side, e.to_side), (Side::Bottom, Side::Top));
}

#[test]
fn unplaced_nodes_and_bad_options_are_errors() {
    let nodes = Table::new(vec![Node::new("a").at(1.0, 1.0), Node::new("b")]);
    let g = SemGraph::new(nodes, Table::new(vec![])).unwrap();
    let err = prepare(&g, &PrepareOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MissingPosition { ref name } if name == "b"));

    let opts = PrepareOptions {
        spacing_x: 0.0,
        ..PrepareOptions::default()
    };
    let err = prepare(&positioned(), &opts).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { name: "spacing_x", .. }));

    let opts = PrepareOptions {
        angle: Some(270.0),
        ..PrepareOptions::default()
    };
    assert!(matches!(
        prepare(&positioned(), &opts).unwrap_err(),
        Error::InvalidAngle { .. }
    ));
}

#[test]
fn prepared_graph_serializes_with_tagged_paths() {
    let out = prepare(&positioned(), &PrepareOptions::default()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out.to_json_string(false).unwrap()).unwrap();
    assert_eq!(v["edges"][2]["path"]["kind"], "quadratic");
    assert_eq!(v["edges"][3]["path"]["kind"], "cubic");
    assert_eq!(v["nodes"][0]["shape"], "oval");
}

#[test]
fn curvature_must_stay_below_a_half_turn() {
    for bad in [180.0, -180.0, 270.0, f64::NAN] {
        let g = positioned()
            .edit_edges(|edges| {
                edges.map(|e| if e.from == "x" && e.to == "y" { e.with_curvature(bad) } else { e })
            })
            .unwrap();
        let err = prepare(&g, &PrepareOptions::default()).unwrap_err();
        assert!(
            matches!(err, Error::InvalidCurvature { ref from, ref to, .. } if from == "x" && to == "y"),
            "curvature {bad}: {err:?}"
        );
    }

    let g = positioned()
        .edit_edges(|edges| {
            edges.map(|e| if e.is_self_loop() { e.with_curvature(180.0) } else { e })
        })
        .unwrap();
    let out = prepare(&g, &PrepareOptions::default()).unwrap();
    assert!(out.bounds.max_y < 5.0);

    let g = positioned()
        .edit_edges(|edges| {
            edges.map(|e| if e.from == "x" && e.to == "y" { e.with_curvature(-179.0) } else { e })
        })
        .unwrap();
    let out = prepare(&g, &PrepareOptions::default()).unwrap();
    let EdgePath::Quadratic { control, .. } = out.edge("x", "y").unwrap().path else {
        panic!("expected a curve");
    };
    assert!(control.y < 2.0);
}

#[test]
fn bounds_include_label_boxes() {
    let label = "a very long covariance label\nsecond line";
    let g = positioned()
        .edit_edges(|edges| {
            edges.map(|mut e| {
                if e.from == "f" && e.to == "x" {
                    e.label = label.to_string();
                }
                e
            })
        })
        .unwrap();
    let out = prepare(&g, &PrepareOptions::default()).unwrap();
    let size = 4.0 / 15.0;
    let width = 28.0 * size * 0.6 + size * 0.4;
    assert!(approx(out.bounds.min_x, 2.0 - width / 2.0));
    assert!(approx(out.bounds.max_x, 4.6));
    assert!(approx(out.bounds.max_y, 4.5));
}
