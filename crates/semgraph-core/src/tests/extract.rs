use super::sample_table;
use crate::*;
use serde_json::json;

#[test]
fn nodes_are_unique_in_first_appearance_order_with_latent_ovals() {
    let nodes = get_nodes(&sample_table(), &ExtractOptions::default()).unwrap();
    let names: Vec<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["ind60", "x1", "x2", "dem60", "y1", "y2"]);

    let shapes: Vec<NodeShape> = nodes.iter().map(|n| n.shape).collect();
    assert_eq!(
        shapes,
        [
            NodeShape::Oval,
            NodeShape::Rect,
            NodeShape::Rect,
            NodeShape::Oval,
            NodeShape::Rect,
            NodeShape::Rect
        ]
    );
    assert!(nodes.iter().all(|n| n.label == n.name && n.show));
    assert!(nodes.iter().all(|n| n.source.is_none()));
}

#[test]
fn edges_follow_operator_direction_and_arrow_conventions() {
    let edges = get_edges(&sample_table(), &ExtractOptions::default()).unwrap();
    let summary: Vec<(&str, &str, Arrow, Option<f64>)> = edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.arrow, e.curvature))
        .collect();
    assert_eq!(
        summary,
        [
            ("ind60", "x1", Arrow::Last, None),
            ("ind60", "x2", Arrow::Last, None),
            ("dem60", "y1", Arrow::Last, None),
            ("dem60", "y2", Arrow::Last, None),
            ("ind60", "dem60", Arrow::Last, None),
            ("y1", "y2", Arrow::Both, Some(60.0)),
        ]
    );
}

#[test]
fn edge_labels_default_to_est_sig() {
    let edges = get_edges(&sample_table(), &ExtractOptions::default()).unwrap();
    let labels: Vec<&str> = edges.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["1.00", "2.18***", "1.00", "1.35***", "1.47***", "-0.12"]);
}

#[test]
fn label_expressions_override_defaults() {
    let options = ExtractOptions {
        edge_label: LabelExpr::parse(r#"est_sig + " " + confint"#).unwrap(),
        node_label: LabelExpr::parse(r#"name + ":" + round(est, 1)"#).unwrap(),
        include_means: true,
        ..ExtractOptions::default()
    };
    let graph = extract(&sample_table(), &options).unwrap();
    let path = graph.edges().between("ind60", "dem60").unwrap();
    assert_eq!(path.label, "1.47*** [0.71, 2.23]");
    assert_eq!(graph.nodes().get("x1").unwrap().label, "x1:5.1");
    assert_eq!(graph.nodes().get("x2").unwrap().label, "x2:");
}

#[test]
fn variances_become_self_loops_on_request() {
    let options = ExtractOptions {
        include_variances: true,
        ..ExtractOptions::default()
    };
    let edges = get_edges(&sample_table(), &options).unwrap();
    let loops: Vec<&Edge> = edges.iter().filter(|e| e.is_self_loop()).collect();
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].from, "y1");
    assert_eq!(loops[0].arrow, Arrow::Both);
    assert_eq!(loops[0].curvature, None);
}

#[test]
fn extracted_graph_satisfies_reference_invariant() {
    let graph = extract(&sample_table(), &ExtractOptions::default()).unwrap();
    for e in graph.edges() {
        assert!(graph.nodes().get(&e.from).is_some());
        assert!(graph.nodes().get(&e.to).is_some());
    }
}

#[test]
fn rows_without_required_fields_are_rejected() {
    let table = ParameterTable::new(vec![ParameterRow::new("f", Operator::Loading, " ")]);
    let err = get_edges(&table, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { row: 0, .. }));
}

#[test]
fn parameter_table_reads_json() {
    let text = json!([
        { "lhs": "f", "op": "=~", "rhs": "a", "est": 0.8, "pval": 0.0 },
        { "lhs": "b", "op": "~", "rhs": "f", "est": -0.25, "se": 0.1, "pval": 0.012 },
        { "lhs": "a", "op": "~~", "rhs": "b" }
    ])
    .to_string();
    let table = ParameterTable::from_json_str(&text).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows()[1].op, Operator::Regression);
    assert_eq!(table.rows()[1].est_sig().as_deref(), Some("-0.25*"));
    assert_eq!(table.rows()[2].est_sig(), None);

    let bad = json!([{ "lhs": "f", "op": " ", "rhs": "a" }]).to_string();
    assert!(matches!(
        ParameterTable::from_json_str(&bad),
        Err(Error::Json(_))
    ));
}

#[test]
fn composites_are_drawn_and_unknown_operators_are_skipped() {
    let text = json!([
        { "lhs": "f", "op": "=~", "rhs": "u1", "est": 1.0 },
        { "lhs": "u1", "op": "~*~", "rhs": "u1", "est": 1.0 },
        { "lhs": "c", "op": "<~", "rhs": "x1", "est": 0.4, "pval": 0.02 },
        { "lhs": "f", "op": "@@", "rhs": "x9" }
    ])
    .to_string();
    let table = ParameterTable::from_json_str(&text).unwrap();
    assert_eq!(table.rows()[1].op, Operator::Scaling);
    assert_eq!(table.rows()[2].op, Operator::Composite);
    assert_eq!(table.rows()[3].op, Operator::Other("@@".to_string()));
    assert_eq!(table.rows()[3].column("op"), Cell::Text("@@".to_string()));

    let graph = extract(&table, &ExtractOptions::default()).unwrap();
    let names: Vec<&str> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["f", "u1", "c", "x1"]);
    assert_eq!(graph.nodes().get("c").unwrap().shape, NodeShape::Rect);

    let summary: Vec<(&str, &str, Arrow)> = graph
        .edges()
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.arrow))
        .collect();
    assert_eq!(summary, [("f", "u1", Arrow::Last), ("x1", "c", Arrow::Last)]);
    assert_eq!(graph.edges().between("x1", "c").unwrap().label, "0.40*");

    let round_trip = serde_json::to_value(&table).unwrap();
    assert_eq!(round_trip[1]["op"], "~*~");
    assert_eq!(round_trip[3]["op"], "@@");
}

#[test]
fn est_sig_never_prints_negative_zero() {
    let row = ParameterRow::new("a", Operator::Covariance, "b").with_est(-0.001, None, Some(0.9));
    assert_eq!(row.est_sig().as_deref(), Some("0.00"));
}
