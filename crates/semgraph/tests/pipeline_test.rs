use semgraph::layout::{Algorithm, GridLayout, LayoutError};
use semgraph::{
    Aesthetic, ExtractOptions, GraphOptions, HeadlessError, LayoutSpec, ParameterTable, Selector,
    Side, extract, graph_sem, layout_graph, prepare_graph, prepare_sem_graph,
};

const TABLE: &str = include_str!("../../../fixtures/sem/political_democracy.json");
const GRID: &str = include_str!("../../../fixtures/sem/political_democracy.grid");

fn table() -> ParameterTable {
    ParameterTable::from_json_str(TABLE).unwrap()
}

fn grid() -> LayoutSpec {
    LayoutSpec::Grid(GridLayout::parse(GRID).unwrap())
}

#[test]
fn grid_layout_places_every_node() {
    let graph = extract(&table(), &ExtractOptions::default()).unwrap();
    let graph = layout_graph(graph, &grid()).unwrap();
    let pos = |name: &str| graph.nodes().get(name).unwrap().position().unwrap();
    assert_eq!(pos("ind60"), (2.0, 2.0));
    assert_eq!(pos("dem60"), (4.0, 2.0));
    assert_eq!(pos("x1"), (1.0, 1.0));
    assert_eq!(pos("y2"), (5.0, 1.0));
}

#[test]
fn tree_layout_follows_arrows_downwards() {
    let graph = extract(&table(), &ExtractOptions::default()).unwrap();
    let graph = layout_graph(graph, &LayoutSpec::default()).unwrap();
    let y = |name: &str| graph.nodes().get(name).unwrap().y.unwrap();
    assert!(y("ind60") > y("dem60"));
    assert!(y("dem60") > y("y1"));
    assert_eq!(y("x1"), y("dem60"));
    assert_eq!(y("y1"), y("y2"));
}

#[test]
fn prepare_graph_runs_extraction_layout_and_anchoring() {
    let prepared = prepare_graph(&table(), &grid(), &GraphOptions::default()).unwrap();
    assert_eq!(prepared.nodes.len(), 7);
    assert_eq!(prepared.edges.len(), 7);

    let structural = prepared.edge("ind60", "dem60").unwrap();
    assert_eq!(
        (structural.from_side, structural.to_side),
        (Side::Right, Side::Left)
    );
    assert_eq!(structural.label, "1.48***");

    let loading = prepared.edge("ind60", "x2").unwrap();
    assert_eq!((loading.from_side, loading.to_side), (Side::Bottom, Side::Top));
}

#[test]
fn options_reach_every_stage() {
    let options: GraphOptions = serde_json::from_value(serde_json::json!({
        "extract": { "include_variances": true, "edge_label": "est_std" },
        "prepare": { "angle": 180.0 },
        "svg": { "scale": 40.0 }
    }))
    .unwrap();
    assert_eq!(options.prepare.spacing_x, 2.0);

    let prepared = prepare_graph(&table(), &grid(), &options).unwrap();
    assert_eq!(prepared.edges.len(), 9);
    assert_eq!(prepared.edge("ind60", "x1").unwrap().label, "0.92");
    let structural = prepared.edge("ind60", "dem60").unwrap();
    assert_eq!(
        (structural.from_side, structural.to_side),
        (Side::Bottom, Side::Top)
    );
}

#[test]
fn styled_tables_survive_the_pipeline() {
    let graph = extract(&table(), &ExtractOptions::default()).unwrap();
    let graph = graph
        .edit_edges(|edges| {
            edges.with_aes_where(&Selector::NonSignificant, Aesthetic::Colour, "grey")
        })
        .unwrap();
    let prepared = prepare_sem_graph(graph, &grid(), &GraphOptions::default()).unwrap();
    let cov = prepared.edge("y1", "y2").unwrap();
    assert_eq!(cov.aes.text_or_default(Aesthetic::Colour), "grey");
    let reg = prepared.edge("ind60", "dem60").unwrap();
    assert_eq!(reg.aes.text_or_default(Aesthetic::Colour), "black");
}

#[test]
fn graph_sem_draws_every_shown_node_and_edge() {
    let svg = graph_sem(&table(), &grid(), &GraphOptions::default()).unwrap();
    assert_eq!(svg.matches("<g class=\"node\"").count(), 7);
    assert_eq!(svg.matches("<path class=\"edge\"").count(), 7);
    assert_eq!(svg.matches("<ellipse ").count(), 2);
}

#[test]
fn layout_spec_parses_names_and_grids() {
    assert_eq!(
        "circle".parse::<LayoutSpec>().unwrap(),
        LayoutSpec::Algorithm(Algorithm::Circle)
    );
    assert!(matches!(GRID.parse::<LayoutSpec>().unwrap(), LayoutSpec::Grid(_)));
    assert!("spiral".parse::<LayoutSpec>().is_err());
}

#[test]
fn grid_errors_surface_as_layout_errors() {
    let spec = LayoutSpec::Grid(GridLayout::parse("ind60 dem60 zeta\n").unwrap());
    let err = prepare_graph(&table(), &spec, &GraphOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        HeadlessError::Layout(LayoutError::UnknownNode { ref name }) if name == "zeta"
    ));
}
