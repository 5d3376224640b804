//! Node and edge tables derived from a parameter table.

use crate::error::{Error, Result};
use crate::expr::LabelExpr;
use crate::graph::SemGraph;
use crate::model::{Arrow, Edge, EdgeTable, Node, NodeShape, NodeTable, Row};
use crate::params::{FittedModel, Operator, ParameterRow, ParameterTable};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COVARIANCE_CURVATURE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub node_label: LabelExpr,
    pub edge_label: LabelExpr,
    /// Turn `x ~~ x` rows into self-loop edges.
    pub include_variances: bool,
    /// Attach `~1` rows to their nodes so node labels and predicates can read them.
    pub include_means: bool,
    pub covariance_curvature: f64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            node_label: LabelExpr::column("name"),
            edge_label: LabelExpr::column("est_sig"),
            include_variances: false,
            include_means: false,
            covariance_curvature: DEFAULT_COVARIANCE_CURVATURE,
        }
    }
}

fn check_row(index: usize, row: &ParameterRow) -> Result<()> {
    if row.lhs.trim().is_empty() {
        return Err(Error::InvalidParameter {
            row: index,
            message: "empty lhs".to_string(),
        });
    }
    let needs_rhs = matches!(
        row.op,
        Operator::Loading | Operator::Regression | Operator::Covariance | Operator::Composite
    );
    if needs_rhs && row.rhs.trim().is_empty() {
        return Err(Error::InvalidParameter {
            row: index,
            message: format!("`{}` row without rhs", row.op),
        });
    }
    Ok(())
}

pub fn get_nodes(table: &ParameterTable, options: &ExtractOptions) -> Result<NodeTable> {
    let mut names: IndexSet<&str> = IndexSet::new();
    let mut latent: FxHashSet<&str> = FxHashSet::default();
    for (index, row) in table.rows().iter().enumerate() {
        check_row(index, row)?;
        match &row.op {
            Operator::Loading => {
                latent.insert(row.lhs.as_str());
                names.insert(row.lhs.as_str());
                names.insert(row.rhs.as_str());
            }
            Operator::Regression | Operator::Covariance | Operator::Composite => {
                names.insert(row.lhs.as_str());
                names.insert(row.rhs.as_str());
            }
            Operator::Intercept => {
                names.insert(row.lhs.as_str());
            }
            Operator::Other(op) => {
                tracing::debug!(row = index, op = %op, "ignoring row with unknown operator");
            }
            Operator::Defined | Operator::Threshold | Operator::Constraint | Operator::Scaling => {}
        }
    }

    let nodes: NodeTable = names
        .into_iter()
        .map(|name| {
            let shape = if latent.contains(name) {
                NodeShape::Oval
            } else {
                NodeShape::Rect
            };
            let mut node = Node::new(name).with_shape(shape);
            if options.include_means {
                node.source = table.intercept(name).cloned();
            }
            node.label = options.node_label.eval(&node);
            node
        })
        .collect();
    tracing::debug!(
        nodes = nodes.len(),
        latent = latent.len(),
        "extracted node table"
    );
    Ok(nodes)
}

pub fn get_edges(table: &ParameterTable, options: &ExtractOptions) -> Result<EdgeTable> {
    let mut edges = Vec::new();
    for (index, row) in table.rows().iter().enumerate() {
        check_row(index, row)?;
        let edge = match row.op {
            Operator::Loading => Edge::new(&row.lhs, &row.rhs),
            Operator::Regression | Operator::Composite => Edge::new(&row.rhs, &row.lhs),
            Operator::Covariance if row.is_variance() => {
                if !options.include_variances {
                    continue;
                }
                Edge::new(&row.lhs, &row.rhs).with_arrow(Arrow::Both)
            }
            Operator::Covariance => Edge::new(&row.lhs, &row.rhs)
                .with_arrow(Arrow::Both)
                .with_curvature(options.covariance_curvature),
            Operator::Intercept
            | Operator::Defined
            | Operator::Threshold
            | Operator::Constraint
            | Operator::Scaling
            | Operator::Other(_) => continue,
        };
        let mut edge = Edge {
            source: Some(row.clone()),
            ..edge
        };
        let label = options.edge_label.eval(&edge);
        edge.set_label(label);
        edges.push(edge);
    }
    tracing::debug!(edges = edges.len(), "extracted edge table");
    Ok(EdgeTable::new(edges))
}

/// Extracts both tables from `model` and checks them against each other.
pub fn extract<M: FittedModel + ?Sized>(model: &M, options: &ExtractOptions) -> Result<SemGraph> {
    let table = model.parameter_table()?;
    let nodes = get_nodes(&table, options)?;
    let edges = get_edges(&table, options)?;
    SemGraph::new(nodes, edges)
}
