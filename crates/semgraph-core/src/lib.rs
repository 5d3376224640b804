#![forbid(unsafe_code)]

//! SEM graph tables (headless).
//!
//! A fitted model's parameter table becomes a node table and an edge table. Both are plain
//! values: labels, aesthetics and visibility are changed by pure table transforms, and the
//! [`SemGraph`] container re-checks that every edge still points at a known node.
//!
//! Estimation, layout and rendering live elsewhere; see `semgraph-layout` and
//! `semgraph-render`.

pub mod error;
pub mod expr;
pub mod extract;
pub mod graph;
pub mod model;
pub mod params;
pub mod style;

pub use error::{Error, Result};
pub use expr::{LabelExpr, Predicate};
pub use extract::{ExtractOptions, extract, get_edges, get_nodes};
pub use graph::SemGraph;
pub use model::{
    AesValue, Aesthetic, Aesthetics, Arrow, Cell, Edge, EdgeTable, Node, NodeShape, NodeTable, Row,
    Side, Table,
};
pub use params::{FittedModel, Operator, ParameterRow, ParameterTable};
pub use style::{Condition, RowPredicate, Selector};

#[cfg(test)]
mod tests;
