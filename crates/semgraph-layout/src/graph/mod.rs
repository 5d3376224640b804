use crate::error::{Error, Result};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn validate(&self) -> Result<()> {
        let mut node_exists: FxHashSet<&str> = FxHashSet::default();
        for n in &self.nodes {
            if !node_exists.insert(n.id.as_str()) {
                return Err(Error::DuplicateNode { name: n.id.clone() });
            }
        }
        for e in &self.edges {
            if !node_exists.contains(e.source.as_str()) || !node_exists.contains(e.target.as_str())
            {
                return Err(Error::MissingEndpoint {
                    source_id: e.source.clone(),
                    target_id: e.target.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Only directed edges constrain layering; covariances do not.
    pub directed: bool,
}

impl Edge {
    pub fn directed(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            directed: true,
        }
    }

    pub fn undirected(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            directed: false,
            ..Self::directed(source, target)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Node centers in unit grid space: neighbours are one unit apart and y grows upwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub positions: BTreeMap<String, Point>,
}

impl LayoutResult {
    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Shifts every position so the smallest x and y become 1.
    pub(crate) fn normalized(mut self) -> Self {
        let min_x = self.positions.values().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = self.positions.values().map(|p| p.y).fold(f64::INFINITY, f64::min);
        if !(min_x.is_finite() && min_y.is_finite()) {
            return self;
        }
        for p in self.positions.values_mut() {
            p.x = p.x - min_x + 1.0;
            p.y = p.y - min_y + 1.0;
        }
        self
    }
}
