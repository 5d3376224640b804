pub mod circle;
pub mod grid;
pub mod tree;

use crate::error::Error;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    /// Layered top-down placement following directed edges (the default for SEM graphs).
    Tree(TreeOptions),
    /// Evenly spaced on a circle, in node order.
    Circle,
    /// Row-major on a near-square grid, in node order.
    Grid,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Tree(TreeOptions::default())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" | "layered" => Ok(Algorithm::Tree(TreeOptions::default())),
            "circle" => Ok(Algorithm::Circle),
            "grid" => Ok(Algorithm::Grid),
            _ => Err(Error::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeOptions {
    /// Order nodes inside a layer by the mean position of their predecessors.
    pub barycenter: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self { barycenter: true }
    }
}
