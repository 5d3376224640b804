//! User-specified grid placement.
//!
//! A grid is a row-major list of cells, each holding a node name or nothing. Cell `(r, c)` maps to
//! `x = c + 1`, `y = rows - r`, so the first row is drawn on top.

use crate::error::{Error, Result};
use crate::graph::{LayoutResult, Point};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    cells: Vec<Option<String>>,
    rows: usize,
}

fn blank(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell == "." || cell.eq_ignore_ascii_case("na")
}

impl GridLayout {
    pub fn new(cells: Vec<Option<String>>, rows: usize) -> Result<Self> {
        if rows == 0 || cells.len() % rows != 0 {
            return Err(Error::GridShape {
                cells: cells.len(),
                rows,
            });
        }
        Ok(Self { cells, rows })
    }

    /// Builds a grid from names, treating `""`, `"."` and `"NA"` as blanks.
    pub fn from_names<S: AsRef<str>>(names: &[S], rows: usize) -> Result<Self> {
        let cells = names
            .iter()
            .map(|s| {
                let s = s.as_ref();
                (!blank(s)).then(|| s.trim().to_string())
            })
            .collect();
        Self::new(cells, rows)
    }

    /// Parses one row per line. Cells are comma separated when the line contains a comma and
    /// whitespace separated otherwise. Empty lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut cells = Vec::new();
        let mut rows = 0usize;
        let mut width = None;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let row: Vec<&str> = if line.contains(',') {
                line.split(',').collect()
            } else {
                line.split_whitespace().collect()
            };
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(Error::RaggedGrid {
                    row: rows,
                    found: row.len(),
                    expected,
                });
            }
            cells.extend(row.into_iter().map(|s| (!blank(s)).then(|| s.trim().to_string())));
            rows += 1;
        }
        Self::new(cells, rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.cells.len() / self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column >= self.columns() {
            return None;
        }
        self.cells.get(row * self.columns() + column)?.as_deref()
    }

    /// Places `nodes` on the grid.
    ///
    /// Every name in the grid must be one of `nodes`, no name may repeat, and every node must be
    /// placed.
    pub fn resolve(&self, nodes: &[&str]) -> Result<LayoutResult> {
        let known: FxHashSet<&str> = nodes.iter().copied().collect();
        let columns = self.columns();
        let mut out = LayoutResult::default();
        for (index, cell) in self.cells.iter().enumerate() {
            let Some(name) = cell else {
                continue;
            };
            if !known.contains(name.as_str()) {
                return Err(Error::UnknownNode { name: name.clone() });
            }
            let (row, column) = (index / columns, index % columns);
            let point = Point {
                x: (column + 1) as f64,
                y: (self.rows - row) as f64,
            };
            if out.positions.insert(name.clone(), point).is_some() {
                return Err(Error::DuplicateNode { name: name.clone() });
            }
        }
        if let Some(missing) = nodes.iter().find(|n| !out.positions.contains_key(**n)) {
            return Err(Error::UnplacedNode {
                name: missing.to_string(),
            });
        }
        tracing::debug!(
            rows = self.rows,
            columns,
            placed = out.len(),
            "resolved grid layout"
        );
        Ok(out)
    }
}
