use crate::error::{Error, Result};
use crate::model::{EdgeTable, NodeTable};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Node and edge tables kept consistent with each other.
///
/// Node names are unique and every edge endpoint names a node. Every constructor and edit
/// re-checks both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemGraph {
    nodes: NodeTable,
    edges: EdgeTable,
}

#[derive(Deserialize)]
struct RawGraph {
    nodes: NodeTable,
    #[serde(default)]
    edges: EdgeTable,
}

impl<'de> Deserialize<'de> for SemGraph {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawGraph::deserialize(deserializer)?;
        SemGraph::new(raw.nodes, raw.edges).map_err(serde::de::Error::custom)
    }
}

impl SemGraph {
    pub fn new(nodes: NodeTable, edges: EdgeTable) -> Result<Self> {
        Self::validate(&nodes, &edges)?;
        Ok(Self { nodes, edges })
    }

    pub fn validate(nodes: &NodeTable, edges: &EdgeTable) -> Result<()> {
        let mut names: FxHashSet<&str> = FxHashSet::default();
        for n in nodes {
            if !names.insert(n.name.as_str()) {
                return Err(Error::DuplicateNode {
                    name: n.name.clone(),
                });
            }
        }
        for e in edges {
            for end in [&e.from, &e.to] {
                if !names.contains(end.as_str()) {
                    return Err(Error::UnknownNode {
                        name: end.clone(),
                        from: e.from.clone(),
                        to: e.to.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    pub fn into_parts(self) -> (NodeTable, EdgeTable) {
        (self.nodes, self.edges)
    }

    pub fn edit_nodes(self, f: impl FnOnce(NodeTable) -> NodeTable) -> Result<Self> {
        let nodes = f(self.nodes);
        Self::new(nodes, self.edges)
    }

    pub fn edit_edges(self, f: impl FnOnce(EdgeTable) -> EdgeTable) -> Result<Self> {
        let edges = f(self.edges);
        Self::new(self.nodes, edges)
    }

    /// Hides the named nodes and every edge touching them.
    pub fn hide_var(self, names: &[&str]) -> Result<Self> {
        self.set_shown(names, false)
    }

    /// Reverses [`SemGraph::hide_var`].
    pub fn show_var(self, names: &[&str]) -> Result<Self> {
        self.set_shown(names, true)
    }

    fn set_shown(self, names: &[&str], show: bool) -> Result<Self> {
        for name in names {
            if self.nodes.get(name).is_none() {
                return Err(Error::NoSuchNode {
                    name: name.to_string(),
                });
            }
        }
        let hit = |n: &str| names.contains(&n);
        let nodes = self.nodes.map(|mut n| {
            if hit(&n.name) {
                n.show = show;
            }
            n
        });
        let edges = self.edges.map(|mut e| {
            if hit(&e.from) || hit(&e.to) {
                e.show = show;
            }
            e
        });
        Ok(Self { nodes, edges })
    }

    /// Assigns coordinates by node name. Nodes not mentioned keep their position.
    pub fn with_positions<'a, I>(self, positions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64, f64)>,
    {
        let mut nodes = self.nodes.into_rows();
        for (name, x, y) in positions {
            let Some(node) = nodes.iter_mut().find(|n| n.name == name) else {
                return Err(Error::NoSuchNode {
                    name: name.to_string(),
                });
            };
            node.x = Some(x);
            node.y = Some(y);
        }
        Ok(Self {
            nodes: NodeTable::new(nodes),
            edges: self.edges,
        })
    }
}
