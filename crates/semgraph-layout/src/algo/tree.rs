//! Layered top-down placement.
//!
//! 1. Back edges found by a depth-first walk in node order are ignored, leaving a DAG.
//! 2. Each node's layer is the longest directed path reaching it.
//! 3. Layer 0 keeps node order; deeper layers are sorted once by predecessor barycenter.
//! 4. Layers are centered on the widest one.

use crate::algo::TreeOptions;
use crate::error::Result;
use crate::graph::{Graph, LayoutResult, Point};
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Directed adjacency without self-loops or back edges, as index lists.
fn acyclic_successors(graph: &Graph, index: &FxHashMap<&str, usize>) -> Vec<Vec<usize>> {
    let n = graph.nodes.len();
    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    for e in graph.edges.iter().filter(|e| e.directed) {
        let (s, t) = (index[e.source.as_str()], index[e.target.as_str()]);
        if s != t && !succ[s].contains(&t) {
            succ[s].push(t);
        }
    }

    let mut state = vec![Visit::New; n];
    let mut kept: Vec<Vec<usize>> = vec![Vec::new(); n];
    for root in 0..n {
        if state[root] != Visit::New {
            continue;
        }
        // Iterative DFS: (node, next successor slot).
        let mut stack = vec![(root, 0usize)];
        state[root] = Visit::Active;
        while let Some(top) = stack.last_mut() {
            let v = top.0;
            let Some(&w) = succ[v].get(top.1) else {
                state[v] = Visit::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;
            match state[w] {
                Visit::Active => {
                    tracing::trace!(from = v, to = w, "ignoring back edge");
                }
                Visit::Done => kept[v].push(w),
                Visit::New => {
                    kept[v].push(w);
                    state[w] = Visit::Active;
                    stack.push((w, 0));
                }
            }
        }
    }
    kept
}

fn longest_path_ranks(succ: &[Vec<usize>]) -> Vec<usize> {
    let n = succ.len();
    let mut indegree = vec![0usize; n];
    for targets in succ {
        for &t in targets {
            indegree[t] += 1;
        }
    }
    let mut rank = vec![0usize; n];
    let mut ready: std::collections::VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
    while let Some(v) = ready.pop_front() {
        for &t in &succ[v] {
            rank[t] = rank[t].max(rank[v] + 1);
            indegree[t] -= 1;
            if indegree[t] == 0 {
                ready.push_back(t);
            }
        }
    }
    rank
}

pub fn layout(graph: &Graph, opts: &TreeOptions) -> Result<LayoutResult> {
    graph.validate()?;

    let index: FxHashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let succ = acyclic_successors(graph, &index);
    let rank = longest_path_ranks(&succ);

    let mut pred: Vec<Vec<usize>> = vec![Vec::new(); succ.len()];
    for (s, targets) in succ.iter().enumerate() {
        for &t in targets {
            pred[t].push(s);
        }
    }

    let depth = rank.iter().copied().max().map_or(0, |m| m + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
    for (v, &r) in rank.iter().enumerate() {
        layers[r].push(v);
    }

    // Slot of each placed node within its layer.
    let mut slot = vec![0.0f64; succ.len()];
    for layer in layers.iter_mut() {
        if opts.barycenter {
            let key = |v: usize| -> Option<f64> {
                let ps = &pred[v];
                (!ps.is_empty()).then(|| ps.iter().map(|&p| slot[p]).sum::<f64>() / ps.len() as f64)
            };
            let mut keyed: Vec<(usize, f64)> = layer
                .iter()
                .map(|&v| (v, key(v).unwrap_or(f64::INFINITY)))
                .collect();
            keyed.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            *layer = keyed.into_iter().map(|(v, _)| v).collect();
        }
        for (i, &v) in layer.iter().enumerate() {
            slot[v] = i as f64;
        }
    }

    let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = LayoutResult::default();
    for (r, layer) in layers.iter().enumerate() {
        let offset = (widest - layer.len()) as f64 / 2.0;
        for (i, &v) in layer.iter().enumerate() {
            out.positions.insert(
                graph.nodes[v].id.clone(),
                Point {
                    x: offset + i as f64 + 1.0,
                    y: (depth - r) as f64,
                },
            );
        }
    }
    tracing::debug!(layers = depth, widest, "tree layout");
    Ok(out)
}
