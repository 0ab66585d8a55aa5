//! Sparse K-nearest-neighbor graph over objectives and its structural metrics.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use arena_core::{EPSILON, GraphConfig, Objective, ObjectiveId, Vec2};

use crate::features::distinct_live;

/// Added to the mean distance in closeness centrality.
const CLOSENESS_EPSILON: f32 = 1e-3;

/// Undirected edge to another node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub to: usize,
    pub length: f32,
}

/// Symmetric K-nearest-neighbor graph with cached centrality and domination.
///
/// Nodes are indexed in objective order. Both structural metrics are min-max
/// normalized to `[0, 1]` across all nodes (0.5 everywhere when every node
/// scores the same).
#[derive(Clone, Debug)]
pub struct NeighborGraph {
    ids: Vec<ObjectiveId>,
    adjacency: Vec<Vec<Edge>>,
    centrality: Vec<f32>,
    domination: Vec<f32>,
}

impl NeighborGraph {
    /// Builds the graph, skipping objectives with non-finite positions and
    /// repeats of an id already seen.
    pub fn build(objectives: &[Objective], cfg: &GraphConfig) -> Self {
        let (ids, positions): (Vec<_>, Vec<_>) = distinct_live(objectives)
            .map(|o| (o.id, o.position))
            .unzip();

        let sets = nearest_neighbor_sets(&positions, cfg.neighbor_count);
        let adjacency: Vec<Vec<Edge>> = sets
            .iter()
            .enumerate()
            .map(|(from, set)| {
                set.iter()
                    .map(|&to| Edge {
                        to,
                        length: positions[from].distance(positions[to]),
                    })
                    .collect()
            })
            .collect();

        let centrality = normalize(&closeness(&adjacency));
        let domination = normalize(&domination(&sets, cfg));

        tracing::debug!(
            "NeighborGraph: built {} nodes, {} edges (k={})",
            ids.len(),
            adjacency.iter().map(Vec::len).sum::<usize>() / 2,
            cfg.neighbor_count
        );

        Self {
            ids,
            adjacency,
            centrality,
            domination,
        }
    }

    /// True when the graph was built from exactly this objective sequence.
    pub fn matches(&self, objectives: &[Objective]) -> bool {
        let mut live = distinct_live(objectives);
        self.ids.iter().all(|id| live.next().is_some_and(|o| o.id == *id)) && live.next().is_none()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn index_of(&self, id: ObjectiveId) -> Option<usize> {
        self.ids.iter().position(|&other| other == id)
    }

    pub fn id(&self, index: usize) -> ObjectiveId {
        self.ids[index]
    }

    pub fn neighbors(&self, index: usize) -> &[Edge] {
        &self.adjacency[index]
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].iter().any(|e| e.to == b)
    }

    /// Normalized closeness centrality of a node.
    pub fn centrality(&self, index: usize) -> f32 {
        self.centrality[index]
    }

    /// Normalized domination weight of a node.
    pub fn domination(&self, index: usize) -> f32 {
        self.domination[index]
    }
}

/// Each node linked to its `k` nearest nodes, then symmetrized.
///
/// Distance ties are broken by lower index so construction is deterministic.
fn nearest_neighbor_sets(positions: &[Vec2], k: usize) -> Vec<BTreeSet<usize>> {
    let n = positions.len();
    let mut sets = vec![BTreeSet::new(); n];
    for i in 0..n {
        let mut others: Vec<(f32, usize)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (positions[i].distance(positions[j]), j))
            .collect();
        others.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for &(_, j) in others.iter().take(k) {
            sets[i].insert(j);
            sets[j].insert(i);
        }
    }
    sets
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Frontier {
    cost: f32,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    // Reversed: BinaryHeap pops the cheapest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest path lengths; unreachable nodes stay at `+inf`.
pub(crate) fn dijkstra(adjacency: &[Vec<Edge>], source: usize) -> Vec<f32> {
    let mut dist = vec![f32::INFINITY; adjacency.len()];
    dist[source] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Frontier {
        cost: 0.0,
        node: source,
    });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if cost > dist[node] {
            continue;
        }
        for edge in &adjacency[node] {
            let next = cost + edge.length;
            if next < dist[edge.to] {
                dist[edge.to] = next;
                heap.push(Frontier {
                    cost: next,
                    node: edge.to,
                });
            }
        }
    }

    dist
}

/// `1 / (eps + mean reachable distance)` per node; isolated nodes score 0.
fn closeness(adjacency: &[Vec<Edge>]) -> Vec<f32> {
    (0..adjacency.len())
        .map(|source| {
            let dist = dijkstra(adjacency, source);
            let (sum, count) = dist
                .iter()
                .enumerate()
                .filter(|&(node, d)| node != source && d.is_finite())
                .fold((0.0_f32, 0_usize), |(sum, count), (_, d)| (sum + d, count + 1));
            if count == 0 {
                0.0
            } else {
                1.0 / (CLOSENESS_EPSILON + sum / count as f32)
            }
        })
        .collect()
}

/// Triangle and 4-cycle participation plus a degree term.
///
/// Cycles are deduplicated through canonical keys: triangles as ascending
/// triples, 4-cycles rotated to start at their smallest node and oriented so
/// the second node is smaller than the fourth.
fn domination(sets: &[BTreeSet<usize>], cfg: &GraphConfig) -> Vec<f32> {
    let n = sets.len();
    let mut triangles: BTreeSet<[usize; 3]> = BTreeSet::new();
    let mut quads: BTreeSet<[usize; 4]> = BTreeSet::new();

    for a in 0..n {
        for &b in sets[a].range(a + 1..) {
            for &c in sets[b].range(a + 1..) {
                if c > b && sets[a].contains(&c) {
                    triangles.insert([a, b, c]);
                }
                for &d in sets[c].range(a + 1..) {
                    if d != b && b < d && sets[a].contains(&d) {
                        quads.insert([a, b, c, d]);
                    }
                }
            }
        }
    }

    let mut raw: Vec<f32> = sets
        .iter()
        .map(|s| s.len() as f32 * cfg.degree_weight)
        .collect();
    for key in &triangles {
        for &node in key {
            raw[node] += 1.0;
        }
    }
    for key in &quads {
        for &node in key {
            raw[node] += cfg.quad_weight;
        }
    }
    raw
}

fn normalize(values: &[f32]) -> Vec<f32> {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    values
        .iter()
        .map(|v| {
            if !range.is_finite() || range <= EPSILON {
                0.5
            } else {
                (v - min) / range
            }
        })
        .collect()
}
