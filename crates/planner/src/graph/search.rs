//! Strategic planner: graph caching and bounded forecast search.

use arena_core::{GraphConfig, Objective, ObjectiveId};

use super::neighbor::NeighborGraph;
use crate::features::{MetricMap, ScoreMap};

/// Owns the cached neighbor graph and produces per-cycle plans.
#[derive(Debug)]
pub struct StrategicPlanner {
    config: GraphConfig,
    graph: Option<NeighborGraph>,
    rebuilds: u64,
}

impl StrategicPlanner {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            graph: None,
            rebuilds: 0,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn graph(&self) -> Option<&NeighborGraph> {
        self.graph.as_ref()
    }

    /// How many times the graph has been (re)built.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Drops the cached graph.
    pub fn clear(&mut self) {
        self.graph = None;
    }

    /// Rebuilds the graph when the objective identity sequence or count changed.
    pub fn refresh(&mut self, objectives: &[Objective]) -> &NeighborGraph {
        self.refreshed(objectives).0
    }

    fn refreshed(&mut self, objectives: &[Objective]) -> (&NeighborGraph, &GraphConfig) {
        if self.graph.as_ref().is_some_and(|g| !g.matches(objectives)) {
            self.graph = None;
        }
        let Self {
            config,
            graph,
            rebuilds,
        } = self;
        let graph = graph.get_or_insert_with(|| {
            *rebuilds += 1;
            tracing::debug!(
                "StrategicPlanner: rebuilding graph for {} objectives (rebuild #{})",
                objectives.len(),
                rebuilds
            );
            NeighborGraph::build(objectives, config)
        });
        (&*graph, &*config)
    }

    /// Prepares node heuristics for this cycle.
    ///
    /// `cruise_speed` converts edge lengths into leg travel times.
    pub fn plan(
        &mut self,
        objectives: &[Objective],
        metrics: &MetricMap,
        scores: &ScoreMap,
        cruise_speed: f32,
    ) -> StrategicPlan<'_> {
        let (graph, cfg) = self.refreshed(objectives);

        let heuristics = (0..graph.len())
            .map(|index| {
                let id = graph.id(index);
                let (entry, raw) = (metrics.get(&id)?, scores.get(&id)?);
                Some(
                    raw * cfg.raw_score_weight
                        + graph.centrality(index) * cfg.centrality_weight
                        + graph.domination(index) * cfg.domination_weight
                        + entry.features.capture_swing * cfg.capture_swing_weight,
                )
            })
            .collect();

        StrategicPlan {
            graph,
            config: cfg,
            heuristics,
            cruise_speed: if cruise_speed > 0.0 && cruise_speed.is_finite() {
                cruise_speed
            } else {
                1.0
            },
        }
    }
}

/// Handle for fetching forecasts during one cycle.
#[derive(Debug)]
pub struct StrategicPlan<'a> {
    graph: &'a NeighborGraph,
    config: &'a GraphConfig,
    /// Per node; `None` for objectives missing from metrics or scores.
    heuristics: Vec<Option<f32>>,
    cruise_speed: f32,
}

struct BestPath {
    nodes: Vec<usize>,
    score: f32,
}

impl StrategicPlan<'_> {
    /// Heuristic value of an objective, if it is plannable this cycle.
    pub fn heuristic(&self, id: ObjectiveId) -> Option<f32> {
        self.graph.index_of(id).and_then(|i| self.heuristics[i])
    }

    /// Predicted sequence of objectives to visit after `start`.
    ///
    /// Searches neighbor edges up to the configured depth and branching
    /// factor and keeps the deepest path found, ties broken by score. When
    /// `start` has no usable edges, ranks all other objectives by heuristic.
    pub fn forecast(&self, start: ObjectiveId) -> Vec<ObjectiveId> {
        let path = match self.graph.index_of(start) {
            Some(origin) => self.search(origin),
            None => Vec::new(),
        };
        let nodes = if path.is_empty() {
            self.rank_by_heuristic(start)
        } else {
            path
        };
        nodes.into_iter().map(|i| self.graph.id(i)).collect()
    }

    fn search(&self, origin: usize) -> Vec<usize> {
        let mut visited = vec![false; self.graph.len()];
        visited[origin] = true;
        let mut path = Vec::with_capacity(self.config.max_depth);
        let mut best = BestPath {
            nodes: Vec::new(),
            score: f32::NEG_INFINITY,
        };
        self.descend(origin, 0, 0.0, &mut visited, &mut path, &mut best);
        best.nodes
    }

    fn descend(
        &self,
        node: usize,
        depth: usize,
        accumulated: f32,
        visited: &mut [bool],
        path: &mut Vec<usize>,
        best: &mut BestPath,
    ) {
        let deeper = path.len() > best.nodes.len();
        let better = path.len() == best.nodes.len() && accumulated > best.score;
        if deeper || better {
            best.nodes.clone_from(path);
            best.score = accumulated;
        }
        if depth >= self.config.max_depth {
            return;
        }

        let mut candidates: Vec<(usize, f32, f32)> = self
            .graph
            .neighbors(node)
            .iter()
            .filter(|e| !visited[e.to])
            .filter_map(|e| self.heuristics[e.to].map(|h| (e.to, h, e.length)))
            .collect();
        candidates.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| self.graph.id(a.0).cmp(&self.graph.id(b.0)))
        });
        candidates.truncate(self.config.branching);

        let discount = self.config.depth_discount.powi(depth as i32);
        for (next, heuristic, length) in candidates {
            let step = discount * (heuristic + self.edge_value(length));
            visited[next] = true;
            path.push(next);
            self.descend(next, depth + 1, accumulated + step, visited, path, best);
            path.pop();
            visited[next] = false;
        }
    }

    /// Adjacency bonus minus leg travel penalty.
    fn edge_value(&self, length: f32) -> f32 {
        let cfg = self.config;
        let adjacency = if cfg.adjacency_scale > 0.0 {
            cfg.adjacency_weight / (1.0 + length / cfg.adjacency_scale)
        } else {
            0.0
        };
        adjacency - cfg.travel_penalty_weight * (length / self.cruise_speed)
    }

    fn rank_by_heuristic(&self, start: ObjectiveId) -> Vec<usize> {
        let mut ranked: Vec<(usize, f32)> = (0..self.graph.len())
            .filter(|&i| self.graph.id(i) != start)
            .filter_map(|i| self.heuristics[i].map(|h| (i, h)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| self.graph.id(a.0).cmp(&self.graph.id(b.0)))
        });
        ranked
            .into_iter()
            .take(self.config.max_depth)
            .map(|(i, _)| i)
            .collect()
    }
}
