//! Strategic layer: objective neighbor graph and forecast search.
//!
//! The graph connects each objective to its nearest neighbors and is rebuilt
//! only when the objective set changes. Per-cycle node heuristics combine the
//! raw score with structural value (closeness centrality and local cycle
//! participation) so the forecast favors objectives that are both attractive
//! and well connected.

mod neighbor;
mod search;

pub use neighbor::{Edge, NeighborGraph};
pub use search::{StrategicPlan, StrategicPlanner};
