//! Interned dense-id directed graph with topology-pruned Dijkstra queries,
//! grounded on `examples/original_source/src/utils/sparse_graph_shortest_path*`.

pub mod build;
pub mod engine;

pub use build::{build_rise_fall, RiseFallGraphs};
pub use engine::{QueryResult, ShortestPathEngine};
