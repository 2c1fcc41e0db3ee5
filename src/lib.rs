// Balanced graph partitioning around hotspot nodes.
//
// Hotspots are picked from previously known node groupings ("structures"), one partition is grown
// around each hotspot depth-first up to a size cap, and whatever is still reachable is handed out
// breadth-first afterwards.

use std::collections::BTreeSet;

pub mod config;
pub mod distance;
pub mod error;
pub mod graph;
pub mod hotspot;
pub mod io;
pub mod partition_util;
pub mod structures;
pub mod sym_matrix;

pub use config::RunConfig;
pub use distance::DistanceMatrix;
pub use error::{ConfigError, MatrixError, ReadError};
pub use graph::WeightedGraph;
pub use hotspot::{PartitionEngine, PartitionOutcome, PartitioningConfig};
pub use io::GraphFormat;
pub use partition_util::ClaimedSet;
pub use structures::Structure;
pub use sym_matrix::{DenseMatrix, SquareMatrix, SymmetricMatrix, Weight};

/// A set of node indices assigned to one hotspot.
pub type Partition = BTreeSet<usize>;

/// Per-partition node limit for the depth-first phase, `node_count / hotspot_count` truncated.
/// Zero when there are no hotspots.
pub fn size_cap(node_count: usize, hotspot_count: usize) -> usize {
    node_count.checked_div(hotspot_count).unwrap_or(0)
}
