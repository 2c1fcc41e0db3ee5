use crate::error::Result;
use crate::sym_matrix::{SymmetricMatrix, Weight};

/// All-pairs shortest path distances computed with Floyd-Warshall.
///
/// Unreachable pairs hold `T::max_value()` in the backing matrix and are reported as `None`.
/// Weights must be non-negative and path sums must stay below `T::max_value()`; negative cycles
/// are not detected.
#[derive(Clone, Debug)]
pub struct DistanceMatrix<T> {
    distances: SymmetricMatrix<T>,
}

impl<T: Weight> DistanceMatrix<T> {
    /// Marker stored for pairs with no connecting path.
    pub fn infinity() -> T {
        T::max_value()
    }

    pub fn from_adjacency(adjacency: &SymmetricMatrix<T>) -> Result<Self> {
        let n = adjacency.size();
        let infinity = Self::infinity();

        let mut distances = SymmetricMatrix::new(n);
        for row in 0..n {
            for col in row..n {
                let weight = adjacency.get(row, col)?;
                let value = if row == col {
                    T::zero()
                } else if adjacency.is_zero(weight) {
                    infinity
                } else {
                    weight
                };
                distances.set(row, col, value)?;
            }
        }

        for k in 0..n {
            for i in 0..n {
                let ik = distances.get(i, k)?;
                if ik == infinity {
                    continue;
                }
                // (i, j) and (j, i) share a cell, so the upper triangle covers every pair.
                for j in i..n {
                    let kj = distances.get(k, j)?;
                    if kj == infinity {
                        continue;
                    }
                    let current = distances.get(i, j)?;
                    let through_k = ik + kj;
                    if current == infinity || through_k < current {
                        distances.set(i, j, through_k)?;
                    }
                }
            }
        }

        log::trace!("distance closure computed for {n} nodes");
        Ok(Self { distances })
    }

    pub fn size(&self) -> usize {
        self.distances.size()
    }

    /// Shortest path length between two nodes, or `None` when they are not connected.
    pub fn distance(&self, a: usize, b: usize) -> Result<Option<T>> {
        let value = self.distances.get(a, b)?;
        Ok((value != Self::infinity()).then_some(value))
    }

    pub fn is_reachable(&self, a: usize, b: usize) -> Result<bool> {
        Ok(self.distance(a, b)?.is_some())
    }

    /// The raw distances, with `infinity()` marking unreachable pairs.
    pub fn as_matrix(&self) -> &SymmetricMatrix<T> {
        &self.distances
    }
}
