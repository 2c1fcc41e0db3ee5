use crate::distance::DistanceMatrix;
use crate::error::{MatrixError, Result};
use crate::sym_matrix::{SymmetricMatrix, Weight};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// An undirected weighted graph backed by a symmetric adjacency matrix.
///
/// A weight of zero means "no edge". Every edge read or write goes through a single lock that is
/// held only for the duration of that one call. Labels are fixed at construction and are read
/// without locking.
pub struct WeightedGraph<T> {
    labels: Option<Vec<String>>,
    matrix: Mutex<SymmetricMatrix<T>>,
    size: usize,
}

impl<T: Weight> WeightedGraph<T> {
    /// Creates an unlabeled graph with `size` nodes and no edges.
    pub fn new(size: usize) -> Self {
        Self::from_matrix(SymmetricMatrix::new(size))
    }

    /// Creates a graph with one node per label and no edges.
    pub fn with_labels(labels: Vec<String>) -> Result<Self> {
        let matrix = SymmetricMatrix::new(labels.len());
        Self::from_labeled_matrix(labels, matrix)
    }

    pub fn from_matrix(matrix: SymmetricMatrix<T>) -> Self {
        Self {
            labels: None,
            size: matrix.size(),
            matrix: Mutex::new(matrix),
        }
    }

    pub fn from_labeled_matrix(labels: Vec<String>, matrix: SymmetricMatrix<T>) -> Result<Self> {
        if labels.len() != matrix.size() {
            return Err(MatrixError::SizeMismatch {
                expected: matrix.size(),
                actual: labels.len(),
            });
        }
        let mut seen = HashSet::with_capacity(labels.len());
        for label in labels.iter() {
            if !seen.insert(label.as_str()) {
                return Err(MatrixError::DuplicateLabel(label.clone()));
            }
        }
        Ok(Self {
            labels: Some(labels),
            size: matrix.size(),
            matrix: Mutex::new(matrix),
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_labeled(&self) -> bool {
        self.labels.is_some()
    }

    /// The label of a node. Unlabeled graphs use the decimal node index.
    pub fn node_label(&self, idx: usize) -> Result<String> {
        self.check_index(idx)?;
        Ok(match &self.labels {
            Some(labels) => labels[idx].clone(),
            None => idx.to_string(),
        })
    }

    pub fn node_index(&self, label: &str) -> Result<usize> {
        let found = match &self.labels {
            Some(labels) => labels.iter().position(|l| l == label),
            None => label.parse::<usize>().ok().filter(|&idx| idx < self.size),
        };
        found.ok_or_else(|| MatrixError::NodeNotFound(label.to_string()))
    }

    pub fn edge_exists(&self, a: usize, b: usize) -> Result<bool> {
        let matrix = self.lock();
        let weight = matrix.get(a, b)?;
        Ok(!matrix.is_zero(weight))
    }

    pub fn edge_exists_by_label(&self, a: &str, b: &str) -> Result<bool> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        self.edge_exists(a, b)
    }

    pub fn edge_weight(&self, a: usize, b: usize) -> Result<T> {
        self.lock().get(a, b)
    }

    pub fn edge_weight_by_label(&self, a: &str, b: &str) -> Result<T> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        self.edge_weight(a, b)
    }

    pub fn set_edge_weight(&self, a: usize, b: usize, weight: T) -> Result<()> {
        self.lock().set(a, b, weight)
    }

    /// Number of non-zero entries in the node's row, a self-loop included.
    pub fn degree(&self, idx: usize) -> Result<usize> {
        let matrix = self.lock();
        let mut degree = 0;
        for col in 0..self.size {
            if !matrix.is_zero(matrix.get(idx, col)?) {
                degree += 1;
            }
        }
        Ok(degree)
    }

    /// All nodes with a non-zero weight to `idx`, in ascending order.
    pub fn neighbors(&self, idx: usize) -> Result<Vec<usize>> {
        let matrix = self.lock();
        let mut neighbors = Vec::new();
        for col in 0..self.size {
            if !matrix.is_zero(matrix.get(idx, col)?) {
                neighbors.push(col);
            }
        }
        Ok(neighbors)
    }

    /// A snapshot of the current adjacency matrix.
    pub fn adjacency_matrix(&self) -> SymmetricMatrix<T> {
        self.lock().clone()
    }

    /// All-pairs shortest path distances over the current edge weights.
    pub fn distance_matrix(&self) -> Result<DistanceMatrix<T>> {
        DistanceMatrix::from_adjacency(&self.adjacency_matrix())
    }

    fn check_index(&self, idx: usize) -> Result<()> {
        if idx >= self.size {
            return Err(MatrixError::IndexOutOfRange {
                index: idx,
                size: self.size,
            });
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, SymmetricMatrix<T>> {
        // Every access under the guard is a single cell read or write.
        self.matrix.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Weight> Clone for WeightedGraph<T> {
    fn clone(&self) -> Self {
        Self {
            labels: self.labels.clone(),
            matrix: Mutex::new(self.adjacency_matrix()),
            size: self.size,
        }
    }
}

impl<T: Weight> fmt::Display for WeightedGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(labels) = &self.labels {
            writeln!(f, "[Labels]")?;
            for label in labels.iter() {
                writeln!(f, "   {label}")?;
            }
            writeln!(f, "[Edges]")?;
        }
        write!(f, "{}", self.lock())
    }
}

impl<T: Weight> fmt::Debug for WeightedGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedGraph")
            .field("size", &self.size)
            .field("labeled", &self.is_labeled())
            .finish()
    }
}
