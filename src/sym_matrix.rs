use crate::error::{MatrixError, Result};
use num_traits::{Bounded, Signed, Zero};
use std::fmt;
use std::str::FromStr;

/// Numeric types that can be stored as edge weights.
pub trait Weight:
    Copy + fmt::Debug + fmt::Display + PartialOrd + Signed + Bounded + FromStr + Send + 'static
{
}

impl<T> Weight for T where
    T: Copy + fmt::Debug + fmt::Display + PartialOrd + Signed + Bounded + FromStr + Send + 'static
{
}

/// Read access shared by the square matrix containers.
pub trait SquareMatrix<T> {
    fn size(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> Result<T>;
}

/// An N x N symmetric matrix that only stores the upper triangle.
///
/// Row `r` of the packed storage holds the cells `(r, r)..(r, size - 1)`, so the
/// logical cell `(row, col)` lives at `(min(row, col), |row - col|)`.
#[derive(Clone, Debug)]
pub struct SymmetricMatrix<T> {
    size: usize,
    data: Vec<T>,
    tolerance: T,
}

impl<T: Weight> Default for SymmetricMatrix<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Weight> SymmetricMatrix<T> {
    /// Panics if the packed storage for `size` rows cannot be allocated; see `try_new`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![T::zero(); packed_len(size)],
            tolerance: T::zero(),
        }
    }

    /// Like `new`, but fails with `InvalidRange` when `size` rows do not fit in memory.
    pub fn try_new(size: usize) -> Result<Self> {
        let too_large = || MatrixError::InvalidRange(format!("cannot store a {size} x {size} matrix"));
        let len = checked_packed_len(size).ok_or_else(|| too_large())?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, T::zero());
        Ok(Self {
            size,
            data,
            tolerance: T::zero(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    /// Sets the tolerance used by `is_zero` and `approx_eq`. Negative values are rejected and
    /// leave the matrix untouched.
    pub fn set_tolerance(&mut self, tolerance: T) -> Result<()> {
        if tolerance < T::zero() {
            return Err(MatrixError::InvalidRange(format!(
                "tolerance {tolerance} is negative"
            )));
        }
        self.tolerance = tolerance;
        Ok(())
    }

    /// Whether the value is within tolerance of zero.
    pub fn is_zero(&self, value: T) -> bool {
        value.abs() <= self.tolerance
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let idx = self.packed_index(row, col)?;
        Ok(self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let idx = self.packed_index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Reallocates the storage for `size` rows. Cells inside both the old and the new bounds keep
    /// their value, everything else starts at zero.
    pub fn resize(&mut self, size: usize) {
        if size == self.size {
            return;
        }
        let mut resized = Self::new(size);
        resized.tolerance = self.tolerance;
        let keep = size.min(self.size);
        for row in 0..keep {
            for col in row..keep {
                resized.data[packed_offset(size, row) + col - row] =
                    self.data[packed_offset(self.size, row) + col - row];
            }
        }
        *self = resized;
    }

    /// Swaps every `(i, j)` with `(j, i)`. For packed symmetric storage the result is always
    /// identical to the input.
    pub fn transpose(&mut self) -> &mut Self {
        for i in 0..self.size.saturating_sub(1) {
            for j in i + 1..self.size {
                let upper = self.cell(i, j);
                let lower = self.cell(j, i);
                self.store(i, j, lower);
                self.store(j, i, upper);
            }
        }
        self
    }

    /// True if every row satisfies `|a(i,i)| >= sum_{j != i} |a(i,j)|`.
    pub fn is_diagonally_dominant(&self) -> bool {
        (0..self.size).all(|i| {
            let off_diagonal = (0..self.size)
                .filter(|&j| j != i)
                .fold(T::zero(), |sum, j| sum + self.cell(i, j).abs());
            off_diagonal <= self.cell(i, i).abs()
        })
    }

    pub fn ensure_diagonally_dominant(&self) -> Result<()> {
        if self.is_diagonally_dominant() {
            Ok(())
        } else {
            Err(MatrixError::NotDiagonallyDominant)
        }
    }

    /// Cell-wise comparison within this matrix's tolerance.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(&a, &b)| self.is_zero(a - b))
    }

    pub fn checked_add(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a + b)
    }

    pub fn checked_sub(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a - b)
    }

    pub fn add_scalar(&self, rhs: T) -> Self {
        self.map(|v| v + rhs)
    }

    pub fn sub_scalar(&self, rhs: T) -> Self {
        self.map(|v| v - rhs)
    }

    pub fn scale(&self, rhs: T) -> Self {
        self.map(|v| v * rhs)
    }

    pub fn divide(&self, rhs: T) -> Result<Self> {
        if rhs.is_zero() {
            return Err(MatrixError::DivisionByZero);
        }
        Ok(self.map(|v| v / rhs))
    }

    pub fn mul_vector(&self, rhs: &[T]) -> Result<Vec<T>> {
        if rhs.len() != self.size {
            return Err(MatrixError::SizeMismatch {
                expected: self.size,
                actual: rhs.len(),
            });
        }
        Ok((0..self.size)
            .map(|i| {
                rhs.iter()
                    .enumerate()
                    .fold(T::zero(), |sum, (j, &v)| sum + self.cell(i, j) * v)
            })
            .collect())
    }

    /// Standard inner-product multiplication. The product is generally not symmetric, even for two
    /// symmetric operands, so it is returned as a dense matrix.
    pub fn mul_matrix<M: SquareMatrix<T>>(&self, rhs: &M) -> Result<DenseMatrix<T>> {
        if rhs.size() != self.size {
            return Err(MatrixError::SizeMismatch {
                expected: self.size,
                actual: rhs.size(),
            });
        }
        let mut product = DenseMatrix::new(self.size);
        for i in 0..self.size {
            for j in 0..self.size {
                let mut sum = T::zero();
                for k in 0..self.size {
                    sum = sum + self.cell(i, k) * rhs.get(k, j)?;
                }
                product.set(i, j, sum)?;
            }
        }
        Ok(product)
    }

    fn map(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            size: self.size,
            data: self.data.iter().map(|&v| f(v)).collect(),
            tolerance: self.tolerance,
        }
    }

    fn zip_with(&self, rhs: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        if rhs.size != self.size {
            return Err(MatrixError::SizeMismatch {
                expected: self.size,
                actual: rhs.size,
            });
        }
        Ok(Self {
            size: self.size,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            tolerance: self.tolerance,
        })
    }

    // Unchecked read for indices that are already known to be in range.
    fn cell(&self, row: usize, col: usize) -> T {
        let (lo, hi) = if row <= col { (row, col) } else { (col, row) };
        self.data[packed_offset(self.size, lo) + hi - lo]
    }

    fn store(&mut self, row: usize, col: usize, value: T) {
        let (lo, hi) = if row <= col { (row, col) } else { (col, row) };
        self.data[packed_offset(self.size, lo) + hi - lo] = value;
    }

    fn packed_index(&self, row: usize, col: usize) -> Result<usize> {
        for index in [row, col] {
            if index >= self.size {
                return Err(MatrixError::IndexOutOfRange {
                    index,
                    size: self.size,
                });
            }
        }
        let (lo, hi) = if row <= col { (row, col) } else { (col, row) };
        Ok(packed_offset(self.size, lo) + hi - lo)
    }
}

impl<T: Weight> SquareMatrix<T> for SymmetricMatrix<T> {
    fn size(&self) -> usize {
        self.size
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        SymmetricMatrix::get(self, row, col)
    }
}

impl<T: Weight> fmt::Display for SymmetricMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.cell(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Row-major N x N matrix without any symmetry assumption.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix<T> {
    size: usize,
    data: Vec<T>,
}

impl<T: Weight> DenseMatrix<T> {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![T::zero(); size * size],
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let idx = self.index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        for index in [row, col] {
            if index >= self.size {
                return Err(MatrixError::IndexOutOfRange {
                    index,
                    size: self.size,
                });
            }
        }
        Ok(row * self.size + col)
    }
}

impl<T: Weight> SquareMatrix<T> for DenseMatrix<T> {
    fn size(&self) -> usize {
        self.size
    }

    fn get(&self, row: usize, col: usize) -> Result<T> {
        let idx = self.index(row, col)?;
        Ok(self.data[idx])
    }
}

fn packed_len(size: usize) -> usize {
    size * (size + 1) / 2
}

fn checked_packed_len(size: usize) -> Option<usize> {
    size.checked_add(1)?.checked_mul(size).map(|cells| cells / 2)
}

fn packed_offset(size: usize, row: usize) -> usize {
    row * (2 * size + 1 - row) / 2
}
