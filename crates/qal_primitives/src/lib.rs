// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Primitive value domains used within the QAL AST and semantic tree.

use core::fmt;
use thiserror::Error;

pub use num_complex::Complex64;

/// String primitive used within the AST and semantic tree.
pub type Str = String;

/// Boolean primitive used within the semantic tree.
pub type Bool = bool;

/// Integer primitive used within the AST and semantic tree.
pub type Int = i64;

/// Real number primitive used within the AST and semantic tree.
pub type Real = f64;

/// Complex number primitive used within the semantic tree.
pub type Complex = Complex64;

/// Matrix of real numbers.
pub type RMatrix = Matrix<Real>;

/// Matrix of complex numbers.
pub type CMatrix = Matrix<Complex>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("invalid matrix shape: {len} elements do not divide into rows of {cols}")]
    BadShape { len: usize, cols: usize },
    #[error("matrix index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Dense two-dimensional matrix, stored row-major.
///
/// `at` accessors are 1-based, matching the way matrix entries are written
/// in QAL source and in error messages.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Clone + Default> Matrix<T> {
    /// Creates a zero-initialized matrix of the given size.
    pub fn new(nrows: usize, ncols: usize) -> Matrix<T> {
        Matrix {
            data: vec![T::default(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Creates a column vector with the given data.
    pub fn from_column(data: Vec<T>) -> Matrix<T> {
        let nrows = data.len();
        Matrix {
            data,
            nrows,
            ncols: 1,
        }
    }

    /// Creates a matrix with the given data and column count; the row count
    /// is inferred. Fails when the element count is not divisible by `ncols`.
    pub fn from_rows(data: Vec<T>, ncols: usize) -> Result<Matrix<T>, MatrixError> {
        if ncols == 0 || data.len() % ncols != 0 {
            return Err(MatrixError::BadShape {
                len: data.len(),
                cols: ncols,
            });
        }
        let nrows = data.len() / ncols;
        Ok(Matrix { data, nrows, ncols })
    }

    pub fn size_rows(&self) -> usize {
        self.nrows
    }

    pub fn size_cols(&self) -> usize {
        self.ncols
    }

    fn check(&self, row: usize, col: usize) -> Result<usize, MatrixError> {
        if row < 1 || row > self.nrows || col < 1 || col > self.ncols {
            return Err(MatrixError::OutOfRange {
                row,
                col,
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        Ok((row - 1) * self.ncols + col - 1)
    }

    /// Returns the value at the given 1-based position.
    pub fn at(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        self.check(row, col).map(|index| self.data[index].clone())
    }

    /// Returns a mutable reference to the value at the given 1-based
    /// position.
    pub fn at_mut(&mut self, row: usize, col: usize) -> Result<&mut T, MatrixError> {
        let index = self.check(row, col)?;
        Ok(&mut self.data[index])
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.nrows {
            if row > 0 {
                write!(f, "; ")?;
            }
            for col in 0..self.ncols {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[row * self.ncols + col])?;
            }
        }
        write!(f, "]")
    }
}

/// Axis primitive used within the semantic tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Version number: a dot-separated sequence of integer components with
/// lexicographic ordering. Components are expected to be non-negative; the
/// analyzer validates this so the parser can hand over whatever it read.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    items: Vec<Int>,
}

impl Version {
    pub fn new(items: Vec<Int>) -> Version {
        Version { items }
    }

    pub fn items(&self) -> &[Int] {
        &self.items
    }
}

impl From<Vec<Int>> for Version {
    fn from(items: Vec<Int>) -> Version {
        Version { items }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
