// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

// The type lattice used to describe instruction and function parameters and
// to classify values. Types record only static descriptors; implicit
// conversion between them is implemented by `values::promote`.

use core::fmt;
use thiserror::Error;

/// Shape constraint of a matrix type. A negative dimension means
/// "unconstrained" and acts as a wildcard during overload matching;
/// otherwise rows must be at least 1 and cols at least 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatrixShape {
    pub rows: i64,
    pub cols: i64,
}

impl MatrixShape {
    pub fn new(rows: i64, cols: i64) -> MatrixShape {
        MatrixShape { rows, cols }
    }

    /// Any shape at all.
    pub fn unconstrained() -> MatrixShape {
        MatrixShape { rows: -1, cols: -1 }
    }

    /// Returns whether an actual matrix of `rows` by `cols` satisfies this
    /// constraint.
    pub fn accepts(&self, rows: usize, cols: usize) -> bool {
        (self.rows < 0 || self.rows == rows as i64) && (self.cols < 0 || self.cols == cols as i64)
    }
}

impl fmt::Display for MatrixShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rows < 0, self.cols < 0) {
            (true, true) => write!(f, "[*, *]"),
            (true, false) => write!(f, "[*, {}]", self.cols),
            (false, true) => write!(f, "[{}, *]", self.rows),
            (false, false) => write!(f, "[{}, {}]", self.rows, self.cols),
        }
    }
}

/// The closed family of QAL types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Qubit,
    Bool,
    Axis,
    Int,
    Real,
    Complex,
    RealMatrix(MatrixShape),
    ComplexMatrix(MatrixShape),
    String,
    Json,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Qubit => write!(f, "qubit"),
            Type::Bool => write!(f, "bool"),
            Type::Axis => write!(f, "axis"),
            Type::Int => write!(f, "int"),
            Type::Real => write!(f, "real"),
            Type::Complex => write!(f, "complex"),
            Type::RealMatrix(shape) => write!(f, "real matrix{shape}"),
            Type::ComplexMatrix(shape) => write!(f, "complex matrix{shape}"),
            Type::String => write!(f, "string"),
            Type::Json => write!(f, "json"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeSpecError {
    #[error("unknown type code '{0}' in parameter type specification")]
    BadTypeSpec(char),
}

/// Constructs a list of types from a shorthand string. Each character
/// encodes one parameter type:
///
///  - `q` = qubit
///  - `a` = axis (x, y, or z)
///  - `b` = bit/boolean
///  - `i` = integer
///  - `r` = real
///  - `c` = complex
///  - `u` = square complex matrix of side `2^n`, where `n` is the number of
///    `q` characters in the same string
///  - `s` = (quoted) string
///  - `j` = json
///
/// Real matrices and complex matrices with other constraints cannot be
/// written this way; construct those parameter lists manually.
pub fn from_spec(spec: &str) -> Result<Vec<Type>, TypeSpecError> {
    // Count the qubits first, in case we find a unitary parameter.
    let num_qubits = spec.chars().filter(|&c| c == 'q').count() as u32;
    let mut types = Vec::with_capacity(spec.len());
    for c in spec.chars() {
        let ty = match c {
            'q' => Type::Qubit,
            'a' => Type::Axis,
            'b' => Type::Bool,
            'i' => Type::Int,
            'r' => Type::Real,
            'c' => Type::Complex,
            'u' => {
                let side = 1i64 << num_qubits;
                Type::ComplexMatrix(MatrixShape::new(side, side))
            }
            's' => Type::String,
            'j' => Type::Json,
            other => return Err(TypeSpecError::BadTypeSpec(other)),
        };
        types.push(ty);
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_maps_each_character() {
        let types = from_spec("qabircsj").unwrap();
        assert_eq!(
            types,
            vec![
                Type::Qubit,
                Type::Axis,
                Type::Bool,
                Type::Int,
                Type::Real,
                Type::Complex,
                Type::String,
                Type::Json,
            ]
        );
    }

    #[test]
    fn unitary_size_follows_qubit_count() {
        let types = from_spec("qqu").unwrap();
        assert_eq!(
            types[2],
            Type::ComplexMatrix(MatrixShape::new(4, 4)),
        );
        let types = from_spec("u").unwrap();
        assert_eq!(types[0], Type::ComplexMatrix(MatrixShape::new(1, 1)));
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(from_spec("qx"), Err(TypeSpecError::BadTypeSpec('x')));
    }

    #[test]
    fn wildcard_shapes() {
        let shape = MatrixShape::new(-1, 4);
        assert!(shape.accepts(7, 4));
        assert!(!shape.accepts(7, 5));
        assert!(MatrixShape::unconstrained().accepts(1, 100));
        assert_eq!(shape.to_string(), "[*, 4]");
    }
}
