// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

// The value domain: compile-time constants and qubit/bit references, tagged
// by the type lattice. `promote` implements the implicit-conversion table
// shared by function calls, instruction resolution and error models.

use core::fmt;

use qal_primitives::{Axis, CMatrix, Complex, Int, RMatrix, Real, Str};
use qal_tree::{Annotations, HasAnnotations, Many, TreeNode};

use crate::types::{MatrixShape, Type};

/// A QAL value: either a reference to runtime entities (qubits, measurement
/// bits) or a compile-time constant.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    QubitRefs(QubitRefs),
    BitRefs(BitRefs),
    ConstBool(ConstBool),
    ConstAxis(ConstAxis),
    ConstInt(ConstInt),
    ConstReal(ConstReal),
    ConstComplex(ConstComplex),
    ConstRealMatrix(ConstRealMatrix),
    ConstComplexMatrix(ConstComplexMatrix),
    ConstString(ConstString),
    ConstJson(ConstJson),
}

macro_rules! scalar_value_node {
    ($(#[$doc:meta])* $name:ident, $payload:ty) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            value: $payload,
            annotations: Annotations,
        }

        impl $name {
            pub fn new(value: impl Into<$payload>) -> $name {
                $name {
                    value: value.into(),
                    annotations: Annotations::new(),
                }
            }

            pub fn value(&self) -> &$payload {
                &self.value
            }

            pub fn to_value(self) -> Value {
                Value::$name(self)
            }
        }

        impl TreeNode for $name {
            fn is_complete(&self) -> bool {
                true
            }
        }

        impl HasAnnotations for $name {
            fn annotations(&self) -> &Annotations {
                &self.annotations
            }

            fn annotations_mut(&mut self) -> &mut Annotations {
                &mut self.annotations
            }
        }
    };
}

scalar_value_node!(ConstBool, bool);
scalar_value_node!(ConstAxis, Axis);
scalar_value_node!(ConstInt, Int);
scalar_value_node!(ConstReal, Real);
scalar_value_node!(ConstComplex, Complex);
scalar_value_node!(ConstRealMatrix, RMatrix);
scalar_value_node!(ConstComplexMatrix, CMatrix);
scalar_value_node!(
    /// A constant string.
    ConstString,
    Str
);
scalar_value_node!(
    /// A JSON blob, stored verbatim as written between `{|` and `|}`.
    ConstJson,
    Str
);

macro_rules! refs_value_node {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            indices: Many<ConstInt>,
            annotations: Annotations,
        }

        impl $name {
            pub fn new(indices: Many<ConstInt>) -> $name {
                $name {
                    indices,
                    annotations: Annotations::new(),
                }
            }

            /// Builds a reference over plain indices.
            pub fn from_indices<I: IntoIterator<Item = Int>>(indices: I) -> $name {
                $name {
                    indices: indices.into_iter().map(ConstInt::new).collect(),
                    annotations: Annotations::new(),
                }
            }

            pub fn indices(&self) -> &Many<ConstInt> {
                &self.indices
            }

            /// The referenced indices as plain integers.
            pub fn index_values(&self) -> Vec<Int> {
                self.indices.iter().map(|index| *index.value()).collect()
            }

            pub fn to_value(self) -> Value {
                Value::$name(self)
            }
        }

        impl TreeNode for $name {
            fn is_complete(&self) -> bool {
                self.indices.is_complete()
            }
        }

        impl HasAnnotations for $name {
            fn annotations(&self) -> &Annotations {
                &self.annotations
            }

            fn annotations_mut(&mut self) -> &mut Annotations {
                &mut self.annotations
            }
        }
    };
}

refs_value_node!(
    /// A reference to one or more qubits. Multiple indices mean single-gate
    /// multiple-qubit broadcasting.
    QubitRefs
);
refs_value_node!(
    /// A reference to one or more measurement bits.
    BitRefs
);

impl Value {
    /// Projects the value onto the type lattice. Matrix values yield their
    /// actual dimensions.
    pub fn type_of(&self) -> Type {
        match self {
            Value::QubitRefs(_) => Type::Qubit,
            Value::BitRefs(_) => Type::Bool,
            Value::ConstBool(_) => Type::Bool,
            Value::ConstAxis(_) => Type::Axis,
            Value::ConstInt(_) => Type::Int,
            Value::ConstReal(_) => Type::Real,
            Value::ConstComplex(_) => Type::Complex,
            Value::ConstRealMatrix(m) => Type::RealMatrix(MatrixShape::new(
                m.value().size_rows() as i64,
                m.value().size_cols() as i64,
            )),
            Value::ConstComplexMatrix(m) => Type::ComplexMatrix(MatrixShape::new(
                m.value().size_rows() as i64,
                m.value().size_cols() as i64,
            )),
            Value::ConstString(_) => Type::String,
            Value::ConstJson(_) => Type::Json,
        }
    }

    /// Returns whether this is a compile-time constant rather than a
    /// reference to runtime entities.
    pub fn is_constant(&self) -> bool {
        !matches!(self, Value::QubitRefs(_) | Value::BitRefs(_))
    }

    /// Type-checks and (if necessary) promotes this value to `target`.
    /// Returns `None` when the conversion is not in the promotion lattice.
    pub fn promote(&self, target: &Type) -> Option<Value> {
        promote(self, target)
    }

    pub fn as_qubit_refs(&self) -> Option<&QubitRefs> {
        match self {
            Value::QubitRefs(refs) => Some(refs),
            _ => None,
        }
    }

    pub fn as_bit_refs(&self) -> Option<&BitRefs> {
        match self {
            Value::BitRefs(refs) => Some(refs),
            _ => None,
        }
    }

    pub fn as_const_bool(&self) -> Option<&ConstBool> {
        match self {
            Value::ConstBool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_axis(&self) -> Option<&ConstAxis> {
        match self {
            Value::ConstAxis(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_int(&self) -> Option<&ConstInt> {
        match self {
            Value::ConstInt(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_real(&self) -> Option<&ConstReal> {
        match self {
            Value::ConstReal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_complex(&self) -> Option<&ConstComplex> {
        match self {
            Value::ConstComplex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_real_matrix(&self) -> Option<&ConstRealMatrix> {
        match self {
            Value::ConstRealMatrix(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_complex_matrix(&self) -> Option<&ConstComplexMatrix> {
        match self {
            Value::ConstComplexMatrix(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_string(&self) -> Option<&ConstString> {
        match self {
            Value::ConstString(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_const_json(&self) -> Option<&ConstJson> {
        match self {
            Value::ConstJson(v) => Some(v),
            _ => None,
        }
    }
}

impl TreeNode for Value {
    fn is_complete(&self) -> bool {
        match self {
            Value::QubitRefs(v) => v.is_complete(),
            Value::BitRefs(v) => v.is_complete(),
            Value::ConstBool(v) => v.is_complete(),
            Value::ConstAxis(v) => v.is_complete(),
            Value::ConstInt(v) => v.is_complete(),
            Value::ConstReal(v) => v.is_complete(),
            Value::ConstComplex(v) => v.is_complete(),
            Value::ConstRealMatrix(v) => v.is_complete(),
            Value::ConstComplexMatrix(v) => v.is_complete(),
            Value::ConstString(v) => v.is_complete(),
            Value::ConstJson(v) => v.is_complete(),
        }
    }
}

impl HasAnnotations for Value {
    fn annotations(&self) -> &Annotations {
        match self {
            Value::QubitRefs(v) => v.annotations(),
            Value::BitRefs(v) => v.annotations(),
            Value::ConstBool(v) => v.annotations(),
            Value::ConstAxis(v) => v.annotations(),
            Value::ConstInt(v) => v.annotations(),
            Value::ConstReal(v) => v.annotations(),
            Value::ConstComplex(v) => v.annotations(),
            Value::ConstRealMatrix(v) => v.annotations(),
            Value::ConstComplexMatrix(v) => v.annotations(),
            Value::ConstString(v) => v.annotations(),
            Value::ConstJson(v) => v.annotations(),
        }
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Value::QubitRefs(v) => v.annotations_mut(),
            Value::BitRefs(v) => v.annotations_mut(),
            Value::ConstBool(v) => v.annotations_mut(),
            Value::ConstAxis(v) => v.annotations_mut(),
            Value::ConstInt(v) => v.annotations_mut(),
            Value::ConstReal(v) => v.annotations_mut(),
            Value::ConstComplex(v) => v.annotations_mut(),
            Value::ConstRealMatrix(v) => v.annotations_mut(),
            Value::ConstComplexMatrix(v) => v.annotations_mut(),
            Value::ConstString(v) => v.annotations_mut(),
            Value::ConstJson(v) => v.annotations_mut(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::QubitRefs(v) => {
                write!(f, "q[")?;
                write_indices(f, v.indices())?;
                write!(f, "]")
            }
            Value::BitRefs(v) => {
                write!(f, "b[")?;
                write_indices(f, v.indices())?;
                write!(f, "]")
            }
            Value::ConstBool(v) => write!(f, "{}", v.value()),
            Value::ConstAxis(v) => write!(f, "{}", v.value()),
            Value::ConstInt(v) => write!(f, "{}", v.value()),
            Value::ConstReal(v) => write!(f, "{}", v.value()),
            Value::ConstComplex(v) => write!(f, "{}", v.value()),
            Value::ConstRealMatrix(v) => write!(f, "{}", v.value()),
            Value::ConstComplexMatrix(v) => write!(f, "{}", v.value()),
            Value::ConstString(v) => write!(f, "{:?}", v.value()),
            Value::ConstJson(v) => write!(f, "{{|{}|}}", v.value()),
        }
    }
}

fn write_indices(f: &mut fmt::Formatter<'_>, indices: &Many<ConstInt>) -> fmt::Result {
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", index.value())?;
    }
    Ok(())
}

/// Returns a copy of `value` with `annotations` cloned from it; used by the
/// widening conversions so promoted values keep their source locations.
fn carry_annotations(mut value: Value, source: &dyn HasAnnotations) -> Value {
    value.annotations_mut().copy_from(source.annotations());
    value
}

/// Type-checks and (if necessary) promotes `value` to `target` following
/// the implicit-conversion lattice:
///
/// - every type converts to itself (identity copy);
/// - `BitRefs` converts to `Bool`;
/// - `Int` widens to `Real` and `Complex`, `Real` widens to `Complex`;
/// - matrices convert when their shape fits the target constraint (a
///   negative target dimension is a wildcard), real matrices additionally
///   widening to complex;
/// - as a backward-compatibility special case, a `1 x 2*4^n` real matrix
///   converts to an `n x n` complex matrix target by interpreting the row
///   as interleaved real/imaginary pairs in row-major order.
///
/// Returns `None` for every pair not in the lattice.
pub fn promote(value: &Value, target: &Type) -> Option<Value> {
    match target {
        Type::Qubit => value.as_qubit_refs().map(|refs| refs.clone().to_value()),

        Type::Bool => match value {
            Value::BitRefs(_) | Value::ConstBool(_) => Some(value.clone()),
            _ => None,
        },

        Type::Axis => value.as_const_axis().map(|v| v.clone().to_value()),

        Type::Int => value.as_const_int().map(|v| v.clone().to_value()),

        Type::Real => match value {
            Value::ConstInt(v) => Some(carry_annotations(
                ConstReal::new(*v.value() as Real).to_value(),
                v,
            )),
            Value::ConstReal(_) => Some(value.clone()),
            _ => None,
        },

        Type::Complex => match value {
            Value::ConstInt(v) => Some(carry_annotations(
                ConstComplex::new(Complex::new(*v.value() as Real, 0.0)).to_value(),
                v,
            )),
            Value::ConstReal(v) => Some(carry_annotations(
                ConstComplex::new(Complex::new(*v.value(), 0.0)).to_value(),
                v,
            )),
            Value::ConstComplex(_) => Some(value.clone()),
            _ => None,
        },

        Type::RealMatrix(shape) => match value {
            Value::ConstRealMatrix(m)
                if shape.accepts(m.value().size_rows(), m.value().size_cols()) =>
            {
                Some(value.clone())
            }
            _ => None,
        },

        Type::ComplexMatrix(shape) => promote_to_complex_matrix(value, shape),

        Type::String => value.as_const_string().map(|v| v.clone().to_value()),

        Type::Json => value.as_const_json().map(|v| v.clone().to_value()),
    }
}

fn promote_to_complex_matrix(value: &Value, shape: &MatrixShape) -> Option<Value> {
    match value {
        Value::ConstComplexMatrix(m)
            if shape.accepts(m.value().size_rows(), m.value().size_cols()) =>
        {
            Some(value.clone())
        }

        Value::ConstRealMatrix(m) => {
            let rows = m.value().size_rows();
            let cols = m.value().size_cols();
            if shape.accepts(rows, cols) {
                // Element-wise widening to complex.
                let mut widened = CMatrix::new(rows, cols);
                for row in 1..=rows {
                    for col in 1..=cols {
                        let entry = m.value().at(row, col).ok()?;
                        *widened.at_mut(row, col).ok()? = Complex::new(entry, 0.0);
                    }
                }
                return Some(carry_annotations(
                    ConstComplexMatrix::new(widened).to_value(),
                    m,
                ));
            }
            // Backward compatibility: against a constrained square N x N
            // target, a single row of exactly 2*4^N reals is an old-style
            // unitary. Only the leading 2*N*N entries hold the interleaved
            // real/imaginary pairs; the required length is kept as-is.
            if shape.rows == shape.cols && shape.rows > 0 && shape.rows <= 15 {
                let side = shape.rows as usize;
                let flat_len = 2usize << (2 * side);
                if rows == 1 && cols == flat_len {
                    let mut unpacked = CMatrix::new(side, side);
                    let mut index = 1usize;
                    for row in 1..=side {
                        for col in 1..=side {
                            let re = m.value().at(1, index).ok()?;
                            let im = m.value().at(1, index + 1).ok()?;
                            index += 2;
                            *unpacked.at_mut(row, col).ok()? = Complex::new(re, im);
                        }
                    }
                    return Some(carry_annotations(
                        ConstComplexMatrix::new(unpacked).to_value(),
                        m,
                    ));
                }
            }
            None
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_is_idempotent() {
        let values = [
            QubitRefs::from_indices([0, 1]).to_value(),
            BitRefs::from_indices([2]).to_value(),
            ConstBool::new(true).to_value(),
            ConstAxis::new(Axis::Y).to_value(),
            ConstInt::new(42).to_value(),
            ConstReal::new(1.5).to_value(),
            ConstComplex::new(Complex::new(1.0, -1.0)).to_value(),
            ConstString::new("s").to_value(),
            ConstJson::new("{}").to_value(),
        ];
        for value in values {
            let promoted = promote(&value, &value.type_of()).unwrap();
            assert_eq!(promoted, value);
        }
    }

    #[test]
    fn promoted_value_has_target_type() {
        let int = ConstInt::new(3).to_value();
        assert_eq!(promote(&int, &Type::Real).unwrap().type_of(), Type::Real);
        assert_eq!(
            promote(&int, &Type::Complex).unwrap().type_of(),
            Type::Complex
        );
        let real = ConstReal::new(0.5).to_value();
        assert_eq!(
            promote(&real, &Type::Complex).unwrap().type_of(),
            Type::Complex
        );
        assert_eq!(promote(&real, &Type::Int), None);
        assert_eq!(promote(&int, &Type::Bool), None);
    }

    #[test]
    fn bit_refs_promote_to_bool_but_not_qubit() {
        let bits = BitRefs::from_indices([0]).to_value();
        assert!(promote(&bits, &Type::Bool).is_some());
        assert!(promote(&bits, &Type::Qubit).is_none());
        let qubits = QubitRefs::from_indices([0]).to_value();
        assert!(promote(&qubits, &Type::Qubit).is_some());
        assert!(promote(&qubits, &Type::Bool).is_none());
    }

    #[test]
    fn matrix_shape_fit_with_wildcards() {
        let m = ConstRealMatrix::new(RMatrix::from_rows(vec![1.0, 2.0, 3.0, 4.0], 2).unwrap())
            .to_value();
        assert!(promote(&m, &Type::RealMatrix(MatrixShape::new(2, 2))).is_some());
        assert!(promote(&m, &Type::RealMatrix(MatrixShape::new(-1, 2))).is_some());
        assert!(promote(&m, &Type::RealMatrix(MatrixShape::new(3, 2))).is_none());
        // Widening to a complex matrix of the same shape.
        let widened = promote(&m, &Type::ComplexMatrix(MatrixShape::new(2, -1))).unwrap();
        let widened = widened.as_const_complex_matrix().unwrap();
        assert_eq!(
            widened.value().at(2, 1).unwrap(),
            Complex::new(3.0, 0.0)
        );
    }
}
