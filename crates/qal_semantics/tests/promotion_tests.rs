// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

// The promotion lattice, tested pair by pair.

use qal_primitives::{Axis, CMatrix, Complex64, RMatrix};
use qal_semantics::types::{MatrixShape, Type};
use qal_semantics::values::{
    BitRefs, ConstAxis, ConstBool, ConstComplex, ConstComplexMatrix, ConstInt, ConstJson,
    ConstReal, ConstRealMatrix, ConstString, QubitRefs, Value,
};

fn all_values() -> Vec<Value> {
    vec![
        QubitRefs::from_indices([0]).to_value(),
        BitRefs::from_indices([0]).to_value(),
        ConstBool::new(true).to_value(),
        ConstAxis::new(Axis::Z).to_value(),
        ConstInt::new(2).to_value(),
        ConstReal::new(2.5).to_value(),
        ConstComplex::new(Complex64::new(1.0, 2.0)).to_value(),
        ConstRealMatrix::new(RMatrix::from_rows(vec![1.0, 2.0], 2).unwrap()).to_value(),
        ConstComplexMatrix::new(CMatrix::from_rows(vec![Complex64::new(1.0, 0.0)], 1).unwrap())
            .to_value(),
        ConstString::new("s").to_value(),
        ConstJson::new("{}").to_value(),
    ]
}

fn all_types() -> Vec<Type> {
    vec![
        Type::Qubit,
        Type::Bool,
        Type::Axis,
        Type::Int,
        Type::Real,
        Type::Complex,
        Type::RealMatrix(MatrixShape::unconstrained()),
        Type::ComplexMatrix(MatrixShape::unconstrained()),
        Type::String,
        Type::Json,
    ]
}

/// Which (value, target) pairs the lattice accepts, with wildcard matrix
/// targets. Everything else must return `None`.
fn accepted(value: &Value, target: &Type) -> bool {
    use Type::*;
    match (value, target) {
        (Value::QubitRefs(_), Qubit) => true,
        (Value::BitRefs(_), Bool) => true,
        (Value::ConstBool(_), Bool) => true,
        (Value::ConstAxis(_), Axis) => true,
        (Value::ConstInt(_), Int | Real | Complex) => true,
        (Value::ConstReal(_), Real | Complex) => true,
        (Value::ConstComplex(_), Complex) => true,
        (Value::ConstRealMatrix(_), RealMatrix(_) | ComplexMatrix(_)) => true,
        (Value::ConstComplexMatrix(_), ComplexMatrix(_)) => true,
        (Value::ConstString(_), String) => true,
        (Value::ConstJson(_), Json) => true,
        _ => false,
    }
}

#[test]
fn promotion_table_is_total() {
    for value in all_values() {
        for target in all_types() {
            let result = value.promote(&target);
            assert_eq!(
                result.is_some(),
                accepted(&value, &target),
                "promote({value}, {target})"
            );
        }
    }
}

#[test]
fn promotion_is_idempotent_under_structural_equality() {
    for value in all_values() {
        let promoted = value.promote(&value.type_of()).unwrap();
        assert_eq!(promoted, value, "{value}");
    }
}

#[test]
fn promoted_type_matches_target_modulo_wildcards() {
    for value in all_values() {
        for target in all_types() {
            let Some(promoted) = value.promote(&target) else {
                continue;
            };
            match (&target, promoted.type_of()) {
                // Wildcard dimensions resolve to the source dimensions.
                (Type::RealMatrix(_), Type::RealMatrix(_)) => {}
                (Type::ComplexMatrix(_), Type::ComplexMatrix(_)) => {}
                (expected, actual) => assert_eq!(*expected, actual),
            }
        }
    }
}

#[test]
fn constrained_matrix_targets_check_shape() {
    let wide = ConstRealMatrix::new(RMatrix::from_rows(vec![0.0; 6], 3).unwrap()).to_value();
    assert!(wide.promote(&Type::RealMatrix(MatrixShape::new(2, 3))).is_some());
    assert!(wide.promote(&Type::RealMatrix(MatrixShape::new(-1, 3))).is_some());
    assert!(wide.promote(&Type::RealMatrix(MatrixShape::new(2, 2))).is_none());
    assert!(wide.promote(&Type::ComplexMatrix(MatrixShape::new(2, 3))).is_some());
}

#[test]
fn legacy_flatten_builds_the_expected_entries() {
    // A 1 x 32 real row against a 2x2 complex target: entry (r+1, c+1) is
    // complex(src[2*(2r + c) + 1], src[2*(2r + c) + 2]), 1-indexed.
    let flat: Vec<f64> = (1..=32).map(f64::from).collect();
    let source = ConstRealMatrix::new(RMatrix::from_rows(flat, 32).unwrap()).to_value();
    let target = Type::ComplexMatrix(MatrixShape::new(2, 2));
    let promoted = source.promote(&target).unwrap();
    let matrix = promoted.as_const_complex_matrix().unwrap().value();
    assert_eq!(matrix.size_rows(), 2);
    assert_eq!(matrix.size_cols(), 2);
    assert_eq!(matrix.at(1, 1).unwrap(), Complex64::new(1.0, 2.0));
    assert_eq!(matrix.at(1, 2).unwrap(), Complex64::new(3.0, 4.0));
    assert_eq!(matrix.at(2, 1).unwrap(), Complex64::new(5.0, 6.0));
    assert_eq!(matrix.at(2, 2).unwrap(), Complex64::new(7.0, 8.0));
}

#[test]
fn legacy_flatten_requires_the_exact_flat_length() {
    // Eight entries would be enough to fill a 2x2 matrix, but the legacy
    // rule demands the historical 2*4^n length.
    let source =
        ConstRealMatrix::new(RMatrix::from_rows((1..=8).map(f64::from).collect(), 8).unwrap())
            .to_value();
    let target = Type::ComplexMatrix(MatrixShape::new(2, 2));
    assert!(source.promote(&target).is_none());
}

#[test]
fn legacy_flatten_needs_a_constrained_square_target() {
    let flat: Vec<f64> = (1..=32).map(f64::from).collect();
    let source = ConstRealMatrix::new(RMatrix::from_rows(flat, 32).unwrap()).to_value();
    assert!(source
        .promote(&Type::ComplexMatrix(MatrixShape::unconstrained()))
        .is_some()); // plain widening of the 1x32 row, not a flatten
    let widened = source
        .promote(&Type::ComplexMatrix(MatrixShape::unconstrained()))
        .unwrap();
    assert_eq!(
        widened.as_const_complex_matrix().unwrap().value().size_cols(),
        32
    );
    assert!(source
        .promote(&Type::ComplexMatrix(MatrixShape::new(2, 3)))
        .is_none());
}
