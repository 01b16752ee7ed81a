// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Constant-folding functions.
//!
//! The analyzer rewrites `a + b` into a call to the synthetic name
//! `operator+` and dispatches it, like any other function call, through the
//! [`FunctionTable`]. The default table registers the arithmetic operators
//! over int, real and complex; hosts add their own functions with
//! [`FunctionTable::add`].

use std::sync::Arc;

use qal_primitives::Complex;
use thiserror::Error;

use crate::resolver::{OverloadedNameResolver, ResolutionError};
use crate::types::Type;
use crate::values::{ConstComplex, ConstInt, ConstReal, Value};

/// Error produced by a function implementation, e.g. integer overflow.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FunctionError(pub String);

pub type FunctionResult = Result<Value, FunctionError>;

/// A callable usable in QAL constant expressions. It receives the argument
/// list already promoted to the parameter types it was registered with.
pub type FunctionImpl = Arc<dyn Fn(Vec<Value>) -> FunctionResult + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum CallError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("in call to '{name}': {error}")]
    Function { name: String, error: FunctionError },
}

/// Table of all overloads of all constant-folding functions.
#[derive(Clone, Default)]
pub struct FunctionTable {
    resolver: OverloadedNameResolver<FunctionImpl>,
}

impl FunctionTable {
    /// Creates an empty table.
    pub fn new() -> FunctionTable {
        FunctionTable::default()
    }

    /// Creates a table with the default operator set registered.
    pub fn with_defaults() -> FunctionTable {
        let mut table = FunctionTable::new();
        register_default_functions(&mut table);
        table
    }

    /// Registers a function overload. Matching is case-insensitive; the
    /// implementation can assume the argument list has the registered arity
    /// and types.
    pub fn add<F>(&mut self, name: &str, param_types: Vec<Type>, implementation: F)
    where
        F: Fn(Vec<Value>) -> FunctionResult + Send + Sync + 'static,
    {
        self.resolver
            .add_overload(name, Arc::new(implementation), param_types);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolver.contains(name)
    }

    /// Resolves and calls a function, returning the value it produced.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        let (implementation, promoted_args) = self.resolver.resolve(name, args)?;
        implementation(promoted_args).map_err(|error| CallError::Function {
            name: name.to_string(),
            error,
        })
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionTable")
    }
}

fn expect_int(value: &Value) -> Result<i64, FunctionError> {
    value
        .as_const_int()
        .map(|v| *v.value())
        .ok_or_else(|| FunctionError("expected an integer argument".to_string()))
}

fn expect_real(value: &Value) -> Result<f64, FunctionError> {
    value
        .as_const_real()
        .map(|v| *v.value())
        .ok_or_else(|| FunctionError("expected a real argument".to_string()))
}

fn expect_complex(value: &Value) -> Result<Complex, FunctionError> {
    value
        .as_const_complex()
        .map(|v| *v.value())
        .ok_or_else(|| FunctionError("expected a complex argument".to_string()))
}

fn int_value(value: i64) -> FunctionResult {
    Ok(ConstInt::new(value).to_value())
}

fn real_value(value: f64) -> FunctionResult {
    Ok(ConstReal::new(value).to_value())
}

fn complex_value(value: Complex) -> FunctionResult {
    Ok(ConstComplex::new(value).to_value())
}

fn overflow() -> FunctionError {
    FunctionError("integer overflow in constant expression".to_string())
}

macro_rules! int_binop {
    ($table:expr, $name:literal, $method:ident) => {
        $table.add($name, vec![Type::Int, Type::Int], |args| {
            let lhs = expect_int(&args[0])?;
            let rhs = expect_int(&args[1])?;
            int_value(lhs.$method(rhs).ok_or_else(overflow)?)
        });
    };
}

macro_rules! real_binop {
    ($table:expr, $name:literal, $op:tt) => {
        $table.add($name, vec![Type::Real, Type::Real], |args| {
            real_value(expect_real(&args[0])? $op expect_real(&args[1])?)
        });
    };
}

macro_rules! complex_binop {
    ($table:expr, $name:literal, $op:tt) => {
        $table.add($name, vec![Type::Complex, Type::Complex], |args| {
            complex_value(expect_complex(&args[0])? $op expect_complex(&args[1])?)
        });
    };
}

/// Registers the arithmetic operators: unary `operator-` over int, real and
/// complex; `operator+`, `operator-` and `operator*` over (int, int),
/// (real, real) and (complex, complex) in that order; `operator/` and
/// `operator**` over (real, real) and (complex, complex), so that integer
/// operands reach them by promotion instead of truncating.
pub(crate) fn register_default_functions(table: &mut FunctionTable) {
    table.add("operator-", vec![Type::Int], |args| {
        int_value(expect_int(&args[0])?.checked_neg().ok_or_else(overflow)?)
    });
    table.add("operator-", vec![Type::Real], |args| {
        real_value(-expect_real(&args[0])?)
    });
    table.add("operator-", vec![Type::Complex], |args| {
        complex_value(-expect_complex(&args[0])?)
    });

    int_binop!(table, "operator+", checked_add);
    real_binop!(table, "operator+", +);
    complex_binop!(table, "operator+", +);

    int_binop!(table, "operator-", checked_sub);
    real_binop!(table, "operator-", -);
    complex_binop!(table, "operator-", -);

    int_binop!(table, "operator*", checked_mul);
    real_binop!(table, "operator*", *);
    complex_binop!(table, "operator*", *);

    real_binop!(table, "operator/", /);
    complex_binop!(table, "operator/", /);

    table.add("operator**", vec![Type::Real, Type::Real], |args| {
        real_value(expect_real(&args[0])?.powf(expect_real(&args[1])?))
    });
    table.add("operator**", vec![Type::Complex, Type::Complex], |args| {
        complex_value(expect_complex(&args[0])?.powc(expect_complex(&args[1])?))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Value {
        ConstInt::new(v).to_value()
    }

    fn real(v: f64) -> Value {
        ConstReal::new(v).to_value()
    }

    #[test]
    fn int_addition_stays_int() {
        let table = FunctionTable::with_defaults();
        let result = table.call("operator+", &[int(1), int(2)]).unwrap();
        assert_eq!(result, int(3));
    }

    #[test]
    fn mixed_addition_promotes_to_real() {
        let table = FunctionTable::with_defaults();
        let result = table.call("operator+", &[int(1), real(2.0)]).unwrap();
        assert_eq!(result, real(3.0));
    }

    #[test]
    fn division_never_truncates() {
        let table = FunctionTable::with_defaults();
        let result = table.call("operator/", &[int(1), int(2)]).unwrap();
        assert_eq!(result, real(0.5));
    }

    #[test]
    fn power_folds() {
        let table = FunctionTable::with_defaults();
        let result = table.call("operator**", &[int(2), int(10)]).unwrap();
        assert_eq!(result, real(1024.0));
    }

    #[test]
    fn unary_negate() {
        let table = FunctionTable::with_defaults();
        let result = table.call("operator-", &[int(5)]).unwrap();
        assert_eq!(result, int(-5));
    }

    #[test]
    fn overflow_is_an_error() {
        let table = FunctionTable::with_defaults();
        let error = table.call("operator+", &[int(i64::MAX), int(1)]).unwrap_err();
        assert!(matches!(error, CallError::Function { .. }));
    }

    #[test]
    fn host_functions_can_be_registered() {
        let mut table = FunctionTable::with_defaults();
        table.add("sqrt", vec![Type::Real], |args| {
            real_value(expect_real(&args[0])?.sqrt())
        });
        let result = table.call("SQRT", &[int(9)]).unwrap();
        assert_eq!(result, real(3.0));
    }
}
