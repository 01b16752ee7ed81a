// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Generic name and overload resolution.
//!
//! An [`OverloadResolver`] holds an ordered list of parameter-type
//! signatures, each tagged with some payload `T` (a function implementation,
//! an instruction descriptor, an error model descriptor). Resolution walks
//! the list in registration order and picks the first overload whose arity
//! matches and whose parameters all accept the arguments under promotion.
//! Ambiguity is therefore resolved by "first match wins": register more
//! specific overloads before more general ones.
//!
//! An [`OverloadedNameResolver`] maps case-insensitive names to overload
//! sets.

use hashbrown::HashMap;
use thiserror::Error;

use crate::types::Type;
use crate::values::{promote, Value};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("use of undefined name '{name}'")]
    NameResolutionFailure { name: String },
    #[error("no overload of '{name}' accepts argument types ({arg_types})")]
    OverloadResolutionFailure { name: String, arg_types: String },
}

impl ResolutionError {
    pub(crate) fn overload_failure(name: &str, args: &[Value]) -> ResolutionError {
        let arg_types = args
            .iter()
            .map(|arg| arg.type_of().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ResolutionError::OverloadResolutionFailure {
            name: name.to_string(),
            arg_types,
        }
    }
}

/// One possible overload: a payload tag plus the parameter types it expects.
#[derive(Clone, Debug)]
pub struct Overload<T> {
    tag: T,
    param_types: Vec<Type>,
}

impl<T> Overload<T> {
    pub fn tag(&self) -> &T {
        &self.tag
    }

    pub fn num_params(&self) -> usize {
        self.param_types.len()
    }

    pub fn param_types(&self) -> &[Type] {
        &self.param_types
    }
}

/// An ordered set of overloads sharing one name.
#[derive(Clone, Debug)]
pub struct OverloadResolver<T> {
    overloads: Vec<Overload<T>>,
}

impl<T> Default for OverloadResolver<T> {
    fn default() -> Self {
        OverloadResolver {
            overloads: Vec::new(),
        }
    }
}

impl<T: Clone> OverloadResolver<T> {
    pub fn new() -> OverloadResolver<T> {
        OverloadResolver {
            overloads: Vec::new(),
        }
    }

    /// Appends an overload. Insertion order is resolution order.
    pub fn add_overload(&mut self, tag: T, param_types: Vec<Type>) {
        self.overloads.push(Overload { tag, param_types });
    }

    /// Returns the tag of the first overload accepting `args`, along with
    /// the arguments promoted to that overload's parameter types.
    ///
    /// `name` is used in the error message only.
    pub fn resolve(&self, name: &str, args: &[Value]) -> Result<(T, Vec<Value>), ResolutionError> {
        'overloads: for overload in &self.overloads {
            if overload.num_params() != args.len() {
                continue;
            }
            let mut promoted_args = Vec::with_capacity(args.len());
            for (arg, param_type) in args.iter().zip(overload.param_types.iter()) {
                match promote(arg, param_type) {
                    Some(promoted) => promoted_args.push(promoted),
                    None => continue 'overloads,
                }
            }
            return Ok((overload.tag.clone(), promoted_args));
        }
        Err(ResolutionError::overload_failure(name, args))
    }
}

/// Table of overload sets with case-insensitive name matching.
#[derive(Clone, Debug)]
pub struct OverloadedNameResolver<T> {
    table: HashMap<String, OverloadResolver<T>>,
}

impl<T> Default for OverloadedNameResolver<T> {
    fn default() -> Self {
        OverloadedNameResolver {
            table: HashMap::new(),
        }
    }
}

impl<T: Clone> OverloadedNameResolver<T> {
    pub fn new() -> OverloadedNameResolver<T> {
        OverloadedNameResolver {
            table: HashMap::new(),
        }
    }

    /// Registers an overload for `name`. Matching is case-insensitive; the
    /// overload is appended to any set already registered under the name.
    pub fn add_overload(&mut self, name: &str, tag: T, param_types: Vec<Type>) {
        self.table
            .entry(name.to_lowercase())
            .or_default()
            .add_overload(tag, param_types);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(&name.to_lowercase())
    }

    /// Resolves `name` case-insensitively, then delegates to the overload
    /// set.
    pub fn resolve(&self, name: &str, args: &[Value]) -> Result<(T, Vec<Value>), ResolutionError> {
        match self.table.get(&name.to_lowercase()) {
            None => Err(ResolutionError::NameResolutionFailure {
                name: name.to_string(),
            }),
            Some(resolver) => resolver.resolve(name, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{ConstInt, ConstReal};

    fn int(v: i64) -> Value {
        ConstInt::new(v).to_value()
    }

    fn real(v: f64) -> Value {
        ConstReal::new(v).to_value()
    }

    #[test]
    fn first_match_wins() {
        let mut set = OverloadResolver::new();
        set.add_overload("ints", vec![Type::Int, Type::Int]);
        set.add_overload("reals", vec![Type::Real, Type::Real]);
        let (tag, args) = set.resolve("f", &[int(1), int(2)]).unwrap();
        assert_eq!(tag, "ints");
        assert!(args[0].as_const_int().is_some());
        // A real argument skips the int overload and promotes the other
        // argument along.
        let (tag, args) = set.resolve("f", &[int(1), real(2.0)]).unwrap();
        assert_eq!(tag, "reals");
        assert_eq!(*args[0].as_const_real().unwrap().value(), 1.0);
    }

    #[test]
    fn registration_order_decides_ambiguity() {
        let mut forward = OverloadResolver::new();
        forward.add_overload("ints", vec![Type::Int, Type::Int]);
        forward.add_overload("reals", vec![Type::Real, Type::Real]);
        let mut backward = OverloadResolver::new();
        backward.add_overload("reals", vec![Type::Real, Type::Real]);
        backward.add_overload("ints", vec![Type::Int, Type::Int]);
        // Both overloads accept two ints; the winner flips with the order.
        let args = [int(1), int(2)];
        assert_eq!(forward.resolve("f", &args).unwrap().0, "ints");
        assert_eq!(backward.resolve("f", &args).unwrap().0, "reals");
    }

    #[test]
    fn arity_must_match() {
        let mut set = OverloadResolver::new();
        set.add_overload("one", vec![Type::Int]);
        assert!(set.resolve("f", &[int(1), int(2)]).is_err());
    }

    #[test]
    fn names_match_case_insensitively() {
        let mut table = OverloadedNameResolver::new();
        table.add_overload("CNOT", "cnot", vec![Type::Int]);
        assert!(table.contains("cnot"));
        assert!(table.resolve("cNoT", &[int(0)]).is_ok());
        let error = table.resolve("cnott", &[int(0)]).unwrap_err();
        assert_eq!(
            error,
            ResolutionError::NameResolutionFailure {
                name: "cnott".to_string()
            }
        );
    }

    #[test]
    fn overload_failure_reports_argument_types() {
        let mut table = OverloadedNameResolver::new();
        table.add_overload("f", "f", vec![Type::Int]);
        let error = table.resolve("f", &[real(1.0)]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "no overload of 'f' accepts argument types (real)"
        );
    }
}
