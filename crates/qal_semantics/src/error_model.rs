// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Error model descriptors and the error model table.
//!
//! A number of these can be registered to inform the analyzer which error
//! models the host supports. Multiple descriptors may share a name as long
//! as their parameter types differ (overloading). As with instruction
//! descriptors, the annotation side-table is free for host bookkeeping.

use std::sync::Arc;

use qal_tree::{Annotations, HasAnnotations};

use crate::resolver::{OverloadedNameResolver, ResolutionError};
use crate::types::{self, Type, TypeSpecError};
use crate::values::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorModelDescriptor {
    name: String,
    param_types: Vec<Type>,
    annotations: Annotations,
}

impl ErrorModelDescriptor {
    /// Creates a descriptor from a shorthand parameter specification (see
    /// [`types::from_spec`]).
    pub fn new(name: &str, param_types_shorthand: &str) -> Result<ErrorModelDescriptor, TypeSpecError> {
        Ok(ErrorModelDescriptor {
            name: name.to_string(),
            param_types: types::from_spec(param_types_shorthand)?,
            annotations: Annotations::new(),
        })
    }

    /// Creates a descriptor from explicit parameter types.
    pub fn with_param_types(name: &str, param_types: Vec<Type>) -> ErrorModelDescriptor {
        ErrorModelDescriptor {
            name: name.to_string(),
            param_types,
            annotations: Annotations::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[Type] {
        &self.param_types
    }
}

impl HasAnnotations for ErrorModelDescriptor {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }
}

/// Table of the supported error models and their overloads.
#[derive(Clone, Debug, Default)]
pub struct ErrorModelTable {
    resolver: OverloadedNameResolver<Arc<ErrorModelDescriptor>>,
}

impl ErrorModelTable {
    pub fn new() -> ErrorModelTable {
        ErrorModelTable::default()
    }

    /// Registers an error model overload under the descriptor's name.
    pub fn add(&mut self, descriptor: ErrorModelDescriptor) {
        let name = descriptor.name.clone();
        let param_types = descriptor.param_types.clone();
        self.resolver
            .add_overload(&name, Arc::new(descriptor), param_types);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolver.contains(name)
    }

    /// Resolves an error model, returning the matching descriptor and the
    /// promoted arguments.
    pub fn resolve(
        &self,
        name: &str,
        args: &[Value],
    ) -> Result<(Arc<ErrorModelDescriptor>, Vec<Value>), ResolutionError> {
        self.resolver.resolve(name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ConstInt;

    #[test]
    fn overloads_by_arity() {
        let mut table = ErrorModelTable::new();
        table.add(ErrorModelDescriptor::new("depolarizing_channel", "r").unwrap());
        table.add(ErrorModelDescriptor::new("depolarizing_channel", "rr").unwrap());
        let one = [ConstInt::new(1).to_value()];
        let two = [ConstInt::new(1).to_value(), ConstInt::new(2).to_value()];
        let (descriptor, args) = table.resolve("depolarizing_channel", &one).unwrap();
        assert_eq!(descriptor.param_types().len(), 1);
        assert!(args[0].as_const_real().is_some());
        let (descriptor, _) = table.resolve("Depolarizing_Channel", &two).unwrap();
        assert_eq!(descriptor.param_types().len(), 2);
    }
}
