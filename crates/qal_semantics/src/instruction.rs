// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Instruction descriptors and the instruction table.
//!
//! Hosts register an [`InstructionDescriptor`] per supported gate overload;
//! the analyzer matches the instructions it finds in a QAL file against the
//! table. The annotation side-table on a descriptor is free for host
//! bookkeeping, a simulator attaching the gate matrix for instance, so hosts
//! need not maintain a separate map keyed on descriptors.

use std::sync::Arc;

use qal_tree::{Annotations, HasAnnotations};

use crate::resolver::{OverloadedNameResolver, ResolutionError};
use crate::types::{self, Type, TypeSpecError};
use crate::values::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct InstructionDescriptor {
    name: String,
    param_types: Vec<Type>,
    allow_conditional: bool,
    allow_parallel: bool,
    allow_reused_qubits: bool,
    annotations: Annotations,
}

impl InstructionDescriptor {
    /// Creates a descriptor from a shorthand parameter specification (see
    /// [`types::from_spec`]).
    ///
    /// `allow_conditional` permits `c-` execution of the instruction.
    /// `allow_parallel` permits bundling it with other instructions.
    /// `allow_reused_qubits` disables the check that rejects the same qubit
    /// appearing twice in the operand list.
    pub fn new(
        name: &str,
        param_types_shorthand: &str,
        allow_conditional: bool,
        allow_parallel: bool,
        allow_reused_qubits: bool,
    ) -> Result<InstructionDescriptor, TypeSpecError> {
        Ok(InstructionDescriptor::with_param_types(
            name,
            types::from_spec(param_types_shorthand)?,
            allow_conditional,
            allow_parallel,
            allow_reused_qubits,
        ))
    }

    /// Like [`InstructionDescriptor::new`] with the usual flags: conditional
    /// execution and bundling allowed, qubit reuse rejected.
    pub fn with_defaults(
        name: &str,
        param_types_shorthand: &str,
    ) -> Result<InstructionDescriptor, TypeSpecError> {
        InstructionDescriptor::new(name, param_types_shorthand, true, true, false)
    }

    /// Creates a descriptor from explicit parameter types, for signatures
    /// the shorthand cannot express.
    pub fn with_param_types(
        name: &str,
        param_types: Vec<Type>,
        allow_conditional: bool,
        allow_parallel: bool,
        allow_reused_qubits: bool,
    ) -> InstructionDescriptor {
        InstructionDescriptor {
            name: name.to_string(),
            param_types,
            allow_conditional,
            allow_parallel,
            allow_reused_qubits,
            annotations: Annotations::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[Type] {
        &self.param_types
    }

    pub fn allow_conditional(&self) -> bool {
        self.allow_conditional
    }

    pub fn allow_parallel(&self) -> bool {
        self.allow_parallel
    }

    pub fn allow_reused_qubits(&self) -> bool {
        self.allow_reused_qubits
    }
}

impl HasAnnotations for InstructionDescriptor {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }
}

/// Table of the supported instructions and their overloads.
#[derive(Clone, Debug, Default)]
pub struct InstructionTable {
    resolver: OverloadedNameResolver<Arc<InstructionDescriptor>>,
}

impl InstructionTable {
    pub fn new() -> InstructionTable {
        InstructionTable::default()
    }

    /// Registers an instruction overload under the descriptor's name.
    pub fn add(&mut self, descriptor: InstructionDescriptor) {
        let name = descriptor.name.clone();
        let param_types = descriptor.param_types.clone();
        self.resolver
            .add_overload(&name, Arc::new(descriptor), param_types);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolver.contains(name)
    }

    /// Resolves an instruction, returning the matching descriptor and the
    /// promoted operands.
    pub fn resolve(
        &self,
        name: &str,
        args: &[Value],
    ) -> Result<(Arc<InstructionDescriptor>, Vec<Value>), ResolutionError> {
        self.resolver.resolve(name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{ConstInt, ConstReal, QubitRefs};

    #[test]
    fn shorthand_expands_unitary_size() {
        let descriptor = InstructionDescriptor::with_defaults("cu", "qqu").unwrap();
        assert_eq!(descriptor.param_types().len(), 3);
        assert_eq!(
            descriptor.param_types()[2],
            Type::ComplexMatrix(crate::types::MatrixShape::new(4, 4))
        );
    }

    #[test]
    fn bad_shorthand_fails_fast() {
        assert!(InstructionDescriptor::with_defaults("zz", "qz").is_err());
    }

    #[test]
    fn resolution_promotes_operands() {
        let mut table = InstructionTable::new();
        table.add(InstructionDescriptor::with_defaults("rx", "qr").unwrap());
        let args = [
            QubitRefs::from_indices([0]).to_value(),
            ConstInt::new(1).to_value(),
        ];
        let (descriptor, promoted) = table.resolve("RX", &args).unwrap();
        assert_eq!(descriptor.name(), "rx");
        assert_eq!(promoted[1], ConstReal::new(1.0).to_value());
    }

    #[test]
    fn descriptor_annotations_are_host_storage() {
        #[derive(Clone, Debug, PartialEq)]
        struct GateMatrix(Vec<f64>);

        let mut descriptor = InstructionDescriptor::with_defaults("h", "q").unwrap();
        descriptor
            .annotations_mut()
            .set(GateMatrix(vec![0.5; 8]));
        let mut table = InstructionTable::new();
        table.add(descriptor);
        let (resolved, _) = table
            .resolve("h", &[QubitRefs::from_indices([0]).to_value()])
            .unwrap();
        assert!(resolved.annotations().has::<GateMatrix>());
    }
}
