// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

// The resolved program representation produced by the analyzer: every name
// resolved, every instruction matched against the host's instruction set,
// every constant folded, every index bounds-checked. Construction from the
// AST is in analyzer.rs.

use std::sync::Arc;

use qal_primitives::{Int, Str};
use qal_tree::{Annotations, Any, HasAnnotations, Many, Maybe, One, TreeNode};

use crate::error_model::ErrorModelDescriptor;
use crate::instruction::InstructionDescriptor;
use crate::values::{ConstInt, Value};

macro_rules! impl_semantic_node {
    ($($node:ident),+ $(,)?) => {
        $(impl HasAnnotations for $node {
            fn annotations(&self) -> &Annotations {
                &self.annotations
            }

            fn annotations_mut(&mut self) -> &mut Annotations {
                &mut self.annotations
            }
        })+
    };
}

impl_semantic_node!(Program, Version, Subcircuit, Bundle, Instruction, ErrorModel, AnnotationData);

/// The root of the semantic tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    version: One<Version>,
    num_qubits: One<ConstInt>,
    error_model: Maybe<ErrorModel>,
    subcircuits: Any<Subcircuit>,
    annotations: Annotations,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn set_version(&mut self, version: Version) {
        self.version.set(version);
    }

    pub fn set_num_qubits(&mut self, num_qubits: ConstInt) {
        self.num_qubits.set(num_qubits);
    }

    pub fn set_error_model(&mut self, error_model: ErrorModel) {
        self.error_model.set(error_model);
    }

    pub fn add_subcircuit(&mut self, subcircuit: Subcircuit) {
        self.subcircuits.add(subcircuit);
    }

    pub fn version(&self) -> &One<Version> {
        &self.version
    }

    pub fn num_qubits(&self) -> &One<ConstInt> {
        &self.num_qubits
    }

    pub fn error_model(&self) -> &Maybe<ErrorModel> {
        &self.error_model
    }

    pub fn subcircuits(&self) -> &Any<Subcircuit> {
        &self.subcircuits
    }

    /// Total number of instructions across all subcircuits.
    pub fn num_instructions(&self) -> usize {
        self.subcircuits
            .iter()
            .flat_map(|subcircuit| subcircuit.bundles().iter())
            .map(|bundle| bundle.items().size())
            .sum()
    }

    /// Print the semantic tree using the pretty `Debug` format.
    pub fn print_debug_pretty(&self) {
        println!("{self:#?}");
    }
}

impl TreeNode for Program {
    fn is_complete(&self) -> bool {
        self.version.is_complete()
            && self.num_qubits.is_complete()
            && self.error_model.is_complete()
            && self.subcircuits.is_complete()
    }
}

/// The validated file format version.
#[derive(Clone, Debug, PartialEq)]
pub struct Version {
    version: qal_primitives::Version,
    annotations: Annotations,
}

impl Version {
    pub fn new(items: Vec<Int>) -> Version {
        Version {
            version: qal_primitives::Version::new(items),
            annotations: Annotations::new(),
        }
    }

    pub fn version(&self) -> &qal_primitives::Version {
        &self.version
    }

    pub fn items(&self) -> &[Int] {
        self.version.items()
    }
}

impl TreeNode for Version {
    fn is_complete(&self) -> bool {
        true
    }
}

/// A named sequence of bundles with an iteration count. The anonymous
/// leading subcircuit has no name.
#[derive(Clone, Debug, PartialEq)]
pub struct Subcircuit {
    name: Option<Str>,
    iterations: One<ConstInt>,
    bundles: Any<Bundle>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl Subcircuit {
    pub fn new(name: Option<Str>, iterations: ConstInt) -> Subcircuit {
        Subcircuit {
            name,
            iterations: One::from(iterations),
            bundles: Any::empty(),
            annotation_data: Any::empty(),
            annotations: Annotations::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn iterations(&self) -> &One<ConstInt> {
        &self.iterations
    }

    pub fn bundles(&self) -> &Any<Bundle> {
        &self.bundles
    }

    pub fn add_bundle(&mut self, bundle: Bundle) {
        self.bundles.add(bundle);
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }
}

impl TreeNode for Subcircuit {
    fn is_complete(&self) -> bool {
        self.iterations.is_complete()
            && self.bundles.is_complete()
            && self.annotation_data.is_complete()
    }
}

/// A group of instructions executed in parallel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bundle {
    items: Many<Instruction>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl Bundle {
    pub fn new() -> Bundle {
        Bundle::default()
    }

    pub fn items(&self) -> &Many<Instruction> {
        &self.items
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.items.add(instruction);
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }
}

impl TreeNode for Bundle {
    fn is_complete(&self) -> bool {
        self.items.is_complete() && self.annotation_data.is_complete()
    }
}

/// A resolved instruction.
///
/// `descriptor` is the matched registration record; it is absent when the
/// analyzer ran with instruction resolution disabled. `name` preserves the
/// case the source used. The condition, when present, is either the
/// constant true or a `BitRefs` value (constant-false conditions drop the
/// instruction during analysis).
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    descriptor: Option<Arc<InstructionDescriptor>>,
    name: Str,
    condition: Maybe<Value>,
    operands: Many<Value>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl Instruction {
    pub fn new(
        descriptor: Option<Arc<InstructionDescriptor>>,
        name: &str,
        condition: Option<Value>,
        operands: Many<Value>,
    ) -> Instruction {
        Instruction {
            descriptor,
            name: name.to_string(),
            condition: condition.map_or_else(Maybe::empty, Maybe::from),
            operands,
            annotation_data: Any::empty(),
            annotations: Annotations::new(),
        }
    }

    pub fn descriptor(&self) -> Option<&Arc<InstructionDescriptor>> {
        self.descriptor.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &Maybe<Value> {
        &self.condition
    }

    pub fn operands(&self) -> &Many<Value> {
        &self.operands
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }
}

impl TreeNode for Instruction {
    fn is_complete(&self) -> bool {
        self.condition.is_complete()
            && self.operands.is_complete()
            && self.annotation_data.is_complete()
    }
}

/// The resolved error model, at most one per program.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorModel {
    descriptor: Option<Arc<ErrorModelDescriptor>>,
    name: Str,
    operands: Any<Value>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl ErrorModel {
    pub fn new(
        descriptor: Option<Arc<ErrorModelDescriptor>>,
        name: &str,
        operands: Any<Value>,
    ) -> ErrorModel {
        ErrorModel {
            descriptor,
            name: name.to_string(),
            operands,
            annotation_data: Any::empty(),
            annotations: Annotations::new(),
        }
    }

    pub fn descriptor(&self) -> Option<&Arc<ErrorModelDescriptor>> {
        self.descriptor.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operands(&self) -> &Any<Value> {
        &self.operands
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }
}

impl TreeNode for ErrorModel {
    fn is_complete(&self) -> bool {
        self.operands.is_complete() && self.annotation_data.is_complete()
    }
}

/// A lowered `@interface.operation(...)` annotation. The interface and
/// operation names are preserved verbatim for downstream consumers; only
/// the argument list is evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationData {
    interface: Str,
    operation: Str,
    operands: Any<Value>,
    annotations: Annotations,
}

impl AnnotationData {
    pub fn new(interface: &str, operation: &str, operands: Any<Value>) -> AnnotationData {
        AnnotationData {
            interface: interface.to_string(),
            operation: operation.to_string(),
            operands,
            annotations: Annotations::new(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn operands(&self) -> &Any<Value> {
        &self.operands
    }
}

impl TreeNode for AnnotationData {
    fn is_complete(&self) -> bool {
        self.operands.is_complete()
    }
}
