// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

// Construction of the semantic tree defined in semantic.rs from the AST
// built by qal_syntax. Recoverable errors are accumulated per statement so
// as much of the program as possible gets analyzed.

use hashbrown::HashSet;

use qal_primitives::{Axis, Complex};
use qal_syntax::ast;
use qal_syntax::{HasSourceLocation, SourceLocation};
use qal_tree::{Any, HasAnnotations, Many};

use crate::error::{
    AnalysisError,
    AnalysisErrorKind::{self, *},
};
use crate::error_model::{ErrorModelDescriptor, ErrorModelTable};
use crate::functions::{CallError, FunctionResult, FunctionTable};
use crate::instruction::{InstructionDescriptor, InstructionTable};
use crate::mappings::MappingTable;
use crate::resolver::ResolutionError;
use crate::semantic;
use crate::types::Type;
use crate::values::{
    BitRefs, ConstAxis, ConstBool, ConstComplex, ConstInt, ConstJson, ConstReal, ConstString,
    QubitRefs, Value,
};

/// The result of analyzing one AST: the semantic tree, the accumulated
/// error list, and the final state of the mapping table (the reserved names
/// `q` and `b` included). Analysis succeeded if and only if `errors` is
/// empty.
#[derive(Clone, Debug)]
pub struct AnalysisResult {
    program: semantic::Program,
    errors: Vec<AnalysisError>,
    mappings: MappingTable,
}

impl AnalysisResult {
    pub fn program(&self) -> &semantic::Program {
        &self.program
    }

    pub fn errors(&self) -> &[AnalysisError] {
        &self.errors
    }

    /// The errors in their externally visible form,
    /// `"<location>: <message>"`.
    pub fn error_strings(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.to_string()).collect()
    }

    pub fn any_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    pub fn into_parts(self) -> (semantic::Program, Vec<AnalysisError>, MappingTable) {
        (self.program, self.errors, self.mappings)
    }
}

/// Semantic analyzer for QAL programs.
///
/// Hosts configure an analyzer once (mappings, constant functions,
/// instruction set, error models) and may then analyze any number of
/// programs with it; `analyze` takes `&self` and keeps no state across
/// calls.
pub struct Analyzer {
    mappings: MappingTable,
    functions: FunctionTable,
    instructions: InstructionTable,
    error_models: ErrorModelTable,
    resolve_instructions: bool,
    resolve_error_model: bool,
}

impl Analyzer {
    /// Creates an analyzer with the default constants (`true`, `false`,
    /// `pi`, `eu`, `im`, and the axes `x`, `y`, `z`) and the default
    /// operator set registered.
    pub fn new() -> Analyzer {
        Analyzer {
            mappings: default_mappings(),
            functions: FunctionTable::with_defaults(),
            instructions: InstructionTable::new(),
            error_models: ErrorModelTable::new(),
            resolve_instructions: true,
            resolve_error_model: true,
        }
    }

    /// Creates an analyzer with empty tables, for hosts that want full
    /// control over every binding.
    pub fn without_defaults() -> Analyzer {
        Analyzer {
            mappings: MappingTable::new(),
            functions: FunctionTable::new(),
            instructions: InstructionTable::new(),
            error_models: ErrorModelTable::new(),
            resolve_instructions: true,
            resolve_error_model: true,
        }
    }

    /// Binds `name` to `value` in the initial scope of every subsequent
    /// analysis. Rebinding overwrites.
    pub fn register_mapping(&mut self, name: &str, value: Value) {
        self.mappings.bind(name, value);
    }

    /// Registers a constant-folding function overload. The implementation
    /// receives arguments already promoted to `param_types`.
    pub fn register_function<F>(&mut self, name: &str, param_types: Vec<Type>, implementation: F)
    where
        F: Fn(Vec<Value>) -> FunctionResult + Send + Sync + 'static,
    {
        self.functions.add(name, param_types, implementation);
    }

    pub fn register_instruction(&mut self, descriptor: InstructionDescriptor) {
        self.instructions.add(descriptor);
    }

    pub fn register_error_model(&mut self, descriptor: ErrorModelDescriptor) {
        self.error_models.add(descriptor);
    }

    /// When disabled, instructions are emitted with no descriptor and
    /// unpromoted operands, and the conditional/parallel/reuse checks are
    /// skipped.
    pub fn set_resolve_instructions(&mut self, enable: bool) {
        self.resolve_instructions = enable;
    }

    /// When disabled, the error model statement is stored with no
    /// descriptor and unpromoted arguments.
    pub fn set_resolve_error_model(&mut self, enable: bool) {
        self.resolve_error_model = enable;
    }

    /// Analyzes an AST root, producing the semantic tree and the error
    /// list.
    pub fn analyze(&self, root: &ast::Root) -> AnalysisResult {
        let mut context = Context {
            analyzer: self,
            program: semantic::Program::new(),
            mappings: self.mappings.clone(),
            errors: Vec::new(),
            current: None,
        };
        match root {
            ast::Root::Program(program) => context.analyze_program(program),
            ast::Root::Erroneous(erroneous) => {
                context.errors.push(AnalysisError::new(
                    ErroneousProgram,
                    erroneous.source_location().cloned(),
                    "cannot analyze: parsing did not produce a program",
                ));
            }
        }
        AnalysisResult {
            program: context.program,
            errors: context.errors,
            mappings: context.mappings,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new()
    }
}

fn default_mappings() -> MappingTable {
    let mut mappings = MappingTable::new();
    mappings.bind("true", ConstBool::new(true).to_value());
    mappings.bind("false", ConstBool::new(false).to_value());
    mappings.bind("pi", ConstReal::new(std::f64::consts::PI).to_value());
    mappings.bind("eu", ConstReal::new(std::f64::consts::E).to_value());
    mappings.bind("im", ConstComplex::new(Complex::new(0.0, 1.0)).to_value());
    mappings.bind("x", ConstAxis::new(Axis::X).to_value());
    mappings.bind("y", ConstAxis::new(Axis::Y).to_value());
    mappings.bind("z", ConstAxis::new(Axis::Z).to_value());
    mappings
}

struct Context<'a> {
    analyzer: &'a Analyzer,
    program: semantic::Program,
    mappings: MappingTable,
    errors: Vec<AnalysisError>,
    /// The subcircuit collecting bundles, if any has been opened.
    current: Option<semantic::Subcircuit>,
}

fn location_of(node: &impl HasAnnotations) -> Option<SourceLocation> {
    node.source_location().cloned()
}

fn resolution_error_kind(error: &ResolutionError) -> AnalysisErrorKind {
    match error {
        ResolutionError::NameResolutionFailure { .. } => NameResolutionFailure,
        ResolutionError::OverloadResolutionFailure { .. } => OverloadResolutionFailure,
    }
}

impl Context<'_> {
    fn push(
        &mut self,
        kind: AnalysisErrorKind,
        location: Option<SourceLocation>,
        message: impl ToString,
    ) {
        self.errors.push(AnalysisError::new(kind, location, message));
    }

    fn push_resolution_error(&mut self, error: ResolutionError, node: &impl HasAnnotations) {
        self.push(
            resolution_error_kind(&error),
            location_of(node),
            error.to_string(),
        );
    }

    //
    // Program structure
    //

    fn analyze_program(&mut self, program: &ast::Program) {
        self.version_statement(program);
        self.qubits_statement(program);
        if let Some(statements) = program.statements().as_option() {
            for statement in statements.items() {
                match statement {
                    ast::Statement::Mapping(mapping) => self.mapping_statement(mapping),
                    ast::Statement::Subcircuit(subcircuit) => {
                        self.subcircuit_statement(subcircuit)
                    }
                    ast::Statement::Bundle(bundle) => self.bundle_statement(bundle),
                    // Already reported by the parser.
                    ast::Statement::Erroneous(_) => {}
                }
            }
        }
        if let Some(open) = self.current.take() {
            self.program.add_subcircuit(open);
        }
    }

    fn version_statement(&mut self, program: &ast::Program) {
        // An empty container means the parser already failed the header.
        let Some(node) = program.version().as_option() else {
            return;
        };
        for &item in node.items() {
            if item < 0 {
                self.push(
                    VersionComponentInvalid,
                    location_of(node),
                    format!("version component {item} is negative"),
                );
            }
        }
        let mut version = semantic::Version::new(node.items().to_vec());
        version.annotations_mut().copy_from(node.annotations());
        self.program.set_version(version);
    }

    fn qubits_statement(&mut self, program: &ast::Program) {
        let Some(expr) = program.num_qubits().as_option() else {
            return;
        };
        let value = match self.eval(expr) {
            Ok(value) => value,
            Err(error) => {
                self.errors.push(error);
                return;
            }
        };
        let num_qubits = match value.promote(&Type::Int) {
            Some(Value::ConstInt(int)) if *int.value() >= 1 => int,
            _ => {
                self.push(
                    NumQubitsInvalid,
                    location_of(expr),
                    format!(
                        "qubit count must be a constant positive integer, got {}",
                        value.type_of()
                    ),
                );
                return;
            }
        };
        let count = *num_qubits.value();
        self.program.set_num_qubits(num_qubits);
        // The full qubit and measurement registers.
        self.mappings
            .bind("q", QubitRefs::from_indices(0..count).to_value());
        self.mappings
            .bind("b", BitRefs::from_indices(0..count).to_value());
    }

    /// `map` evaluates its expression once, eagerly, and binds the alias by
    /// value. Rebinding an existing name silently overwrites it.
    fn mapping_statement(&mut self, mapping: &ast::Mapping) {
        let alias = mapping.alias().get().unwrap().name().to_string();
        match self.eval(mapping.expr().get().unwrap()) {
            Ok(value) => self.mappings.bind(&alias, value),
            Err(error) => self.errors.push(error),
        }
    }

    fn subcircuit_statement(&mut self, subcircuit: &ast::Subcircuit) {
        if let Some(open) = self.current.take() {
            self.program.add_subcircuit(open);
        }
        let name = subcircuit.name().get().unwrap().name().to_string();
        let iterations = match subcircuit.iterations().as_option() {
            None => ConstInt::new(1),
            Some(expr) => match self.eval(expr) {
                Err(error) => {
                    self.errors.push(error);
                    ConstInt::new(1)
                }
                Ok(value) => match value.promote(&Type::Int) {
                    Some(Value::ConstInt(int)) if *int.value() >= 1 => int,
                    _ => {
                        self.push(
                            SubcircuitIterationInvalid,
                            location_of(expr),
                            format!(
                                "iteration count must be a constant positive integer, got {}",
                                value.type_of()
                            ),
                        );
                        ConstInt::new(1)
                    }
                },
            },
        };
        let mut opened = semantic::Subcircuit::new(Some(name), iterations);
        opened.annotations_mut().copy_from(subcircuit.annotations());
        for data in subcircuit.annotation_data() {
            if let Some(lowered) = self.lower_annotation(data) {
                opened.add_annotation_data(lowered);
            }
        }
        self.current = Some(opened);
    }

    fn bundle_statement(&mut self, bundle: &ast::Bundle) {
        let size = bundle.items().size();
        // The error model statement arrives as an instruction named
        // `error_model`; intercept it before any scope evaluation.
        if size == 1 {
            let instruction = bundle.items().at(0).unwrap();
            let name = instruction.name().get().unwrap().name();
            if name.eq_ignore_ascii_case("error_model") {
                self.error_model_statement(instruction);
                return;
            }
        }
        let mut items = Vec::new();
        for instruction in bundle.items() {
            let name = instruction.name().get().unwrap().name();
            if name.eq_ignore_ascii_case("error_model") {
                self.push(
                    ErrorModelInvalid,
                    location_of(instruction),
                    "error model cannot be bundled with instructions",
                );
                continue;
            }
            if let Some(resolved) = self.resolve_instruction(instruction, size) {
                items.push(resolved);
            }
        }
        if items.is_empty() {
            // Every instruction was dropped (or failed); there is no bundle
            // to emit.
            return;
        }
        let mut lowered = semantic::Bundle::new();
        for item in items {
            lowered.add_instruction(item);
        }
        lowered.annotations_mut().copy_from(bundle.annotations());
        for data in bundle.annotation_data() {
            if let Some(lowered_data) = self.lower_annotation(data) {
                lowered.add_annotation_data(lowered_data);
            }
        }
        self.current_subcircuit().add_bundle(lowered);
    }

    /// The subcircuit collecting bundles, opening the anonymous leading
    /// subcircuit if no header has been seen yet.
    fn current_subcircuit(&mut self) -> &mut semantic::Subcircuit {
        self.current
            .get_or_insert_with(|| semantic::Subcircuit::new(None, ConstInt::new(1)))
    }

    fn resolve_instruction(
        &mut self,
        instruction: &ast::Instruction,
        bundle_size: usize,
    ) -> Option<semantic::Instruction> {
        let name = instruction.name().get().unwrap().name().to_string();

        let mut operands = Vec::new();
        for expr in instruction.operands().get().unwrap().items() {
            match self.eval(expr) {
                Ok(value) => operands.push(value),
                Err(error) => {
                    self.errors.push(error);
                    return None;
                }
            }
        }

        let condition_value = match instruction.condition().as_option() {
            None => None,
            Some(expr) => match self.eval(expr) {
                Ok(value) => Some((value, expr)),
                Err(error) => {
                    self.errors.push(error);
                    return None;
                }
            },
        };

        if !self.analyzer.resolve_instructions {
            // No table lookup: emit with whatever was evaluated.
            let mut unresolved = semantic::Instruction::new(
                None,
                &name,
                condition_value.map(|(value, _)| value),
                Many::from(operands),
            );
            unresolved
                .annotations_mut()
                .copy_from(instruction.annotations());
            for data in instruction.annotation_data() {
                if let Some(lowered) = self.lower_annotation(data) {
                    unresolved.add_annotation_data(lowered);
                }
            }
            return Some(unresolved);
        }

        let (descriptor, promoted) = match self.analyzer.instructions.resolve(&name, &operands) {
            Ok(resolution) => resolution,
            Err(error) => {
                self.push_resolution_error(error, instruction);
                return None;
            }
        };

        let condition = match condition_value {
            None => None,
            Some((value, expr)) => {
                if !descriptor.allow_conditional() {
                    self.push(
                        ConditionalExecutionNotSupported,
                        location_of(instruction),
                        format!("instruction '{name}' does not support conditional execution"),
                    );
                    return None;
                }
                match value.promote(&Type::Bool) {
                    None => {
                        self.push(
                            InvalidCondition,
                            location_of(expr),
                            format!(
                                "condition must be a bit reference or boolean, got {}",
                                value.type_of()
                            ),
                        );
                        return None;
                    }
                    // A constant-false condition makes the instruction a
                    // no-op; drop it without error.
                    Some(Value::ConstBool(flag)) if !*flag.value() => return None,
                    Some(promoted_condition) => Some(promoted_condition),
                }
            }
        };

        if !descriptor.allow_reused_qubits() {
            let mut seen = HashSet::new();
            for operand in &promoted {
                let Value::QubitRefs(refs) = operand else {
                    continue;
                };
                for index in refs.index_values() {
                    if !seen.insert(index) {
                        self.push(
                            QubitsNotUnique,
                            location_of(instruction),
                            format!("qubit {index} is used more than once by '{name}'"),
                        );
                        return None;
                    }
                }
            }
        }

        if bundle_size > 1 && !descriptor.allow_parallel() {
            self.push(
                ParallelExecutionNotSupported,
                location_of(instruction),
                format!("instruction '{name}' cannot be executed in parallel"),
            );
            return None;
        }

        let mut resolved =
            semantic::Instruction::new(Some(descriptor), &name, condition, Many::from(promoted));
        resolved
            .annotations_mut()
            .copy_from(instruction.annotations());
        for data in instruction.annotation_data() {
            if let Some(lowered) = self.lower_annotation(data) {
                resolved.add_annotation_data(lowered);
            }
        }
        Some(resolved)
    }

    fn error_model_statement(&mut self, instruction: &ast::Instruction) {
        if !instruction.condition().is_empty() {
            self.push(
                ErrorModelInvalid,
                location_of(instruction),
                "error model cannot be conditional",
            );
            return;
        }
        if !self.program.error_model().is_empty() {
            self.push(
                ErrorModelInvalid,
                location_of(instruction),
                "error model is specified more than once",
            );
            return;
        }
        let operand_list = instruction.operands().get().unwrap();
        let Some(first) = operand_list.items().first() else {
            self.push(
                ErrorModelInvalid,
                location_of(instruction),
                "expected an error model name",
            );
            return;
        };
        // The model name is matched against the error model table, not the
        // scope; it must stay a bare identifier.
        let Some(name_node) = first.as_identifier() else {
            self.push(
                ErrorModelInvalid,
                location_of(first),
                "error model name must be an identifier",
            );
            return;
        };
        let name = name_node.name().to_string();
        let mut args = Vec::new();
        for expr in operand_list.items().iter().skip(1) {
            match self.eval(expr) {
                Ok(value) => args.push(value),
                Err(error) => {
                    self.errors.push(error);
                    return;
                }
            }
        }
        let mut model = if self.analyzer.resolve_error_model {
            match self.analyzer.error_models.resolve(&name, &args) {
                Ok((descriptor, promoted)) => {
                    semantic::ErrorModel::new(Some(descriptor), &name, Any::from(promoted))
                }
                Err(error) => {
                    self.push_resolution_error(error, name_node);
                    return;
                }
            }
        } else {
            semantic::ErrorModel::new(None, &name, Any::from(args))
        };
        model.annotations_mut().copy_from(instruction.annotations());
        for data in instruction.annotation_data() {
            if let Some(lowered) = self.lower_annotation(data) {
                model.add_annotation_data(lowered);
            }
        }
        self.program.set_error_model(model);
    }

    /// Evaluates an annotation's argument list; the interface and operation
    /// names are never interpreted.
    fn lower_annotation(&mut self, data: &ast::AnnotationData) -> Option<semantic::AnnotationData> {
        let interface = data.interface().get().unwrap().name().to_string();
        let operation = data.operation().get().unwrap().name().to_string();
        let mut operands = Any::empty();
        if let Some(list) = data.operands().as_option() {
            for expr in list.items() {
                match self.eval(expr) {
                    Ok(value) => operands.add(value),
                    Err(error) => {
                        self.errors.push(error);
                        return None;
                    }
                }
            }
        }
        let mut lowered = semantic::AnnotationData::new(&interface, &operation, operands);
        lowered.annotations_mut().copy_from(data.annotations());
        Some(lowered)
    }

    //
    // Expression evaluation
    //

    fn eval(&self, expression: &ast::Expression) -> Result<Value, AnalysisError> {
        let location = location_of(expression);
        match expression {
            ast::Expression::IntegerLiteral(node) => {
                Ok(with_location(ConstInt::new(node.value()).to_value(), location))
            }
            ast::Expression::FloatLiteral(node) => {
                Ok(with_location(ConstReal::new(node.value()).to_value(), location))
            }
            ast::Expression::StringLiteral(node) => Ok(with_location(
                ConstString::new(node.value()).to_value(),
                location,
            )),
            ast::Expression::JsonLiteral(node) => Ok(with_location(
                ConstJson::new(node.value()).to_value(),
                location,
            )),
            ast::Expression::Identifier(node) => match self.mappings.lookup(node.name()) {
                // Bound by value; the clone gets the use site as location.
                Some(value) => Ok(with_location(value.clone(), location)),
                None => Err(AnalysisError::new(
                    NameResolutionFailure,
                    location,
                    format!("use of undefined name '{}'", node.name()),
                )),
            },
            ast::Expression::MatrixLiteral(node) => self.eval_matrix(node),
            ast::Expression::Index(node) => self.eval_index(node),
            ast::Expression::UnaryOp(node) => {
                let operand = self.eval(node.expr().get().unwrap())?;
                self.call_function(node.op().function_name(), vec![operand], location)
            }
            ast::Expression::BinaryOp(node) => {
                let lhs = self.eval(node.lhs().get().unwrap())?;
                let rhs = self.eval(node.rhs().get().unwrap())?;
                self.call_function(node.op().function_name(), vec![lhs, rhs], location)
            }
            ast::Expression::FunctionCall(node) => {
                let name = node.name().get().unwrap().name();
                let mut args = Vec::new();
                for expr in node.args().get().unwrap().items() {
                    args.push(self.eval(expr)?);
                }
                self.call_function(name, args, location)
            }
            ast::Expression::Erroneous(_) => Err(AnalysisError::new(
                ConstantFoldingFailure,
                location,
                "cannot evaluate erroneous expression",
            )),
        }
    }

    /// Operators and function calls both dispatch through the function
    /// table; operators use their synthetic `operator<sym>` names.
    fn call_function(
        &self,
        name: &str,
        args: Vec<Value>,
        location: Option<SourceLocation>,
    ) -> Result<Value, AnalysisError> {
        match self.analyzer.functions.call(name, &args) {
            Ok(value) => Ok(with_location(value, location)),
            Err(CallError::Resolution(error)) => Err(AnalysisError::new(
                resolution_error_kind(&error),
                location,
                error.to_string(),
            )),
            Err(error @ CallError::Function { .. }) => Err(AnalysisError::new(
                ConstantFoldingFailure,
                location,
                error.to_string(),
            )),
        }
    }

    /// Tries to build a real matrix from the cell values; if any cell
    /// fails to promote to real, retries as a complex matrix.
    fn eval_matrix(&self, node: &ast::MatrixLiteral) -> Result<Value, AnalysisError> {
        let location = location_of(node);
        let rows = node.rows();
        let num_cols = rows.at(0).map(|row| row.len()).unwrap_or(0);
        if num_cols == 0 {
            return Err(AnalysisError::new(
                InvalidMatrixLiteral,
                location,
                "empty matrix literal",
            ));
        }
        let mut cells = Vec::new();
        for row in rows {
            for expr in row.items() {
                cells.push(self.eval(expr)?);
            }
        }
        let reals: Option<Vec<f64>> = cells
            .iter()
            .map(|cell| {
                cell.promote(&Type::Real)
                    .and_then(|value| value.as_const_real().map(|real| *real.value()))
            })
            .collect();
        if let Some(reals) = reals {
            let matrix = qal_primitives::RMatrix::from_rows(reals, num_cols).map_err(|error| {
                AnalysisError::new(InvalidMatrixLiteral, location.clone(), error.to_string())
            })?;
            return Ok(with_location(
                crate::values::ConstRealMatrix::new(matrix).to_value(),
                location,
            ));
        }
        let complexes: Option<Vec<Complex>> = cells
            .iter()
            .map(|cell| {
                cell.promote(&Type::Complex)
                    .and_then(|value| value.as_const_complex().map(|c| *c.value()))
            })
            .collect();
        if let Some(complexes) = complexes {
            let matrix = qal_primitives::CMatrix::from_rows(complexes, num_cols).map_err(
                |error| AnalysisError::new(InvalidMatrixLiteral, location.clone(), error.to_string()),
            )?;
            return Ok(with_location(
                crate::values::ConstComplexMatrix::new(matrix).to_value(),
                location,
            ));
        }
        Err(AnalysisError::new(
            InvalidMatrixLiteral,
            location,
            "matrix cells do not uniformly convert to real or complex",
        ))
    }

    /// Indexation of a qubit or bit reference: every picked index goes
    /// through the base's own index list, so chained indexation composes.
    fn eval_index(&self, node: &ast::Index) -> Result<Value, AnalysisError> {
        let location = location_of(node);
        let base = self.eval(node.expr().get().unwrap())?;
        let entries = node.indices().get().unwrap().items();
        match &base {
            Value::QubitRefs(refs) => {
                let picked = self.pick_indices(refs.indices(), entries)?;
                Ok(with_location(QubitRefs::new(picked).to_value(), location))
            }
            Value::BitRefs(refs) => {
                let picked = self.pick_indices(refs.indices(), entries)?;
                Ok(with_location(BitRefs::new(picked).to_value(), location))
            }
            other => Err(AnalysisError::new(
                IndexationNotSupported,
                location,
                format!("cannot index a value of type {}", other.type_of()),
            )),
        }
    }

    fn pick_indices(
        &self,
        base: &Many<ConstInt>,
        entries: &Many<ast::IndexEntry>,
    ) -> Result<Many<ConstInt>, AnalysisError> {
        let size = base.size() as i64;
        let mut picked = Many::empty();
        for entry in entries {
            match entry {
                ast::IndexEntry::Item(item) => {
                    let index = self.const_index(item.index().get().unwrap(), size)?;
                    picked.add(base.at(index as usize).unwrap().clone());
                }
                ast::IndexEntry::Range(range) => {
                    let first = self.const_index(range.first().get().unwrap(), size)?;
                    let last = self.const_index(range.last().get().unwrap(), size)?;
                    if first > last {
                        return Err(AnalysisError::new(
                            IndexOutOfRange,
                            location_of(range),
                            format!("invalid range {first}:{last}, first exceeds last"),
                        ));
                    }
                    for index in first..=last {
                        picked.add(base.at(index as usize).unwrap().clone());
                    }
                }
            }
        }
        Ok(picked)
    }

    fn const_index(
        &self,
        expression: &ast::Expression,
        size: i64,
    ) -> Result<i64, AnalysisError> {
        let location = location_of(expression);
        let value = self.eval(expression)?;
        let index = match value.promote(&Type::Int) {
            Some(Value::ConstInt(int)) => *int.value(),
            _ => {
                return Err(AnalysisError::new(
                    ConstantFoldingFailure,
                    location,
                    format!("index must be a constant integer, got {}", value.type_of()),
                ))
            }
        };
        if index < 0 || index >= size {
            return Err(AnalysisError::new(
                IndexOutOfRange,
                location,
                format!("index {index} out of range, expected 0..{size}"),
            ));
        }
        Ok(index)
    }
}

fn with_location(mut value: Value, location: Option<SourceLocation>) -> Value {
    if let Some(location) = location {
        value.set_source_location(location);
    }
    value
}
