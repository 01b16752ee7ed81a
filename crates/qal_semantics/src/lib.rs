// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for the QAL quantum assembly language.
//!
//! The [`Analyzer`] consumes the AST produced by `qal_syntax` together with
//! host-registered mappings, constant functions, instructions and error
//! models, and produces a resolved, type-checked [`semantic::Program`] plus
//! an accumulated error list. See `analyzer.rs` for the lowering itself,
//! `types.rs`/`values.rs` for the type lattice and promotion, and
//! `resolver.rs` for name and overload resolution.

pub mod analyzer;
pub mod error;
pub mod error_model;
pub mod functions;
pub mod instruction;
pub mod mappings;
pub mod resolver;
pub mod semantic;
pub mod types;
pub mod values;

pub use analyzer::{AnalysisResult, Analyzer};
pub use error::{AnalysisError, AnalysisErrorKind};
pub use error_model::{ErrorModelDescriptor, ErrorModelTable};
pub use functions::{FunctionError, FunctionResult, FunctionTable};
pub use instruction::{InstructionDescriptor, InstructionTable};
pub use mappings::MappingTable;
pub use resolver::{OverloadResolver, OverloadedNameResolver, ResolutionError};
pub use types::{MatrixShape, Type};
pub use values::Value;
