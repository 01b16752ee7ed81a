// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Concrete syntax tree and parser for the QAL quantum assembly language.
//!
//! [`parse_source`] turns source text into an [`ast::Root`] plus a list of
//! located error strings. The tree is faithful to the source; name
//! resolution, overload resolution and constant folding live in
//! `qal_semantics`.

pub mod ast;
mod dump;
mod location;
mod parser;
pub mod visitor;

pub use dump::{dump, dump_to_string};
pub use location::{HasSourceLocation, SourceLocation};
pub use parser::parse_source;
