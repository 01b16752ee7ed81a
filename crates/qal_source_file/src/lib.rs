// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Parse entry points for QAL source files and strings, plus diagnostics
//! display using the external crate `ariadne`.
//!
//! The parse result keeps the error list as plain located strings of the
//! form `<file>:<line>:<col>: <message>`; `print_errors` renders them
//! against the source text.

use std::fs;
use std::io;
use std::path::Path;

use ariadne::{ColorGenerator, Config, Label, Report, ReportKind, Source};

use qal_syntax::ast;

/// Result of parsing one source text: the AST root (a program, or an
/// erroneous-program marker when the header was unusable) and the error
/// strings. Parsing succeeded if and only if `errors` is empty.
#[derive(Clone, Debug)]
pub struct ParseResult {
    file_name: String,
    source: String,
    root: ast::Root,
    errors: Vec<String>,
}

impl ParseResult {
    pub fn root(&self) -> &ast::Root {
        &self.root
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn any_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_parts(self) -> (ast::Root, Vec<String>) {
        (self.root, self.errors)
    }

    /// Pretty-prints all parse errors against the source text.
    pub fn print_errors(&self) {
        for error in &self.errors {
            match split_located(error, &self.file_name) {
                Some((line, column, message)) => {
                    report_error(message, line, column, &self.file_name, &self.source)
                }
                None => eprintln!("{error}"),
            }
        }
    }
}

/// Parses QAL source text. The file name is only used in diagnostics; pass
/// `None` when the source did not come from a file.
pub fn parse_source_string<T: AsRef<str>>(source: T, file_name: Option<&str>) -> ParseResult {
    let file_name = file_name.unwrap_or("<unknown>").to_string();
    let source = source.as_ref().to_string();
    let (root, errors) = qal_syntax::parse_source(&source, &file_name);
    ParseResult {
        file_name,
        source,
        root,
        errors,
    }
}

/// Reads and parses a QAL source file.
pub fn parse_source_file<P: AsRef<Path>>(file_path: P) -> io::Result<ParseResult> {
    let source = fs::read_to_string(file_path.as_ref())?;
    let file_name = file_path.as_ref().display().to_string();
    Ok(parse_source_string(source, Some(&file_name)))
}

/// Renders one error with `ariadne`. `line` and `column` are 1-based.
pub fn report_error(message: &str, line: u32, column: u32, file_name: &str, source: &str) {
    let mut colors = ColorGenerator::new();
    let color = colors.next();
    let offset = offset_of(source, line, column);
    let span = offset..(offset + 1).min(source.len().max(1));
    Report::build(ReportKind::Error, file_name, offset)
        .with_message(message)
        .with_config(Config::default().with_compact(true))
        .with_label(
            Label::new((file_name, span))
                .with_message("near this point")
                .with_color(color),
        )
        .finish()
        .print((file_name, Source::from(source)))
        .ok();
}

/// Splits `"<file>:<line>:<col>: <message>"` into its parts. Returns `None`
/// for errors that do not carry a location.
fn split_located<'a>(error: &'a str, file_name: &str) -> Option<(u32, u32, &'a str)> {
    let rest = error.strip_prefix(file_name)?.strip_prefix(':')?;
    let (line, rest) = rest.split_once(':')?;
    let (column, message) = rest.split_once(": ")?;
    Some((line.parse().ok()?, column.parse().ok()?, message))
}

/// Byte offset of a 1-based line/column position.
fn offset_of(source: &str, line: u32, column: u32) -> usize {
    let mut current_line = 1u32;
    let mut current_column = 1u32;
    for (offset, c) in source.char_indices() {
        if current_line == line && current_column == column {
            return offset;
        }
        if c == '\n' {
            current_line += 1;
            current_column = 1;
        } else {
            current_column += 1;
        }
    }
    source.len()
}
