// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Analysis errors.
//!
//! Recoverable errors are caught at the nearest statement boundary,
//! annotated with the source location of the offending node, and
//! accumulated on the analysis result; analysis then continues with the
//! next statement. Displaying an error produces
//! `"<location>: <message>"`, which is the externally visible form.

use core::fmt;

use qal_syntax::SourceLocation;

/// Classification of a recoverable analysis error. Messages, not kinds, are
/// the external contract; the kinds exist so tests and hosts can match on
/// the failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalysisErrorKind {
    /// Identifier or operator not found in the scope or relevant table.
    NameResolutionFailure,
    /// Name found but no overload accepts the argument types.
    OverloadResolutionFailure,
    /// Matrix cells do not uniformly promote to real or to complex.
    InvalidMatrixLiteral,
    /// Base expression of an indexation is not a reference value.
    IndexationNotSupported,
    /// Index or range endpoint outside the base's index count.
    IndexOutOfRange,
    /// `c-` used on an instruction whose descriptor forbids it.
    ConditionalExecutionNotSupported,
    /// Condition does not promote to bool.
    InvalidCondition,
    /// Instruction forbidding parallel execution found in a multi-instruction
    /// bundle.
    ParallelExecutionNotSupported,
    /// Instruction forbids qubit reuse but operands share a qubit index.
    QubitsNotUnique,
    /// Qubit count is non-constant, non-integer or non-positive.
    NumQubitsInvalid,
    /// Negative version component.
    VersionComponentInvalid,
    /// Subcircuit iteration count is non-constant, non-integer or
    /// non-positive.
    SubcircuitIterationInvalid,
    /// An expression required to be constant produced a reference value, or
    /// constant evaluation failed.
    ConstantFoldingFailure,
    /// Malformed or duplicate error model statement.
    ErrorModelInvalid,
    /// Analysis was requested for an erroneous parse result.
    ErroneousProgram,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisError {
    kind: AnalysisErrorKind,
    location: Option<SourceLocation>,
    message: String,
}

impl AnalysisError {
    pub fn new(
        kind: AnalysisErrorKind,
        location: Option<SourceLocation>,
        message: impl ToString,
    ) -> AnalysisError {
        AnalysisError {
            kind,
            location,
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> AnalysisErrorKind {
        self.kind
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_location() {
        let error = AnalysisError::new(
            AnalysisErrorKind::QubitsNotUnique,
            Some(SourceLocation::new("t.qal", 3, 1, 3, 14)),
            "qubit 0 is used more than once",
        );
        assert_eq!(
            error.to_string(),
            "t.qal:3:1..14: qubit 0 is used more than once"
        );
        let bare = AnalysisError::new(
            AnalysisErrorKind::NumQubitsInvalid,
            None,
            "missing qubit count",
        );
        assert_eq!(bare.to_string(), "missing qubit count");
    }
}
