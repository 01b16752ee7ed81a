// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Source locations, attached to tree nodes through the annotation
//! side-table and printed as prefixes of error messages.

use core::fmt;

use qal_tree::HasAnnotations;

/// Convenience accessors for the source location stored in a node's
/// annotation side-table. Blanket-implemented for every node.
pub trait HasSourceLocation: HasAnnotations {
    fn source_location(&self) -> Option<&SourceLocation> {
        self.annotations().get::<SourceLocation>()
    }

    fn set_source_location(&mut self, location: SourceLocation) {
        self.annotations_mut().set(location);
    }
}

impl<T: HasAnnotations + ?Sized> HasSourceLocation for T {}

/// A range in a source file. Lines and columns are 1-based; zero means
/// "unknown". The parser attaches one of these to every node it builds, and
/// the analyzer copies them onto the semantic nodes it derives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub file_name: String,
    pub first_line: u32,
    pub first_column: u32,
    pub last_line: u32,
    pub last_column: u32,
}

impl SourceLocation {
    pub fn new<T: ToString>(
        file_name: T,
        first_line: u32,
        first_column: u32,
        last_line: u32,
        last_column: u32,
    ) -> SourceLocation {
        SourceLocation {
            file_name: file_name.to_string(),
            first_line,
            first_column,
            last_line,
            last_column,
        }
    }

    /// A location naming only the file.
    pub fn file_only<T: ToString>(file_name: T) -> SourceLocation {
        SourceLocation::new(file_name, 0, 0, 0, 0)
    }

    /// Expands the range to also cover `other`.
    pub fn expand_to_include(&mut self, other: &SourceLocation) {
        if other.first_line != 0
            && (self.first_line == 0
                || (other.first_line, other.first_column) < (self.first_line, self.first_column))
        {
            self.first_line = other.first_line;
            self.first_column = other.first_column;
        }
        if other.last_line != 0
            && (other.last_line, other.last_column) > (self.last_line, self.last_column)
        {
            self.last_line = other.last_line;
            self.last_column = other.last_column;
        }
    }
}

impl fmt::Display for SourceLocation {
    /// The narrowest applicable form of
    /// `<file>:<line>:<col>..<line>:<col>`: wider fields are omitted when
    /// unknown or equal to their counterpart.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name)?;
        if self.first_line == 0 {
            return Ok(());
        }
        write!(f, ":{}", self.first_line)?;
        if self.first_column != 0 {
            write!(f, ":{}", self.first_column)?;
        }
        let spans_lines = self.last_line != 0 && self.last_line != self.first_line;
        if spans_lines {
            write!(f, "..{}", self.last_line)?;
            if self.first_column != 0 && self.last_column != 0 {
                write!(f, ":{}", self.last_column)?;
            }
        } else if self.first_column != 0
            && self.last_column != 0
            && self.last_column != self.first_column
        {
            write!(f, "..{}", self.last_column)?;
        }
        Ok(())
    }
}
