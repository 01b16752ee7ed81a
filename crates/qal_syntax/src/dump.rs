// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Debug dump of syntax trees: an indented, s-expression-like rendering
//! with source locations shown as trailing comments.

use core::fmt;

use crate::ast::*;
use crate::visitor::{NodeRef, Visitor};

/// Writes a debug representation of `node` (and everything below it) to
/// `out`.
pub fn dump(node: NodeRef<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
    let mut dumper = Dumper {
        out,
        indent: 0,
        status: Ok(()),
    };
    node.accept(&mut dumper);
    dumper.status
}

/// Convenience wrapper around [`dump`].
pub fn dump_to_string(node: NodeRef<'_>) -> String {
    let mut buffer = String::new();
    // Writing to a String cannot fail.
    let _ = dump(node, &mut buffer);
    buffer
}

struct Dumper<'w> {
    out: &'w mut dyn fmt::Write,
    indent: usize,
    status: fmt::Result,
}

impl Dumper<'_> {
    fn write(&mut self, args: fmt::Arguments<'_>) {
        if self.status.is_ok() {
            self.status = self.out.write_fmt(args);
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.write(format_args!("  "));
        }
    }

    fn location_suffix(&self, node: NodeRef<'_>) -> String {
        let annotations = match node {
            NodeRef::IntegerLiteral(n) => n.annotations(),
            NodeRef::FloatLiteral(n) => n.annotations(),
            NodeRef::StringLiteral(n) => n.annotations(),
            NodeRef::JsonLiteral(n) => n.annotations(),
            NodeRef::MatrixLiteral(n) => n.annotations(),
            NodeRef::Identifier(n) => n.annotations(),
            NodeRef::FunctionCall(n) => n.annotations(),
            NodeRef::Index(n) => n.annotations(),
            NodeRef::UnaryOp(n) => n.annotations(),
            NodeRef::BinaryOp(n) => n.annotations(),
            NodeRef::ErroneousExpression(n) => n.annotations(),
            NodeRef::IndexItem(n) => n.annotations(),
            NodeRef::IndexRange(n) => n.annotations(),
            NodeRef::IndexList(n) => n.annotations(),
            NodeRef::ExpressionList(n) => n.annotations(),
            NodeRef::AnnotationData(n) => n.annotations(),
            NodeRef::Instruction(n) => n.annotations(),
            NodeRef::Bundle(n) => n.annotations(),
            NodeRef::Mapping(n) => n.annotations(),
            NodeRef::Subcircuit(n) => n.annotations(),
            NodeRef::ErroneousStatement(n) => n.annotations(),
            NodeRef::StatementList(n) => n.annotations(),
            NodeRef::Version(n) => n.annotations(),
            NodeRef::Program(n) => n.annotations(),
            NodeRef::ErroneousProgram(n) => n.annotations(),
        };
        match annotations.get::<crate::SourceLocation>() {
            Some(location) => format!(" # {location}"),
            None => String::new(),
        }
    }

    fn payload(node: NodeRef<'_>) -> Option<String> {
        match node {
            NodeRef::IntegerLiteral(n) => Some(n.value().to_string()),
            NodeRef::FloatLiteral(n) => Some(n.value().to_string()),
            NodeRef::StringLiteral(n) => Some(format!("{:?}", n.value())),
            NodeRef::JsonLiteral(n) => Some(n.value().to_string()),
            NodeRef::Identifier(n) => Some(n.name().to_string()),
            NodeRef::UnaryOp(n) => Some(n.op().symbol().to_string()),
            NodeRef::BinaryOp(n) => Some(n.op().symbol().to_string()),
            NodeRef::Version(n) => Some(
                n.items()
                    .iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }
}

impl Visitor for Dumper<'_> {
    fn visit_node(&mut self, node: NodeRef<'_>) {
        let mut children = Vec::new();
        node.for_each_child(&mut |child| children.push(child));
        let name = node.kind().name();
        let payload = Dumper::payload(node);
        let suffix = self.location_suffix(node);
        self.write_indent();
        if children.is_empty() {
            match payload {
                Some(payload) => self.write(format_args!("{name}({payload}){suffix}\n")),
                None => self.write(format_args!("{name}(){suffix}\n")),
            }
            return;
        }
        match payload {
            Some(payload) => self.write(format_args!("{name}[{payload}]({suffix}\n")),
            None => self.write(format_args!("{name}({suffix}\n")),
        }
        self.indent += 1;
        for child in children {
            child.accept(self);
        }
        self.indent -= 1;
        self.write_indent();
        self.write(format_args!(")\n"));
    }
}
