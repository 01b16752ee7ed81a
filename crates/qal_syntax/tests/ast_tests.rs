// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

use qal_syntax::ast::*;
use qal_syntax::visitor::NodeRef;
use qal_syntax::{dump_to_string, parse_source, HasSourceLocation, SourceLocation};
use qal_tree::TreeNode;

#[test]
fn equality_ignores_annotations() {
    let make = || {
        BinaryOp::new(
            BinaryOperator::Add,
            IntegerLiteral::new(1).to_expr(),
            Identifier::new("x").to_expr(),
        )
        .to_expr()
    };
    let plain = make();
    let mut located = make();
    located.set_source_location(SourceLocation::new("t.qal", 1, 1, 1, 5));
    assert_eq!(plain, located);
    // Mutating an annotation afterwards does not change the result either.
    let mut relocated = located.clone();
    relocated.set_source_location(SourceLocation::new("other.qal", 9, 9, 9, 9));
    assert_eq!(located, relocated);
    // Differences in structure still count.
    let different = BinaryOp::new(
        BinaryOperator::Subtract,
        IntegerLiteral::new(1).to_expr(),
        Identifier::new("x").to_expr(),
    )
    .to_expr();
    assert_ne!(plain, different);
}

#[test]
fn one_may_be_empty_during_construction() {
    let mut program = Program::new();
    assert!(!program.is_complete());
    program.set_version(Version::new(vec![1, 0]));
    program.set_num_qubits(IntegerLiteral::new(2).to_expr());
    assert!(!program.is_complete());
    program.set_statements(StatementList::new());
    assert!(program.is_complete());
}

#[test]
fn erroneous_nodes_are_never_complete() {
    assert!(!ErroneousExpression::new().to_expr().is_complete());
    assert!(!ErroneousStatement::new().to_stmt().is_complete());
    assert!(!ErroneousProgram::new().to_root().is_complete());
    let mut bundle = Bundle::new();
    assert!(!bundle.is_complete());
    bundle.add_instruction(Instruction::new(
        Identifier::new("x"),
        None,
        ExpressionList::new(),
    ));
    assert!(bundle.is_complete());
}

#[test]
fn node_kinds_and_downcasts() {
    let expr = Identifier::new("q").to_expr();
    assert_eq!(expr.kind(), NodeKind::Identifier);
    assert_eq!(expr.kind().name(), "Identifier");
    assert!(expr.as_identifier().is_some());
    assert!(expr.as_binary_op().is_none());
    let stmt = Mapping::new(Identifier::new("a"), IntegerLiteral::new(1).to_expr()).to_stmt();
    assert_eq!(stmt.kind(), NodeKind::Mapping);
    assert!(stmt.as_mapping().is_some());
    assert!(stmt.as_bundle().is_none());
}

#[test]
fn dump_of_a_parsed_program() {
    let (root, errors) = parse_source("version 1.0\nqubits 1\nx q[0]\n", "dump.qal");
    assert!(errors.is_empty());
    let text = dump_to_string(NodeRef::from_root(&root));
    // Shape of the tree, with locations as trailing comments.
    assert!(text.starts_with("Program( # dump.qal:1:1..3:7\n"), "{text}");
    assert!(text.contains("Version(1.0) # dump.qal:1:9..11\n"), "{text}");
    assert!(text.contains("Bundle( # dump.qal:3:1..6\n"), "{text}");
    assert!(text.contains("Identifier(q)"), "{text}");
    assert!(text.contains("IndexItem("), "{text}");
}
