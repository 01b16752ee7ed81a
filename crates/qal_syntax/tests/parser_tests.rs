// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

use qal_syntax::ast::*;
use qal_syntax::{parse_source, HasSourceLocation};
use qal_tree::TreeNode;

fn parse(source: &str) -> (Root, Vec<String>) {
    parse_source(source, "test.qal")
}

fn parse_program(source: &str) -> Program {
    let (root, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    match root {
        Root::Program(program) => program,
        Root::Erroneous(_) => panic!("expected a program root"),
    }
}

fn statements(program: &Program) -> &[Statement] {
    program.statements().get().unwrap().items().as_slice()
}

#[test]
fn minimal_program() {
    let program = parse_program("version 1.0\nqubits 3\n");
    assert!(program.is_complete());
    assert_eq!(program.version().get().unwrap().items(), &[1, 0]);
    let num_qubits = program.num_qubits().get().unwrap();
    assert_eq!(num_qubits.as_integer_literal().unwrap().value(), 3);
    assert!(statements(&program).is_empty());
}

#[test]
fn version_with_three_components() {
    let program = parse_program("version 1.0.3\nqubits 1\n");
    assert_eq!(program.version().get().unwrap().items(), &[1, 0, 3]);
}

#[test]
fn parse_errors_iff_incomplete() {
    // Property: empty error list iff the root is a complete program.
    let ok = [
        "version 1.0\nqubits 1\n",
        "version 1.0\nqubits 2\nmap q[1], target\n",
        "version 1.0\nqubits 2\nx q[0] | y q[1]\n",
    ];
    for source in ok {
        let (root, errors) = parse(source);
        assert!(errors.is_empty(), "{source:?} gave {errors:?}");
        assert!(root.is_complete(), "{source:?} gave incomplete tree");
        assert!(root.as_program().is_some());
    }
    let bad = [
        "",
        "qubits 3\n",
        "version 1.0\nqubits 2\nmap q[1]\n",
        "version 1.0\nqubits 2\nx q[0\n",
        "version one\nqubits 2\n",
    ];
    for source in bad {
        let (root, errors) = parse(source);
        assert!(!errors.is_empty(), "{source:?} parsed without errors");
        assert!(
            !root.is_complete() || root.as_program().is_none(),
            "{source:?} gave a complete program despite errors"
        );
    }
}

#[test]
fn missing_version_gives_erroneous_program() {
    let (root, errors) = parse("qubits 3\n");
    assert!(matches!(root, Root::Erroneous(_)));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("test.qal:1:1:"), "{}", errors[0]);
    assert!(errors[0].contains("version"));
}

#[test]
fn mapping_both_forms() {
    let program = parse_program("version 1.0\nqubits 2\nmap q[1], target\nmap other = q[0]\n");
    let stmts = statements(&program);
    assert_eq!(stmts.len(), 2);
    let first = stmts[0].as_mapping().unwrap();
    assert_eq!(first.alias().get().unwrap().name(), "target");
    assert!(first.expr().get().unwrap().as_index().is_some());
    let second = stmts[1].as_mapping().unwrap();
    assert_eq!(second.alias().get().unwrap().name(), "other");
}

#[test]
fn subcircuit_header_with_iterations() {
    let program = parse_program("version 1.0\nqubits 1\n.loop(10)\nx q[0]\n");
    let stmts = statements(&program);
    let subcircuit = stmts[0].as_subcircuit().unwrap();
    assert_eq!(subcircuit.name().get().unwrap().name(), "loop");
    let iterations = subcircuit.iterations().get().unwrap();
    assert_eq!(iterations.as_integer_literal().unwrap().value(), 10);
    assert!(stmts[1].as_bundle().is_some());
}

#[test]
fn single_line_bundle_with_pipes() {
    let program = parse_program("version 1.0\nqubits 2\nx q[0] | y q[1]\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    assert_eq!(bundle.items().size(), 2);
    let names: Vec<&str> = bundle
        .items()
        .iter()
        .map(|instruction| instruction.name().get().unwrap().name())
        .collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn braced_bundle_spans_lines() {
    let program = parse_program("version 1.0\nqubits 2\n{\n  x q[0]\n  y q[1] | z q[0]\n}\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    assert_eq!(bundle.items().size(), 3);
}

#[test]
fn conditional_prefix() {
    let program = parse_program("version 1.0\nqubits 1\nc- b[0], x q[0]\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let instruction = bundle.items().at(0).unwrap();
    assert_eq!(instruction.name().get().unwrap().name(), "x");
    let condition = instruction.condition().get().unwrap();
    assert!(condition.as_index().is_some());
    assert_eq!(instruction.operands().get().unwrap().len(), 1);
}

#[test]
fn non_adjacent_minus_is_not_conditional() {
    // `c - 1` is an instruction named `c` with operand `-1`... except that
    // an expression cannot follow a name without separation, so this parses
    // as instruction `c` with a single negated operand.
    let program = parse_program("version 1.0\nqubits 1\nc -1\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let instruction = bundle.items().at(0).unwrap();
    assert_eq!(instruction.name().get().unwrap().name(), "c");
    assert!(instruction.condition().is_empty());
}

#[test]
fn annotation_binds_to_instruction_on_single_line() {
    let program = parse_program("version 1.0\nqubits 1\nx q[0] @timing.delay(100)\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    assert!(bundle.annotation_data().is_empty());
    let instruction = bundle.items().at(0).unwrap();
    assert_eq!(instruction.annotation_data().size(), 1);
    let data = instruction.annotation_data().at(0).unwrap();
    assert_eq!(data.interface().get().unwrap().name(), "timing");
    assert_eq!(data.operation().get().unwrap().name(), "delay");
    assert_eq!(data.operands().get().unwrap().len(), 1);
}

#[test]
fn annotation_after_brace_binds_to_bundle() {
    let program = parse_program("version 1.0\nqubits 2\n{ x q[0] | y q[1] } @sched.barrier\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    assert_eq!(bundle.annotation_data().size(), 1);
    assert!(bundle
        .items()
        .iter()
        .all(|instruction| instruction.annotation_data().is_empty()));
    // No parenthesized argument list at all.
    let data = bundle.annotation_data().at(0).unwrap();
    assert!(data.operands().is_empty());
}

#[test]
fn index_items_and_ranges() {
    let program = parse_program("version 1.0\nqubits 8\nx q[0, 2:4, 7]\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let operand = bundle
        .items()
        .at(0)
        .unwrap()
        .operands()
        .get()
        .unwrap()
        .items()
        .at(0)
        .unwrap();
    let index = operand.as_index().unwrap();
    let entries = index.indices().get().unwrap().items();
    assert_eq!(entries.size(), 3);
    assert!(matches!(entries.at(0).unwrap(), IndexEntry::Item(_)));
    assert!(matches!(entries.at(1).unwrap(), IndexEntry::Range(_)));
    assert!(matches!(entries.at(2).unwrap(), IndexEntry::Item(_)));
}

#[test]
fn legacy_flat_matrix_is_one_row() {
    let program = parse_program("version 1.0\nqubits 1\nu q[0], [1, 0, 0, 0, 0, 0, 1, 0]\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let operands = bundle.items().at(0).unwrap().operands().get().unwrap();
    let matrix = operands.items().at(1).unwrap().as_matrix_literal().unwrap();
    assert_eq!(matrix.rows().size(), 1);
    assert_eq!(matrix.rows().at(0).unwrap().len(), 8);
}

#[test]
fn multi_row_matrix() {
    let program = parse_program("version 1.0\nqubits 1\nu q[0], [1, 0; 0, 1]\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let operands = bundle.items().at(0).unwrap().operands().get().unwrap();
    let matrix = operands.items().at(1).unwrap().as_matrix_literal().unwrap();
    assert_eq!(matrix.rows().size(), 2);
    assert_eq!(matrix.rows().at(1).unwrap().len(), 2);
}

#[test]
fn ragged_matrix_is_reported() {
    let (_, errors) = parse("version 1.0\nqubits 1\nu q[0], [1, 0; 1]\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("matrix rows differ in length"));
}

#[test]
fn error_model_becomes_named_instruction() {
    let program = parse_program("version 1.0\nqubits 2\nerror_model depolarizing_channel, 0.001\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let instruction = bundle.items().at(0).unwrap();
    assert_eq!(instruction.name().get().unwrap().name(), "error_model");
    let operands = instruction.operands().get().unwrap();
    assert_eq!(operands.len(), 2);
    assert_eq!(
        operands.items().at(0).unwrap().as_identifier().unwrap().name(),
        "depolarizing_channel"
    );
}

#[test]
fn reset_averaging_survives_as_model_name() {
    let program = parse_program("version 1.0\nqubits 2\nerror_model reset-averaging, 0.1\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let operands = bundle.items().at(0).unwrap().operands().get().unwrap();
    assert_eq!(
        operands.items().at(0).unwrap().as_identifier().unwrap().name(),
        "reset-averaging"
    );
}

#[test]
fn operator_precedence_shape() {
    let program = parse_program("version 1.0\nqubits 1\nrx q[0], 1 + 2 * 3\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let operands = bundle.items().at(0).unwrap().operands().get().unwrap();
    let sum = operands.items().at(1).unwrap().as_binary_op().unwrap();
    assert_eq!(sum.op(), BinaryOperator::Add);
    let rhs = sum.rhs().get().unwrap().as_binary_op().unwrap();
    assert_eq!(rhs.op(), BinaryOperator::Multiply);
}

#[test]
fn power_is_right_associative_and_looser_than_unary_minus() {
    let program = parse_program("version 1.0\nqubits 1\nrx q[0], -2 ** 3 ** 2\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let operands = bundle.items().at(0).unwrap().operands().get().unwrap();
    let power = operands.items().at(1).unwrap().as_binary_op().unwrap();
    assert_eq!(power.op(), BinaryOperator::Power);
    // Base is the negated literal, exponent is another power node.
    assert!(power.lhs().get().unwrap().as_unary_op().is_some());
    let exponent = power.rhs().get().unwrap().as_binary_op().unwrap();
    assert_eq!(exponent.op(), BinaryOperator::Power);
}

#[test]
fn string_escapes_are_decoded() {
    let program = parse_program("version 1.0\nqubits 1\ndisplay \"a\\tb\\\\c\"\n");
    let bundle = statements(&program)[0].as_bundle().unwrap();
    let operands = bundle.items().at(0).unwrap().operands().get().unwrap();
    let string = operands.items().at(0).unwrap().as_string_literal().unwrap();
    assert_eq!(string.value(), "a\tb\\c");
}

#[test]
fn bad_statement_recovers_and_marks() {
    let (root, errors) = parse("version 1.0\nqubits 2\nx q[\ny q[1]\n");
    assert_eq!(errors.len(), 1);
    let program = match root {
        Root::Program(program) => program,
        Root::Erroneous(_) => panic!("header was fine"),
    };
    let stmts = program.statements().get().unwrap().items();
    assert_eq!(stmts.size(), 2);
    assert!(matches!(stmts.at(0).unwrap(), Statement::Erroneous(_)));
    assert!(stmts.at(1).unwrap().as_bundle().is_some());
    assert!(!program.is_complete());
}

#[test]
fn keywords_are_case_insensitive() {
    let program = parse_program("VERSION 1.0\nQuBits 2\nMAP q[0], a\n");
    assert_eq!(statements(&program).len(), 1);
    assert!(statements(&program)[0].as_mapping().is_some());
}

#[test]
fn semicolon_separates_statements() {
    let program = parse_program("version 1.0;qubits 2;x q[0];y q[1]\n");
    assert_eq!(statements(&program).len(), 2);
}

#[test]
fn locations_are_attached() {
    let program = parse_program("version 1.0\nqubits 2\nmap q[1], target\n");
    let mapping = statements(&program)[0].as_mapping().unwrap();
    let location = mapping.source_location().unwrap();
    assert_eq!(location.to_string(), "test.qal:3:1..16");
    let expr_location = mapping
        .expr()
        .get()
        .unwrap()
        .source_location()
        .unwrap()
        .to_string();
    assert_eq!(expr_location, "test.qal:3:5..8");
}
