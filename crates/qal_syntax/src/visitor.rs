// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Visitor dispatch over the AST.
//!
//! Dispatching a node calls the `visit_*` method for its concrete kind. The
//! default implementation of each leaf method chains up to its parent
//! category (`visit_expression`, `visit_statement`, ...), and the categories
//! chain to [`Visitor::visit_node`]. A visitor that overrides only
//! `visit_node` therefore sees exactly one call per dispatched node.
//!
//! [`RecursiveVisitor::visit_tree`] drives a depth-first traversal, parents
//! before children, children in declared order.

use crate::ast::*;

/// Reference to a node of any concrete kind.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    IntegerLiteral(&'a IntegerLiteral),
    FloatLiteral(&'a FloatLiteral),
    StringLiteral(&'a StringLiteral),
    JsonLiteral(&'a JsonLiteral),
    MatrixLiteral(&'a MatrixLiteral),
    Identifier(&'a Identifier),
    FunctionCall(&'a FunctionCall),
    Index(&'a Index),
    UnaryOp(&'a UnaryOp),
    BinaryOp(&'a BinaryOp),
    ErroneousExpression(&'a ErroneousExpression),
    IndexItem(&'a IndexItem),
    IndexRange(&'a IndexRange),
    IndexList(&'a IndexList),
    ExpressionList(&'a ExpressionList),
    AnnotationData(&'a AnnotationData),
    Instruction(&'a Instruction),
    Bundle(&'a Bundle),
    Mapping(&'a Mapping),
    Subcircuit(&'a Subcircuit),
    ErroneousStatement(&'a ErroneousStatement),
    StatementList(&'a StatementList),
    Version(&'a Version),
    Program(&'a Program),
    ErroneousProgram(&'a ErroneousProgram),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::IntegerLiteral(_) => NodeKind::IntegerLiteral,
            NodeRef::FloatLiteral(_) => NodeKind::FloatLiteral,
            NodeRef::StringLiteral(_) => NodeKind::StringLiteral,
            NodeRef::JsonLiteral(_) => NodeKind::JsonLiteral,
            NodeRef::MatrixLiteral(_) => NodeKind::MatrixLiteral,
            NodeRef::Identifier(_) => NodeKind::Identifier,
            NodeRef::FunctionCall(_) => NodeKind::FunctionCall,
            NodeRef::Index(_) => NodeKind::Index,
            NodeRef::UnaryOp(_) => NodeKind::UnaryOp,
            NodeRef::BinaryOp(_) => NodeKind::BinaryOp,
            NodeRef::ErroneousExpression(_) => NodeKind::ErroneousExpression,
            NodeRef::IndexItem(_) => NodeKind::IndexItem,
            NodeRef::IndexRange(_) => NodeKind::IndexRange,
            NodeRef::IndexList(_) => NodeKind::IndexList,
            NodeRef::ExpressionList(_) => NodeKind::ExpressionList,
            NodeRef::AnnotationData(_) => NodeKind::AnnotationData,
            NodeRef::Instruction(_) => NodeKind::Instruction,
            NodeRef::Bundle(_) => NodeKind::Bundle,
            NodeRef::Mapping(_) => NodeKind::Mapping,
            NodeRef::Subcircuit(_) => NodeKind::Subcircuit,
            NodeRef::ErroneousStatement(_) => NodeKind::ErroneousStatement,
            NodeRef::StatementList(_) => NodeKind::StatementList,
            NodeRef::Version(_) => NodeKind::Version,
            NodeRef::Program(_) => NodeKind::Program,
            NodeRef::ErroneousProgram(_) => NodeKind::ErroneousProgram,
        }
    }

    pub fn from_expression(expression: &'a Expression) -> NodeRef<'a> {
        match expression {
            Expression::IntegerLiteral(n) => NodeRef::IntegerLiteral(n),
            Expression::FloatLiteral(n) => NodeRef::FloatLiteral(n),
            Expression::StringLiteral(n) => NodeRef::StringLiteral(n),
            Expression::JsonLiteral(n) => NodeRef::JsonLiteral(n),
            Expression::MatrixLiteral(n) => NodeRef::MatrixLiteral(n),
            Expression::Identifier(n) => NodeRef::Identifier(n),
            Expression::FunctionCall(n) => NodeRef::FunctionCall(n),
            Expression::Index(n) => NodeRef::Index(n),
            Expression::UnaryOp(n) => NodeRef::UnaryOp(n),
            Expression::BinaryOp(n) => NodeRef::BinaryOp(n),
            Expression::Erroneous(n) => NodeRef::ErroneousExpression(n),
        }
    }

    pub fn from_statement(statement: &'a Statement) -> NodeRef<'a> {
        match statement {
            Statement::Bundle(n) => NodeRef::Bundle(n),
            Statement::Mapping(n) => NodeRef::Mapping(n),
            Statement::Subcircuit(n) => NodeRef::Subcircuit(n),
            Statement::Erroneous(n) => NodeRef::ErroneousStatement(n),
        }
    }

    pub fn from_index_entry(entry: &'a IndexEntry) -> NodeRef<'a> {
        match entry {
            IndexEntry::Item(n) => NodeRef::IndexItem(n),
            IndexEntry::Range(n) => NodeRef::IndexRange(n),
        }
    }

    pub fn from_root(root: &'a Root) -> NodeRef<'a> {
        match root {
            Root::Program(n) => NodeRef::Program(n),
            Root::Erroneous(n) => NodeRef::ErroneousProgram(n),
        }
    }

    /// Dispatches this node through `visitor`, calling the `visit_*` method
    /// for its concrete kind.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match *self {
            NodeRef::IntegerLiteral(n) => visitor.visit_integer_literal(n),
            NodeRef::FloatLiteral(n) => visitor.visit_float_literal(n),
            NodeRef::StringLiteral(n) => visitor.visit_string_literal(n),
            NodeRef::JsonLiteral(n) => visitor.visit_json_literal(n),
            NodeRef::MatrixLiteral(n) => visitor.visit_matrix_literal(n),
            NodeRef::Identifier(n) => visitor.visit_identifier(n),
            NodeRef::FunctionCall(n) => visitor.visit_function_call(n),
            NodeRef::Index(n) => visitor.visit_index(n),
            NodeRef::UnaryOp(n) => visitor.visit_unary_op(n),
            NodeRef::BinaryOp(n) => visitor.visit_binary_op(n),
            NodeRef::ErroneousExpression(n) => visitor.visit_erroneous_expression(n),
            NodeRef::IndexItem(n) => visitor.visit_index_item(n),
            NodeRef::IndexRange(n) => visitor.visit_index_range(n),
            NodeRef::IndexList(n) => visitor.visit_index_list(n),
            NodeRef::ExpressionList(n) => visitor.visit_expression_list(n),
            NodeRef::AnnotationData(n) => visitor.visit_annotation_data(n),
            NodeRef::Instruction(n) => visitor.visit_instruction(n),
            NodeRef::Bundle(n) => visitor.visit_bundle(n),
            NodeRef::Mapping(n) => visitor.visit_mapping(n),
            NodeRef::Subcircuit(n) => visitor.visit_subcircuit(n),
            NodeRef::ErroneousStatement(n) => visitor.visit_erroneous_statement(n),
            NodeRef::StatementList(n) => visitor.visit_statement_list(n),
            NodeRef::Version(n) => visitor.visit_version(n),
            NodeRef::Program(n) => visitor.visit_program(n),
            NodeRef::ErroneousProgram(n) => visitor.visit_erroneous_program(n),
        }
    }

    /// Calls `f` for each direct child, in declared order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(NodeRef<'a>)) {
        match *self {
            NodeRef::IntegerLiteral(_)
            | NodeRef::FloatLiteral(_)
            | NodeRef::StringLiteral(_)
            | NodeRef::JsonLiteral(_)
            | NodeRef::Identifier(_)
            | NodeRef::ErroneousExpression(_)
            | NodeRef::ErroneousStatement(_)
            | NodeRef::Version(_)
            | NodeRef::ErroneousProgram(_) => {}
            NodeRef::MatrixLiteral(n) => {
                for row in n.rows() {
                    f(NodeRef::ExpressionList(row));
                }
            }
            NodeRef::FunctionCall(n) => {
                for name in n.name().iter() {
                    f(NodeRef::Identifier(name));
                }
                for args in n.args().iter() {
                    f(NodeRef::ExpressionList(args));
                }
            }
            NodeRef::Index(n) => {
                for expr in n.expr().iter() {
                    f(NodeRef::from_expression(expr));
                }
                for indices in n.indices().iter() {
                    f(NodeRef::IndexList(indices));
                }
            }
            NodeRef::UnaryOp(n) => {
                for expr in n.expr().iter() {
                    f(NodeRef::from_expression(expr));
                }
            }
            NodeRef::BinaryOp(n) => {
                for lhs in n.lhs().iter() {
                    f(NodeRef::from_expression(lhs));
                }
                for rhs in n.rhs().iter() {
                    f(NodeRef::from_expression(rhs));
                }
            }
            NodeRef::IndexItem(n) => {
                for index in n.index().iter() {
                    f(NodeRef::from_expression(index));
                }
            }
            NodeRef::IndexRange(n) => {
                for first in n.first().iter() {
                    f(NodeRef::from_expression(first));
                }
                for last in n.last().iter() {
                    f(NodeRef::from_expression(last));
                }
            }
            NodeRef::IndexList(n) => {
                for entry in n.items() {
                    f(NodeRef::from_index_entry(entry));
                }
            }
            NodeRef::ExpressionList(n) => {
                for expression in n.items() {
                    f(NodeRef::from_expression(expression));
                }
            }
            NodeRef::AnnotationData(n) => {
                for interface in n.interface().iter() {
                    f(NodeRef::Identifier(interface));
                }
                for operation in n.operation().iter() {
                    f(NodeRef::Identifier(operation));
                }
                for operands in n.operands().iter() {
                    f(NodeRef::ExpressionList(operands));
                }
            }
            NodeRef::Instruction(n) => {
                for name in n.name().iter() {
                    f(NodeRef::Identifier(name));
                }
                for condition in n.condition().iter() {
                    f(NodeRef::from_expression(condition));
                }
                for operands in n.operands().iter() {
                    f(NodeRef::ExpressionList(operands));
                }
                for data in n.annotation_data() {
                    f(NodeRef::AnnotationData(data));
                }
            }
            NodeRef::Bundle(n) => {
                for item in n.items() {
                    f(NodeRef::Instruction(item));
                }
                for data in n.annotation_data() {
                    f(NodeRef::AnnotationData(data));
                }
            }
            NodeRef::Mapping(n) => {
                for alias in n.alias().iter() {
                    f(NodeRef::Identifier(alias));
                }
                for expr in n.expr().iter() {
                    f(NodeRef::from_expression(expr));
                }
                for data in n.annotation_data() {
                    f(NodeRef::AnnotationData(data));
                }
            }
            NodeRef::Subcircuit(n) => {
                for name in n.name().iter() {
                    f(NodeRef::Identifier(name));
                }
                for iterations in n.iterations().iter() {
                    f(NodeRef::from_expression(iterations));
                }
                for data in n.annotation_data() {
                    f(NodeRef::AnnotationData(data));
                }
            }
            NodeRef::StatementList(n) => {
                for statement in n.items() {
                    f(NodeRef::from_statement(statement));
                }
            }
            NodeRef::Program(n) => {
                for version in n.version().iter() {
                    f(NodeRef::Version(version));
                }
                for num_qubits in n.num_qubits().iter() {
                    f(NodeRef::from_expression(num_qubits));
                }
                for statements in n.statements().iter() {
                    f(NodeRef::StatementList(statements));
                }
            }
        }
    }
}

impl Expression {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::from_expression(self).accept(visitor);
    }
}

impl Statement {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::from_statement(self).accept(visitor);
    }
}

impl IndexEntry {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::from_index_entry(self).accept(visitor);
    }
}

impl Root {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        NodeRef::from_root(self).accept(visitor);
    }
}

/// Visitor with per-kind hooks and base-class fallback chains.
pub trait Visitor {
    /// Final fallback for every node kind.
    fn visit_node(&mut self, _node: NodeRef<'_>) {}

    // Category fallbacks.

    fn visit_annotated(&mut self, node: NodeRef<'_>) {
        self.visit_node(node);
    }

    fn visit_expression(&mut self, node: NodeRef<'_>) {
        self.visit_node(node);
    }

    fn visit_statement(&mut self, node: NodeRef<'_>) {
        self.visit_annotated(node);
    }

    fn visit_index_entry(&mut self, node: NodeRef<'_>) {
        self.visit_node(node);
    }

    fn visit_root(&mut self, node: NodeRef<'_>) {
        self.visit_node(node);
    }

    // Expression leaves.

    fn visit_integer_literal(&mut self, n: &IntegerLiteral) {
        self.visit_expression(NodeRef::IntegerLiteral(n));
    }

    fn visit_float_literal(&mut self, n: &FloatLiteral) {
        self.visit_expression(NodeRef::FloatLiteral(n));
    }

    fn visit_string_literal(&mut self, n: &StringLiteral) {
        self.visit_expression(NodeRef::StringLiteral(n));
    }

    fn visit_json_literal(&mut self, n: &JsonLiteral) {
        self.visit_expression(NodeRef::JsonLiteral(n));
    }

    fn visit_matrix_literal(&mut self, n: &MatrixLiteral) {
        self.visit_expression(NodeRef::MatrixLiteral(n));
    }

    fn visit_identifier(&mut self, n: &Identifier) {
        self.visit_expression(NodeRef::Identifier(n));
    }

    fn visit_function_call(&mut self, n: &FunctionCall) {
        self.visit_expression(NodeRef::FunctionCall(n));
    }

    fn visit_index(&mut self, n: &Index) {
        self.visit_expression(NodeRef::Index(n));
    }

    fn visit_unary_op(&mut self, n: &UnaryOp) {
        self.visit_expression(NodeRef::UnaryOp(n));
    }

    fn visit_binary_op(&mut self, n: &BinaryOp) {
        self.visit_expression(NodeRef::BinaryOp(n));
    }

    fn visit_erroneous_expression(&mut self, n: &ErroneousExpression) {
        self.visit_expression(NodeRef::ErroneousExpression(n));
    }

    // Index entry leaves.

    fn visit_index_item(&mut self, n: &IndexItem) {
        self.visit_index_entry(NodeRef::IndexItem(n));
    }

    fn visit_index_range(&mut self, n: &IndexRange) {
        self.visit_index_entry(NodeRef::IndexRange(n));
    }

    // Plain nodes.

    fn visit_index_list(&mut self, n: &IndexList) {
        self.visit_node(NodeRef::IndexList(n));
    }

    fn visit_expression_list(&mut self, n: &ExpressionList) {
        self.visit_node(NodeRef::ExpressionList(n));
    }

    fn visit_annotation_data(&mut self, n: &AnnotationData) {
        self.visit_node(NodeRef::AnnotationData(n));
    }

    fn visit_version(&mut self, n: &Version) {
        self.visit_node(NodeRef::Version(n));
    }

    fn visit_statement_list(&mut self, n: &StatementList) {
        self.visit_node(NodeRef::StatementList(n));
    }

    // Annotated leaves.

    fn visit_instruction(&mut self, n: &Instruction) {
        self.visit_annotated(NodeRef::Instruction(n));
    }

    // Statement leaves.

    fn visit_bundle(&mut self, n: &Bundle) {
        self.visit_statement(NodeRef::Bundle(n));
    }

    fn visit_mapping(&mut self, n: &Mapping) {
        self.visit_statement(NodeRef::Mapping(n));
    }

    fn visit_subcircuit(&mut self, n: &Subcircuit) {
        self.visit_statement(NodeRef::Subcircuit(n));
    }

    fn visit_erroneous_statement(&mut self, n: &ErroneousStatement) {
        self.visit_statement(NodeRef::ErroneousStatement(n));
    }

    // Roots.

    fn visit_program(&mut self, n: &Program) {
        self.visit_root(NodeRef::Program(n));
    }

    fn visit_erroneous_program(&mut self, n: &ErroneousProgram) {
        self.visit_root(NodeRef::ErroneousProgram(n));
    }
}

/// Depth-first traversal over any [`Visitor`]: each node is dispatched
/// before its children; children come in declared order.
pub trait RecursiveVisitor: Visitor {
    fn visit_tree(&mut self, node: NodeRef<'_>) {
        node.accept(self);
        let mut children = Vec::new();
        node.for_each_child(&mut |child| children.push(child));
        for child in children {
            self.visit_tree(child);
        }
    }
}

impl<V: Visitor + ?Sized> RecursiveVisitor for V {}

#[cfg(test)]
mod tests {
    use super::*;

    struct KindCounter {
        visited: Vec<NodeKind>,
    }

    impl Visitor for KindCounter {
        fn visit_node(&mut self, node: NodeRef<'_>) {
            self.visited.push(node.kind());
        }
    }

    #[test]
    fn fallback_chain_reaches_visit_node_once() {
        let expr = BinaryOp::new(
            BinaryOperator::Add,
            IntegerLiteral::new(1).to_expr(),
            FloatLiteral::new(2.0).to_expr(),
        )
        .to_expr();
        let mut counter = KindCounter {
            visited: Vec::new(),
        };
        counter.visit_tree(NodeRef::from_expression(&expr));
        assert_eq!(
            counter.visited,
            vec![
                NodeKind::BinaryOp,
                NodeKind::IntegerLiteral,
                NodeKind::FloatLiteral
            ]
        );
    }

    struct ExpressionSpy {
        expressions: usize,
        nodes: usize,
    }

    impl Visitor for ExpressionSpy {
        fn visit_node(&mut self, _node: NodeRef<'_>) {
            self.nodes += 1;
        }

        fn visit_expression(&mut self, node: NodeRef<'_>) {
            self.expressions += 1;
            // Keep the chain going so visit_node still counts everything.
            self.visit_node(node);
        }
    }

    #[test]
    fn category_override_intercepts_every_expression_kind() {
        let expr = Index::new(
            Identifier::new("q").to_expr(),
            {
                let mut list = IndexList::new();
                list.add(IndexItem::new(IntegerLiteral::new(0).to_expr()).to_entry());
                list
            },
        )
        .to_expr();
        let mut spy = ExpressionSpy {
            expressions: 0,
            nodes: 0,
        };
        spy.visit_tree(NodeRef::from_expression(&expr));
        // Index, Identifier and IntegerLiteral are expressions; IndexList
        // and IndexItem are not.
        assert_eq!(spy.expressions, 3);
        assert_eq!(spy.nodes, 5);
    }
}
