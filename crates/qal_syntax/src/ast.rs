// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! The QAL abstract syntax tree.
//!
//! One discriminated union per schema category ([`Expression`],
//! [`Statement`], [`Root`], [`IndexEntry`]) wrapping one struct per concrete
//! node kind. Construction of the tree from source text is in `parser.rs`.
//!
//! Every node owns two kinds of annotation:
//! - `annotations`: the typed side-table from `qal_tree`, used for source
//!   locations and other bookkeeping. Structural equality ignores it.
//! - `annotation_data` (statements and instructions only): the
//!   `@interface.operation(...)` annotations written in the source.
//!
//! Variants have the form `Xxx(Xxx)`: the outer name is the variant, the
//! inner name the struct with the node's structure.

use qal_primitives::{Int, Real, Str};
use qal_tree::{Annotations, Any, Many, Maybe, One, TreeNode};

pub use qal_tree::HasAnnotations;

/// Enumeration of every concrete node kind in the AST schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    JsonLiteral,
    MatrixLiteral,
    Identifier,
    FunctionCall,
    Index,
    UnaryOp,
    BinaryOp,
    ErroneousExpression,
    IndexItem,
    IndexRange,
    IndexList,
    ExpressionList,
    AnnotationData,
    Instruction,
    Bundle,
    Mapping,
    Subcircuit,
    ErroneousStatement,
    StatementList,
    Version,
    Program,
    ErroneousProgram,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::IntegerLiteral => "IntegerLiteral",
            NodeKind::FloatLiteral => "FloatLiteral",
            NodeKind::StringLiteral => "StringLiteral",
            NodeKind::JsonLiteral => "JsonLiteral",
            NodeKind::MatrixLiteral => "MatrixLiteral",
            NodeKind::Identifier => "Identifier",
            NodeKind::FunctionCall => "FunctionCall",
            NodeKind::Index => "Index",
            NodeKind::UnaryOp => "UnaryOp",
            NodeKind::BinaryOp => "BinaryOp",
            NodeKind::ErroneousExpression => "ErroneousExpression",
            NodeKind::IndexItem => "IndexItem",
            NodeKind::IndexRange => "IndexRange",
            NodeKind::IndexList => "IndexList",
            NodeKind::ExpressionList => "ExpressionList",
            NodeKind::AnnotationData => "AnnotationData",
            NodeKind::Instruction => "Instruction",
            NodeKind::Bundle => "Bundle",
            NodeKind::Mapping => "Mapping",
            NodeKind::Subcircuit => "Subcircuit",
            NodeKind::ErroneousStatement => "ErroneousStatement",
            NodeKind::StatementList => "StatementList",
            NodeKind::Version => "Version",
            NodeKind::Program => "Program",
            NodeKind::ErroneousProgram => "ErroneousProgram",
        }
    }
}

macro_rules! impl_has_annotations {
    ($($node:ident),+ $(,)?) => {
        $(impl HasAnnotations for $node {
            fn annotations(&self) -> &Annotations {
                &self.annotations
            }

            fn annotations_mut(&mut self) -> &mut Annotations {
                &mut self.annotations
            }
        })+
    };
}

impl_has_annotations!(
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    JsonLiteral,
    MatrixLiteral,
    Identifier,
    FunctionCall,
    Index,
    UnaryOp,
    BinaryOp,
    ErroneousExpression,
    IndexItem,
    IndexRange,
    IndexList,
    ExpressionList,
    AnnotationData,
    Instruction,
    Bundle,
    Mapping,
    Subcircuit,
    ErroneousStatement,
    StatementList,
    Version,
    Program,
    ErroneousProgram,
);

//
// Expressions
//

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    IntegerLiteral(IntegerLiteral),
    FloatLiteral(FloatLiteral),
    StringLiteral(StringLiteral),
    JsonLiteral(JsonLiteral),
    MatrixLiteral(MatrixLiteral),
    Identifier(Identifier),
    FunctionCall(FunctionCall),
    Index(Index),
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    Erroneous(ErroneousExpression),
}

impl Expression {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::IntegerLiteral(_) => NodeKind::IntegerLiteral,
            Expression::FloatLiteral(_) => NodeKind::FloatLiteral,
            Expression::StringLiteral(_) => NodeKind::StringLiteral,
            Expression::JsonLiteral(_) => NodeKind::JsonLiteral,
            Expression::MatrixLiteral(_) => NodeKind::MatrixLiteral,
            Expression::Identifier(_) => NodeKind::Identifier,
            Expression::FunctionCall(_) => NodeKind::FunctionCall,
            Expression::Index(_) => NodeKind::Index,
            Expression::UnaryOp(_) => NodeKind::UnaryOp,
            Expression::BinaryOp(_) => NodeKind::BinaryOp,
            Expression::Erroneous(_) => NodeKind::ErroneousExpression,
        }
    }

    pub fn as_integer_literal(&self) -> Option<&IntegerLiteral> {
        match self {
            Expression::IntegerLiteral(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_float_literal(&self) -> Option<&FloatLiteral> {
        match self {
            Expression::FloatLiteral(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_string_literal(&self) -> Option<&StringLiteral> {
        match self {
            Expression::StringLiteral(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_json_literal(&self) -> Option<&JsonLiteral> {
        match self {
            Expression::JsonLiteral(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_matrix_literal(&self) -> Option<&MatrixLiteral> {
        match self {
            Expression::MatrixLiteral(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            Expression::FunctionCall(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<&Index> {
        match self {
            Expression::Index(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_unary_op(&self) -> Option<&UnaryOp> {
        match self {
            Expression::UnaryOp(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_binary_op(&self) -> Option<&BinaryOp> {
        match self {
            Expression::BinaryOp(n) => Some(n),
            _ => None,
        }
    }
}

impl TreeNode for Expression {
    fn is_complete(&self) -> bool {
        match self {
            Expression::IntegerLiteral(n) => n.is_complete(),
            Expression::FloatLiteral(n) => n.is_complete(),
            Expression::StringLiteral(n) => n.is_complete(),
            Expression::JsonLiteral(n) => n.is_complete(),
            Expression::MatrixLiteral(n) => n.is_complete(),
            Expression::Identifier(n) => n.is_complete(),
            Expression::FunctionCall(n) => n.is_complete(),
            Expression::Index(n) => n.is_complete(),
            Expression::UnaryOp(n) => n.is_complete(),
            Expression::BinaryOp(n) => n.is_complete(),
            Expression::Erroneous(n) => n.is_complete(),
        }
    }
}

impl HasAnnotations for Expression {
    fn annotations(&self) -> &Annotations {
        match self {
            Expression::IntegerLiteral(n) => n.annotations(),
            Expression::FloatLiteral(n) => n.annotations(),
            Expression::StringLiteral(n) => n.annotations(),
            Expression::JsonLiteral(n) => n.annotations(),
            Expression::MatrixLiteral(n) => n.annotations(),
            Expression::Identifier(n) => n.annotations(),
            Expression::FunctionCall(n) => n.annotations(),
            Expression::Index(n) => n.annotations(),
            Expression::UnaryOp(n) => n.annotations(),
            Expression::BinaryOp(n) => n.annotations(),
            Expression::Erroneous(n) => n.annotations(),
        }
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Expression::IntegerLiteral(n) => n.annotations_mut(),
            Expression::FloatLiteral(n) => n.annotations_mut(),
            Expression::StringLiteral(n) => n.annotations_mut(),
            Expression::JsonLiteral(n) => n.annotations_mut(),
            Expression::MatrixLiteral(n) => n.annotations_mut(),
            Expression::Identifier(n) => n.annotations_mut(),
            Expression::FunctionCall(n) => n.annotations_mut(),
            Expression::Index(n) => n.annotations_mut(),
            Expression::UnaryOp(n) => n.annotations_mut(),
            Expression::BinaryOp(n) => n.annotations_mut(),
            Expression::Erroneous(n) => n.annotations_mut(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntegerLiteral {
    value: Int,
    annotations: Annotations,
}

impl IntegerLiteral {
    pub fn new(value: Int) -> IntegerLiteral {
        IntegerLiteral {
            value,
            annotations: Annotations::new(),
        }
    }

    pub fn value(&self) -> Int {
        self.value
    }

    pub fn to_expr(self) -> Expression {
        Expression::IntegerLiteral(self)
    }
}

impl TreeNode for IntegerLiteral {
    fn is_complete(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatLiteral {
    value: Real,
    annotations: Annotations,
}

impl FloatLiteral {
    pub fn new(value: Real) -> FloatLiteral {
        FloatLiteral {
            value,
            annotations: Annotations::new(),
        }
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn to_expr(self) -> Expression {
        Expression::FloatLiteral(self)
    }
}

impl TreeNode for FloatLiteral {
    fn is_complete(&self) -> bool {
        true
    }
}

/// A double-quoted string literal; `value` holds the unescaped contents.
#[derive(Clone, Debug, PartialEq)]
pub struct StringLiteral {
    value: Str,
    annotations: Annotations,
}

impl StringLiteral {
    pub fn new<T: ToString>(value: T) -> StringLiteral {
        StringLiteral {
            value: value.to_string(),
            annotations: Annotations::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn to_expr(self) -> Expression {
        Expression::StringLiteral(self)
    }
}

impl TreeNode for StringLiteral {
    fn is_complete(&self) -> bool {
        true
    }
}

/// A `{| ... |}` literal; `value` holds the raw text between the delimiters,
/// preserved verbatim for downstream consumers.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonLiteral {
    value: Str,
    annotations: Annotations,
}

impl JsonLiteral {
    pub fn new<T: ToString>(value: T) -> JsonLiteral {
        JsonLiteral {
            value: value.to_string(),
            annotations: Annotations::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn to_expr(self) -> Expression {
        Expression::JsonLiteral(self)
    }
}

impl TreeNode for JsonLiteral {
    fn is_complete(&self) -> bool {
        true
    }
}

/// A matrix literal. The legacy flat form `[a, b, ...]` parses as a single
/// row; the multi-row form separates rows with newlines or semicolons.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixLiteral {
    rows: Many<ExpressionList>,
    annotations: Annotations,
}

impl MatrixLiteral {
    pub fn new(rows: Many<ExpressionList>) -> MatrixLiteral {
        MatrixLiteral {
            rows,
            annotations: Annotations::new(),
        }
    }

    pub fn rows(&self) -> &Many<ExpressionList> {
        &self.rows
    }

    pub fn to_expr(self) -> Expression {
        Expression::MatrixLiteral(self)
    }
}

impl TreeNode for MatrixLiteral {
    fn is_complete(&self) -> bool {
        self.rows.is_complete()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    name: Str,
    annotations: Annotations,
}

impl Identifier {
    pub fn new<T: ToString>(name: T) -> Identifier {
        Identifier {
            name: name.to_string(),
            annotations: Annotations::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_expr(self) -> Expression {
        Expression::Identifier(self)
    }
}

impl TreeNode for Identifier {
    fn is_complete(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    name: One<Identifier>,
    args: One<ExpressionList>,
    annotations: Annotations,
}

impl FunctionCall {
    pub fn new(name: Identifier, args: ExpressionList) -> FunctionCall {
        FunctionCall {
            name: One::from(name),
            args: One::from(args),
            annotations: Annotations::new(),
        }
    }

    pub fn name(&self) -> &One<Identifier> {
        &self.name
    }

    pub fn args(&self) -> &One<ExpressionList> {
        &self.args
    }

    pub fn to_expr(self) -> Expression {
        Expression::FunctionCall(self)
    }
}

impl TreeNode for FunctionCall {
    fn is_complete(&self) -> bool {
        self.name.is_complete() && self.args.is_complete()
    }
}

/// Indexation `expr[indices]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Index {
    expr: One<Expression>,
    indices: One<IndexList>,
    annotations: Annotations,
}

impl Index {
    pub fn new(expr: Expression, indices: IndexList) -> Index {
        Index {
            expr: One::from(expr),
            indices: One::from(indices),
            annotations: Annotations::new(),
        }
    }

    pub fn expr(&self) -> &One<Expression> {
        &self.expr
    }

    pub fn indices(&self) -> &One<IndexList> {
        &self.indices
    }

    pub fn to_expr(self) -> Expression {
        Expression::Index(self)
    }
}

impl TreeNode for Index {
    fn is_complete(&self) -> bool {
        self.expr.is_complete() && self.indices.is_complete()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
        }
    }

    /// Name of the synthetic function the analyzer dispatches this operator
    /// through.
    pub fn function_name(&self) -> &'static str {
        match self {
            UnaryOperator::Negate => "operator-",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryOp {
    op: UnaryOperator,
    expr: One<Expression>,
    annotations: Annotations,
}

impl UnaryOp {
    pub fn new(op: UnaryOperator, expr: Expression) -> UnaryOp {
        UnaryOp {
            op,
            expr: One::from(expr),
            annotations: Annotations::new(),
        }
    }

    pub fn op(&self) -> UnaryOperator {
        self.op
    }

    pub fn expr(&self) -> &One<Expression> {
        &self.expr
    }

    pub fn to_expr(self) -> Expression {
        Expression::UnaryOp(self)
    }
}

impl TreeNode for UnaryOp {
    fn is_complete(&self) -> bool {
        self.expr.is_complete()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "**",
        }
    }

    /// Name of the synthetic function the analyzer dispatches this operator
    /// through.
    pub fn function_name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "operator+",
            BinaryOperator::Subtract => "operator-",
            BinaryOperator::Multiply => "operator*",
            BinaryOperator::Divide => "operator/",
            BinaryOperator::Power => "operator**",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOp {
    op: BinaryOperator,
    lhs: One<Expression>,
    rhs: One<Expression>,
    annotations: Annotations,
}

impl BinaryOp {
    pub fn new(op: BinaryOperator, lhs: Expression, rhs: Expression) -> BinaryOp {
        BinaryOp {
            op,
            lhs: One::from(lhs),
            rhs: One::from(rhs),
            annotations: Annotations::new(),
        }
    }

    pub fn op(&self) -> BinaryOperator {
        self.op
    }

    pub fn lhs(&self) -> &One<Expression> {
        &self.lhs
    }

    pub fn rhs(&self) -> &One<Expression> {
        &self.rhs
    }

    pub fn to_expr(self) -> Expression {
        Expression::BinaryOp(self)
    }
}

impl TreeNode for BinaryOp {
    fn is_complete(&self) -> bool {
        self.lhs.is_complete() && self.rhs.is_complete()
    }
}

/// Placeholder for an expression that failed to parse. Never complete.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErroneousExpression {
    annotations: Annotations,
}

impl ErroneousExpression {
    pub fn new() -> ErroneousExpression {
        ErroneousExpression::default()
    }

    pub fn to_expr(self) -> Expression {
        Expression::Erroneous(self)
    }
}

impl TreeNode for ErroneousExpression {
    fn is_complete(&self) -> bool {
        false
    }
}

//
// Index lists
//

#[derive(Clone, Debug, PartialEq)]
pub enum IndexEntry {
    Item(IndexItem),
    Range(IndexRange),
}

impl IndexEntry {
    pub fn kind(&self) -> NodeKind {
        match self {
            IndexEntry::Item(_) => NodeKind::IndexItem,
            IndexEntry::Range(_) => NodeKind::IndexRange,
        }
    }
}

impl TreeNode for IndexEntry {
    fn is_complete(&self) -> bool {
        match self {
            IndexEntry::Item(n) => n.is_complete(),
            IndexEntry::Range(n) => n.is_complete(),
        }
    }
}

impl HasAnnotations for IndexEntry {
    fn annotations(&self) -> &Annotations {
        match self {
            IndexEntry::Item(n) => n.annotations(),
            IndexEntry::Range(n) => n.annotations(),
        }
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            IndexEntry::Item(n) => n.annotations_mut(),
            IndexEntry::Range(n) => n.annotations_mut(),
        }
    }
}

/// A single index in an index list.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexItem {
    index: One<Expression>,
    annotations: Annotations,
}

impl IndexItem {
    pub fn new(index: Expression) -> IndexItem {
        IndexItem {
            index: One::from(index),
            annotations: Annotations::new(),
        }
    }

    pub fn index(&self) -> &One<Expression> {
        &self.index
    }

    pub fn to_entry(self) -> IndexEntry {
        IndexEntry::Item(self)
    }
}

impl TreeNode for IndexItem {
    fn is_complete(&self) -> bool {
        self.index.is_complete()
    }
}

/// An inclusive range `first:last` in an index list.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexRange {
    first: One<Expression>,
    last: One<Expression>,
    annotations: Annotations,
}

impl IndexRange {
    pub fn new(first: Expression, last: Expression) -> IndexRange {
        IndexRange {
            first: One::from(first),
            last: One::from(last),
            annotations: Annotations::new(),
        }
    }

    pub fn first(&self) -> &One<Expression> {
        &self.first
    }

    pub fn last(&self) -> &One<Expression> {
        &self.last
    }

    pub fn to_entry(self) -> IndexEntry {
        IndexEntry::Range(self)
    }
}

impl TreeNode for IndexRange {
    fn is_complete(&self) -> bool {
        self.first.is_complete() && self.last.is_complete()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexList {
    items: Many<IndexEntry>,
    annotations: Annotations,
}

impl IndexList {
    pub fn new() -> IndexList {
        IndexList::default()
    }

    pub fn add(&mut self, entry: IndexEntry) {
        self.items.add(entry);
    }

    pub fn items(&self) -> &Many<IndexEntry> {
        &self.items
    }
}

impl TreeNode for IndexList {
    fn is_complete(&self) -> bool {
        self.items.is_complete()
    }
}

/// A comma-separated list of expressions: instruction operands, call
/// arguments, annotation arguments, one matrix row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionList {
    items: Any<Expression>,
    annotations: Annotations,
}

impl ExpressionList {
    pub fn new() -> ExpressionList {
        ExpressionList::default()
    }

    pub fn add(&mut self, expression: Expression) {
        self.items.add(expression);
    }

    pub fn items(&self) -> &Any<Expression> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.size()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<Expression>> for ExpressionList {
    fn from(items: Vec<Expression>) -> ExpressionList {
        ExpressionList {
            items: Any::from(items),
            annotations: Annotations::new(),
        }
    }
}

impl TreeNode for ExpressionList {
    fn is_complete(&self) -> bool {
        self.items.is_complete()
    }
}

//
// Annotations written in the source: `@interface.operation(operands)`
//

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationData {
    interface: One<Identifier>,
    operation: One<Identifier>,
    operands: Maybe<ExpressionList>,
    annotations: Annotations,
}

impl AnnotationData {
    pub fn new(
        interface: Identifier,
        operation: Identifier,
        operands: Option<ExpressionList>,
    ) -> AnnotationData {
        AnnotationData {
            interface: One::from(interface),
            operation: One::from(operation),
            operands: operands.map_or_else(Maybe::empty, Maybe::from),
            annotations: Annotations::new(),
        }
    }

    pub fn interface(&self) -> &One<Identifier> {
        &self.interface
    }

    pub fn operation(&self) -> &One<Identifier> {
        &self.operation
    }

    pub fn operands(&self) -> &Maybe<ExpressionList> {
        &self.operands
    }
}

impl TreeNode for AnnotationData {
    fn is_complete(&self) -> bool {
        self.interface.is_complete() && self.operation.is_complete() && self.operands.is_complete()
    }
}

//
// Instructions and statements
//

/// One instruction: a name, an optional `c-` condition, and operands.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    name: One<Identifier>,
    condition: Maybe<Expression>,
    operands: One<ExpressionList>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl Instruction {
    pub fn new(
        name: Identifier,
        condition: Option<Expression>,
        operands: ExpressionList,
    ) -> Instruction {
        Instruction {
            name: One::from(name),
            condition: condition.map_or_else(Maybe::empty, Maybe::from),
            operands: One::from(operands),
            annotation_data: Any::empty(),
            annotations: Annotations::new(),
        }
    }

    pub fn name(&self) -> &One<Identifier> {
        &self.name
    }

    pub fn condition(&self) -> &Maybe<Expression> {
        &self.condition
    }

    pub fn operands(&self) -> &One<ExpressionList> {
        &self.operands
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }
}

impl TreeNode for Instruction {
    fn is_complete(&self) -> bool {
        self.name.is_complete()
            && self.condition.is_complete()
            && self.operands.is_complete()
            && self.annotation_data.is_complete()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Bundle(Bundle),
    Mapping(Mapping),
    Subcircuit(Subcircuit),
    Erroneous(ErroneousStatement),
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Bundle(_) => NodeKind::Bundle,
            Statement::Mapping(_) => NodeKind::Mapping,
            Statement::Subcircuit(_) => NodeKind::Subcircuit,
            Statement::Erroneous(_) => NodeKind::ErroneousStatement,
        }
    }

    pub fn as_bundle(&self) -> Option<&Bundle> {
        match self {
            Statement::Bundle(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Statement::Mapping(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_subcircuit(&self) -> Option<&Subcircuit> {
        match self {
            Statement::Subcircuit(n) => Some(n),
            _ => None,
        }
    }
}

impl TreeNode for Statement {
    fn is_complete(&self) -> bool {
        match self {
            Statement::Bundle(n) => n.is_complete(),
            Statement::Mapping(n) => n.is_complete(),
            Statement::Subcircuit(n) => n.is_complete(),
            Statement::Erroneous(n) => n.is_complete(),
        }
    }
}

impl HasAnnotations for Statement {
    fn annotations(&self) -> &Annotations {
        match self {
            Statement::Bundle(n) => n.annotations(),
            Statement::Mapping(n) => n.annotations(),
            Statement::Subcircuit(n) => n.annotations(),
            Statement::Erroneous(n) => n.annotations(),
        }
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Statement::Bundle(n) => n.annotations_mut(),
            Statement::Mapping(n) => n.annotations_mut(),
            Statement::Subcircuit(n) => n.annotations_mut(),
            Statement::Erroneous(n) => n.annotations_mut(),
        }
    }
}

/// A group of instructions executed in parallel: either a single-line
/// `a | b | c` group or a brace-enclosed multi-line group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bundle {
    items: Many<Instruction>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl Bundle {
    pub fn new() -> Bundle {
        Bundle::default()
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.items.add(instruction);
    }

    pub fn items(&self) -> &Many<Instruction> {
        &self.items
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }

    pub fn to_stmt(self) -> Statement {
        Statement::Bundle(self)
    }
}

impl TreeNode for Bundle {
    fn is_complete(&self) -> bool {
        self.items.is_complete() && self.annotation_data.is_complete()
    }
}

/// `map <expr>, <alias>` or `map <alias> = <expr>`: binds a name to the
/// value of an expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    alias: One<Identifier>,
    expr: One<Expression>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl Mapping {
    pub fn new(alias: Identifier, expr: Expression) -> Mapping {
        Mapping {
            alias: One::from(alias),
            expr: One::from(expr),
            annotation_data: Any::empty(),
            annotations: Annotations::new(),
        }
    }

    pub fn alias(&self) -> &One<Identifier> {
        &self.alias
    }

    pub fn expr(&self) -> &One<Expression> {
        &self.expr
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }

    pub fn to_stmt(self) -> Statement {
        Statement::Mapping(self)
    }
}

impl TreeNode for Mapping {
    fn is_complete(&self) -> bool {
        self.alias.is_complete() && self.expr.is_complete() && self.annotation_data.is_complete()
    }
}

/// A subcircuit header `.<name>` or `.<name>(<iterations>)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Subcircuit {
    name: One<Identifier>,
    iterations: Maybe<Expression>,
    annotation_data: Any<AnnotationData>,
    annotations: Annotations,
}

impl Subcircuit {
    pub fn new(name: Identifier, iterations: Option<Expression>) -> Subcircuit {
        Subcircuit {
            name: One::from(name),
            iterations: iterations.map_or_else(Maybe::empty, Maybe::from),
            annotation_data: Any::empty(),
            annotations: Annotations::new(),
        }
    }

    pub fn name(&self) -> &One<Identifier> {
        &self.name
    }

    pub fn iterations(&self) -> &Maybe<Expression> {
        &self.iterations
    }

    pub fn annotation_data(&self) -> &Any<AnnotationData> {
        &self.annotation_data
    }

    pub fn add_annotation_data(&mut self, data: AnnotationData) {
        self.annotation_data.add(data);
    }

    pub fn to_stmt(self) -> Statement {
        Statement::Subcircuit(self)
    }
}

impl TreeNode for Subcircuit {
    fn is_complete(&self) -> bool {
        self.name.is_complete()
            && self.iterations.is_complete()
            && self.annotation_data.is_complete()
    }
}

/// Placeholder for a statement that failed to parse. Never complete.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErroneousStatement {
    annotations: Annotations,
}

impl ErroneousStatement {
    pub fn new() -> ErroneousStatement {
        ErroneousStatement::default()
    }

    pub fn to_stmt(self) -> Statement {
        Statement::Erroneous(self)
    }
}

impl TreeNode for ErroneousStatement {
    fn is_complete(&self) -> bool {
        false
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatementList {
    items: Any<Statement>,
    annotations: Annotations,
}

impl StatementList {
    pub fn new() -> StatementList {
        StatementList::default()
    }

    pub fn add(&mut self, statement: Statement) {
        self.items.add(statement);
    }

    pub fn items(&self) -> &Any<Statement> {
        &self.items
    }
}

impl TreeNode for StatementList {
    fn is_complete(&self) -> bool {
        self.items.is_complete()
    }
}

//
// Program root
//

/// The `version` statement payload: integer components as written, sign
/// included. Validation (components must be non-negative) happens during
/// analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Version {
    items: Vec<Int>,
    annotations: Annotations,
}

impl Version {
    pub fn new(items: Vec<Int>) -> Version {
        Version {
            items,
            annotations: Annotations::new(),
        }
    }

    pub fn items(&self) -> &[Int] {
        &self.items
    }
}

impl TreeNode for Version {
    fn is_complete(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Root {
    Program(Program),
    Erroneous(ErroneousProgram),
}

impl Root {
    pub fn kind(&self) -> NodeKind {
        match self {
            Root::Program(_) => NodeKind::Program,
            Root::Erroneous(_) => NodeKind::ErroneousProgram,
        }
    }

    pub fn as_program(&self) -> Option<&Program> {
        match self {
            Root::Program(n) => Some(n),
            Root::Erroneous(_) => None,
        }
    }
}

impl TreeNode for Root {
    fn is_complete(&self) -> bool {
        match self {
            Root::Program(n) => n.is_complete(),
            Root::Erroneous(n) => n.is_complete(),
        }
    }
}

impl HasAnnotations for Root {
    fn annotations(&self) -> &Annotations {
        match self {
            Root::Program(n) => n.annotations(),
            Root::Erroneous(n) => n.annotations(),
        }
    }

    fn annotations_mut(&mut self) -> &mut Annotations {
        match self {
            Root::Program(n) => n.annotations_mut(),
            Root::Erroneous(n) => n.annotations_mut(),
        }
    }
}

/// A successfully parsed program: version, qubit count, statements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    version: One<Version>,
    num_qubits: One<Expression>,
    statements: One<StatementList>,
    annotations: Annotations,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn set_version(&mut self, version: Version) {
        self.version.set(version);
    }

    pub fn set_num_qubits(&mut self, num_qubits: Expression) {
        self.num_qubits.set(num_qubits);
    }

    pub fn set_statements(&mut self, statements: StatementList) {
        self.statements.set(statements);
    }

    pub fn version(&self) -> &One<Version> {
        &self.version
    }

    pub fn num_qubits(&self) -> &One<Expression> {
        &self.num_qubits
    }

    pub fn statements(&self) -> &One<StatementList> {
        &self.statements
    }

    pub fn to_root(self) -> Root {
        Root::Program(self)
    }
}

impl TreeNode for Program {
    fn is_complete(&self) -> bool {
        self.version.is_complete()
            && self.num_qubits.is_complete()
            && self.statements.is_complete()
    }
}

/// Marker root emitted when the program header could not be parsed at all.
/// Never complete.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErroneousProgram {
    annotations: Annotations,
}

impl ErroneousProgram {
    pub fn new() -> ErroneousProgram {
        ErroneousProgram::default()
    }

    pub fn to_root(self) -> Root {
        Root::Erroneous(self)
    }
}

impl TreeNode for ErroneousProgram {
    fn is_complete(&self) -> bool {
        false
    }
}
