//! Node definitions.
//!
//! Each struct is one syntactic construct. Node fields hold owned children
//! (boxed where the type recurses), so a tree has exactly one owner and no
//! back references. Names are [`Ident`]s rather than nodes; they carry the
//! `missing` flag of the token they were built from.

use std::fmt;

use crate::span::Span;
use crate::token::{Token, TokenKind};

use super::NodeRef;

/// A name as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub span: Span,
    /// Synthesized by error recovery; `text` is empty.
    pub missing: bool,
}

impl Ident {
    pub fn from_token(token: &Token<'_>) -> Self {
        Self {
            text: token.text.to_owned(),
            span: token.span,
            missing: token.is_missing(),
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
}

impl Modifier {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Public => Self::Public,
            TokenKind::Private => Self::Private,
            TokenKind::Protected => Self::Protected,
            TokenKind::Static => Self::Static,
            TokenKind::Final => Self::Final,
            TokenKind::Abstract => Self::Abstract,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Static => "static",
            Self::Final => "final",
            Self::Abstract => "abstract",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    String,
    Char,
    True,
    False,
    Null,
}

impl LiteralKind {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::IntLiteral => Self::Int,
            TokenKind::StringLiteral => Self::String,
            TokenKind::CharLiteral => Self::Char,
            TokenKind::True => Self::True,
            TokenKind::False => Self::False,
            TokenKind::Null => Self::Null,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::PipePipe => Self::Or,
            TokenKind::AmpAmp => Self::And,
            TokenKind::EqEq => Self::Eq,
            TokenKind::BangEq => Self::Ne,
            TokenKind::Lt => Self::Lt,
            TokenKind::LtEq => Self::Le,
            TokenKind::Gt => Self::Gt,
            TokenKind::GtEq => Self::Ge,
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::Percent => Self::Rem,
            _ => return None,
        })
    }

    /// Binding power; higher binds tighter. All binary operators are
    /// left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Minus => Self::Neg,
            TokenKind::Plus => Self::Plus,
            TokenKind::Bang => Self::Not,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Assign => Self::Assign,
            TokenKind::PlusAssign => Self::AddAssign,
            TokenKind::MinusAssign => Self::SubAssign,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
        }
    }
}

// === Declarations ===

/// Root of a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub classes: Vec<ClassDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub modifiers: Vec<Modifier>,
    pub name: Ident,
    pub extends: Option<ExtendsClause>,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendsClause {
    pub superclass: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: Ident,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeRef,
    pub name: Ident,
    pub params: Vec<Param>,
    /// `None` for a bodiless declaration ending in `;`.
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: Ident,
    pub span: Span,
}

/// A primitive or named type with zero or more `[]` suffixes.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: Ident,
    pub dims: usize,
    pub span: Span,
}

impl TypeRef {
    pub fn is_primitive(&self) -> bool {
        matches!(self.name.text.as_str(), "int" | "boolean" | "char" | "void")
    }
}

// === Statements ===

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    LocalVar(LocalVarDecl),
    Expr(ExprStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Empty(EmptyStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVarDecl {
    pub ty: TypeRef,
    pub name: Ident,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStmt {
    pub span: Span,
}

// === Expressions ===

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(NameExpr),
    Literal(LiteralExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Assign(AssignExpr),
    Call(CallExpr),
    FieldAccess(FieldAccessExpr),
    Paren(ParenExpr),
    Cast(CastExpr),
    ArrayInit(ArrayInitExpr),
    Error(ErrorExpr),
}

/// A variable reference, or `this`.
#[derive(Debug, Clone, PartialEq)]
pub struct NameExpr {
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessExpr {
    pub receiver: Box<Expr>,
    pub field: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub ty: TypeRef,
    pub operand: Box<Expr>,
    pub span: Span,
}

/// `{a, b, c}` in a variable initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInitExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// Placeholder for an expression that could not be parsed. Zero-width at
/// the position where the expression was expected.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorExpr {
    pub span: Span,
}

// === Children ===
//
// Present sub-nodes only, in field declaration order.

impl CompilationUnit {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        self.classes.iter().map(NodeRef::from).collect()
    }
}

impl ClassDecl {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        let mut children: Vec<NodeRef<'_>> = self.extends.iter().map(NodeRef::from).collect();
        children.extend(self.members.iter().map(Member::as_node));
        children
    }
}

impl ExtendsClause {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![NodeRef::from(&self.superclass)]
    }
}

impl FieldDecl {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        let mut children = vec![NodeRef::from(&self.ty)];
        children.extend(self.init.as_ref().map(Expr::as_node));
        children
    }
}

impl MethodDecl {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        let mut children = vec![NodeRef::from(&self.return_type)];
        children.extend(self.params.iter().map(NodeRef::from));
        children.extend(self.body.as_ref().map(NodeRef::from));
        children
    }
}

impl Param {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![NodeRef::from(&self.ty)]
    }
}

impl TypeRef {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        Vec::new()
    }
}

impl Block {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        self.stmts.iter().map(Stmt::as_node).collect()
    }
}

impl LocalVarDecl {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        let mut children = vec![NodeRef::from(&self.ty)];
        children.extend(self.init.as_ref().map(Expr::as_node));
        children
    }
}

impl ExprStmt {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![self.expr.as_node()]
    }
}

impl IfStmt {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        let mut children = vec![self.condition.as_node(), self.then_branch.as_node()];
        children.extend(self.else_branch.as_deref().map(Stmt::as_node));
        children
    }
}

impl WhileStmt {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![self.condition.as_node(), self.body.as_node()]
    }
}

impl ReturnStmt {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        self.value.iter().map(Expr::as_node).collect()
    }
}

impl EmptyStmt {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        Vec::new()
    }
}

impl NameExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        Vec::new()
    }
}

impl LiteralExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        Vec::new()
    }
}

impl UnaryExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![self.operand.as_node()]
    }
}

impl BinaryExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![self.lhs.as_node(), self.rhs.as_node()]
    }
}

impl AssignExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![self.target.as_node(), self.value.as_node()]
    }
}

impl CallExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        let mut children = vec![self.callee.as_node()];
        children.extend(self.args.iter().map(Expr::as_node));
        children
    }
}

impl FieldAccessExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![self.receiver.as_node()]
    }
}

impl ParenExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![self.inner.as_node()]
    }
}

impl CastExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        vec![NodeRef::from(&self.ty), self.operand.as_node()]
    }
}

impl ArrayInitExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        self.elements.iter().map(Expr::as_node).collect()
    }
}

impl ErrorExpr {
    pub(super) fn child_nodes(&self) -> Vec<NodeRef<'_>> {
        Vec::new()
    }
}

// === Sum types ===

impl Member {
    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            Member::Field(n) => n.into(),
            Member::Method(n) => n.into(),
        }
    }

    pub fn name(&self) -> &Ident {
        match self {
            Member::Field(n) => &n.name,
            Member::Method(n) => &n.name,
        }
    }
}

impl Stmt {
    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            Stmt::Block(n) => n.into(),
            Stmt::LocalVar(n) => n.into(),
            Stmt::Expr(n) => n.into(),
            Stmt::If(n) => n.into(),
            Stmt::While(n) => n.into(),
            Stmt::Return(n) => n.into(),
            Stmt::Empty(n) => n.into(),
        }
    }

    pub fn span(&self) -> Span {
        self.as_node().span()
    }
}

impl Expr {
    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            Expr::Name(n) => n.into(),
            Expr::Literal(n) => n.into(),
            Expr::Unary(n) => n.into(),
            Expr::Binary(n) => n.into(),
            Expr::Assign(n) => n.into(),
            Expr::Call(n) => n.into(),
            Expr::FieldAccess(n) => n.into(),
            Expr::Paren(n) => n.into(),
            Expr::Cast(n) => n.into(),
            Expr::ArrayInit(n) => n.into(),
            Expr::Error(n) => n.into(),
        }
    }

    pub fn span(&self) -> Span {
        self.as_node().span()
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Expr::Error(_))
    }
}
