//! # Typed Syntax Tree
//!
//! The grammar produces a tree of owned, immutable node structs (see
//! [`nodes`]). Two views make the tree traversable without knowing every
//! struct up front:
//!
//! - **Generic**: [`NodeRef`] is a borrowed tagged union over every node
//!   type. [`NodeRef::children`] lists the present sub-nodes in declaration
//!   order, so tree walks, dumps and diffs need no per-kind code.
//! - **Kind-specific**: [`NodeRef::accept`] calls exactly one method of a
//!   [`Visitor`]. The trait has no default methods, so adding a node kind is
//!   a compile error in every visitor until it is handled.
//!
//! ```
//! use kestrel_syntax::ast::{AstNode, NodeKind};
//! use kestrel_syntax::parser::grammar::parse_statement;
//!
//! let result = parse_statement("if (x) { y; }");
//! let kinds: Vec<_> = result.root.children().iter().map(|c| c.kind()).collect();
//! assert_eq!(kinds, vec![NodeKind::NameExpr, NodeKind::Block]);
//! ```

mod nodes;
pub mod printer;
mod visitor;
pub mod walk;

pub use nodes::*;
pub use visitor::Visitor;

use crate::span::Span;

/// Declares the node kinds once and derives [`NodeKind`], [`NodeRef`], and
/// the conversions and visitor routing from the list.
macro_rules! node_kinds {
    ($($kind:ident => $visit:ident),* $(,)?) => {
        /// Tag identifying a node's variant.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)*
                }
            }
        }

        /// A borrowed reference to any node.
        #[derive(Debug, Clone, Copy)]
        pub enum NodeRef<'a> {
            $($kind(&'a $kind),)*
        }

        impl<'a> NodeRef<'a> {
            pub fn kind(self) -> NodeKind {
                match self {
                    $(NodeRef::$kind(_) => NodeKind::$kind,)*
                }
            }

            pub fn span(self) -> Span {
                match self {
                    $(NodeRef::$kind(node) => node.span,)*
                }
            }

            /// Present sub-nodes, in declaration order.
            pub fn children(self) -> Vec<NodeRef<'a>> {
                match self {
                    $(NodeRef::$kind(node) => node.child_nodes(),)*
                }
            }

            /// Dispatch to the one visitor method for this node's kind.
            pub fn accept<V: Visitor + ?Sized>(self, visitor: &mut V) -> V::Output {
                match self {
                    $(NodeRef::$kind(node) => visitor.$visit(node),)*
                }
            }
        }

        $(
            impl<'a> From<&'a $kind> for NodeRef<'a> {
                fn from(node: &'a $kind) -> Self {
                    NodeRef::$kind(node)
                }
            }

            impl AstNode for $kind {
                fn as_node(&self) -> NodeRef<'_> {
                    NodeRef::$kind(self)
                }
            }
        )*
    };
}

node_kinds! {
    CompilationUnit => visit_compilation_unit,
    ClassDecl => visit_class_decl,
    ExtendsClause => visit_extends_clause,
    FieldDecl => visit_field_decl,
    MethodDecl => visit_method_decl,
    Param => visit_param,
    TypeRef => visit_type_ref,
    Block => visit_block,
    LocalVarDecl => visit_local_var_decl,
    ExprStmt => visit_expr_stmt,
    IfStmt => visit_if_stmt,
    WhileStmt => visit_while_stmt,
    ReturnStmt => visit_return_stmt,
    EmptyStmt => visit_empty_stmt,
    NameExpr => visit_name_expr,
    LiteralExpr => visit_literal_expr,
    UnaryExpr => visit_unary_expr,
    BinaryExpr => visit_binary_expr,
    AssignExpr => visit_assign_expr,
    CallExpr => visit_call_expr,
    FieldAccessExpr => visit_field_access_expr,
    ParenExpr => visit_paren_expr,
    CastExpr => visit_cast_expr,
    ArrayInitExpr => visit_array_init_expr,
    ErrorExpr => visit_error_expr,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform access to any node, concrete struct or sum type alike.
pub trait AstNode {
    fn as_node(&self) -> NodeRef<'_>;

    fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }

    fn span(&self) -> Span {
        self.as_node().span()
    }

    fn children(&self) -> Vec<NodeRef<'_>> {
        self.as_node().children()
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        self.as_node().accept(visitor)
    }
}

impl AstNode for NodeRef<'_> {
    fn as_node(&self) -> NodeRef<'_> {
        *self
    }
}

impl AstNode for Member {
    fn as_node(&self) -> NodeRef<'_> {
        Member::as_node(self)
    }
}

impl AstNode for Stmt {
    fn as_node(&self) -> NodeRef<'_> {
        Stmt::as_node(self)
    }
}

impl AstNode for Expr {
    fn as_node(&self) -> NodeRef<'_> {
        Expr::as_node(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;
    use pretty_assertions::assert_eq;

    fn span(start: usize, end: usize) -> Span {
        Span::new(Position::new(start, 1, start as u32 + 1), end)
    }

    fn name(text: &str, start: usize) -> NameExpr {
        NameExpr {
            name: Ident {
                text: text.to_owned(),
                span: span(start, start + text.len()),
                missing: false,
            },
            span: span(start, start + text.len()),
        }
    }

    #[test]
    fn kind_names_match_variants() {
        assert_eq!(NodeKind::IfStmt.name(), "IfStmt");
        assert_eq!(NodeKind::ALL.len(), 25);
        assert_eq!(NodeKind::ALL.first(), Some(&NodeKind::CompilationUnit));
    }

    #[test]
    fn sum_types_expose_inner_kind() {
        let expr = Expr::Name(name("x", 0));
        assert_eq!(AstNode::kind(&expr), NodeKind::NameExpr);
        assert_eq!(expr.span(), span(0, 1));
    }

    #[test]
    fn optional_children_are_omitted() {
        let stmt = ReturnStmt {
            value: None,
            span: span(0, 7),
        };
        assert!(stmt.children().is_empty());

        let with_value = ReturnStmt {
            value: Some(Expr::Name(name("x", 7))),
            span: span(0, 9),
        };
        let kinds: Vec<_> = with_value.children().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::NameExpr]);
    }

    #[test]
    fn node_ref_is_its_own_node() {
        let expr = name("y", 3);
        let node = NodeRef::from(&expr);
        assert_eq!(node.as_node().kind(), NodeKind::NameExpr);
        assert_eq!(AstNode::span(&node), span(3, 4));
    }
}
