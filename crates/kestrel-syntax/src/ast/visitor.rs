use super::*;

/// Kind-specific traversal, one method per node kind.
///
/// Reached through [`NodeRef::accept`] / [`AstNode::accept`]. Visitors decide
/// themselves whether and in which order to descend; `children()` is there
/// for the cases where order does not matter.
pub trait Visitor {
    type Output;

    // Declarations
    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) -> Self::Output;
    fn visit_class_decl(&mut self, class: &ClassDecl) -> Self::Output;
    fn visit_extends_clause(&mut self, extends: &ExtendsClause) -> Self::Output;
    fn visit_field_decl(&mut self, field: &FieldDecl) -> Self::Output;
    fn visit_method_decl(&mut self, method: &MethodDecl) -> Self::Output;
    fn visit_param(&mut self, param: &Param) -> Self::Output;
    fn visit_type_ref(&mut self, type_ref: &TypeRef) -> Self::Output;

    // Statements
    fn visit_block(&mut self, block: &Block) -> Self::Output;
    fn visit_local_var_decl(&mut self, decl: &LocalVarDecl) -> Self::Output;
    fn visit_expr_stmt(&mut self, stmt: &ExprStmt) -> Self::Output;
    fn visit_if_stmt(&mut self, stmt: &IfStmt) -> Self::Output;
    fn visit_while_stmt(&mut self, stmt: &WhileStmt) -> Self::Output;
    fn visit_return_stmt(&mut self, stmt: &ReturnStmt) -> Self::Output;
    fn visit_empty_stmt(&mut self, stmt: &EmptyStmt) -> Self::Output;

    // Expressions
    fn visit_name_expr(&mut self, expr: &NameExpr) -> Self::Output;
    fn visit_literal_expr(&mut self, expr: &LiteralExpr) -> Self::Output;
    fn visit_unary_expr(&mut self, expr: &UnaryExpr) -> Self::Output;
    fn visit_binary_expr(&mut self, expr: &BinaryExpr) -> Self::Output;
    fn visit_assign_expr(&mut self, expr: &AssignExpr) -> Self::Output;
    fn visit_call_expr(&mut self, expr: &CallExpr) -> Self::Output;
    fn visit_field_access_expr(&mut self, expr: &FieldAccessExpr) -> Self::Output;
    fn visit_paren_expr(&mut self, expr: &ParenExpr) -> Self::Output;
    fn visit_cast_expr(&mut self, expr: &CastExpr) -> Self::Output;
    fn visit_array_init_expr(&mut self, expr: &ArrayInitExpr) -> Self::Output;
    fn visit_error_expr(&mut self, expr: &ErrorExpr) -> Self::Output;
}
