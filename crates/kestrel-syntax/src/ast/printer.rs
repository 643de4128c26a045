//! Rendering trees as text.
//!
//! - [`tree_dump`] shows structure and spans, one node per line. It relies
//!   only on `children()`, so it doubles as a check that every kind reports
//!   its sub-nodes.
//! - [`to_source`] renders Kestrel source in a canonical layout through
//!   [`SourcePrinter`], a [`Visitor`].

use std::fmt::Write;

use super::*;

const INDENT: &str = "    ";

/// Indented `Kind@start..end` listing, two spaces per level.
pub fn tree_dump<N: AstNode + ?Sized>(root: &N) -> String {
    let mut out = String::new();
    dump_node(root.as_node(), 0, &mut out);
    out
}

fn dump_node(node: NodeRef<'_>, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{:indent$}{}@{}", "", node.kind(), node.span(), indent = depth * 2);
    for child in node.children() {
        dump_node(child, depth + 1, out);
    }
}

/// Render `root` as canonically formatted source.
pub fn to_source<N: AstNode + ?Sized>(root: &N) -> String {
    let mut printer = SourcePrinter::default();
    root.accept(&mut printer);
    printer.finish()
}

/// Writes nodes as source text.
///
/// Statements and members are written without leading indentation or a
/// trailing newline; the enclosing block or class body lays them out.
#[derive(Debug, Default)]
pub struct SourcePrinter {
    out: String,
    depth: usize,
}

impl SourcePrinter {
    pub fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            self.write(modifier.as_str());
            self.write(" ");
        }
    }

    fn comma_separated(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            expr.accept(self);
        }
    }

    /// `{`, one line per item, `}` at the current depth.
    fn braced<T: AstNode>(&mut self, items: &[T]) {
        self.write("{");
        self.depth += 1;
        for item in items {
            self.newline();
            item.accept(self);
        }
        self.depth -= 1;
        self.newline();
        self.write("}");
    }
}

impl Visitor for SourcePrinter {
    type Output = ();

    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) {
        for (i, class) in unit.classes.iter().enumerate() {
            if i > 0 {
                self.write("\n");
            }
            self.visit_class_decl(class);
            self.write("\n");
        }
    }

    fn visit_class_decl(&mut self, class: &ClassDecl) {
        self.modifiers(&class.modifiers);
        self.write("class ");
        self.write(&class.name.text);
        if let Some(extends) = &class.extends {
            self.write(" ");
            self.visit_extends_clause(extends);
        }
        self.write(" ");
        self.braced(&class.members);
    }

    fn visit_extends_clause(&mut self, extends: &ExtendsClause) {
        self.write("extends ");
        self.visit_type_ref(&extends.superclass);
    }

    fn visit_field_decl(&mut self, field: &FieldDecl) {
        self.modifiers(&field.modifiers);
        self.visit_type_ref(&field.ty);
        self.write(" ");
        self.write(&field.name.text);
        if let Some(init) = &field.init {
            self.write(" = ");
            init.accept(self);
        }
        self.write(";");
    }

    fn visit_method_decl(&mut self, method: &MethodDecl) {
        self.modifiers(&method.modifiers);
        self.visit_type_ref(&method.return_type);
        self.write(" ");
        self.write(&method.name.text);
        self.write("(");
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.visit_param(param);
        }
        self.write(")");
        match &method.body {
            Some(body) => {
                self.write(" ");
                self.visit_block(body);
            }
            None => self.write(";"),
        }
    }

    fn visit_param(&mut self, param: &Param) {
        self.visit_type_ref(&param.ty);
        self.write(" ");
        self.write(&param.name.text);
    }

    fn visit_type_ref(&mut self, type_ref: &TypeRef) {
        self.write(&type_ref.name.text);
        for _ in 0..type_ref.dims {
            self.write("[]");
        }
    }

    fn visit_block(&mut self, block: &Block) {
        self.braced(&block.stmts);
    }

    fn visit_local_var_decl(&mut self, decl: &LocalVarDecl) {
        self.visit_type_ref(&decl.ty);
        self.write(" ");
        self.write(&decl.name.text);
        if let Some(init) = &decl.init {
            self.write(" = ");
            init.accept(self);
        }
        self.write(";");
    }

    fn visit_expr_stmt(&mut self, stmt: &ExprStmt) {
        stmt.expr.accept(self);
        self.write(";");
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt) {
        self.write("if (");
        stmt.condition.accept(self);
        self.write(") ");
        stmt.then_branch.accept(self);
        if let Some(else_branch) = &stmt.else_branch {
            self.write(" else ");
            else_branch.accept(self);
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileStmt) {
        self.write("while (");
        stmt.condition.accept(self);
        self.write(") ");
        stmt.body.accept(self);
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnStmt) {
        self.write("return");
        if let Some(value) = &stmt.value {
            self.write(" ");
            value.accept(self);
        }
        self.write(";");
    }

    fn visit_empty_stmt(&mut self, _stmt: &EmptyStmt) {
        self.write(";");
    }

    fn visit_name_expr(&mut self, expr: &NameExpr) {
        self.write(&expr.name.text);
    }

    fn visit_literal_expr(&mut self, expr: &LiteralExpr) {
        self.write(&expr.text);
    }

    fn visit_unary_expr(&mut self, expr: &UnaryExpr) {
        self.write(expr.op.as_str());
        expr.operand.accept(self);
    }

    fn visit_binary_expr(&mut self, expr: &BinaryExpr) {
        expr.lhs.accept(self);
        self.write(" ");
        self.write(expr.op.as_str());
        self.write(" ");
        expr.rhs.accept(self);
    }

    fn visit_assign_expr(&mut self, expr: &AssignExpr) {
        expr.target.accept(self);
        self.write(" ");
        self.write(expr.op.as_str());
        self.write(" ");
        expr.value.accept(self);
    }

    fn visit_call_expr(&mut self, expr: &CallExpr) {
        expr.callee.accept(self);
        self.write("(");
        self.comma_separated(&expr.args);
        self.write(")");
    }

    fn visit_field_access_expr(&mut self, expr: &FieldAccessExpr) {
        expr.receiver.accept(self);
        self.write(".");
        self.write(&expr.field.text);
    }

    fn visit_paren_expr(&mut self, expr: &ParenExpr) {
        self.write("(");
        expr.inner.accept(self);
        self.write(")");
    }

    fn visit_cast_expr(&mut self, expr: &CastExpr) {
        self.write("(");
        self.visit_type_ref(&expr.ty);
        self.write(") ");
        expr.operand.accept(self);
    }

    fn visit_array_init_expr(&mut self, expr: &ArrayInitExpr) {
        self.write("{");
        self.comma_separated(&expr.elements);
        self.write("}");
    }

    fn visit_error_expr(&mut self, _expr: &ErrorExpr) {
        self.write("<error>");
    }
}
