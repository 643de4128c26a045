//! Blocks and statements.

use super::decl::{name, starts_type, try_type_ref, variable_initializer};
use super::expr::{expression, required_expression, starts_expression};
use super::{KestrelParser, placeholder_span, skip_too_deep};
use crate::ast::{
    Block, EmptyStmt, ErrorExpr, Expr, ExprStmt, IfStmt, LocalVarDecl, ReturnStmt, Stmt,
    WhileStmt,
};
use crate::source::TokenSource;
use crate::token::TokenKind;

pub(super) fn block<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Block {
    let start = p.current().span;
    p.expect(TokenKind::LBrace, None);
    // `class` means the closing brace went missing.
    let stmts = p.many(
        |token| !matches!(token.kind, TokenKind::RBrace | TokenKind::Class),
        |p| Some(statement(p)),
    );
    p.expect(TokenKind::RBrace, None);
    Block {
        stmts,
        span: p.span_from(start),
    }
}

/// Where to resume after a token that cannot start a statement.
const STMT_RECOVERY: &[TokenKind] = &[TokenKind::RBrace, TokenKind::Class];

/// Any statement. Consumes at least one token unless the next token is `}`
/// or end of input.
pub(crate) fn statement<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Stmt {
    match p.nested(any_statement) {
        Some(stmt) => stmt,
        None => {
            let span = skip_too_deep(p, true);
            Stmt::Expr(ExprStmt {
                expr: Expr::Error(ErrorExpr { span }),
                span,
            })
        }
    }
}

fn any_statement<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Stmt {
    let next = p.current();
    match next.kind {
        TokenKind::LBrace => return Stmt::Block(block(p)),
        TokenKind::If => return Stmt::If(if_stmt(p)),
        TokenKind::While => return Stmt::While(while_stmt(p)),
        TokenKind::Return => return Stmt::Return(return_stmt(p)),
        TokenKind::Semicolon => {
            p.eat(TokenKind::Semicolon);
            return Stmt::Empty(EmptyStmt { span: next.span });
        }
        _ => {}
    }

    if starts_type(next.kind) {
        if let Some(decl) = p.try_parse(local_var_decl) {
            return Stmt::LocalVar(decl);
        }
    }
    if starts_expression(next.kind) {
        return expression_stmt(p);
    }

    p.report_error_at(&next, format!("expected statement, found {}", next.kind));
    let span = if matches!(next.kind, TokenKind::RBrace | TokenKind::Eof) {
        placeholder_span(p)
    } else {
        // Burst recovery may already have moved past `next`.
        if p.current() == next {
            p.advance();
            p.synchronize(STMT_RECOVERY);
        }
        p.span_from(next.span)
    };
    Stmt::Expr(ExprStmt {
        expr: Expr::Error(ErrorExpr { span }),
        span,
    })
}

/// `Type name [= init];`. Declines before consuming anything that could
/// also start an expression statement.
fn local_var_decl<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
) -> Option<LocalVarDecl> {
    let start = p.current().span;
    let ty = try_type_ref(p)?;
    if !p.at(TokenKind::Ident) {
        return None;
    }
    let name = name(p);
    let init = if p.eat(TokenKind::Assign) {
        Some(variable_initializer(p))
    } else {
        None
    };
    p.expect(TokenKind::Semicolon, None);
    Some(LocalVarDecl {
        ty,
        name,
        init,
        span: p.span_from(start),
    })
}

fn expression_stmt<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Stmt {
    let start = p.current().span;
    let expr = required_expression(p);
    p.expect(TokenKind::Semicolon, None);
    Stmt::Expr(ExprStmt {
        expr,
        span: p.span_from(start),
    })
}

fn if_stmt<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> IfStmt {
    let start = p.current().span;
    p.expect(TokenKind::If, None);
    p.expect(TokenKind::LParen, None);
    let condition = required_expression(p);
    p.expect(TokenKind::RParen, None);
    let then_branch = Box::new(statement(p));
    let else_branch = if p.eat(TokenKind::Else) {
        Some(Box::new(statement(p)))
    } else {
        None
    };
    IfStmt {
        condition,
        then_branch,
        else_branch,
        span: p.span_from(start),
    }
}

fn while_stmt<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> WhileStmt {
    let start = p.current().span;
    p.expect(TokenKind::While, None);
    p.expect(TokenKind::LParen, None);
    let condition = required_expression(p);
    p.expect(TokenKind::RParen, None);
    let body = Box::new(statement(p));
    WhileStmt {
        condition,
        body,
        span: p.span_from(start),
    }
}

fn return_stmt<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> ReturnStmt {
    let start = p.current().span;
    p.expect(TokenKind::Return, None);
    let value = expression(p);
    p.expect(TokenKind::Semicolon, None);
    ReturnStmt {
        value,
        span: p.span_from(start),
    }
}
