//! Expressions.
//!
//! Assignment is right-associative and sits above the binary operators,
//! which are parsed by precedence climbing over [`BinaryOp::precedence`].
//! Below those come prefix operators, casts, and postfix call and field
//! access chains.

use super::decl::{name, try_type_ref, variable_initializer};
use super::{KestrelParser, placeholder_span, skip_too_deep};
use crate::ast::{
    ArrayInitExpr, AssignExpr, AssignOp, BinaryExpr, BinaryOp, CallExpr, CastExpr, ErrorExpr,
    Expr, FieldAccessExpr, Ident, LiteralExpr, LiteralKind, NameExpr, ParenExpr, UnaryExpr,
    UnaryOp,
};
use crate::source::TokenSource;
use crate::token::TokenKind;

const ASSIGN_OPS: &[TokenKind] = &[
    TokenKind::Assign,
    TokenKind::PlusAssign,
    TokenKind::MinusAssign,
];

pub(super) fn starts_expression(kind: TokenKind) -> bool {
    kind.is_literal()
        || matches!(
            kind,
            TokenKind::Ident
                | TokenKind::This
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Bang
        )
}

/// An expression if one starts here. Declines without reporting.
pub(crate) fn expression<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
) -> Option<Expr> {
    if starts_expression(p.current().kind) {
        Some(assignment(p))
    } else {
        None
    }
}

/// An expression, or an [`ErrorExpr`] plus a report.
pub(crate) fn required_expression<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
) -> Expr {
    match expression(p) {
        Some(expr) => expr,
        None => missing_expression(p),
    }
}

/// Run a recursive expression rule one nesting level deeper.
fn nested<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
    rule: impl FnOnce(&mut KestrelParser<'src, S>) -> Expr,
) -> Expr {
    match p.nested(rule) {
        Some(expr) => expr,
        None => Expr::Error(ErrorExpr {
            span: skip_too_deep(p, false),
        }),
    }
}

fn missing_expression<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Expr {
    let next = p.current();
    p.report_error_at(&next, format!("expected expression, found {}", next.kind));
    Expr::Error(ErrorExpr {
        span: placeholder_span(p),
    })
}

fn assignment<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Expr {
    let target = binary(p, 0);
    let Some(op) = p.eat_any(ASSIGN_OPS).and_then(AssignOp::from_token) else {
        return target;
    };
    let value = nested(p, required_expression);
    Expr::Assign(AssignExpr {
        span: p.span_from(target.span()),
        op,
        target: Box::new(target),
        value: Box::new(value),
    })
}

fn binary<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>, min_precedence: u8) -> Expr {
    let mut lhs = unary(p);
    loop {
        let kind = p.current().kind;
        let Some(op) = BinaryOp::from_token(kind) else {
            break;
        };
        let precedence = op.precedence();
        if precedence < min_precedence {
            break;
        }
        p.eat(kind);
        let rhs = binary(p, precedence + 1);
        lhs = Expr::Binary(BinaryExpr {
            span: p.span_from(lhs.span()),
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        });
    }
    lhs
}

fn unary<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Expr {
    nested(p, prefixed)
}

/// Prefix operators and casts over a postfix expression.
fn prefixed<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Expr {
    let next = p.current();
    if let Some(op) = UnaryOp::from_token(next.kind) {
        p.eat(next.kind);
        let operand = unary(p);
        return Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
            span: p.span_from(next.span),
        });
    }
    if next.kind == TokenKind::LParen {
        if let Some(cast) = p.try_parse(cast_expr) {
            return cast;
        }
    }
    postfix(p)
}

/// `(Type) operand`, declining when the parenthesized part reads better as
/// an expression: `(a) - b` is a subtraction, `(int) -b` a cast.
fn cast_expr<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Option<Expr> {
    let start = p.current().span;
    p.eat(TokenKind::LParen);
    let ty = try_type_ref(p)?;
    if !p.eat(TokenKind::RParen) {
        return None;
    }

    let next = p.current().kind;
    let operand_follows = match next {
        TokenKind::Minus | TokenKind::Plus => ty.is_primitive(),
        _ => starts_expression(next),
    };
    if !operand_follows {
        return None;
    }

    let operand = unary(p);
    Some(Expr::Cast(CastExpr {
        ty,
        operand: Box::new(operand),
        span: p.span_from(start),
    }))
}

fn postfix<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Expr {
    let start = p.current().span;
    let mut expr = primary(p);
    if expr.is_error() {
        return expr;
    }
    loop {
        if p.eat(TokenKind::Dot) {
            let field = name(p);
            expr = Expr::FieldAccess(FieldAccessExpr {
                receiver: Box::new(expr),
                field,
                span: p.span_from(start),
            });
        } else if p.eat(TokenKind::LParen) {
            let args = p.separated_list(TokenKind::Comma, false, expression);
            p.expect(TokenKind::RParen, None);
            expr = Expr::Call(CallExpr {
                callee: Box::new(expr),
                args,
                span: p.span_from(start),
            });
        } else {
            return expr;
        }
    }
}

fn primary<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Expr {
    let next = p.current();
    match next.kind {
        TokenKind::Ident | TokenKind::This => {
            p.eat(next.kind);
            Expr::Name(NameExpr {
                name: Ident::from_token(&next),
                span: next.span,
            })
        }
        TokenKind::LParen => {
            p.eat(TokenKind::LParen);
            let inner = required_expression(p);
            p.expect(TokenKind::RParen, None);
            Expr::Paren(ParenExpr {
                inner: Box::new(inner),
                span: p.span_from(next.span),
            })
        }
        kind => match LiteralKind::from_token(kind) {
            Some(literal) => {
                p.eat(kind);
                Expr::Literal(LiteralExpr {
                    kind: literal,
                    text: next.text.to_owned(),
                    span: next.span,
                })
            }
            None => missing_expression(p),
        },
    }
}

/// `{ a, b, }`; a trailing comma is allowed.
pub(super) fn array_init<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Expr {
    let start = p.current().span;
    p.expect(TokenKind::LBrace, None);
    let elements = p.separated_list(TokenKind::Comma, true, |p| {
        if p.at(TokenKind::LBrace) || starts_expression(p.current().kind) {
            Some(nested(p, variable_initializer))
        } else {
            None
        }
    });
    p.expect(TokenKind::RBrace, None);
    Expr::ArrayInit(ArrayInitExpr {
        elements,
        span: p.span_from(start),
    })
}
