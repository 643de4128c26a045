//! Declarations: classes, members, parameters, types.

use super::expr;
use super::stmt::block;
use super::{KestrelParser, placeholder_span};
use crate::ast::{
    ClassDecl, CompilationUnit, Expr, ExtendsClause, FieldDecl, Ident, Member, MethodDecl,
    Modifier, Param, TypeRef,
};
use crate::source::TokenSource;
use crate::span::Span;
use crate::token::TokenKind;

/// Where to resume after junk between or inside class declarations.
const DECL_RECOVERY: &[TokenKind] = &[TokenKind::RBrace, TokenKind::Class];

pub(crate) fn compilation_unit<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
) -> CompilationUnit {
    let start = p.current().span;
    let mut classes = Vec::new();

    while !p.is_at_end() {
        if at_class_start(p) {
            classes.push(class_decl(p));
            continue;
        }
        let junk = p.current();
        p.report_error_at(&junk, format!("expected class declaration, found {}", junk.kind));
        // Burst recovery may already have moved past the junk.
        if p.current() == junk {
            p.advance();
            p.synchronize(&[TokenKind::Class]);
        }
    }

    CompilationUnit {
        classes,
        span: p.span_from(start),
    }
}

/// Modifiers (if any) followed by `class`.
fn at_class_start<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> bool {
    let mut n = 1;
    while Modifier::from_token(p.lookahead(n).kind).is_some() {
        n += 1;
    }
    p.lookahead(n).kind == TokenKind::Class
}

fn class_decl<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> ClassDecl {
    let start = p.current().span;
    let modifiers = modifiers(p);
    p.expect(TokenKind::Class, None);
    let name = name(p);

    let extends = if p.at(TokenKind::Extends) {
        let extends_start = p.advance().span;
        let superclass = type_ref(p);
        Some(ExtendsClause {
            superclass,
            span: p.span_from(extends_start),
        })
    } else {
        None
    };

    p.expect(TokenKind::LBrace, None);
    let members = class_body(p);
    p.expect(TokenKind::RBrace, None);

    ClassDecl {
        modifiers,
        name,
        extends,
        members,
        span: p.span_from(start),
    }
}

fn class_body<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Vec<Member> {
    let mut members = Vec::new();
    loop {
        let next = p.current();
        match next.kind {
            TokenKind::RBrace | TokenKind::Eof => break,
            // A class header here means this body's `}` is missing.
            _ if at_class_start(p) => break,
            TokenKind::Semicolon => {
                p.eat(TokenKind::Semicolon);
                p.report_warning_at(&next, "unnecessary semicolon in class body");
            }
            kind if Modifier::from_token(kind).is_some() || starts_type(kind) => {
                members.push(member(p));
            }
            _ => {
                p.report_error_at(&next, format!("expected member declaration, found {}", next.kind));
                if p.current() == next {
                    p.advance();
                    p.synchronize(DECL_RECOVERY);
                }
            }
        }
    }
    members
}

fn member<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Member {
    let start = p.current().span;
    let modifiers = modifiers(p);
    let ty = type_ref(p);
    let name = name(p);

    if p.at(TokenKind::LParen) {
        Member::Method(method_rest(p, start, modifiers, ty, name))
    } else {
        let init = if p.eat(TokenKind::Assign) {
            Some(variable_initializer(p))
        } else {
            None
        };
        p.expect(TokenKind::Semicolon, None);
        Member::Field(FieldDecl {
            modifiers,
            ty,
            name,
            init,
            span: p.span_from(start),
        })
    }
}

fn method_rest<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
    start: Span,
    modifiers: Vec<Modifier>,
    return_type: TypeRef,
    name: Ident,
) -> MethodDecl {
    p.expect(TokenKind::LParen, None);
    let params = p.separated_list(TokenKind::Comma, false, param);
    p.expect(TokenKind::RParen, None);

    let body = if p.eat(TokenKind::Semicolon) {
        None
    } else {
        Some(block(p))
    };

    MethodDecl {
        modifiers,
        return_type,
        name,
        params,
        body,
        span: p.span_from(start),
    }
}

fn param<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Option<Param> {
    let start = p.current().span;
    let ty = try_type_ref(p)?;
    let name = name(p);
    Some(Param {
        ty,
        name,
        span: p.span_from(start),
    })
}

fn modifiers<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Vec<Modifier> {
    p.many(
        |token| Modifier::from_token(token.kind).is_some(),
        |p| Modifier::from_token(p.advance().kind),
    )
}

/// `= value` right-hand side: an expression or an array initializer.
pub(super) fn variable_initializer<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
) -> Expr {
    if p.at(TokenKind::LBrace) {
        expr::array_init(p)
    } else {
        expr::required_expression(p)
    }
}

pub(super) fn name<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Ident {
    let token = p.expect(TokenKind::Ident, None);
    Ident::from_token(&token)
}

pub(super) fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Void | TokenKind::Int | TokenKind::Boolean | TokenKind::Char | TokenKind::Ident
    )
}

/// A type, or a report plus a missing type name.
pub(super) fn type_ref<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> TypeRef {
    if let Some(ty) = try_type_ref(p) {
        return ty;
    }
    let next = p.current();
    p.report_error_at(&next, format!("expected type, found {}", next.kind));
    let at = placeholder_span(p);
    TypeRef {
        name: Ident {
            text: String::new(),
            span: at,
            missing: true,
        },
        dims: 0,
        span: at,
    }
}

/// A type if one starts here, without reporting anything otherwise.
pub(super) fn try_type_ref<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
) -> Option<TypeRef> {
    let first = p.current();
    if !starts_type(first.kind) {
        return None;
    }
    p.eat(first.kind);

    let mut dims = 0;
    while p.at(TokenKind::LBracket) && p.lookahead(2).kind == TokenKind::RBracket {
        p.eat(TokenKind::LBracket);
        p.eat(TokenKind::RBracket);
        dims += 1;
    }

    Some(TypeRef {
        name: Ident::from_token(&first),
        dims,
        span: p.span_from(first.span),
    })
}
