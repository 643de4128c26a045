//! # kestrel-syntax
//!
//! A hand-written, backtracking, error-recovering parser for Kestrel, a
//! small Java-like language, producing a typed syntax tree.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Lookahead → Parser Engine → Grammar → AST
//!               (Logos)  (trivia filtered)   (markers, recovery)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! [Logos] turns the input into a lossless token stream. Whitespace and
//! comments are kept as trivia tokens; unrecognized characters become error
//! tokens. Anything implementing [`source::TokenSource`] can stand in for
//! the lexer.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ### 2. Parser Engine ([`parser`] module)
//!
//! Grammar-independent primitives: bounded lookahead, `eat`/`expect`,
//! speculative parsing with backtracking [markers](parser::Marker), list
//! combinators, and burst-limited error recovery. Parsing never aborts:
//! missing tokens are synthesized and reported as [diagnostics](diagnostic).
//!
//! ### 3. Grammar ([`parser::grammar`] module)
//!
//! The Kestrel rules, written against the engine.
//!
//! ### 4. AST ([`ast`] module)
//!
//! Immutable node structs with a generic view ([`ast::NodeRef`],
//! `children()`) and kind-specific dispatch ([`ast::Visitor`]).
//!
//! ## Module Structure
//!
//! ```text
//! kestrel-syntax/
//! ├── lib.rs          # This file - public API
//! ├── span.rs         # Positions and spans
//! ├── token.rs        # TokenKind (Logos), Token, channels and flags
//! ├── source.rs       # TokenSource contract, VecSource
//! ├── lexer.rs        # LexerSource, lex()
//! ├── diagnostic.rs   # Diagnostic, DiagnosticLog
//! ├── parser/
//! │   ├── mod.rs      # Parser engine, SyncPolicy, Grammar, ParseResult
//! │   ├── lookahead.rs# Trivia-filtering lookahead buffer
//! │   ├── marker.rs   # Backtracking markers
//! │   └── grammar/    # Kestrel declarations, statements, expressions
//! └── ast/
//!     ├── mod.rs      # NodeKind, NodeRef, AstNode
//!     ├── nodes.rs    # Node structs
//!     ├── visitor.rs  # Visitor trait
//!     ├── walk.rs     # Preorder traversal
//!     └── printer.rs  # Tree dumps and source printing
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use kestrel_syntax::ast::printer::tree_dump;
//! use kestrel_syntax::parse;
//!
//! let result = parse("class A { void f() { if (x) { y; } } }");
//! assert!(result.diagnostics.is_empty());
//! assert!(tree_dump(&result.root).starts_with("CompilationUnit@0..38"));
//!
//! // Broken input still produces a tree, plus diagnostics.
//! let result = parse("class A { int x = ; }");
//! assert_eq!(result.root.classes.len(), 1);
//! assert_eq!(
//!     result.diagnostics[0].to_string(),
//!     "1:19: error: expected expression, found ';'"
//! );
//! ```

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod span;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticLog, Severity};
pub use parser::grammar::{parse_compilation_unit as parse, parse_expression, parse_statement};
pub use parser::{Grammar, ParseResult, Parser};
pub use span::{Position, Span};
pub use token::{Token, TokenKind};
