// src/grammar/mod.rs - Indent grammar for Lucid sources
//
// This is a skeleton grammar: it only recognizes the block structure that
// indentation cares about (modules, always/if/case/for constructs, else
// clauses, bracketed groups, statements, block comments). Everything else
// is carried through as opaque tokens.

pub mod lexer;
pub mod parser;

pub use lexer::{Token, TokenKind, lex};
pub use parser::{Node, NodeKind, parse};
