// src/grammar/parser.rs - Error-tolerant recursive descent over the token stream
//
// The parser always produces a tree, no matter how malformed the input is:
// stray closers become plain tokens, a missing closer is synthesized at the
// last consumed token, and end of input closes every open construct. It has
// no diagnostics at all; "still typing" states are ordinary inputs here.

use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Source,
    /// `module name (ports) { body }`
    Module,
    /// Keyword-led construct: always, if, case, for.
    AlwaysLine,
    ElseBlock,
    /// `{ ... }`
    Braced,
    /// `( ... )` or `[ ... ]`, holding comma-separated elements.
    Group,
    /// One element of a group.
    Elem,
    /// A run of tokens up to `;` (or the next structural boundary).
    Statement,
    /// A `/* ... */` terminal.
    Comment,
    /// Any other terminal.
    Token,
}

/// Concrete syntax tree node. `first`/`last` are indices into the token
/// stream, inclusive on both ends. Nodes are never mutated once built.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub first: usize,
    pub last: usize,
}

impl Node {
    fn interior(kind: NodeKind, children: Vec<Node>) -> Self {
        let first = children.first().map(|c| c.first).unwrap_or(0);
        let last = children.last().map(|c| c.last).unwrap_or(0);
        Self {
            kind,
            children,
            first,
            last,
        }
    }
}

pub fn parse(tokens: &[Token]) -> Node {
    let mut parser = Parser { tokens, pos: 0 };
    let mut children = Vec::new();
    while parser.pos < tokens.len() {
        children.push(parser.item());
    }
    Node::interior(NodeKind::Source, children)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Consume the current token as a terminal node.
    fn terminal(&mut self, kind: NodeKind) -> Node {
        let node = Node {
            kind,
            children: Vec::new(),
            first: self.pos,
            last: self.pos,
        };
        self.pos += 1;
        node
    }

    /// Synthetic error node standing in for a missing closer. It points at
    /// the last consumed token so line spans stay meaningful.
    fn missing_closer(&self) -> Node {
        let idx = self.pos.saturating_sub(1);
        Node {
            kind: NodeKind::Token,
            children: Vec::new(),
            first: idx,
            last: idx,
        }
    }

    fn item(&mut self) -> Node {
        match self.peek() {
            Some(TokenKind::Module) => self.module(),
            Some(
                TokenKind::Always | TokenKind::If | TokenKind::Case | TokenKind::For,
            ) => self.always_line(),
            Some(TokenKind::Else) => self.else_block(),
            Some(TokenKind::BlockComment) => self.terminal(NodeKind::Comment),
            Some(TokenKind::LBrace) => self.braced(),
            Some(TokenKind::LParen | TokenKind::LBracket) => self.group(),
            // Stray closer at item level: keep it and move on
            Some(TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket) => {
                self.terminal(NodeKind::Token)
            }
            _ => self.statement(),
        }
    }

    fn module(&mut self) -> Node {
        let mut children = vec![self.terminal(NodeKind::Token)];
        loop {
            match self.peek() {
                Some(TokenKind::LBrace) => {
                    // The body block ends the module
                    children.push(self.braced());
                    break;
                }
                Some(TokenKind::LParen | TokenKind::LBracket) => children.push(self.group()),
                Some(TokenKind::BlockComment) => children.push(self.terminal(NodeKind::Comment)),
                None
                | Some(
                    TokenKind::Module
                    | TokenKind::RBrace
                    | TokenKind::RParen
                    | TokenKind::RBracket,
                ) => break,
                _ => children.push(self.terminal(NodeKind::Token)),
            }
        }
        Node::interior(NodeKind::Module, children)
    }

    fn always_line(&mut self) -> Node {
        let mut children = vec![self.terminal(NodeKind::Token)];
        while matches!(self.peek(), Some(TokenKind::LParen | TokenKind::LBracket)) {
            children.push(self.group());
        }
        match self.peek() {
            Some(TokenKind::LBrace) => children.push(self.braced()),
            Some(
                TokenKind::Always | TokenKind::If | TokenKind::Case | TokenKind::For,
            ) => children.push(self.always_line()),
            None
            | Some(
                TokenKind::Else
                | TokenKind::Module
                | TokenKind::BlockComment
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::RParen
                | TokenKind::RBracket,
            ) => {}
            _ => children.push(self.statement()),
        }
        if self.peek() == Some(TokenKind::Else) {
            children.push(self.else_block());
        }
        Node::interior(NodeKind::AlwaysLine, children)
    }

    fn else_block(&mut self) -> Node {
        let mut children = vec![self.terminal(NodeKind::Token)];
        match self.peek() {
            Some(TokenKind::LBrace) => children.push(self.braced()),
            Some(
                TokenKind::Always | TokenKind::If | TokenKind::Case | TokenKind::For,
            ) => children.push(self.always_line()),
            None
            | Some(
                TokenKind::Else
                | TokenKind::Module
                | TokenKind::BlockComment
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::RParen
                | TokenKind::RBracket,
            ) => {}
            _ => children.push(self.statement()),
        }
        Node::interior(NodeKind::ElseBlock, children)
    }

    fn braced(&mut self) -> Node {
        let mut children = vec![self.terminal(NodeKind::Token)];
        loop {
            match self.peek() {
                Some(TokenKind::RBrace) => {
                    children.push(self.terminal(NodeKind::Token));
                    break;
                }
                // Foreign closer: close this block and leave it for the owner
                Some(TokenKind::RParen | TokenKind::RBracket) | None => {
                    children.push(self.missing_closer());
                    break;
                }
                Some(TokenKind::Comma) => children.push(self.terminal(NodeKind::Token)),
                _ => children.push(self.item()),
            }
        }
        Node::interior(NodeKind::Braced, children)
    }

    fn group(&mut self) -> Node {
        let closer = if self.peek() == Some(TokenKind::LParen) {
            TokenKind::RParen
        } else {
            TokenKind::RBracket
        };
        let mut children = vec![self.terminal(NodeKind::Token)];
        loop {
            match self.peek() {
                Some(k) if k == closer => {
                    children.push(self.terminal(NodeKind::Token));
                    break;
                }
                Some(TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket) | None => {
                    children.push(self.missing_closer());
                    break;
                }
                Some(TokenKind::Comma) => children.push(self.terminal(NodeKind::Token)),
                _ => children.push(self.elem()),
            }
        }
        Node::interior(NodeKind::Group, children)
    }

    fn elem(&mut self) -> Node {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                None
                | Some(
                    TokenKind::Comma
                    | TokenKind::RBrace
                    | TokenKind::RParen
                    | TokenKind::RBracket,
                ) => break,
                Some(TokenKind::LBrace) => children.push(self.braced()),
                Some(TokenKind::LParen | TokenKind::LBracket) => children.push(self.group()),
                Some(TokenKind::BlockComment) => children.push(self.terminal(NodeKind::Comment)),
                _ => children.push(self.terminal(NodeKind::Token)),
            }
        }
        Node::interior(NodeKind::Elem, children)
    }

    fn statement(&mut self) -> Node {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some(TokenKind::Semi) => {
                    children.push(self.terminal(NodeKind::Token));
                    break;
                }
                Some(TokenKind::LBrace) => children.push(self.braced()),
                Some(TokenKind::LParen | TokenKind::LBracket) => children.push(self.group()),
                None => break,
                Some(
                    TokenKind::Comma
                    | TokenKind::RBrace
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::Module
                    | TokenKind::Always
                    | TokenKind::If
                    | TokenKind::Case
                    | TokenKind::For
                    | TokenKind::Else
                    | TokenKind::BlockComment,
                ) if !children.is_empty() => break,
                _ => children.push(self.terminal(NodeKind::Token)),
            }
        }
        Node::interior(NodeKind::Statement, children)
    }
}
