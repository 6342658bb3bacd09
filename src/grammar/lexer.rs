// src/grammar/lexer.rs - Tolerant lexer for the Lucid indent grammar

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Colon,
    Comma,
    Module,
    Always,
    If,
    Else,
    Case,
    For,
    BlockComment,
    /// Identifiers, numbers, strings, operators - anything the indenter
    /// does not need to distinguish.
    Word,
}

/// One lexed token. `line` is 1-based; `start`/`stop` are byte offsets into
/// the snapshot, `stop` inclusive.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub start: usize,
    pub stop: usize,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'$' || b >= 0x80
}

fn keyword(text: &str) -> Option<TokenKind> {
    match text {
        "module" => Some(TokenKind::Module),
        "always" => Some(TokenKind::Always),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "case" => Some(TokenKind::Case),
        "for" => Some(TokenKind::For),
        _ => None,
    }
}

/// Tokenize `text`. Whitespace and line comments are skipped; block comments
/// become single tokens because the indenter applies its own rule to them.
/// Malformed input (unterminated strings or comments) lexes to end of input;
/// this function cannot fail.
pub fn lex(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b' ' | b'\t' | b'\r' => {
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                let start_line = line;
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == b'\n' {
                        line += 1;
                    } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::BlockComment,
                    line: start_line,
                    start,
                    stop: i.min(bytes.len()) - 1,
                });
            }
            b'"' => {
                // Strings are opaque; an unterminated one runs to end of line
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' && i + 1 < bytes.len() {
                        i += 1;
                    }
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'"' {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Word,
                    line,
                    start,
                    stop: i - 1,
                });
            }
            b'{' | b'}' | b'(' | b')' | b'[' | b']' | b';' | b':' | b',' => {
                let kind = match b {
                    b'{' => TokenKind::LBrace,
                    b'}' => TokenKind::RBrace,
                    b'(' => TokenKind::LParen,
                    b')' => TokenKind::RParen,
                    b'[' => TokenKind::LBracket,
                    b']' => TokenKind::RBracket,
                    b';' => TokenKind::Semi,
                    b':' => TokenKind::Colon,
                    _ => TokenKind::Comma,
                };
                tokens.push(Token {
                    kind,
                    line,
                    start: i,
                    stop: i,
                });
                i += 1;
            }
            _ if is_word_byte(b) => {
                let start = i;
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                let kind = keyword(&text[start..i]).unwrap_or(TokenKind::Word);
                tokens.push(Token {
                    kind,
                    line,
                    start,
                    stop: i - 1,
                });
            }
            _ => {
                // Operator or other punctuation: one opaque token per byte
                tokens.push(Token {
                    kind: TokenKind::Word,
                    line,
                    start: i,
                    stop: i,
                });
                i += 1;
            }
        }
    }

    tokens
}
