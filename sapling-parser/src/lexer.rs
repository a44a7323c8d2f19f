//! Hand-written lexer.

use crate::error::{ParseError, Result};

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    // Keywords
    Let,
    Const,
    Var,
    Function,
    Return,
    Import,
    From,
    True,
    False,
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    EqEq,
    Lt,
    Gt,
    Eof,
}

impl TokenKind {
    /// A short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Number(n) => format!("number `{n}`"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Let => "`let`".to_string(),
            TokenKind::Const => "`const`".to_string(),
            TokenKind::Var => "`var`".to_string(),
            TokenKind::Function => "`function`".to_string(),
            TokenKind::Return => "`return`".to_string(),
            TokenKind::Import => "`import`".to_string(),
            TokenKind::From => "`from`".to_string(),
            TokenKind::True => "`true`".to_string(),
            TokenKind::False => "`false`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Semi => "`;`".to_string(),
            TokenKind::Assign => "`=`".to_string(),
            TokenKind::Plus => "`+`".to_string(),
            TokenKind::Minus => "`-`".to_string(),
            TokenKind::Star => "`*`".to_string(),
            TokenKind::Slash => "`/`".to_string(),
            TokenKind::EqEq => "`==`".to_string(),
            TokenKind::Lt => "`<`".to_string(),
            TokenKind::Gt => "`>`".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source.
    pub offset: usize,
    /// Byte length of the lexeme.
    pub len: usize,
    /// 1-based source line.
    pub line: u32,
}

pub(crate) fn tokenize(source: &str, filename: &str) -> Result<Vec<Token>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line: u32 = 1;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];
        match c {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b' ' | b'\t' | b'\r' => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'(' => push_punct(&mut tokens, TokenKind::LParen, start, &mut i, line),
            b')' => push_punct(&mut tokens, TokenKind::RParen, start, &mut i, line),
            b'{' => push_punct(&mut tokens, TokenKind::LBrace, start, &mut i, line),
            b'}' => push_punct(&mut tokens, TokenKind::RBrace, start, &mut i, line),
            b',' => push_punct(&mut tokens, TokenKind::Comma, start, &mut i, line),
            b';' => push_punct(&mut tokens, TokenKind::Semi, start, &mut i, line),
            b'+' => push_punct(&mut tokens, TokenKind::Plus, start, &mut i, line),
            b'-' => push_punct(&mut tokens, TokenKind::Minus, start, &mut i, line),
            b'*' => push_punct(&mut tokens, TokenKind::Star, start, &mut i, line),
            b'/' => push_punct(&mut tokens, TokenKind::Slash, start, &mut i, line),
            b'<' => push_punct(&mut tokens, TokenKind::Lt, start, &mut i, line),
            b'>' => push_punct(&mut tokens, TokenKind::Gt, start, &mut i, line),
            b'=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    i += 2;
                    tokens.push(Token {
                        kind: TokenKind::EqEq,
                        offset: start,
                        len: 2,
                        line,
                    });
                } else {
                    push_punct(&mut tokens, TokenKind::Assign, start, &mut i, line);
                }
            }
            b'"' | b'\'' => {
                let quote = c;
                i += 1;
                let content_start = i;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    i += 1;
                }
                if i >= bytes.len() || bytes[i] != quote {
                    return Err(ParseError::new(
                        source,
                        filename,
                        start,
                        i - start,
                        "unterminated string literal",
                    ));
                }
                let value = source[content_start..i].to_string();
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Str(value),
                    offset: start,
                    len: i - start,
                    line,
                });
            }
            b'0'..=b'9' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let text = &source[start..i];
                let value: f64 = text.parse().map_err(|_| {
                    ParseError::new(
                        source,
                        filename,
                        start,
                        i - start,
                        format!("invalid number literal `{text}`"),
                    )
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    offset: start,
                    len: i - start,
                    line,
                });
            }
            c if c.is_ascii_alphabetic() || c == b'_' || c == b'$' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$')
                {
                    i += 1;
                }
                let text = &source[start..i];
                let kind = match text {
                    "let" => TokenKind::Let,
                    "const" => TokenKind::Const,
                    "var" => TokenKind::Var,
                    "function" => TokenKind::Function,
                    "return" => TokenKind::Return,
                    "import" => TokenKind::Import,
                    "from" => TokenKind::From,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    _ => TokenKind::Ident(text.to_string()),
                };
                tokens.push(Token {
                    kind,
                    offset: start,
                    len: i - start,
                    line,
                });
            }
            other => {
                return Err(ParseError::new(
                    source,
                    filename,
                    start,
                    1,
                    format!("unexpected character `{}`", other as char),
                ));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
        len: 0,
        line,
    });
    Ok(tokens)
}

fn push_punct(tokens: &mut Vec<Token>, kind: TokenKind, start: usize, i: &mut usize, line: u32) {
    *i += 1;
    tokens.push(Token {
        kind,
        offset: start,
        len: 1,
        line,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, "test.sl")
            .expect("tokenize should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_declaration() {
        assert_eq!(
            kinds("let x = 1;"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Number(1.0),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_operators_and_strings() {
        assert_eq!(
            kinds(r#"a == "hi" + 2.5"#),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::EqEq,
                TokenKind::Str("hi".into()),
                TokenKind::Plus,
                TokenKind::Number(2.5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comments_are_skipped() {
        assert_eq!(
            kinds("let a = 1; // trailing\n// full line\nlet b = 2;").len(),
            11
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("let a = 1;\nlet b = 2;", "test.sl").unwrap();
        let b_decl = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Ident("b".into()))
            .unwrap();
        assert_eq!(b_decl.line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("let s = \"oops;", "test.sl").unwrap_err();
        assert!(err.message().contains("unterminated"));
    }
}
