// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::QueryLocation;

use crate::ParserError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(Box<str>),
    Number(f64),
    /// A single- or double-quoted string literal, unquoted.
    String(Box<str>),
    /// The raw text between a balanced `{`..`}` pair, braces excluded. The
    /// closure matcher (spec §9) interprets this text separately; the
    /// tokenizer only needs to find the matching close brace.
    Closure(Box<str>),
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Plus,
    Minus,
    Star,
    Slash,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

/// Tokenizes an expression string for the recursive-descent parser (spec
/// §9: "the grammar is closed, the parser can be a recursive-descent over
/// the tokenised expression string").
pub fn tokenize(query: &str) -> Result<Vec<Token>, ParserError> {
    let bytes = query.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line = 1usize;
    let mut column = 1usize;

    let loc_at = |pos: usize, line: usize, column: usize| -> QueryLocation {
        QueryLocation::new(pos, pos, line, column).unwrap_or_else(|_| QueryLocation::new_fake())
    };

    while pos < len {
        let c = bytes[pos] as char;

        if c == '\n' {
            pos += 1;
            line += 1;
            column = 1;
            continue;
        }
        if c.is_whitespace() {
            pos += 1;
            column += 1;
            continue;
        }

        let start = pos;
        let start_line = line;
        let start_column = column;

        match c {
            '.' => {
                tokens.push(Token { kind: TokenKind::Dot, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            ',' => {
                tokens.push(Token { kind: TokenKind::Comma, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            '(' => {
                tokens.push(Token { kind: TokenKind::LParen, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            ')' => {
                tokens.push(Token { kind: TokenKind::RParen, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            '[' => {
                tokens.push(Token { kind: TokenKind::LBracket, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            ']' => {
                tokens.push(Token { kind: TokenKind::RBracket, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            '+' => {
                tokens.push(Token { kind: TokenKind::Plus, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            '-' => {
                tokens.push(Token { kind: TokenKind::Minus, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            '*' => {
                tokens.push(Token { kind: TokenKind::Star, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            '/' => {
                tokens.push(Token { kind: TokenKind::Slash, start, end: start + 1, line, column });
                pos += 1;
                column += 1;
            }
            '\'' | '"' => {
                let quote = c;
                let mut end = pos + 1;
                let mut value = String::new();
                while end < len && bytes[end] as char != quote {
                    value.push(bytes[end] as char);
                    end += 1;
                }
                if end >= len {
                    return Err(ParserError::UnexpectedEndOfInput(
                        loc_at(start, start_line, start_column),
                        "unterminated string literal".into(),
                    ));
                }
                tokens.push(Token {
                    kind: TokenKind::String(value.into_boxed_str()),
                    start,
                    end: end + 1,
                    line,
                    column,
                });
                column += end + 1 - pos;
                pos = end + 1;
            }
            '{' => {
                let mut depth = 1usize;
                let mut end = pos + 1;
                while end < len && depth > 0 {
                    match bytes[end] as char {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    end += 1;
                }
                if depth != 0 {
                    return Err(ParserError::UnexpectedEndOfInput(
                        loc_at(start, start_line, start_column),
                        "unterminated closure".into(),
                    ));
                }
                let inner = &query[pos + 1..end - 1];
                tokens.push(Token {
                    kind: TokenKind::Closure(inner.into()),
                    start,
                    end,
                    line,
                    column,
                });
                column += end - pos;
                pos = end;
            }
            _ if c.is_ascii_digit() => {
                let mut end = pos;
                while end < len
                    && (bytes[end].is_ascii_digit() || bytes[end] as char == '.')
                {
                    end += 1;
                }
                let text = &query[pos..end];
                let value: f64 = text.parse().map_err(|_| {
                    ParserError::InvalidLiteral(
                        loc_at(start, start_line, start_column),
                        format!("'{text}' is not a valid number"),
                    )
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    start,
                    end,
                    line,
                    column,
                });
                column += end - pos;
                pos = end;
            }
            _ if c.is_alphabetic() || c == '_' => {
                let mut end = pos;
                while end < len
                    && (bytes[end].is_ascii_alphanumeric() || matches!(bytes[end] as char, '_'))
                {
                    end += 1;
                }
                let text = &query[pos..end];
                tokens.push(Token {
                    kind: TokenKind::Ident(text.into()),
                    start,
                    end,
                    line,
                    column,
                });
                column += end - pos;
                pos = end;
            }
            other => {
                return Err(ParserError::UnexpectedToken(
                    loc_at(start, start_line, start_column),
                    format!("unexpected character '{other}'"),
                ));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        start: len,
        end: len,
        line,
        column,
    });

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_pipeline() {
        let tokens = tokenize("process_cpu_usage * 100").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("process_cpu_usage".into()),
                TokenKind::Star,
                TokenKind::Number(100.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_closure_as_single_token() {
        let tokens = tokenize("tag({tags -> tags.k = 'v' + tags.k})").unwrap();
        let closure = tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::Closure(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(&*closure, "tags -> tags.k = 'v' + tags.k");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(tokenize("tagEqual(k, 'v)").is_err());
    }
}
