// Formula tokenizer.

use super::EvalError;

/// A lexical token tagged with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    /// A bare identifier (`points`, `TS%`) or a bracketed column label
    /// (`[WS/48]`) with the brackets stripped.
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    End,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '%'
}

/// Split `source` into tokens, always terminated by `TokenKind::End`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let single = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        };
        if let Some(kind) = single {
            chars.next();
            tokens.push(Token { kind, position: pos });
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let end = scan_number(source, pos);
            let text = &source[pos..end];
            let value: f64 = text
                .parse()
                .map_err(|_| EvalError::syntax(pos, format!("invalid number `{text}`")))?;
            while chars.peek().is_some_and(|&(i, _)| i < end) {
                chars.next();
            }
            tokens.push(Token {
                kind: TokenKind::Number(value),
                position: pos,
            });
            continue;
        }

        if is_ident_start(c) {
            let mut end = pos;
            while let Some(&(i, ch)) = chars.peek() {
                if !is_ident_continue(ch) {
                    break;
                }
                end = i + ch.len_utf8();
                chars.next();
            }
            tokens.push(Token {
                kind: TokenKind::Ident(source[pos..end].to_string()),
                position: pos,
            });
            continue;
        }

        if c == '[' {
            chars.next();
            let mut label = String::new();
            let mut closed = false;
            for (_, ch) in chars.by_ref() {
                if ch == ']' {
                    closed = true;
                    break;
                }
                label.push(ch);
            }
            if !closed {
                return Err(EvalError::syntax(pos, "unterminated `[` column reference"));
            }
            let label = label.trim();
            if label.is_empty() {
                return Err(EvalError::syntax(pos, "empty column reference"));
            }
            tokens.push(Token {
                kind: TokenKind::Ident(label.to_string()),
                position: pos,
            });
            continue;
        }

        return Err(EvalError::syntax(pos, format!("unexpected character `{c}`")));
    }

    tokens.push(Token {
        kind: TokenKind::End,
        position: source.len(),
    });
    Ok(tokens)
}

/// Find the end of a numeric literal starting at `start`:
/// digits, an optional fraction, and an optional exponent.
fn scan_number(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}
