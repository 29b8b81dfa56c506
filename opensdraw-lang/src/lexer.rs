// MIT License
//
// Copyright (c) 2024 OpenSDraw contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

//! Tokenizer for the S-expression surface syntax.

use crate::error::{ErrorKind, LResult, LcadError};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    Number(f64),
    Str(String),
    /// A bare or `:`-prefixed identifier. `is_keyword` is set when the
    /// token started with `:`; the leading colon is kept in `text` so
    /// downstream code can tell a keyword symbol from a bare one just by
    /// looking at the string, matching how the evaluator treats `:foo`
    /// as a distinct kind of symbol rather than stripping it here.
    Symbol(String),
}

pub struct Lexeme {
    pub token: Token,
    pub line: u32,
}

pub fn lex(source: &str) -> LResult<Vec<Lexeme>> {
    let mut out = Vec::new();
    let mut chars = source.char_indices().peekable();
    let mut line: u32 = 1;
    let bytes = source.as_bytes();

    while let Some(&(i, c)) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            ';' => {
                while let Some(&(_, c)) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '(' => {
                out.push(Lexeme { token: Token::LParen, line });
                chars.next();
            }
            ')' => {
                out.push(Lexeme { token: Token::RParen, line });
                chars.next();
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                let mut closed = false;
                while let Some(&(_, c)) = chars.peek() {
                    chars.next();
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            if let Some(&(_, esc)) = chars.peek() {
                                chars.next();
                                s.push(match esc {
                                    'n' => '\n',
                                    't' => '\t',
                                    '"' => '"',
                                    '\\' => '\\',
                                    other => other,
                                });
                            }
                        }
                        '\n' => {
                            line += 1;
                            s.push(c);
                        }
                        other => s.push(other),
                    }
                }
                if !closed {
                    return Err(LcadError::new(ErrorKind::SyntaxError(format!(
                        "unterminated string at line {line}"
                    ))));
                }
                out.push(Lexeme { token: Token::Str(s), line });
            }
            _ => {
                let start = i;
                let mut end = i;
                while let Some(&(j, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == ';' || c == '"' {
                        break;
                    }
                    end = j + c.len_utf8();
                    chars.next();
                }
                let text = std::str::from_utf8(&bytes[start..end]).unwrap();
                if let Ok(n) = text.parse::<f64>() {
                    if n.is_finite() || looks_like_number(text) {
                        out.push(Lexeme { token: Token::Number(n), line });
                    } else {
                        // Rust's float parser also accepts `inf`, `-inf`,
                        // `infinity` and `nan` as spellings of a non-finite
                        // float; a bare word like that is almost certainly
                        // meant as a symbol, not a number literal.
                        out.push(Lexeme { token: Token::Symbol(text.to_string()), line });
                    }
                } else {
                    out.push(Lexeme { token: Token::Symbol(text.to_string()), line });
                }
            }
        }
    }

    Ok(out)
}

/// Whether `text` is shaped like a numeric literal -- an optional sign,
/// at least one digit, and nothing but digits/`.`/an exponent after that --
/// as opposed to a word that merely happens to parse as a float.
fn looks_like_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut saw_digit = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                saw_digit = true;
                i += 1;
            }
            b'.' => i += 1,
            b'e' | b'E' if saw_digit => {
                i += 1;
                if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
                    i += 1;
                }
            }
            _ => return false,
        }
    }
    saw_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(source: &str) -> Vec<Token> {
        lex(source).unwrap().into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn ordinary_numbers_lex_as_numbers() {
        assert_eq!(token_kinds("3.5"), vec![Token::Number(3.5)]);
        assert_eq!(token_kinds("-2"), vec![Token::Number(-2.0)]);
        assert_eq!(token_kinds("1e3"), vec![Token::Number(1000.0)]);
    }

    #[test]
    fn non_finite_float_spellings_lex_as_symbols() {
        for word in ["inf", "-inf", "infinity", "nan"] {
            assert_eq!(token_kinds(word), vec![Token::Symbol(word.to_string())], "{word} should lex as a symbol");
        }
    }
}
