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

//! Turns a token stream into an AST.
//!
//! A source file is a sequence of top-level forms; the parser wraps them
//! in an implicit top-level `Expression` node whose value, once
//! evaluated, is the value of the last form -- matching the "implicit
//! top-level expression" grammar note.

use std::rc::Rc;

use crate::ast::{Node, NodeKind};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::lexer::{lex, Lexeme, Token};
use crate::value::Value;

pub fn parse(source: &str, filename: &str) -> LResult<Node> {
    let tokens = lex(source)?;
    let file: Rc<str> = Rc::from(filename);
    let mut pos = 0;
    let mut forms = Vec::new();
    while pos < tokens.len() {
        let (node, next) = parse_form(&tokens, pos, &file)?;
        forms.push(node);
        pos = next;
    }
    Ok(Node::new(NodeKind::Expression(forms), file.clone(), 1))
}

fn parse_form(tokens: &[Lexeme], pos: usize, file: &Rc<str>) -> LResult<(Node, usize)> {
    let Some(lex) = tokens.get(pos) else {
        return Err(LcadError::new(ErrorKind::SyntaxError("unexpected end of input".into())));
    };
    let line = lex.line;
    match &lex.token {
        Token::LParen => {
            let mut children = Vec::new();
            let mut i = pos + 1;
            loop {
                match tokens.get(i) {
                    None => {
                        return Err(LcadError::new(ErrorKind::SyntaxError(format!(
                            "unterminated expression starting at line {line}"
                        ))));
                    }
                    Some(Lexeme { token: Token::RParen, .. }) => {
                        i += 1;
                        break;
                    }
                    _ => {
                        let (child, next) = parse_form(tokens, i, file)?;
                        children.push(child);
                        i = next;
                    }
                }
            }
            Ok((Node::new(NodeKind::Expression(children), file.clone(), line), i))
        }
        Token::RParen => Err(LcadError::new(ErrorKind::SyntaxError(format!(
            "unexpected `)` at line {line}"
        )))),
        Token::Number(n) => Ok((
            Node::new(NodeKind::Constant(Value::Number(*n)), file.clone(), line),
            pos + 1,
        )),
        Token::Str(s) => Ok((
            Node::new(NodeKind::Constant(Value::string(s.as_str())), file.clone(), line),
            pos + 1,
        )),
        Token::Symbol(name) => Ok((Node::new(NodeKind::Symbol(name.clone()), file.clone(), line), pos + 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_expression() {
        let ast = parse("(+ 1 2 3)", "test.lcad").unwrap();
        let top = ast.as_expression().unwrap();
        assert_eq!(top.len(), 1);
        let call = top[0].as_expression().unwrap();
        assert_eq!(call.len(), 4);
        assert_eq!(call[0].as_symbol(), Some("+"));
    }

    #[test]
    fn unmatched_paren_is_syntax_error() {
        assert!(parse("(+ 1 2", "test.lcad").is_err());
        assert!(parse("+ 1 2)", "test.lcad").is_err());
    }

    #[test]
    fn keyword_symbol_keeps_colon() {
        let ast = parse("(inc 1 :y 2)", "test.lcad").unwrap();
        let call = ast.as_expression().unwrap()[0].as_expression().unwrap();
        assert!(call[2].is_keyword_symbol());
    }
}
