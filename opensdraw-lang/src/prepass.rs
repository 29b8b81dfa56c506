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

//! Semantic pre-pass: a single structural walk over the parsed AST that
//! validates every `def` form's shape before any evaluation begins, so a
//! malformed definition is reported as a `SyntaxError` up front rather
//! than partway through a run.
//!
//! Forward references to sibling user functions and override/shadow
//! checks against the lexical environment are enforced dynamically by
//! `env::ScopeArena` at evaluation time instead of here: a function
//! defined inside another function needs a fresh binding frame per call
//! (see `eval::Evaluator::eval_sequence`'s hoisting scan), which a
//! single static pass run once before any call happens cannot model.

use crate::ast::{Node, NodeKind};
use crate::error::{ErrorKind, LResult, LcadError};

/// Which of `def`'s three surface forms a particular `(def ...)` call
/// takes. `(def a (x y) ...)` is ambiguous on its face -- it could be a
/// function named `a` with params `(x y)`, or the start of a multi-def
/// whose first value happens to be the call expression `(x y)`. Multi-def
/// wins whenever its simpler shape (odd arity, symbol in every name slot)
/// fits, since that reading never requires also validating a param list.
#[derive(Debug, PartialEq, Eq)]
pub enum DefShape {
    /// `(def NAME VALUE)`.
    Simple,
    /// `(def N1 V1 N2 V2 ...)`.
    Multi,
    /// `(def NAME (PARAMS) BODY ...)`.
    Function,
}

pub fn def_shape(children: &[Node]) -> Option<DefShape> {
    if children.len() < 3 || children[1].as_symbol().is_none() {
        return None;
    }
    if children.len() == 3 {
        return Some(DefShape::Simple);
    }
    if is_multi_shape(children) {
        return Some(DefShape::Multi);
    }
    if matches!(children[2].kind, NodeKind::Expression(_)) {
        return Some(DefShape::Function);
    }
    None
}

fn is_multi_shape(children: &[Node]) -> bool {
    if children.len() % 2 == 0 || children.len() < 5 {
        return false;
    }
    children[1..].iter().step_by(2).all(|c| c.as_symbol().is_some())
}

pub fn run(ast: &Node) -> LResult<()> {
    walk(ast)
}

fn walk(node: &Node) -> LResult<()> {
    let NodeKind::Expression(children) = &node.kind else {
        return Ok(());
    };

    if children.first().and_then(|c| c.as_symbol()) == Some("def") {
        validate_def(node, children)?;
    }

    for child in children {
        walk(child)?;
    }
    Ok(())
}

fn validate_def(node: &Node, children: &[Node]) -> LResult<()> {
    match def_shape(children) {
        Some(DefShape::Function) => validate_param_list(&children[2]),
        Some(_) => Ok(()),
        None => Err(LcadError::new(ErrorKind::SyntaxError(format!(
            "malformed `def` at {}:{}",
            node.file, node.line
        )))),
    }
}

fn validate_param_list(param_list: &Node) -> LResult<()> {
    let children = param_list.as_expression().ok_or_else(|| {
        LcadError::new(ErrorKind::SyntaxError("function parameter list must be an expression".into()))
    })?;

    let mut i = 0;
    let mut seen_keyword = false;
    while i < children.len() {
        if children[i].is_keyword_symbol() {
            seen_keyword = true;
            i += 1;
            if i >= children.len() {
                return Err(LcadError::new(ErrorKind::KeywordValueMissing(
                    children[i - 1].as_symbol().unwrap_or("?").trim_start_matches(':').to_string(),
                )));
            }
            i += 1;
        } else {
            if seen_keyword {
                return Err(LcadError::new(ErrorKind::SyntaxError(
                    "positional parameters must precede keyword parameters".into(),
                )));
            }
            if children[i].as_symbol().is_none() {
                return Err(LcadError::new(ErrorKind::SyntaxError("parameter must be a symbol".into())));
            }
            i += 1;
        }
    }
    Ok(())
}

/// Parses a flat parameter list `(p1 p2 ... :k1 d1 ...)` into positional
/// names and `(name, default-expression)` keyword pairs. Used by the
/// `def` built-in when it actually constructs the `UserFn` value.
pub fn parse_param_list(param_list: &Node) -> (Vec<String>, Vec<(String, Node)>) {
    let children = param_list.as_expression().unwrap_or(&[]);
    let mut params = Vec::new();
    let mut keyword_params = Vec::new();
    let mut i = 0;
    while i < children.len() {
        if children[i].is_keyword_symbol() {
            let kw = children[i].as_symbol().unwrap().trim_start_matches(':').to_string();
            i += 1;
            if let Some(default_node) = children.get(i) {
                keyword_params.push((kw, default_node.clone()));
            }
            i += 1;
        } else if let Some(name) = children[i].as_symbol() {
            params.push(name.to_string());
            i += 1;
        } else {
            i += 1;
        }
    }
    (params, keyword_params)
}
