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

//! The built-in function library, split into modules the way the
//! original interpreter's `addBuiltIns()` enumerates its own function
//! modules.

pub mod arithmetic;
pub mod chain;
pub mod comparison;
pub mod core;
pub mod curve;
pub mod geometry;
pub mod logic;
pub mod part;
pub mod random;
pub mod signature;
pub mod spring;
pub mod trig;

use std::rc::Rc;

use crate::ast::Node;
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::eval::Evaluator;
use crate::value::{BuiltinHandler, Function, Value};

pub fn install(scopes: &mut ScopeArena, builtin_scope: ScopeId) {
    core::install(scopes, builtin_scope);
    arithmetic::install(scopes, builtin_scope);
    comparison::install(scopes, builtin_scope);
    logic::install(scopes, builtin_scope);
    trig::install(scopes, builtin_scope);
    geometry::install(scopes, builtin_scope);
    part::install(scopes, builtin_scope);
    curve::install(scopes, builtin_scope);
    spring::install(scopes, builtin_scope);
    random::install(scopes, builtin_scope);
    chain::install(scopes, builtin_scope);
}

pub fn register(scopes: &mut ScopeArena, scope: ScopeId, name: &str, handler: BuiltinHandler) {
    let value = Value::Function(Rc::new(Function::Builtin { name: name.to_string(), handler }));
    scopes
        .define(scope, name, value, Rc::from("<builtin>"), false)
        .expect("built-ins are only installed once, into an empty scope");
}

/// Evaluates a call's argument nodes (`node`'s children after the head),
/// splitting them into evaluated positional values and `(name, value)`
/// keyword pairs -- the shared `(F A1 A2 ... :K V ...)` call convention
/// every function, built-in or user-defined, accepts.
pub fn split_args(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<(Vec<Value>, Vec<(String, Value)>)> {
    let children = node.as_expression().unwrap_or(&[]);
    let mut positional = Vec::new();
    let mut keywords = Vec::new();
    let mut i = 1;
    while i < children.len() {
        if children[i].is_keyword_symbol() {
            let name = children[i].as_symbol().unwrap().trim_start_matches(':').to_string();
            i += 1;
            let Some(value_node) = children.get(i) else {
                return Err(LcadError::new(ErrorKind::KeywordValueMissing(name)));
            };
            let value = ev.eval_node(value_node, scope)?;
            keywords.push((name, value));
            i += 1;
        } else {
            positional.push(ev.eval_node(&children[i], scope)?);
            i += 1;
        }
    }
    Ok((positional, keywords))
}

/// Evaluates only the positional argument nodes, erroring if any keyword
/// arguments were passed -- for built-ins that accept no keywords.
pub fn eval_positional(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Vec<Value>> {
    let (positional, keywords) = split_args(ev, node, scope)?;
    if let Some((name, _)) = keywords.into_iter().next() {
        return Err(LcadError::new(ErrorKind::UnknownKeyword(name)));
    }
    Ok(positional)
}

pub fn expect_number(v: &Value, what: &str) -> LResult<f64> {
    v.as_number()
        .ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "number".into(), actual: format!("{what}: {}", v.type_name()) }))
}

pub fn keyword_or<'a>(keywords: &'a [(String, Value)], name: &str) -> Option<&'a Value> {
    keywords.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}
