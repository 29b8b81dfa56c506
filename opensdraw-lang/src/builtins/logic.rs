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

//! `and`/`or` short-circuit on their unevaluated argument nodes; `not` is
//! an ordinary eager unary function.

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::LResult;
use crate::eval::Evaluator;
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "and", and);
    register(scopes, scope, "or", or);
    register(scopes, scope, "not", not);
}

fn and(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    let mut last = Value::T;
    for child in &children[1..] {
        last = ev.eval_node(child, scope)?;
        if !last.truthy() {
            return Ok(last);
        }
    }
    Ok(last)
}

fn or(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    let mut last = Value::Nil;
    for child in &children[1..] {
        last = ev.eval_node(child, scope)?;
        if last.truthy() {
            return Ok(last);
        }
    }
    Ok(last)
}

fn not(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check("not", args.len())?;
    Ok(Value::boolean(!args[0].truthy()))
}
