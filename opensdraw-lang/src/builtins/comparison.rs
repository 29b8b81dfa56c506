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

//! `= != < > <= >=`, strictly binary and numeric.

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::LResult;
use crate::eval::Evaluator;
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "=", |ev, n, s| compare(ev, n, s, "=", |a, b| a == b));
    register(scopes, scope, "!=", |ev, n, s| compare(ev, n, s, "!=", |a, b| a != b));
    register(scopes, scope, "<", |ev, n, s| compare(ev, n, s, "<", |a, b| a < b));
    register(scopes, scope, ">", |ev, n, s| compare(ev, n, s, ">", |a, b| a > b));
    register(scopes, scope, "<=", |ev, n, s| compare(ev, n, s, "<=", |a, b| a <= b));
    register(scopes, scope, ">=", |ev, n, s| compare(ev, n, s, ">=", |a, b| a >= b));
}

fn compare(ev: &mut Evaluator, node: &Node, scope: ScopeId, name: &str, op: fn(f64, f64) -> bool) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(2).check(name, args.len())?;
    let a = builtins::expect_number(&args[0], name)?;
    let b = builtins::expect_number(&args[1], name)?;
    Ok(Value::boolean(op(a, b)))
}
