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

//! Degree-based trigonometry plus `sqrt`/`pow`/`exp`/`log`, all thin
//! wraps around `opensdraw_math`'s degree-convention helpers.

use opensdraw_math::{dacos, dasin, datan2, dcos, dsin, dtan};

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::LResult;
use crate::eval::Evaluator;
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "sin", |ev, n, s| unary(ev, n, s, "sin", dsin));
    register(scopes, scope, "cos", |ev, n, s| unary(ev, n, s, "cos", dcos));
    register(scopes, scope, "tan", |ev, n, s| unary(ev, n, s, "tan", dtan));
    register(scopes, scope, "asin", |ev, n, s| unary(ev, n, s, "asin", dasin));
    register(scopes, scope, "acos", |ev, n, s| unary(ev, n, s, "acos", dacos));
    register(scopes, scope, "sqrt", |ev, n, s| unary(ev, n, s, "sqrt", f64::sqrt));
    register(scopes, scope, "exp", |ev, n, s| unary(ev, n, s, "exp", f64::exp));
    register(scopes, scope, "log", |ev, n, s| unary(ev, n, s, "log", f64::ln));
    register(scopes, scope, "atan2", atan2);
    register(scopes, scope, "pow", pow);
}

fn unary(ev: &mut Evaluator, node: &Node, scope: ScopeId, name: &str, f: fn(f64) -> f64) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check(name, args.len())?;
    Ok(Value::Number(f(builtins::expect_number(&args[0], name)?)))
}

fn atan2(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(2).check("atan2", args.len())?;
    let y = builtins::expect_number(&args[0], "atan2")?;
    let x = builtins::expect_number(&args[1], "atan2")?;
    Ok(Value::Number(datan2(y, x)))
}

fn pow(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(2).check("pow", args.len())?;
    let base = builtins::expect_number(&args[0], "pow")?;
    let exponent = builtins::expect_number(&args[1], "pow")?;
    Ok(Value::Number(base.powf(exponent)))
}
