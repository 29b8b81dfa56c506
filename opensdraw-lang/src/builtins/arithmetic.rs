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

//! `+ - * / %`, all variadic over two or more numbers except unary `-`
//! which also accepts exactly one (negation).

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::eval::Evaluator;
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "+", add);
    register(scopes, scope, "-", sub);
    register(scopes, scope, "*", mul);
    register(scopes, scope, "/", div);
    register(scopes, scope, "%", rem);
}

fn numbers(ev: &mut Evaluator, node: &Node, scope: ScopeId, name: &str) -> LResult<Vec<f64>> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::at_least(1).check(name, args.len())?;
    args.iter().map(|v| builtins::expect_number(v, name)).collect()
}

fn add(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    Ok(Value::Number(numbers(ev, node, scope, "+")?.into_iter().sum()))
}

fn sub(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let ns = numbers(ev, node, scope, "-")?;
    if ns.len() == 1 {
        return Ok(Value::Number(-ns[0]));
    }
    Ok(Value::Number(ns[1..].iter().fold(ns[0], |acc, n| acc - n)))
}

fn mul(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    Ok(Value::Number(numbers(ev, node, scope, "*")?.into_iter().product()))
}

fn div(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let ns = numbers(ev, node, scope, "/")?;
    builtins::signature::Arity::at_least(2).check("/", ns.len())?;
    for n in &ns[1..] {
        if *n == 0.0 {
            return Err(LcadError::new(ErrorKind::WrongType { expected: "nonzero divisor".into(), actual: "0".into() }));
        }
    }
    Ok(Value::Number(ns[1..].iter().fold(ns[0], |acc, n| acc / n)))
}

fn rem(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let ns = numbers(ev, node, scope, "%")?;
    builtins::signature::Arity::exactly(2).check("%", ns.len())?;
    Ok(Value::Number(ns[0] % ns[1]))
}
