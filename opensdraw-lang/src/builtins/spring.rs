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

//! The `spring` builtin: `(spring LENGTH DIAMETER GAUGE TURNS :end-turns N)`.

use std::rc::Rc;

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::LResult;
use crate::eval::Evaluator;
use crate::geom::spring::{self, SpringOptions};
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "spring", spring_builtin);
}

fn spring_builtin(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let (positional, keywords) = builtins::split_args(ev, node, scope)?;
    builtins::signature::Arity::exactly(4).check("spring", positional.len())?;
    let length = builtins::expect_number(&positional[0], "spring length")?;
    let diameter = builtins::expect_number(&positional[1], "spring diameter")?;
    let gauge = builtins::expect_number(&positional[2], "spring gauge")?;
    let turns = builtins::expect_number(&positional[3], "spring turns")?;
    let end_turns = match builtins::keyword_or(&keywords, "end-turns") {
        Some(v) => builtins::expect_number(v, "spring :end-turns")?,
        None => 2.0,
    };

    let spring_fn = spring::build(SpringOptions { length, diameter, gauge, turns, end_turns })?;
    Ok(Value::Spring(Rc::new(spring_fn)))
}
