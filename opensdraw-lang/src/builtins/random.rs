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

//! `(rand)` gives a uniform float in `[0, 1)`, `(rand N)` one in
//! `[0, N)`, `(seed N)` reseeds the evaluator's Mersenne Twister.

use opensdraw_math::MersenneTwister;

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::LResult;
use crate::eval::Evaluator;
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "rand", rand);
    register(scopes, scope, "seed", seed);
}

fn rand(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::range(0, 1).check("rand", args.len())?;
    match args.first() {
        Some(v) => {
            let max = builtins::expect_number(v, "rand")?;
            Ok(Value::Number(ev.rng.range_f64(0.0, max)))
        }
        None => Ok(Value::Number(ev.rng.next_f64())),
    }
}

fn seed(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check("seed", args.len())?;
    let s = builtins::expect_number(&args[0], "seed")?;
    ev.rng = MersenneTwister::with_seed(s as i64 as u32);
    Ok(Value::Nil)
}
