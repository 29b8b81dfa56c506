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

//! `(chain (list STEP1 STEP2 ...))` stitches curves and springs end to
//! end into one callable spanning their combined arc length -- the same
//! distance-to-(position, orientation) contract as a single curve or
//! spring, just dispatching to whichever piece a distance falls in.

use std::rc::Rc;

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::eval::Evaluator;
use crate::value::{Function, Value};

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "chain", chain_builtin);
}

enum Step {
    Curve(Rc<crate::geom::curve::CurveFn>),
    Spring(Rc<crate::geom::spring::SpringFn>),
}

impl Step {
    fn length(&self) -> f64 {
        match self {
            Step::Curve(c) => c.length(),
            Step::Spring(s) => s.length(),
        }
    }

    fn sample(&self, s: f64) -> [f64; 6] {
        match self {
            Step::Curve(c) => {
                let sample = c.eval(s);
                [sample.pos.x, sample.pos.y, sample.pos.z, sample.rx, sample.ry, sample.rz]
            }
            Step::Spring(s_fn) => {
                let sample = s_fn.eval(s);
                [sample.pos.x, sample.pos.y, sample.pos.z, sample.rx, sample.ry, sample.rz]
            }
        }
    }
}

fn chain_builtin(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check("chain", args.len())?;
    let items = args[0].as_value_seq().ok_or_else(|| {
        LcadError::new(ErrorKind::WrongType { expected: "list of curves/springs".into(), actual: args[0].type_name().into() })
    })?;
    if items.is_empty() {
        return Err(LcadError::new(ErrorKind::NumberControlPoints("chain needs at least one step".into())));
    }

    let mut steps = Vec::with_capacity(items.len());
    for item in items {
        let step = match item {
            Value::Curve(c) => Step::Curve(c),
            Value::Spring(s) => Step::Spring(s),
            other => {
                return Err(LcadError::new(ErrorKind::WrongType { expected: "curve or spring".into(), actual: other.type_name().into() }));
            }
        };
        steps.push(step);
    }

    let mut starts = Vec::with_capacity(steps.len());
    let mut total = 0.0;
    for step in &steps {
        starts.push(total);
        total += step.length();
    }

    let handler: Rc<dyn Fn(&[Value]) -> LResult<Value>> = Rc::new(move |args: &[Value]| {
        let arg = args.first().ok_or_else(|| LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "1".into(), actual: 0 }))?;
        if matches!(arg, Value::T) {
            return Ok(Value::Number(total));
        }
        let s = builtins::expect_number(arg, "chain distance")?;
        let s = s.clamp(0.0, total.max(0.0));

        let mut idx = steps.len() - 1;
        for (i, start) in starts.iter().enumerate() {
            let end = start + steps[i].length();
            if s <= end || i == steps.len() - 1 {
                idx = i;
                break;
            }
        }
        let local = s - starts[idx];
        let sample = steps[idx].sample(local);
        Ok(Value::vector_of(sample.to_vec()))
    });

    Ok(Value::Function(Rc::new(Function::Native { name: "chain".into(), handler })))
}
