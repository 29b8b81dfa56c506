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

//! `def`, `set`, `if`, `cond`, `while`, `for`, `block` and the handful of
//! list/utility forms that round out the core language -- everything that
//! needs to see its own unevaluated argument nodes rather than a plain
//! `Vec<Value>`.

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::eval::Evaluator;
use crate::prepass::{self, DefShape};
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "def", def);
    register(scopes, scope, "set", set);
    register(scopes, scope, "if", if_);
    register(scopes, scope, "cond", cond);
    register(scopes, scope, "while", while_);
    register(scopes, scope, "for", for_);
    register(scopes, scope, "block", block);
    register(scopes, scope, "list", list);
    register(scopes, scope, "aref", aref);
    register(scopes, scope, "len", len);
    register(scopes, scope, "print", print);
    register(scopes, scope, "import", import);
}

fn children_of(node: &Node) -> &[Node] {
    node.as_expression().unwrap_or(&[])
}

fn def(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    match prepass::def_shape(children) {
        Some(DefShape::Simple) => {
            let name = children[1].as_symbol().unwrap();
            let value = ev.eval_node(&children[2], scope)?;
            ev.scopes.define(scope, name, value.clone(), node.file.clone(), false)?;
            Ok(value)
        }
        Some(DefShape::Multi) => {
            let mut last = Value::Nil;
            let mut pair = children[1..].chunks_exact(2);
            for chunk in &mut pair {
                let name = chunk[0].as_symbol().unwrap();
                last = ev.eval_node(&chunk[1], scope)?;
                ev.scopes.define(scope, name, last.clone(), node.file.clone(), false)?;
            }
            Ok(last)
        }
        Some(DefShape::Function) => {
            // `Evaluator::eval_sequence` hoists every direct-child function
            // `def` into `scope` before running any statement, so by the
            // time this node is actually evaluated the binding already
            // exists; re-running it here just confirms that and returns
            // the bound function.
            let name = children[1].as_symbol().unwrap();
            let cell = ev
                .scopes
                .local(scope, name)
                .ok_or_else(|| LcadError::new(ErrorKind::SymbolNotDefined(name.to_string())))?;
            Ok(cell.borrow().value.clone())
        }
        None => Err(LcadError::new(ErrorKind::SyntaxError(format!("malformed `def` at {}:{}", node.file, node.line)))),
    }
}

fn set(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    let args = &children[1..];
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments {
            expected: "an even number, at least 2".into(),
            actual: args.len(),
        }));
    }
    let mut last = Value::Nil;
    for pair in args.chunks_exact(2) {
        let place = &pair[0];
        let value = ev.eval_node(&pair[1], scope)?;
        assign_place(ev, place, scope, value.clone())?;
        last = value;
    }
    Ok(last)
}

fn assign_place(ev: &mut Evaluator, place: &Node, scope: ScopeId, value: Value) -> LResult<()> {
    if let Some(name) = place.as_symbol() {
        ev.scopes.set(scope, name, value)?;
        return Ok(());
    }
    let place_children = place.as_expression().unwrap_or(&[]);
    if place_children.first().and_then(|c| c.as_symbol()) != Some("aref") || place_children.len() != 3 {
        return Err(LcadError::new(ErrorKind::SyntaxError(
            "`set` place must be a symbol or `(aref LIST INDEX)`".into(),
        )));
    }
    let list_val = ev.eval_node(&place_children[1], scope)?;
    let index_val = ev.eval_node(&place_children[2], scope)?;
    let index = builtins::expect_number(&index_val, "aref index")? as i64;
    let cells = list_val
        .as_list()
        .ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "list".into(), actual: list_val.type_name().into() }))?;
    let cells = cells.borrow();
    let len = cells.len();
    let cell = usize::try_from(index)
        .ok()
        .and_then(|i| cells.get(i))
        .ok_or_else(|| LcadError::new(ErrorKind::IndexOutOfRange { index, len }))?;
    cell.borrow_mut().value = value;
    cell.borrow_mut().is_set = true;
    Ok(())
}

fn if_(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    if children.len() < 2 || children.len() > 4 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "2 or 3".into(), actual: children.len() - 1 }));
    }
    let cond = ev.eval_node(&children[1], scope)?;
    if cond.truthy() {
        ev.eval_node(&children[2], scope)
    } else if let Some(else_node) = children.get(3) {
        ev.eval_node(else_node, scope)
    } else {
        Ok(Value::Nil)
    }
}

fn cond(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    for clause in &children[1..] {
        let clause_children = clause.as_expression().ok_or_else(|| {
            LcadError::new(ErrorKind::SyntaxError("`cond` clause must be `(TEST EXPR...)`".into()))
        })?;
        let Some((test, body)) = clause_children.split_first() else {
            continue;
        };
        if ev.eval_node(test, scope)?.truthy() {
            return ev.eval_block(body, scope);
        }
    }
    Ok(Value::Nil)
}

fn while_(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    if children.len() < 2 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "at least 1".into(), actual: 0 }));
    }
    let cond = &children[1];
    let body = &children[2..];
    let mut result = Value::Nil;
    while ev.eval_node(cond, scope)?.truthy() {
        result = ev.eval_block(body, scope)?;
    }
    Ok(result)
}

fn for_(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    if children.len() < 2 {
        return Err(LcadError::new(ErrorKind::SyntaxError("`for` needs an iterator spec".into())));
    }
    let spec = children[1]
        .as_expression()
        .ok_or_else(|| LcadError::new(ErrorKind::SyntaxError("`for` iterator spec must be `(VAR ...)`".into())))?;
    let var = spec
        .first()
        .and_then(|c| c.as_symbol())
        .ok_or_else(|| LcadError::new(ErrorKind::SyntaxError("`for` iterator variable must be a symbol".into())))?;
    let body = &children[2..];

    let mut result = Value::Nil;
    let mut run_iteration = |ev: &mut Evaluator, value: Value| -> LResult<()> {
        // A fresh scope per iteration (rather than one `loop_scope` rebound
        // every pass) so `define` never sees the loop variable as an
        // existing, already-set binding in the same scope.
        let iter_scope = ev.scopes.push_scope(Some(scope));
        ev.scopes.define(iter_scope, var, value, node.file.clone(), false)?;
        result = ev.eval_sequence(body, iter_scope)?;
        Ok(())
    };

    match spec.len() - 1 {
        1 => {
            let v = ev.eval_node(&spec[1], scope)?;
            if let Some(items) = v.as_value_seq() {
                for item in items {
                    run_iteration(ev, item)?;
                }
            } else {
                let n = builtins::expect_number(&v, "for count")?;
                let mut i = 0i64;
                while (i as f64) < n {
                    run_iteration(ev, Value::Number(i as f64))?;
                    i += 1;
                }
            }
        }
        2 => {
            let start = builtins::expect_number(&ev.eval_node(&spec[1], scope)?, "for start")?;
            let end = builtins::expect_number(&ev.eval_node(&spec[2], scope)?, "for end")?;
            let mut i = start;
            while i < end {
                run_iteration(ev, Value::Number(i))?;
                i += 1.0;
            }
        }
        3 => {
            let start = builtins::expect_number(&ev.eval_node(&spec[1], scope)?, "for start")?;
            let step = builtins::expect_number(&ev.eval_node(&spec[2], scope)?, "for step")?;
            let end = builtins::expect_number(&ev.eval_node(&spec[3], scope)?, "for end")?;
            let mut i = start;
            if step > 0.0 {
                while i < end {
                    run_iteration(ev, Value::Number(i))?;
                    i += step;
                }
            } else if step < 0.0 {
                while i > end {
                    run_iteration(ev, Value::Number(i))?;
                    i += step;
                }
            } else {
                return Err(LcadError::new(ErrorKind::SyntaxError("`for` step must be nonzero".into())));
            }
        }
        _ => return Err(LcadError::new(ErrorKind::SyntaxError("malformed `for` iterator spec".into()))),
    }
    Ok(result)
}

fn block(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    ev.eval_block(&children[1..], scope)
}

fn list(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let (values, keywords) = builtins::split_args(ev, node, scope)?;
    if let Some((name, _)) = keywords.into_iter().next() {
        return Err(LcadError::new(ErrorKind::UnknownKeyword(name)));
    }
    Ok(Value::list_of(values, node.file.clone()))
}

fn aref(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(2).check("aref", args.len())?;
    let index = builtins::expect_number(&args[1], "aref index")? as i64;

    // Vectors (e.g. a curve/spring/chain sample) are read-only, so they're
    // indexed straight from the backing numbers rather than through a cell.
    if let Value::Vector(nums) = &args[0] {
        let len = nums.len();
        let n = usize::try_from(index)
            .ok()
            .and_then(|i| nums.get(i))
            .ok_or_else(|| LcadError::new(ErrorKind::IndexOutOfRange { index, len }))?;
        return Ok(Value::Number(*n));
    }

    let cells = args[0]
        .as_list()
        .ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "list or vector".into(), actual: args[0].type_name().into() }))?;
    let cells = cells.borrow();
    let len = cells.len();
    let cell = usize::try_from(index)
        .ok()
        .and_then(|i| cells.get(i))
        .ok_or_else(|| LcadError::new(ErrorKind::IndexOutOfRange { index, len }))?;
    Ok(cell.borrow().value.clone())
}

fn len(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check("len", args.len())?;
    let n = args[0]
        .as_list()
        .map(|cells| cells.borrow().len())
        .or_else(|| args[0].as_number_seq().map(|v| v.len()))
        .ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "list".into(), actual: args[0].type_name().into() }))?;
    Ok(Value::Number(n as f64))
}

fn print(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", rendered.join(" "));
    Ok(args.into_iter().last().unwrap_or(Value::Nil))
}

fn import(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = children_of(node);
    let module = children
        .get(1)
        .and_then(|n| n.as_symbol())
        .ok_or_else(|| LcadError::new(ErrorKind::SyntaxError("`import` needs a module name".into())))?;
    let local = children.get(2).and_then(|n| n.as_symbol()) == Some(":local");
    ev.import(module, local, scope, node)
}
