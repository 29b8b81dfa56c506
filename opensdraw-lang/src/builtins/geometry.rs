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

//! `translate`/`rotate`/`mirror`/`transform` run their body under a
//! temporarily modified current matrix; `vector`/`matrix` and the small
//! vector-algebra helpers are plain eager functions.

use opensdraw_math::{Mt4, Pt3};

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::eval::Evaluator;
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "translate", translate);
    register(scopes, scope, "rotate", rotate);
    register(scopes, scope, "mirror", mirror);
    register(scopes, scope, "transform", transform);
    register(scopes, scope, "vector", vector);
    register(scopes, scope, "matrix", matrix);
    register(scopes, scope, "cross-product", cross_product);
    register(scopes, scope, "dot-product", dot_product);
    register(scopes, scope, "vector-length", vector_length);
}

fn with_local_matrix(ev: &mut Evaluator, node: &Node, scope: ScopeId, body_start: usize, local: Mt4) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    let body = &children[body_start..];
    let saved = ev.model.current_matrix();
    ev.model.set_current_matrix(saved * local);
    let child_scope = ev.scopes.push_scope(Some(scope));
    // `Model::with_matrix` takes a closure over `&mut Model` alone, which
    // can't also hold the `&mut Evaluator` the body needs, so the
    // save/restore is inlined here instead of going through it.
    let result = ev.eval_sequence(body, child_scope);
    ev.model.set_current_matrix(saved);
    result
}

fn vec3_from_node(ev: &mut Evaluator, node: &Node, scope: ScopeId, what: &str) -> LResult<Pt3> {
    if let Some(children) = node.as_expression() {
        let mut values = Vec::with_capacity(3);
        for c in children {
            values.push(builtins::expect_number(&ev.eval_node(c, scope)?, what)?);
        }
        if values.len() != 3 {
            return Err(LcadError::new(ErrorKind::WrongType { expected: format!("{what} (3 numbers)"), actual: format!("{} numbers", values.len()) }));
        }
        return Ok(Pt3::new(values[0], values[1], values[2]));
    }
    let v = ev.eval_node(node, scope)?;
    v.as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: format!("{what} (3-vector)"), actual: v.type_name().into() }))
}

fn translate(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    if children.len() < 2 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "at least 1".into(), actual: 0 }));
    }
    let offset = vec3_from_node(ev, &children[1], scope, "translate offset")?;
    with_local_matrix(ev, node, scope, 2, Mt4::translation(offset))
}

fn rotate(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    if children.len() < 2 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "at least 1".into(), actual: 0 }));
    }
    let angles = vec3_from_node(ev, &children[1], scope, "rotate angles")?;
    with_local_matrix(ev, node, scope, 2, Mt4::rotation_xyz(angles.x, angles.y, angles.z))
}

fn mirror(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    if children.len() < 2 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "at least 1".into(), actual: 0 }));
    }
    let signs = vec3_from_node(ev, &children[1], scope, "mirror signs")?;
    let sign = |v: f64| if v < 0.0 { -1.0 } else { 1.0 };
    with_local_matrix(ev, node, scope, 2, Mt4::scale(sign(signs.x), sign(signs.y), sign(signs.z)))
}

fn transform(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    if children.len() < 2 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "at least 1".into(), actual: 0 }));
    }
    let m_value = ev.eval_node(&children[1], scope)?;
    let m = matrix_from_value(&m_value)?;
    with_local_matrix(ev, node, scope, 2, m)
}

fn matrix_from_value(v: &Value) -> LResult<Mt4> {
    let flat = if let Some(nested) = v.as_value_seq() {
        if nested.len() == 4 {
            let mut flat = Vec::with_capacity(16);
            for row in &nested {
                flat.extend(row.as_number_seq().ok_or_else(|| {
                    LcadError::new(ErrorKind::WrongType { expected: "4x4 list of numbers".into(), actual: "non-numeric row".into() })
                })?);
            }
            flat
        } else {
            v.as_number_seq().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "16-number or 4x4 list".into(), actual: v.type_name().into() }))?
        }
    } else {
        return Err(LcadError::new(ErrorKind::WrongType { expected: "16-number or 4x4 list".into(), actual: v.type_name().into() }));
    };
    if flat.len() != 16 {
        return Err(LcadError::new(ErrorKind::WrongType { expected: "16 numbers".into(), actual: format!("{} numbers", flat.len()) }));
    }
    let mut arr = [0.0; 16];
    arr.copy_from_slice(&flat);
    Ok(Mt4::from_row_major(&arr))
}

fn vector(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    let mut nums = Vec::with_capacity(args.len());
    for a in &args {
        nums.push(builtins::expect_number(a, "vector")?);
    }
    Ok(Value::vector_of(nums))
}

fn matrix(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    if args.len() == 1 {
        return Ok(Value::Matrix(matrix_from_value(&args[0])?));
    }
    let mut nums = Vec::with_capacity(args.len());
    for a in &args {
        nums.push(builtins::expect_number(a, "matrix")?);
    }
    Ok(Value::Matrix(matrix_from_value(&Value::vector_of(nums))?))
}

fn cross_product(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(2).check("cross-product", args.len())?;
    let a = args[0].as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "3-vector".into(), actual: args[0].type_name().into() }))?;
    let b = args[1].as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "3-vector".into(), actual: args[1].type_name().into() }))?;
    Ok(Value::from_pt3(a.cross(b)))
}

fn dot_product(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(2).check("dot-product", args.len())?;
    let a = args[0].as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "3-vector".into(), actual: args[0].type_name().into() }))?;
    let b = args[1].as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "3-vector".into(), actual: args[1].type_name().into() }))?;
    Ok(Value::Number(a.dot(b)))
}

fn vector_length(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check("vector-length", args.len())?;
    let a = args[0].as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "3-vector".into(), actual: args[0].type_name().into() }))?;
    Ok(Value::Number(a.length()))
}
