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

//! `part`/`group`/`header` and the primitive emitters. A color is a plain
//! number: below `0x2000000` it is an LDraw palette index, at or above it
//! the low 24 bits are an RGB direct color (mirroring the `0x2RRGGBB`
//! convention the serializer writes direct colors back out in).

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::eval::Evaluator;
use crate::model::{Color, PrimitiveKind};
use crate::value::Value;

const DIRECT_COLOR_BASE: f64 = 0x2000000 as f64;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "part", part);
    register(scopes, scope, "group", group);
    register(scopes, scope, "header", header);
    register(scopes, scope, "line", line);
    register(scopes, scope, "triangle", triangle);
    register(scopes, scope, "quadrilateral", quadrilateral);
}

fn color_from_value(v: &Value) -> LResult<Color> {
    let n = builtins::expect_number(v, "color")?;
    if n >= DIRECT_COLOR_BASE {
        Ok(Color::Direct((n as i64 as u32) & 0x00FF_FFFF))
    } else {
        Ok(Color::Indexed(n as i64))
    }
}

fn point_from_value(v: &Value, what: &str) -> LResult<[f64; 3]> {
    let p = v.as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: format!("{what} (3-vector)"), actual: v.type_name().into() }))?;
    Ok([p.x, p.y, p.z])
}

fn part(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(2).check("part", args.len())?;
    let part_id = args[0].as_str().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "string".into(), actual: args[0].type_name().into() }))?;
    let color = color_from_value(&args[1])?;
    ev.model.add_part(part_id, color);
    Ok(Value::Nil)
}

fn group(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let children = node.as_expression().unwrap_or(&[]);
    if children.len() < 2 {
        return Err(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "at least 1".into(), actual: 0 }));
    }
    let name_value = ev.eval_node(&children[1], scope)?;
    let name = name_value.as_str().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "string".into(), actual: name_value.type_name().into() }))?.to_string();
    ev.model.push_group(&name)?;
    let child_scope = ev.scopes.push_scope(Some(scope));
    let result = ev.eval_sequence(&children[2..], child_scope);
    ev.model.pop_group();
    result
}

fn header(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check("header", args.len())?;
    let text = args[0].as_str().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: "string".into(), actual: args[0].type_name().into() }))?;
    ev.model.add_header(text);
    Ok(Value::Nil)
}

fn line(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(3).check("line", args.len())?;
    let points = vec![point_from_value(&args[0], "line point")?, point_from_value(&args[1], "line point")?];
    let color = color_from_value(&args[2])?;
    ev.model.add_primitive(PrimitiveKind::Line, points, color);
    Ok(Value::Nil)
}

fn triangle(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(4).check("triangle", args.len())?;
    let points = vec![
        point_from_value(&args[0], "triangle point")?,
        point_from_value(&args[1], "triangle point")?,
        point_from_value(&args[2], "triangle point")?,
    ];
    let color = color_from_value(&args[3])?;
    ev.model.add_primitive(PrimitiveKind::Triangle, points, color);
    Ok(Value::Nil)
}

fn quadrilateral(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let args = builtins::eval_positional(ev, node, scope)?;
    builtins::signature::Arity::exactly(5).check("quadrilateral", args.len())?;
    let points = vec![
        point_from_value(&args[0], "quadrilateral point")?,
        point_from_value(&args[1], "quadrilateral point")?,
        point_from_value(&args[2], "quadrilateral point")?,
        point_from_value(&args[3], "quadrilateral point")?,
    ];
    let color = color_from_value(&args[4])?;
    ev.model.add_primitive(PrimitiveKind::Quadrilateral, points, color);
    Ok(Value::Nil)
}
