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

//! The `curve` builtin: parses a control-point list plus keyword options
//! and hands them to [`crate::geom::curve::build`].

use std::rc::Rc;

use opensdraw_math::Pt3;

use crate::ast::Node;
use crate::builtins::{self, register};
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::eval::Evaluator;
use crate::geom::curve::{self, ControlPoint, CurveOptions};
use crate::value::Value;

pub fn install(scopes: &mut ScopeArena, scope: ScopeId) {
    register(scopes, scope, "curve", curve_builtin);
}

fn pt3_of(v: &Value, what: &str) -> LResult<Pt3> {
    v.as_pt3().ok_or_else(|| LcadError::new(ErrorKind::WrongType { expected: format!("{what} (3-vector)"), actual: v.type_name().into() }))
}

fn control_point(v: &Value, index: usize) -> LResult<ControlPoint> {
    let parts = v.as_value_seq().ok_or_else(|| {
        LcadError::new(ErrorKind::ControlPoint(format!("control point {index} must be a list of (LOC DIR [PERP])")))
    })?;
    if index == 0 {
        if parts.len() != 3 {
            return Err(LcadError::new(ErrorKind::ControlPoint(
                "the first control point must be (LOC DIR PERP)".into(),
            )));
        }
        Ok(ControlPoint {
            loc: pt3_of(&parts[0], "control point location")?,
            dir: pt3_of(&parts[1], "control point direction")?,
            perp: Some(pt3_of(&parts[2], "control point perpendicular")?),
        })
    } else {
        if parts.len() != 2 {
            return Err(LcadError::new(ErrorKind::ControlPoint(format!(
                "control point {index} must be (LOC DIR)"
            ))));
        }
        Ok(ControlPoint {
            loc: pt3_of(&parts[0], "control point location")?,
            dir: pt3_of(&parts[1], "control point direction")?,
            perp: None,
        })
    }
}

fn curve_builtin(ev: &mut Evaluator, node: &Node, scope: ScopeId) -> LResult<Value> {
    let (positional, keywords) = builtins::split_args(ev, node, scope)?;
    builtins::signature::Arity::exactly(1).check("curve", positional.len())?;
    let points_values = positional[0].as_value_seq().ok_or_else(|| {
        LcadError::new(ErrorKind::WrongType { expected: "list of control points".into(), actual: positional[0].type_name().into() })
    })?;
    let mut points = Vec::with_capacity(points_values.len());
    for (i, p) in points_values.iter().enumerate() {
        points.push(control_point(p, i)?);
    }

    let auto_scale = builtins::keyword_or(&keywords, "auto-scale").map(Value::truthy).unwrap_or(true);
    let extrapolate = builtins::keyword_or(&keywords, "extrapolate").map(Value::truthy).unwrap_or(true);
    let scale = match builtins::keyword_or(&keywords, "scale") {
        Some(v) => builtins::expect_number(v, "curve :scale")?,
        None => 1.0,
    };
    let twist = match builtins::keyword_or(&keywords, "twist") {
        Some(v) => builtins::expect_number(v, "curve :twist")?,
        None => 0.0,
    };

    let curve_fn = curve::build(&points, CurveOptions { auto_scale, extrapolate, scale, twist })?;
    Ok(Value::Curve(Rc::new(curve_fn)))
}
