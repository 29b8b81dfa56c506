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

//! The runtime value universe.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use opensdraw_math::{Mt4, Pt3};

use crate::ast::Node;
use crate::env::ScopeId;
use crate::geom::{curve::CurveFn, spring::SpringFn};

/// A binding slot. Lists are sequences of these (not of bare `Value`s) so
/// that `(set (aref list i) v)` mutates a slot shared with whoever else
/// holds the list.
#[derive(Clone, Debug)]
pub struct Cell {
    pub name: String,
    pub is_set: bool,
    pub value: Value,
    /// File the binding was introduced in, used to detect colliding
    /// `:local` imports of the same name from two different files.
    pub origin_file: Rc<str>,
}

impl Cell {
    pub fn unset(name: impl Into<String>, origin_file: Rc<str>) -> Self {
        Cell { name: name.into(), is_set: false, value: Value::Nil, origin_file }
    }

    pub fn new(name: impl Into<String>, value: Value, origin_file: Rc<str>) -> Self {
        Cell { name: name.into(), is_set: true, value, origin_file }
    }
}

pub type CellRef = Rc<RefCell<Cell>>;

#[derive(Clone)]
pub enum Value {
    Nil,
    T,
    Number(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<CellRef>>>),
    Matrix(Mt4),
    Vector(Rc<Vec<f64>>),
    Function(Rc<Function>),
    Curve(Rc<CurveFn>),
    Spring(Rc<SpringFn>),
}

pub enum Function {
    Builtin {
        name: String,
        handler: BuiltinHandler,
    },
    UserFn {
        name: String,
        params: Vec<String>,
        keyword_params: Vec<(String, Node)>,
        body: Vec<Node>,
        closure: ScopeId,
    },
    /// A function assembled at runtime (e.g. by `chain`), not tied to any
    /// AST node.
    Native {
        name: String,
        handler: Rc<dyn Fn(&[Value]) -> crate::error::LResult<Value>>,
    },
    /// A host-registered function from the foreign-function registry;
    /// unlike `Native` its handler also gets the `Model`, so e.g. `picture`
    /// can append to it.
    Foreign {
        name: String,
        handler: crate::ffi::FfiHandler,
    },
}

/// A built-in's handler receives the *whole* call expression node (so
/// lazy forms like `def`, `if` and `for` can choose which of their own
/// argument nodes to evaluate and in which scope) plus the scope the
/// call itself is being evaluated in.
pub type BuiltinHandler =
    fn(&mut crate::eval::Evaluator, &Node, ScopeId) -> crate::error::LResult<Value>;

impl Value {
    pub fn truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::List(cells) => !cells.borrow().is_empty(),
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::T => "t",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Matrix(_) => "matrix",
            Value::Vector(_) => "vector",
            Value::Function(_) => "function",
            Value::Curve(_) => "curve",
            Value::Spring(_) => "spring",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Rc<RefCell<Vec<CellRef>>>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn list_of(values: Vec<Value>, origin_file: Rc<str>) -> Value {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Rc::new(RefCell::new(Cell::new(format!("_{i}"), v, origin_file.clone()))))
            .collect();
        Value::List(Rc::new(RefCell::new(cells)))
    }

    /// Reads a list of exactly 3 numbers as a point/vector, the
    /// representation `(list X Y Z)` and `(vector X Y Z)` both produce.
    pub fn as_pt3(&self) -> Option<Pt3> {
        let nums = self.as_number_seq()?;
        if nums.len() != 3 {
            return None;
        }
        Some(Pt3::new(nums[0], nums[1], nums[2]))
    }

    /// Reads `List`/`Vector` as a `Vec<Value>` -- for `for`-loops and
    /// other consumers that want the elements themselves, not just
    /// numbers.
    pub fn as_value_seq(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(cells) => Some(cells.borrow().iter().map(|c| c.borrow().value.clone()).collect()),
            Value::Vector(v) => Some(v.iter().map(|n| Value::Number(*n)).collect()),
            _ => None,
        }
    }

    pub fn as_number_seq(&self) -> Option<Vec<f64>> {
        match self {
            Value::Vector(v) => Some(v.as_ref().clone()),
            Value::List(cells) => {
                let cells = cells.borrow();
                let mut out = Vec::with_capacity(cells.len());
                for c in cells.iter() {
                    out.push(c.borrow().value.as_number()?);
                }
                Some(out)
            }
            _ => None,
        }
    }

    pub fn vector_of(nums: Vec<f64>) -> Value {
        Value::Vector(Rc::new(nums))
    }

    pub fn from_pt3(p: Pt3) -> Value {
        Value::vector_of(vec![p.x, p.y, p.z])
    }

    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn boolean(b: bool) -> Value {
        if b {
            Value::T
        } else {
            Value::Nil
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::T => write!(f, "t"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(cells) => {
                write!(f, "(")?;
                let cells = cells.borrow();
                for (i, c) in cells.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", c.borrow().value)?;
                }
                write!(f, ")")
            }
            Value::Matrix(_) => write!(f, "<matrix>"),
            Value::Vector(v) => {
                write!(f, "[")?;
                for (i, n) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{n}")?;
                }
                write!(f, "]")
            }
            Value::Function(func) => match func.as_ref() {
                Function::Builtin { name, .. } => write!(f, "<builtin {name}>"),
                Function::UserFn { name, .. } => write!(f, "<function {name}>"),
                Function::Native { name, .. } => write!(f, "<native {name}>"),
                Function::Foreign { name, .. } => write!(f, "<foreign {name}>"),
            },
            Value::Curve(_) => write!(f, "<curve>"),
            Value::Spring(_) => write!(f, "<spring>"),
        }
    }
}
