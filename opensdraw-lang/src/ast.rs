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

//! The abstract syntax tree produced by the parser.
//!
//! Scope resolution happens dynamically during evaluation (a recursive
//! or looping call needs a fresh binding frame per invocation, which a
//! single scope handle attached once per node at parse time cannot
//! provide) -- see `prepass` and `eval` for how the scope a node resolves
//! against is threaded through instead.

use std::rc::Rc;

use crate::value::Value;

#[derive(Clone, Debug)]
pub enum NodeKind {
    Constant(Value),
    Symbol(String),
    Expression(Vec<Node>),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub file: Rc<str>,
    pub line: u32,
}

impl Node {
    pub fn new(kind: NodeKind, file: Rc<str>, line: u32) -> Self {
        Node { kind, file, line }
    }

    pub fn is_keyword_symbol(&self) -> bool {
        matches!(&self.kind, NodeKind::Symbol(s) if s.starts_with(':'))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Expression(children) => Some(children),
            _ => None,
        }
    }
}
