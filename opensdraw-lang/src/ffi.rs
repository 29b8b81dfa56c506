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

//! Foreign-function registry: lets a host program add native functions,
//! callable by name from DSL source, before evaluation starts.

use std::rc::Rc;

use crate::error::LResult;
use crate::model::Model;
use crate::value::Value;

pub type FfiHandler = Rc<dyn Fn(&[Value], &mut Model) -> LResult<Value>>;

pub struct ForeignFunction {
    pub name: String,
    pub handler: FfiHandler,
}

#[derive(Default)]
pub struct Registry {
    functions: Vec<ForeignFunction>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: FfiHandler) {
        self.functions.push(ForeignFunction { name: name.into(), handler });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForeignFunction> {
        self.functions.iter()
    }
}
