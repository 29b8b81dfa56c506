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

//! Structured error taxonomy.
//!
//! One variant per error kind rather than a hierarchy of error types --
//! the set is small and fully enumerable, so a hand-rolled enum plus
//! `Display`/`Error` impls is simpler than pulling in an error-derive
//! crate for it.

use std::fmt;
use std::rc::Rc;

/// One step of the call-site chain an error accumulates as it unwinds.
#[derive(Clone, Debug)]
pub struct Frame {
    pub function: Option<String>,
    pub file: Rc<str>,
    pub line: u32,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(name) => write!(f, "  in {} at {}:{}", name, self.file, self.line),
            None => write!(f, "  at {}:{}", self.file, self.line),
        }
    }
}

#[derive(Clone, Debug)]
pub enum ErrorKind {
    SyntaxError(String),
    SymbolNotDefined(String),
    SymbolAlreadyExists(String),
    CannotOverrideBuiltin(String),
    NotAFunction(String),
    WrongType { expected: String, actual: String },
    WrongNumberOfArguments { expected: String, actual: usize },
    UnknownKeyword(String),
    KeywordValueMissing(String),
    IndexOutOfRange { index: i64, len: usize },
    GroupExists(String),
    ControlPoint(String),
    Tangent(String),
    NumberControlPoints(String),
    FileNotFound(String),
    IOError(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::SyntaxError(msg) => write!(f, "syntax error: {msg}"),
            ErrorKind::SymbolNotDefined(name) => write!(f, "symbol not defined: {name}"),
            ErrorKind::SymbolAlreadyExists(name) => write!(f, "symbol already exists: {name}"),
            ErrorKind::CannotOverrideBuiltin(name) => {
                write!(f, "cannot override built-in: {name}")
            }
            ErrorKind::NotAFunction(what) => write!(f, "not a function: {what}"),
            ErrorKind::WrongType { expected, actual } => {
                write!(f, "wrong type: expected {expected}, got {actual}")
            }
            ErrorKind::WrongNumberOfArguments { expected, actual } => {
                write!(f, "wrong number of arguments: expected {expected}, got {actual}")
            }
            ErrorKind::UnknownKeyword(name) => write!(f, "unknown keyword: {name}"),
            ErrorKind::KeywordValueMissing(name) => {
                write!(f, "keyword value missing for: {name}")
            }
            ErrorKind::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for list of length {len}")
            }
            ErrorKind::GroupExists(name) => write!(f, "group already exists: {name}"),
            ErrorKind::ControlPoint(msg) => write!(f, "invalid control point: {msg}"),
            ErrorKind::Tangent(msg) => write!(f, "invalid tangent: {msg}"),
            ErrorKind::NumberControlPoints(msg) => write!(f, "invalid number of control points: {msg}"),
            ErrorKind::FileNotFound(path) => write!(f, "file not found: {path}"),
            ErrorKind::IOError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

/// An error plus the call-site chain it accumulated while unwinding.
#[derive(Clone, Debug)]
pub struct LcadError {
    pub kind: ErrorKind,
    pub chain: Vec<Frame>,
}

impl LcadError {
    pub fn new(kind: ErrorKind) -> Self {
        LcadError { kind, chain: Vec::new() }
    }

    /// Push a frame as this error unwinds through a call site.
    pub fn push_frame(mut self, function: Option<String>, file: Rc<str>, line: u32) -> Self {
        self.chain.push(Frame { function, file, line });
        self
    }
}

impl fmt::Display for LcadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        for frame in &self.chain {
            writeln!(f, "{frame}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LcadError {}

pub type LResult<T> = Result<T, LcadError>;
