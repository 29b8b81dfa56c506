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

//! The tree-walking evaluator.

use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

use opensdraw_math::MersenneTwister;

use crate::ast::{Node, NodeKind};
use crate::builtins;
use crate::env::{ScopeArena, ScopeId};
use crate::error::{ErrorKind, LResult, LcadError};
use crate::ffi::Registry;
use crate::model::Model;
use crate::parser;
use crate::prepass;
use crate::value::{Function, Value};

pub struct Evaluator {
    pub scopes: ScopeArena,
    pub model: Model,
    pub lib_root: Option<PathBuf>,
    pub rng: MersenneTwister,
    /// `(absolute source path, target scope)` pairs already evaluated by
    /// `import`, so re-importing the same file into the same scope is a
    /// no-op rather than a re-run or a collision error.
    imported: HashSet<(String, ScopeId)>,
}

impl Evaluator {
    pub fn new(time_index: f64, ffi: Registry, lib_root: Option<PathBuf>) -> Self {
        let mut scopes = ScopeArena::new();
        let builtin = scopes.builtin_scope;
        builtins::install(&mut scopes, builtin);
        define_constant(&mut scopes, builtin, "time-index", Value::Number(time_index));
        define_constant(&mut scopes, builtin, "pi", Value::Number(std::f64::consts::PI));
        define_constant(&mut scopes, builtin, "e", Value::Number(std::f64::consts::E));
        define_constant(&mut scopes, builtin, "t", Value::T);
        define_constant(&mut scopes, builtin, "nil", Value::Nil);
        for foreign in ffi.iter() {
            let value = Value::Function(Rc::new(Function::Foreign { name: foreign.name.clone(), handler: foreign.handler.clone() }));
            define_constant(&mut scopes, builtin, &foreign.name, value);
        }

        Evaluator {
            scopes,
            model: Model::new(time_index),
            lib_root,
            rng: MersenneTwister::new(),
            imported: HashSet::new(),
        }
    }

    pub fn eval_node(&mut self, node: &Node, scope: ScopeId) -> LResult<Value> {
        match &node.kind {
            NodeKind::Constant(v) => Ok(v.clone()),
            NodeKind::Symbol(name) => self.eval_symbol(name, scope),
            NodeKind::Expression(children) => self.eval_expression(children, scope, node),
        }
    }

    fn eval_symbol(&mut self, name: &str, scope: ScopeId) -> LResult<Value> {
        let cell = self
            .scopes
            .resolve(scope, name)
            .ok_or_else(|| LcadError::new(ErrorKind::SymbolNotDefined(name.to_string())))?;
        let cell_ref = cell.borrow();
        if !cell_ref.is_set {
            return Err(LcadError::new(ErrorKind::SymbolNotDefined(name.to_string())));
        }
        Ok(cell_ref.value.clone())
    }

    fn eval_expression(&mut self, children: &[Node], scope: ScopeId, node: &Node) -> LResult<Value> {
        if children.is_empty() {
            return Ok(Value::Nil);
        }
        let head = &children[0];
        let func_val = self.eval_node(head, scope).map_err(|e| self.frame(e, node))?;

        let func = match func_val {
            Value::Function(func) => func,
            Value::Curve(curve) => {
                let args = self.eval_call_args(&children[1..], scope)?;
                return self.call_curve(&curve, &args, node);
            }
            Value::Spring(spring) => {
                let args = self.eval_call_args(&children[1..], scope)?;
                return self.call_spring(&spring, &args, node);
            }
            _ => {
                return Err(self.frame(LcadError::new(ErrorKind::NotAFunction(describe(head))), node));
            }
        };

        match func.as_ref() {
            Function::Builtin { handler, .. } => (handler)(self, node, scope).map_err(|e| self.frame(e, node)),
            Function::UserFn { .. } => self.call_user_fn(&func, &children[1..], scope, node),
            Function::Native { handler, .. } => {
                let mut args = Vec::with_capacity(children.len() - 1);
                for c in &children[1..] {
                    args.push(self.eval_node(c, scope)?);
                }
                (handler)(&args).map_err(|e| self.frame(e, node))
            }
            Function::Foreign { handler, .. } => {
                let args = self.eval_call_args(&children[1..], scope)?;
                (handler)(&args, &mut self.model).map_err(|e| self.frame(e, node))
            }
        }
    }

    fn eval_call_args(&mut self, arg_nodes: &[Node], scope: ScopeId) -> LResult<Vec<Value>> {
        arg_nodes.iter().map(|n| self.eval_node(n, scope)).collect()
    }

    /// Curve and spring objects are callable directly: `(c t)` returns the
    /// total arc length, `(c s)` returns a 6-vector
    /// `(x y z rx ry rz)` at distance `s` along the path.
    fn call_curve(&mut self, curve: &Rc<crate::geom::curve::CurveFn>, args: &[Value], node: &Node) -> LResult<Value> {
        let arg = args.first().ok_or_else(|| {
            self.frame(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "1".into(), actual: 0 }), node)
        })?;
        if matches!(arg, Value::T) {
            return Ok(Value::Number(curve.length()));
        }
        let s = builtins::expect_number(arg, "curve distance").map_err(|e| self.frame(e, node))?;
        let sample = curve.eval(s);
        Ok(Value::vector_of(vec![sample.pos.x, sample.pos.y, sample.pos.z, sample.rx, sample.ry, sample.rz]))
    }

    fn call_spring(&mut self, spring: &Rc<crate::geom::spring::SpringFn>, args: &[Value], node: &Node) -> LResult<Value> {
        let arg = args.first().ok_or_else(|| {
            self.frame(LcadError::new(ErrorKind::WrongNumberOfArguments { expected: "1".into(), actual: 0 }), node)
        })?;
        if matches!(arg, Value::T) {
            return Ok(Value::Number(spring.length()));
        }
        let s = builtins::expect_number(arg, "spring distance").map_err(|e| self.frame(e, node))?;
        let sample = spring.eval(s);
        Ok(Value::vector_of(vec![sample.pos.x, sample.pos.y, sample.pos.z, sample.rx, sample.ry, sample.rz]))
    }

    fn call_user_fn(&mut self, func: &Rc<Function>, arg_nodes: &[Node], call_scope: ScopeId, call_node: &Node) -> LResult<Value> {
        let Function::UserFn { name, params, keyword_params, body, closure } = func.as_ref() else {
            unreachable!()
        };

        let mut positional = Vec::new();
        let mut keywords: Vec<(String, Value)> = Vec::new();
        let mut i = 0;
        while i < arg_nodes.len() {
            if arg_nodes[i].is_keyword_symbol() {
                let kw = arg_nodes[i].as_symbol().unwrap().trim_start_matches(':').to_string();
                i += 1;
                let Some(value_node) = arg_nodes.get(i) else {
                    return Err(self.frame(LcadError::new(ErrorKind::KeywordValueMissing(kw)), call_node));
                };
                let v = self.eval_node(value_node, call_scope)?;
                keywords.push((kw, v));
                i += 1;
            } else {
                positional.push(self.eval_node(&arg_nodes[i], call_scope)?);
                i += 1;
            }
        }

        if positional.len() != params.len() {
            return Err(self.frame(
                LcadError::new(ErrorKind::WrongNumberOfArguments {
                    expected: params.len().to_string(),
                    actual: positional.len(),
                }),
                call_node,
            ));
        }

        for (kw, _) in &keywords {
            if !keyword_params.iter().any(|(n, _)| n == kw) {
                return Err(self.frame(LcadError::new(ErrorKind::UnknownKeyword(kw.clone())), call_node));
            }
        }

        let fn_scope = self.scopes.push_scope(Some(*closure));
        for (pname, pval) in params.iter().zip(positional) {
            self.scopes.define(fn_scope, pname, pval, call_node.file.clone(), false)?;
        }
        for (kwname, default_node) in keyword_params {
            let value = match keywords.iter().find(|(n, _)| n == kwname) {
                Some((_, v)) => v.clone(),
                None => self.eval_node(default_node, call_scope)?,
            };
            self.scopes.define(fn_scope, kwname, value, call_node.file.clone(), false)?;
        }

        let mut result = Value::Nil;
        for stmt in body {
            result = self.eval_node(stmt, fn_scope).map_err(|e| {
                e.push_frame(Some(name.clone()), call_node.file.clone(), call_node.line)
            })?;
        }
        Ok(result)
    }

    /// Evaluates a sequence of statements in a fresh child scope -- the
    /// shape `block`, function bodies, `while`/`for` bodies, and `cond`
    /// clause bodies all share.
    pub fn eval_block(&mut self, body: &[Node], parent_scope: ScopeId) -> LResult<Value> {
        let scope = self.scopes.push_scope(Some(parent_scope));
        self.eval_sequence(body, scope)
    }

    /// Evaluates a sequence of statements directly in `scope`, first
    /// hoisting any direct-child user function definitions so forward
    /// references and recursion work regardless of textual order. This
    /// runs on every entry into `scope`, which is what lets a function
    /// defined inside a repeatedly-called function get an independent
    /// closure each call.
    pub fn eval_sequence(&mut self, body: &[Node], scope: ScopeId) -> LResult<Value> {
        for stmt in body {
            if let Some(children) = stmt.as_expression() {
                if children.first().and_then(|c| c.as_symbol()) == Some("def") && is_function_def(children) {
                    self.hoist_function_def(children, scope, &stmt.file)?;
                }
            }
        }

        let mut result = Value::Nil;
        for node in body {
            result = self.eval_node(node, scope)?;
        }
        Ok(result)
    }

    fn hoist_function_def(&mut self, children: &[Node], scope: ScopeId, file: &Rc<str>) -> LResult<()> {
        let name = children[1].as_symbol().unwrap().to_string();
        let (params, keyword_params) = prepass::parse_param_list(&children[2]);
        let body = children[3..].to_vec();
        let func = Value::Function(Rc::new(Function::UserFn { name: name.clone(), params, keyword_params, body, closure: scope }));
        self.scopes.define(scope, &name, func, file.clone(), false)?;
        Ok(())
    }

    fn frame(&self, err: LcadError, node: &Node) -> LcadError {
        let function_name = node.as_expression().and_then(|c| c.first()).and_then(|h| h.as_symbol()).map(str::to_string);
        err.push_frame(function_name, node.file.clone(), node.line)
    }

    pub fn import(&mut self, module: &str, local: bool, call_scope: ScopeId, call_node: &Node) -> LResult<Value> {
        let path = self.resolve_import_path(module, call_node)?;
        let canonical = path.to_string_lossy().to_string();

        if self.imported.contains(&(canonical.clone(), call_scope)) {
            return Ok(Value::Nil);
        }

        let source = std::fs::read_to_string(&path)
            .map_err(|e| LcadError::new(ErrorKind::IOError(format!("{}: {e}", path.display()))))?;

        let ast = parser::parse(&source, &canonical)?;
        prepass::run(&ast)?;

        let module_scope = self.scopes.push_scope(Some(self.scopes.builtin_scope));
        let NodeKind::Expression(forms) = &ast.kind else { unreachable!() };
        self.eval_sequence(forms, module_scope)?;

        self.install_imported_names(module, module_scope, call_scope, local, &canonical)?;
        self.imported.insert((canonical, call_scope));
        Ok(Value::Nil)
    }

    fn install_imported_names(
        &mut self,
        module: &str,
        module_scope: ScopeId,
        target_scope: ScopeId,
        local: bool,
        origin: &str,
    ) -> LResult<()> {
        let names = self.scopes.local_names(module_scope);
        let origin: Rc<str> = Rc::from(origin);
        for name in names {
            let cell = self.scopes.local(module_scope, &name).unwrap();
            let value = cell.borrow().value.clone();
            let target_name = if local { name.clone() } else { format!("{module}:{name}") };
            self.scopes.define(target_scope, &target_name, value, origin.clone(), true)?;
        }
        Ok(())
    }

    fn resolve_import_path(&self, module: &str, call_node: &Node) -> LResult<PathBuf> {
        let filename = format!("{module}.lcad");
        if let Some(dir) = std::path::Path::new(call_node.file.as_ref()).parent() {
            let candidate = dir.join(&filename);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        if let Some(root) = &self.lib_root {
            let candidate = root.join(&filename);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(LcadError::new(ErrorKind::FileNotFound(filename)))
    }
}

fn is_function_def(children: &[Node]) -> bool {
    matches!(prepass::def_shape(children), Some(prepass::DefShape::Function))
}

fn define_constant(scopes: &mut ScopeArena, scope: ScopeId, name: &str, value: Value) {
    scopes
        .define(scope, name, value, Rc::from("<builtin>"), false)
        .expect("built-in constants never collide with themselves");
}

fn describe(node: &Node) -> String {
    match &node.kind {
        NodeKind::Symbol(s) => s.clone(),
        NodeKind::Constant(v) => v.to_string(),
        NodeKind::Expression(_) => "<expression>".to_string(),
    }
}

/// Parses, pre-passes and evaluates `source`, returning the finished
/// `Model`. `time_index` is bound to the symbol `time-index` before
/// evaluation, as the single driver-controlled animation parameter.
pub fn evaluate(source: &str, filename: &str, time_index: f64) -> LResult<Model> {
    evaluate_with(source, filename, time_index, Registry::new(), None)
}

pub fn evaluate_with(
    source: &str,
    filename: &str,
    time_index: f64,
    ffi: Registry,
    lib_root: Option<PathBuf>,
) -> LResult<Model> {
    let ast = parser::parse(source, filename)?;
    prepass::run(&ast)?;

    let mut evaluator = Evaluator::new(time_index, ffi, lib_root);
    let NodeKind::Expression(forms) = &ast.kind else { unreachable!() };
    let root_scope = evaluator.scopes.root_scope;
    evaluator.eval_sequence(forms, root_scope)?;

    Ok(evaluator.model)
}
