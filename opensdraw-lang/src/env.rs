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

//! The lexical environment: a tree of scopes, stored as an arena so
//! closures can capture a cheap integer handle instead of a graph of
//! `Rc<RefCell<_>>` scopes.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ErrorKind, LResult, LcadError};
use crate::value::{Cell, CellRef, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

struct ScopeNode {
    parent: Option<ScopeId>,
    bindings: HashMap<String, CellRef>,
}

/// Owns every scope created during one evaluation. The built-in scope
/// (index 0) and the user root scope (index 1) always exist.
pub struct ScopeArena {
    scopes: Vec<ScopeNode>,
    pub builtin_scope: ScopeId,
    pub root_scope: ScopeId,
}

impl ScopeArena {
    pub fn new() -> Self {
        let mut arena = ScopeArena { scopes: Vec::new(), builtin_scope: ScopeId(0), root_scope: ScopeId(0) };
        let builtin = arena.push_scope(None);
        let root = arena.push_scope(Some(builtin));
        arena.builtin_scope = builtin;
        arena.root_scope = root;
        arena
    }

    pub fn push_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeNode { parent, bindings: HashMap::new() });
        id
    }

    fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.scopes[id.0]
    }

    fn node_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.scopes[id.0]
    }

    pub fn parent_of(&self, id: ScopeId) -> Option<ScopeId> {
        self.node(id).parent
    }

    /// Looks for an existing binding in `id` only (not ancestors).
    pub fn local(&self, id: ScopeId, name: &str) -> Option<CellRef> {
        self.node(id).bindings.get(name).cloned()
    }

    /// All names bound directly in `id`, used by `import` to re-export a
    /// module's top-level definitions.
    pub fn local_names(&self, id: ScopeId) -> Vec<String> {
        self.node(id).bindings.keys().cloned().collect()
    }

    /// Resolves a name by walking up through ancestor scopes.
    pub fn resolve(&self, id: ScopeId, name: &str) -> Option<CellRef> {
        let mut cur = Some(id);
        while let Some(scope) = cur {
            if let Some(cell) = self.node(scope).bindings.get(name) {
                return Some(cell.clone());
            }
            cur = self.node(scope).parent;
        }
        None
    }

    /// Installs a new binding cell for `name` directly in scope `id`.
    /// Fails if `name` already names a built-in (built-ins may never be
    /// shadowed-by-redefinition at the root).
    ///
    /// `is_import` distinguishes a direct `def` from an `import`
    /// re-export: a direct `def` errors on any existing same-scope
    /// binding that already has a value (a hoisted function placeholder
    /// is exempt, since it has no value yet), while an import only
    /// errors when the existing binding came from a *different* origin
    /// file (distinct `:local` imports of the same file are allowed to
    /// collide; that is a no-op).
    pub fn define(&mut self, id: ScopeId, name: &str, value: Value, origin_file: Rc<str>, is_import: bool) -> LResult<CellRef> {
        if id != self.builtin_scope && self.local(self.builtin_scope, name).is_some() {
            return Err(LcadError::new(ErrorKind::CannotOverrideBuiltin(name.to_string())));
        }
        if let Some(existing) = self.local(id, name) {
            let collides = if is_import {
                existing.borrow().origin_file.as_ref() != origin_file.as_ref()
            } else {
                existing.borrow().is_set
            };
            if collides {
                return Err(LcadError::new(ErrorKind::SymbolAlreadyExists(name.to_string())));
            }
            existing.borrow_mut().value = value;
            existing.borrow_mut().is_set = true;
            return Ok(existing);
        }
        if self.scope_has_ancestor_shadow(id, name) {
            log::warn!("definition of `{name}` shadows a binding in an enclosing scope");
        }
        let cell = Rc::new(std::cell::RefCell::new(Cell::new(name, value, origin_file)));
        self.node_mut(id).bindings.insert(name.to_string(), cell.clone());
        Ok(cell)
    }

    /// Reserves an unset cell for `name`, for callers that need to claim a
    /// binding slot before they have a value to put in it.
    pub fn define_unset(&mut self, id: ScopeId, name: &str, origin_file: Rc<str>) -> LResult<CellRef> {
        if self.local(self.builtin_scope, name).is_some() {
            return Err(LcadError::new(ErrorKind::CannotOverrideBuiltin(name.to_string())));
        }
        if let Some(existing) = self.local(id, name) {
            return Ok(existing);
        }
        let cell = Rc::new(std::cell::RefCell::new(Cell::unset(name, origin_file)));
        self.node_mut(id).bindings.insert(name.to_string(), cell.clone());
        Ok(cell)
    }

    fn scope_has_ancestor_shadow(&self, id: ScopeId, name: &str) -> bool {
        let mut cur = self.parent_of(id);
        while let Some(scope) = cur {
            if self.node(scope).bindings.contains_key(name) {
                return true;
            }
            cur = self.parent_of(scope);
        }
        false
    }

    /// `set`: mutate an existing cell. Errors if undefined or built-in.
    pub fn set(&mut self, id: ScopeId, name: &str, value: Value) -> LResult<Value> {
        if self.local(self.builtin_scope, name).is_some() {
            return Err(LcadError::new(ErrorKind::CannotOverrideBuiltin(name.to_string())));
        }
        match self.resolve(id, name) {
            Some(cell) => {
                cell.borrow_mut().value = value.clone();
                cell.borrow_mut().is_set = true;
                Ok(value)
            }
            None => Err(LcadError::new(ErrorKind::SymbolNotDefined(name.to_string()))),
        }
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_def_in_same_scope_errors() {
        let mut arena = ScopeArena::new();
        let scope = arena.root_scope;
        let file: Rc<str> = Rc::from("a.lcad");
        arena.define(scope, "x", Value::Number(1.0), file.clone(), false).unwrap();
        let err = arena.define(scope, "x", Value::Number(2.0), file, false).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SymbolAlreadyExists(_)));
    }

    #[test]
    fn import_of_same_file_may_redefine_without_erroring() {
        let mut arena = ScopeArena::new();
        let scope = arena.root_scope;
        let file: Rc<str> = Rc::from("lib.lcad");
        arena.define(scope, "x", Value::Number(1.0), file.clone(), true).unwrap();
        let cell = arena.define(scope, "x", Value::Number(2.0), file, true).unwrap();
        assert_eq!(cell.borrow().value.as_number(), Some(2.0));
    }

    #[test]
    fn import_of_a_different_file_errors() {
        let mut arena = ScopeArena::new();
        let scope = arena.root_scope;
        arena.define(scope, "x", Value::Number(1.0), Rc::from("a.lcad"), true).unwrap();
        let err = arena.define(scope, "x", Value::Number(2.0), Rc::from("b.lcad"), true).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SymbolAlreadyExists(_)));
    }

    #[test]
    fn unset_placeholder_may_be_filled_in_without_erroring() {
        let mut arena = ScopeArena::new();
        let scope = arena.root_scope;
        let file: Rc<str> = Rc::from("a.lcad");
        arena.define_unset(scope, "f", file.clone()).unwrap();
        let cell = arena.define(scope, "f", Value::Number(9.0), file, false).unwrap();
        assert_eq!(cell.borrow().value.as_number(), Some(9.0));
    }
}
