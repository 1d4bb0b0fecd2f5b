//! Environments: lexical scopes and the interpreter's scope stack.
//!
//! A `Scope` maps names to values and links to its enclosing scope. Scopes
//! are shared through `LocalScope` handles: a closure keeps its defining scope
//! alive for as long as the closure itself is reachable.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use lox_ir::Name;

use crate::value::Value;

/// Why a lookup or assignment failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// Name not bound in any scope searched.
    Undefined,
    /// Name declared without an initializer and never assigned.
    Uninitialized,
    /// Fewer enclosing scopes than the requested distance.
    MissingScope,
}

/// A single-threaded shared handle with interior mutability.
///
/// Wraps `Rc<RefCell<T>>` so every scope allocation goes through
/// `LocalScope::new()`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Whether both handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalScope({:p})", Rc::as_ptr(&self.0))
    }
}

impl LocalScope<Scope> {
    /// The scope exactly `distance` links out (0 is this scope).
    pub fn ancestor(&self, distance: usize) -> Option<LocalScope<Scope>> {
        let mut scope = self.clone();
        for _ in 0..distance {
            let parent = scope.borrow().parent.clone()?;
            scope = parent;
        }
        Some(scope)
    }
}

/// One lexical scope.
///
/// A binding holding `None` was declared without an initializer.
pub struct Scope {
    bindings: FxHashMap<Name, Option<Value>>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    /// Create a new scope nested in `parent`.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<&LocalScope<Scope>> {
        self.parent.as_ref()
    }

    /// Bind `name` in this scope, replacing any earlier binding.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, Some(value));
    }

    /// Bind `name` in this scope without a value.
    #[inline]
    pub fn declare(&mut self, name: Name) {
        self.bindings.insert(name, None);
    }

    /// Value bound in this scope only; `None` if absent or unset.
    pub fn get_own(&self, name: Name) -> Option<Value> {
        self.bindings.get(&name).cloned().flatten()
    }

    /// Look `name` up in this scope only.
    fn get_here(&self, name: Name) -> Option<Result<Value, LookupError>> {
        self.bindings
            .get(&name)
            .map(|slot| slot.clone().ok_or(LookupError::Uninitialized))
    }

    /// Look `name` up here, then outward.
    pub fn lookup(&self, name: Name) -> Result<Value, LookupError> {
        if let Some(found) = self.get_here(name) {
            return found;
        }
        match &self.parent {
            Some(parent) => parent.borrow().lookup(name),
            None => Err(LookupError::Undefined),
        }
    }

    /// Assign to the innermost scope binding `name`.
    ///
    /// Assigning to a declared but unset binding initializes it.
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), LookupError> {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = Some(value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(LookupError::Undefined),
        }
    }

    /// Number of bindings in this scope.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// The interpreter's scope stack.
///
/// The top of the stack is the current scope. Blocks push a child of the
/// current scope; calls push a child of the callee's closure, which need not
/// be the current scope. The global scope is always at the bottom.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    /// Create a new environment with an empty global scope.
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Number of scopes on the stack, globals included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn global(&self) -> &LocalScope<Scope> {
        &self.global
    }

    /// Handle to the current scope.
    #[inline]
    pub fn current(&self) -> LocalScope<Scope> {
        self.current_ref().clone()
    }

    #[inline]
    fn current_ref(&self) -> &LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global)
    }

    /// Push a child of the current scope.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current();
        self.push_scope_in(parent);
    }

    /// Push a child of `parent`.
    #[inline]
    pub fn push_scope_in(&mut self, parent: LocalScope<Scope>) {
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the current scope. The global scope is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Define a variable in the current scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.current_ref().borrow_mut().define(name, value);
    }

    /// Declare an unset variable in the current scope.
    #[inline]
    pub fn declare(&mut self, name: Name) {
        self.current_ref().borrow_mut().declare(name);
    }

    /// Define a variable in the global scope.
    pub fn define_global(&mut self, name: Name, value: Value) {
        self.global.borrow_mut().define(name, value);
    }

    /// Look up a global.
    #[inline]
    pub fn lookup_global(&self, name: Name) -> Result<Value, LookupError> {
        self.global.borrow().lookup(name)
    }

    /// Assign to an existing global.
    #[inline]
    pub fn assign_global(&mut self, name: Name, value: Value) -> Result<(), LookupError> {
        self.global.borrow_mut().assign(name, value)
    }

    /// Look up `name` by searching outward from the current scope.
    pub fn lookup(&self, name: Name) -> Result<Value, LookupError> {
        self.current_ref().borrow().lookup(name)
    }

    /// Read `name` from the scope exactly `distance` links out, without
    /// searching further.
    pub fn lookup_at(&self, distance: usize, name: Name) -> Result<Value, LookupError> {
        let scope = self
            .current_ref()
            .ancestor(distance)
            .ok_or(LookupError::MissingScope)?;
        let found = scope.borrow().get_here(name);
        found.unwrap_or(Err(LookupError::Undefined))
    }

    /// Assign `name` in the scope exactly `distance` links out.
    pub fn assign_at(
        &mut self,
        distance: usize,
        name: Name,
        value: Value,
    ) -> Result<(), LookupError> {
        let target = self
            .current_ref()
            .ancestor(distance)
            .ok_or(LookupError::MissingScope)?;
        let mut scope = target.borrow_mut();
        match scope.bindings.get_mut(&name) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(LookupError::Undefined),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
