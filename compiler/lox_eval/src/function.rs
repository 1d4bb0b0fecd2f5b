//! Callable runtime: user functions, natives, classes and instances.

use std::cell::RefCell;

use lox_ir::{FunctionId, Name};
use rustc_hash::FxHashMap;

use crate::environment::{LocalScope, Scope};
use crate::errors::EvalResult;
use crate::script::SharedScript;
use crate::value::{Heap, Value};

/// A user-defined function or method.
///
/// Carries the script it was declared in (the declaration is looked up there
/// on each call) and the scope it closes over.
pub struct UserFunction {
    name: Name,
    display_name: &'static str,
    decl: FunctionId,
    arity: usize,
    script: SharedScript,
    closure: LocalScope<Scope>,
    is_initializer: bool,
}

impl UserFunction {
    pub fn new(
        name: Name,
        display_name: &'static str,
        decl: FunctionId,
        script: SharedScript,
        closure: LocalScope<Scope>,
        is_initializer: bool,
    ) -> Self {
        let arity = script.program.arena.function(decl).arity();
        UserFunction {
            name,
            display_name,
            decl,
            arity,
            script,
            closure,
            is_initializer,
        }
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    #[inline]
    pub fn decl(&self) -> FunctionId {
        self.decl
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn script(&self) -> &SharedScript {
        &self.script
    }

    #[inline]
    pub fn closure(&self) -> &LocalScope<Scope> {
        &self.closure
    }

    #[inline]
    pub fn is_initializer(&self) -> bool {
        self.is_initializer
    }

    /// Copy of this method whose closure is a fresh scope over the original
    /// one, holding `this` and, for subclasses, `super`.
    pub fn bind(&self, this: (Name, Value), super_: Option<(Name, Value)>) -> UserFunction {
        let mut scope = Scope::with_parent(self.closure.clone());
        scope.define(this.0, this.1);
        if let Some((name, superclass)) = super_ {
            scope.define(name, superclass);
        }
        UserFunction {
            name: self.name,
            display_name: self.display_name,
            decl: self.decl,
            arity: self.arity,
            script: self.script.clone(),
            closure: LocalScope::new(scope),
            is_initializer: self.is_initializer,
        }
    }
}

/// Host function signature. Natives see only their arguments.
pub type NativeFn = fn(&[Value]) -> EvalResult;

/// A function implemented by the host.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        NativeFunction { name, arity, func }
    }

    #[inline]
    pub fn call(&self, args: &[Value]) -> EvalResult {
        (self.func)(args)
    }
}

/// A class: name, optional superclass and its own method table.
pub struct Class {
    name: Name,
    display_name: &'static str,
    superclass: Option<Heap<Class>>,
    methods: FxHashMap<Name, Heap<UserFunction>>,
}

impl Class {
    pub fn new(
        name: Name,
        display_name: &'static str,
        superclass: Option<Heap<Class>>,
        methods: FxHashMap<Name, Heap<UserFunction>>,
    ) -> Self {
        Class {
            name,
            display_name,
            superclass,
            methods,
        }
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    #[inline]
    pub fn superclass(&self) -> Option<&Heap<Class>> {
        self.superclass.as_ref()
    }

    /// Find a method along the superclass chain.
    ///
    /// Also returns the class that defines it, which is what `super` inside
    /// that method must be bound relative to.
    pub fn find_method(&self, name: Name) -> Option<(&Heap<UserFunction>, &Class)> {
        let mut class = self;
        loop {
            if let Some(method) = class.methods.get(&name) {
                return Some((method, class));
            }
            class = class.superclass.as_deref()?;
        }
    }

    /// Calling a class takes the initializer's arguments, or none.
    pub fn arity(&self, init: Name) -> usize {
        self.find_method(init)
            .map_or(0, |(method, _)| method.arity())
    }
}

/// An instance of a class with mutable fields.
pub struct Instance {
    class: Heap<Class>,
    fields: RefCell<FxHashMap<Name, Value>>,
}

impl Instance {
    pub fn new(class: Heap<Class>) -> Self {
        Instance {
            class,
            fields: RefCell::new(FxHashMap::default()),
        }
    }

    #[inline]
    pub fn class(&self) -> &Heap<Class> {
        &self.class
    }

    /// Own field value. Methods are not consulted.
    pub fn field(&self, name: Name) -> Option<Value> {
        self.fields.borrow().get(&name).cloned()
    }

    /// Create or overwrite a field.
    pub fn set_field(&self, name: Name, value: Value) {
        self.fields.borrow_mut().insert(name, value);
    }
}
