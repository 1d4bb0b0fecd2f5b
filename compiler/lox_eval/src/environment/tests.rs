use super::*;
use lox_ir::StringInterner;

#[test]
fn test_scope_define_lookup() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut scope = Scope::new();
    scope.define(x, Value::Number(42.0));
    assert_eq!(scope.lookup(x), Ok(Value::Number(42.0)));
    assert_eq!(scope.len(), 1);
}

#[test]
fn test_scope_shadowing_leaves_parent_untouched() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let parent = LocalScope::new(Scope::new());
    parent.borrow_mut().define(x, Value::Number(1.0));

    let mut child = Scope::with_parent(parent.clone());
    child.define(x, Value::Number(2.0));
    child.assign(x, Value::Number(3.0)).unwrap();

    assert_eq!(child.lookup(x), Ok(Value::Number(3.0)));
    assert_eq!(parent.borrow().lookup(x), Ok(Value::Number(1.0)));
}

#[test]
fn test_assign_walks_outward() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let parent = LocalScope::new(Scope::new());
    parent.borrow_mut().define(x, Value::Number(1.0));

    let mut child = Scope::with_parent(parent.clone());
    child.assign(x, Value::Number(5.0)).unwrap();

    assert!(child.is_empty());
    assert_eq!(parent.borrow().lookup(x), Ok(Value::Number(5.0)));
}

#[test]
fn test_undefined_and_uninitialized_are_distinct() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let y = interner.intern("y");

    let mut scope = Scope::new();
    scope.declare(x);

    assert_eq!(scope.lookup(x), Err(LookupError::Uninitialized));
    assert_eq!(scope.lookup(y), Err(LookupError::Undefined));
    assert_eq!(scope.assign(y, Value::Nil), Err(LookupError::Undefined));

    // Assignment initializes a declared binding
    scope.assign(x, Value::Bool(true)).unwrap();
    assert_eq!(scope.lookup(x), Ok(Value::Bool(true)));
}

#[test]
fn test_environment_push_pop() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define(x, Value::Number(1.0));

    env.push_scope();
    env.define(x, Value::Number(2.0));
    assert_eq!(env.lookup(x), Ok(Value::Number(2.0)));
    assert_eq!(env.depth(), 2);

    env.pop_scope();
    assert_eq!(env.lookup(x), Ok(Value::Number(1.0)));
    assert_eq!(env.depth(), 1);
}

#[test]
fn test_global_scope_is_never_popped() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define_global(x, Value::Nil);
    env.pop_scope();
    env.pop_scope();

    assert_eq!(env.depth(), 1);
    assert_eq!(env.lookup_global(x), Ok(Value::Nil));
}

#[test]
fn test_distance_addressing_skips_shadowing() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.push_scope();
    env.define(x, Value::Number(1.0));
    env.push_scope();
    env.define(x, Value::Number(2.0));

    assert_eq!(env.lookup_at(0, x), Ok(Value::Number(2.0)));
    assert_eq!(env.lookup_at(1, x), Ok(Value::Number(1.0)));

    env.assign_at(1, x, Value::Number(10.0)).unwrap();
    assert_eq!(env.lookup_at(0, x), Ok(Value::Number(2.0)));
    assert_eq!(env.lookup_at(1, x), Ok(Value::Number(10.0)));
}

#[test]
fn test_distance_addressing_does_not_search() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define(x, Value::Nil);
    env.push_scope();

    // x lives one scope out, not at distance 0
    assert_eq!(env.lookup_at(0, x), Err(LookupError::Undefined));
    assert_eq!(env.lookup_at(5, x), Err(LookupError::MissingScope));
    assert_eq!(
        env.assign_at(0, x, Value::Nil),
        Err(LookupError::Undefined)
    );
}

#[test]
fn test_push_scope_in_uses_given_parent() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let closure = LocalScope::new(Scope::new());
    closure.borrow_mut().define(x, Value::Number(7.0));

    let mut env = Environment::new();
    env.push_scope();
    env.push_scope_in(closure.clone());

    assert_eq!(env.lookup_at(1, x), Ok(Value::Number(7.0)));
    let current = env.current();
    let parent = current.borrow().parent().cloned();
    assert!(parent.is_some_and(|p| p.ptr_eq(&closure)));
}

#[test]
fn test_ancestor() {
    let root = LocalScope::new(Scope::new());
    let mid = LocalScope::new(Scope::with_parent(root.clone()));
    let leaf = LocalScope::new(Scope::with_parent(mid.clone()));

    assert!(leaf.ancestor(0).is_some_and(|s| s.ptr_eq(&leaf)));
    assert!(leaf.ancestor(2).is_some_and(|s| s.ptr_eq(&root)));
    assert!(leaf.ancestor(3).is_none());
}
