//! The resolver pass.

use lox_ir::{
    ExprArena, ExprId, ExprKind, FunctionDecl, Name, Program, Resolution, StmtId, StmtKind,
    StringInterner, Token,
};
use lox_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{ResolveError, ResolveErrorKind};

/// What kind of function body is being resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

/// What kind of class body is being resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Names the resolver binds implicitly.
#[derive(Copy, Clone)]
struct KnownNames {
    this: Name,
    super_: Name,
    init: Name,
}

/// Resolve a whole program.
///
/// Returns every static error found, in source order, if there are any.
#[tracing::instrument(level = "debug", skip_all, fields(statements = program.body().len()))]
pub fn resolve_program(
    program: &Program,
    interner: &StringInterner,
) -> Result<Resolution, Vec<ResolveError>> {
    let mut resolver = Resolver::new(&program.arena, interner);
    resolver.resolve_stmts(program.body());
    resolver.finish()
}

/// Walks the tree keeping a stack of block scopes.
///
/// Each scope maps a name to whether its initializer has finished
/// resolving. The global scope is not on the stack: anything not found
/// locally is left unresolved.
pub struct Resolver<'a> {
    arena: &'a ExprArena,
    names: KnownNames,
    scopes: Vec<FxHashMap<Name, bool>>,
    function: FunctionKind,
    class: ClassKind,
    /// Loops enclosing the current point within the current function body.
    loop_depth: usize,
    resolution: Resolution,
    errors: Vec<ResolveError>,
}

impl<'a> Resolver<'a> {
    pub fn new(arena: &'a ExprArena, interner: &StringInterner) -> Self {
        Resolver {
            arena,
            names: KnownNames {
                this: interner.intern("this"),
                super_: interner.intern("super"),
                init: interner.intern("init"),
            },
            scopes: Vec::new(),
            function: FunctionKind::None,
            class: ClassKind::None,
            loop_depth: 0,
            resolution: Resolution::new(),
            errors: Vec::new(),
        }
    }

    /// Consume the resolver, yielding the side table or the collected errors.
    pub fn finish(self) -> Result<Resolution, Vec<ResolveError>> {
        debug_assert!(self.scopes.is_empty(), "unbalanced resolver scopes");
        if self.errors.is_empty() {
            Ok(self.resolution)
        } else {
            tracing::debug!(errors = self.errors.len(), "resolution failed");
            Err(self.errors)
        }
    }

    pub fn resolve_stmts(&mut self, stmts: &[StmtId]) {
        for &stmt in stmts {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, id: StmtId) {
        ensure_sufficient_stack(|| self.resolve_stmt_inner(id));
    }

    fn resolve_stmt_inner(&mut self, id: StmtId) {
        let arena = self.arena;
        match arena.stmt(id).kind {
            StmtKind::Expression(expr) | StmtKind::Print(expr) => self.resolve_expr(expr),
            StmtKind::Var { name, initializer } => {
                self.declare(name);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            StmtKind::Block(range) => {
                self.begin_scope();
                self.resolve_stmts(arena.stmt_list(range));
                self.end_scope();
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            StmtKind::While {
                condition,
                body,
                increment,
            } => {
                self.resolve_expr(condition);
                self.loop_depth += 1;
                self.resolve_stmt(body);
                self.loop_depth -= 1;
                if let Some(increment) = increment {
                    self.resolve_expr(increment);
                }
            }
            StmtKind::Break(keyword) => {
                if self.loop_depth == 0 {
                    self.error(ResolveErrorKind::BreakOutsideLoop, keyword);
                }
            }
            StmtKind::Continue(keyword) => {
                if self.loop_depth == 0 {
                    self.error(ResolveErrorKind::ContinueOutsideLoop, keyword);
                }
            }
            StmtKind::Function(id) => {
                let decl = arena.function(id);
                // Defined before the body so the function can recurse
                self.declare(decl.name);
                self.define(decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            StmtKind::Class {
                name,
                superclass,
                methods,
            } => {
                let enclosing = std::mem::replace(&mut self.class, ClassKind::Class);
                self.declare(name);
                self.define(name);

                if let Some(superclass) = superclass {
                    if let ExprKind::Variable(super_name) = arena.expr(superclass).kind {
                        if super_name.lexeme == name.lexeme {
                            self.error(ResolveErrorKind::InheritFromSelf, super_name);
                        }
                    }
                    self.class = ClassKind::Subclass;
                    self.resolve_expr(superclass);
                }

                // One scope holds both `this` and `super`; bound methods
                // mirror it with a single environment.
                self.begin_scope();
                self.define_implicit(self.names.this);
                if superclass.is_some() {
                    self.define_implicit(self.names.super_);
                }
                for &method in arena.function_list(methods) {
                    let decl = arena.function(method);
                    let kind = if decl.name.lexeme == self.names.init {
                        FunctionKind::Initializer
                    } else {
                        FunctionKind::Method
                    };
                    self.resolve_function(decl, kind);
                }
                self.end_scope();

                self.class = enclosing;
            }
            StmtKind::Return { keyword, value } => {
                if self.function == FunctionKind::None {
                    self.error(ResolveErrorKind::ReturnAtTopLevel, keyword);
                }
                if let Some(value) = value {
                    if self.function == FunctionKind::Initializer {
                        self.error(ResolveErrorKind::ReturnValueFromInitializer, keyword);
                    }
                    self.resolve_expr(value);
                }
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = std::mem::replace(&mut self.function, kind);
        // A loop around a function declaration does not enclose its body
        let enclosing_loops = std::mem::replace(&mut self.loop_depth, 0);

        self.begin_scope();
        for &param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        let arena = self.arena;
        self.resolve_stmts(arena.stmt_list(decl.body));
        self.end_scope();

        self.loop_depth = enclosing_loops;
        self.function = enclosing_function;
    }

    fn resolve_expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| self.resolve_expr_inner(id));
    }

    fn resolve_expr_inner(&mut self, id: ExprId) {
        let arena = self.arena;
        match arena.expr(id).kind {
            ExprKind::Literal(_) => {}
            ExprKind::Grouping(inner) => self.resolve_expr(inner),
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.resolve_expr(condition);
                self.resolve_expr(then_expr);
                self.resolve_expr(else_expr);
            }
            ExprKind::Variable(name) => {
                let in_own_initializer = self
                    .scopes
                    .last()
                    .is_some_and(|scope| scope.get(&name.lexeme) == Some(&false));
                if in_own_initializer {
                    self.error(ResolveErrorKind::ReadInOwnInitializer, name);
                }
                self.resolve_local(id, name.lexeme);
            }
            ExprKind::Assign { name, value } => {
                self.resolve_expr(value);
                self.resolve_local(id, name.lexeme);
            }
            ExprKind::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for &arg in arena.expr_list(args) {
                    self.resolve_expr(arg);
                }
            }
            ExprKind::Get { object, .. } => self.resolve_expr(object),
            ExprKind::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            ExprKind::This(keyword) => {
                if self.class == ClassKind::None {
                    self.error(ResolveErrorKind::ThisOutsideClass, keyword);
                    return;
                }
                self.resolve_local(id, self.names.this);
            }
            ExprKind::Super { keyword, .. } => {
                match self.class {
                    ClassKind::None => {
                        self.error(ResolveErrorKind::SuperOutsideClass, keyword);
                        return;
                    }
                    ClassKind::Class => {
                        self.error(ResolveErrorKind::SuperWithoutSuperclass, keyword);
                        return;
                    }
                    ClassKind::Subclass => {}
                }
                self.resolve_local(id, self.names.super_);
            }
        }
    }

    /// Record the distance to the innermost scope declaring `name`.
    fn resolve_local(&mut self, id: ExprId, name: Name) {
        let found = self
            .scopes
            .iter()
            .rev()
            .position(|scope| scope.contains_key(&name));
        match found {
            Some(depth) => {
                trace!(?id, ?name, depth, "resolved local");
                self.resolution.record(id, depth);
            }
            None => trace!(?id, ?name, "left global"),
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Mark `name` as declared but not yet usable. Redeclaring in the same
    /// scope is allowed. No-op at global scope.
    fn declare(&mut self, name: Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme, false);
        }
    }

    fn define(&mut self, name: Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme, true);
        }
    }

    fn define_implicit(&mut self, name: Name) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, true);
        }
    }

    #[cold]
    fn error(&mut self, kind: ResolveErrorKind, token: Token) {
        trace!(?kind, line = token.line, "resolve error");
        self.errors.push(ResolveError::new(kind, token));
    }
}
