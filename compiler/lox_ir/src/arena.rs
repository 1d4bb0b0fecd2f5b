//! Arena storage for the flat syntax tree.

use crate::{
    Expr, ExprId, ExprRange, FunctionDecl, FunctionId, FunctionRange, Stmt, StmtId, StmtRange,
};

/// Converts an arena length to a `u32` index.
///
/// # Panics
/// Panics if the arena grows past `u32::MAX` entries.
#[inline]
fn to_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("syntax arena exceeded {} entries", u32::MAX))
}

/// Contiguous storage for every node of a program.
///
/// Child lists (call arguments, block bodies, class methods) are flattened
/// into side vectors and referenced by range.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    functions: Vec<FunctionDecl>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    function_lists: Vec<FunctionId>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_index(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_index(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_function(&mut self, decl: FunctionDecl) -> FunctionId {
        let id = FunctionId::new(to_index(self.functions.len()));
        self.functions.push(decl);
        id
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_index(self.expr_lists.len());
        self.expr_lists.extend(ids);
        ExprRange::new(start, to_index(self.expr_lists.len()) - start)
    }

    pub fn alloc_stmt_list(&mut self, ids: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = to_index(self.stmt_lists.len());
        self.stmt_lists.extend(ids);
        StmtRange::new(start, to_index(self.stmt_lists.len()) - start)
    }

    pub fn alloc_function_list(
        &mut self,
        ids: impl IntoIterator<Item = FunctionId>,
    ) -> FunctionRange {
        let start = to_index(self.function_lists.len());
        self.function_lists.extend(ids);
        FunctionRange::new(start, to_index(self.function_lists.len()) - start)
    }

    /// Get an expression by id.
    ///
    /// # Panics
    /// Panics if the id was not allocated by this arena.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get a statement by id.
    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Get a function declaration by id.
    #[inline]
    pub fn function(&self, id: FunctionId) -> &FunctionDecl {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.bounds()]
    }

    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.bounds()]
    }

    #[inline]
    pub fn function_list(&self, range: FunctionRange) -> &[FunctionId] {
        &self.function_lists[range.bounds()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

/// A parsed program: the arena plus its top-level statements.
#[derive(Clone, Default, Debug)]
pub struct Program {
    pub arena: ExprArena,
    pub body: StmtRange,
}

impl Program {
    pub fn new(arena: ExprArena, body: StmtRange) -> Self {
        Program { arena, body }
    }

    /// Top-level statements in source order.
    #[inline]
    pub fn body(&self) -> &[StmtId] {
        self.arena.stmt_list(self.body)
    }
}
