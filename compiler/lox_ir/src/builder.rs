//! Programmatic construction of syntax trees.
//!
//! `AstBuilder` is what a front end (or a test) uses to hand the runtime a
//! well-formed program without going through source text. Methods take
//! `&self`, so calls nest the way the tree does:
//!
//! ```
//! use lox_ir::{AstBuilder, BinaryOp, StringInterner};
//!
//! let interner = StringInterner::new();
//! let b = AstBuilder::new(&interner);
//! let sum = b.binary(b.number(1.0), BinaryOp::Add, b.number(2.0));
//! let stmt = b.print(sum);
//! let program = b.finish([stmt]);
//! assert_eq!(program.body().len(), 1);
//! ```
//!
//! # Method Organization
//!
//! | Category | Methods |
//! |----------|---------|
//! | Position | `at_line`, `token`, `ident` |
//! | Literals | `nil`, `bool`, `number`, `string` |
//! | Operators | `grouping`, `unary`, `binary`, `and`, `or`, `ternary` |
//! | Variables | `var`, `assign`, `this`, `super_` |
//! | Calls & properties | `call`, `get`, `set` |
//! | Statements | `expr_stmt`, `print`, `var_decl`, `block`, `if_`, `while_`, `for_loop`, `break_`, `continue_`, `return_` |
//! | Declarations | `function`, `method`, `class` |

use std::cell::{Cell, RefCell};

use crate::{
    BinaryOp, Expr, ExprArena, ExprId, ExprKind, FunctionDecl, FunctionId, Literal, LogicalOp,
    Program, Span, Stmt, StmtId, StmtKind, StringInterner, Token, TokenKind, UnaryOp,
};

/// Builds a [`Program`] node by node.
///
/// Child lists are collected before the arena is touched, so iterators passed
/// in may themselves call back into the builder.
///
/// Every synthesized token gets the current line (see [`AstBuilder::at_line`])
/// and a fresh byte span, so diagnostics point somewhere distinct.
pub struct AstBuilder<'i> {
    arena: RefCell<ExprArena>,
    interner: &'i StringInterner,
    line: Cell<u32>,
    offset: Cell<u32>,
}

impl<'i> AstBuilder<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        AstBuilder {
            arena: RefCell::new(ExprArena::new()),
            interner,
            line: Cell::new(1),
            offset: Cell::new(0),
        }
    }

    /// Set the line number for subsequently created tokens.
    pub fn at_line(&self, line: u32) -> &Self {
        self.line.set(line);
        self
    }

    /// Current line number.
    pub fn line(&self) -> u32 {
        self.line.get()
    }

    /// Synthesize a token with the given kind and lexeme.
    pub fn token(&self, kind: TokenKind, lexeme: &str) -> Token {
        let start = self.offset.get();
        let len = u32::try_from(lexeme.len()).unwrap_or(u32::MAX);
        let end = start.saturating_add(len);
        self.offset.set(end.saturating_add(1));
        Token::new(
            kind,
            self.interner.intern(lexeme),
            self.line.get(),
            Span::new(start, end),
        )
    }

    /// Identifier token.
    pub fn ident(&self, name: &str) -> Token {
        self.token(TokenKind::Identifier, name)
    }

    fn keyword(&self, kind: TokenKind) -> Token {
        self.token(kind, kind.as_str().unwrap_or(""))
    }

    fn expr(&self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.borrow_mut().alloc_expr(Expr::new(kind, span))
    }

    fn stmt(&self, kind: StmtKind, span: Span) -> StmtId {
        self.arena.borrow_mut().alloc_stmt(Stmt::new(kind, span))
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.arena.borrow().expr(id).span
    }

    fn fresh_span(&self) -> Span {
        let at = self.offset.get();
        Span::new(at, at)
    }

    fn literal(&self, lit: Literal, kind: TokenKind, lexeme: &str) -> ExprId {
        let span = self.token(kind, lexeme).span;
        self.expr(ExprKind::Literal(lit), span)
    }

    // Literals

    pub fn nil(&self) -> ExprId {
        self.literal(Literal::Nil, TokenKind::Nil, "nil")
    }

    pub fn bool(&self, value: bool) -> ExprId {
        let kind = if value { TokenKind::True } else { TokenKind::False };
        self.literal(Literal::Bool(value), kind, kind.as_str().unwrap_or(""))
    }

    pub fn number(&self, value: f64) -> ExprId {
        self.literal(Literal::Number(value), TokenKind::Number, &value.to_string())
    }

    pub fn string(&self, value: &str) -> ExprId {
        let token = self.token(TokenKind::String, value);
        self.expr(ExprKind::Literal(Literal::Str(token.lexeme)), token.span)
    }

    // Operators

    pub fn grouping(&self, inner: ExprId) -> ExprId {
        self.expr(ExprKind::Grouping(inner), self.span_of(inner))
    }

    pub fn unary(&self, op: UnaryOp, operand: ExprId) -> ExprId {
        let operator = self.keyword(op.token_kind());
        let span = operator.span.merge(self.span_of(operand));
        self.expr(
            ExprKind::Unary {
                op,
                operator,
                operand,
            },
            span,
        )
    }

    pub fn binary(&self, left: ExprId, op: BinaryOp, right: ExprId) -> ExprId {
        let operator = self.keyword(op.token_kind());
        let span = self.span_of(left).merge(self.span_of(right));
        self.expr(
            ExprKind::Binary {
                op,
                operator,
                left,
                right,
            },
            span,
        )
    }

    fn logical(&self, left: ExprId, op: LogicalOp, right: ExprId) -> ExprId {
        let span = self.span_of(left).merge(self.span_of(right));
        self.expr(ExprKind::Logical { op, left, right }, span)
    }

    pub fn and(&self, left: ExprId, right: ExprId) -> ExprId {
        self.logical(left, LogicalOp::And, right)
    }

    pub fn or(&self, left: ExprId, right: ExprId) -> ExprId {
        self.logical(left, LogicalOp::Or, right)
    }

    pub fn ternary(&self, condition: ExprId, then_expr: ExprId, else_expr: ExprId) -> ExprId {
        let span = self.span_of(condition).merge(self.span_of(else_expr));
        self.expr(
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            },
            span,
        )
    }

    // Variables

    /// Variable reference.
    pub fn var(&self, name: &str) -> ExprId {
        let token = self.ident(name);
        self.expr(ExprKind::Variable(token), token.span)
    }

    pub fn assign(&self, name: &str, value: ExprId) -> ExprId {
        let token = self.ident(name);
        let span = token.span.merge(self.span_of(value));
        self.expr(ExprKind::Assign { name: token, value }, span)
    }

    pub fn this(&self) -> ExprId {
        let token = self.keyword(TokenKind::This);
        self.expr(ExprKind::This(token), token.span)
    }

    /// `super.method`
    pub fn super_(&self, method: &str) -> ExprId {
        let keyword = self.keyword(TokenKind::Super);
        let method = self.ident(method);
        self.expr(
            ExprKind::Super { keyword, method },
            keyword.span.merge(method.span),
        )
    }

    // Calls & properties

    pub fn call(&self, callee: ExprId, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        let args: Vec<ExprId> = args.into_iter().collect();
        let args = self.arena.borrow_mut().alloc_expr_list(args);
        let paren = self.keyword(TokenKind::RightParen);
        let span = self.span_of(callee).merge(paren.span);
        self.expr(
            ExprKind::Call {
                callee,
                paren,
                args,
            },
            span,
        )
    }

    /// `object.name`
    pub fn get(&self, object: ExprId, name: &str) -> ExprId {
        let name = self.ident(name);
        let span = self.span_of(object).merge(name.span);
        self.expr(ExprKind::Get { object, name }, span)
    }

    /// `object.name = value`
    pub fn set(&self, object: ExprId, name: &str, value: ExprId) -> ExprId {
        let name = self.ident(name);
        let span = self.span_of(object).merge(self.span_of(value));
        self.expr(ExprKind::Set { object, name, value }, span)
    }

    // Statements

    pub fn expr_stmt(&self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expression(expr), self.span_of(expr))
    }

    pub fn print(&self, expr: ExprId) -> StmtId {
        let keyword = self.keyword(TokenKind::Print);
        self.stmt(StmtKind::Print(expr), keyword.span.merge(self.span_of(expr)))
    }

    pub fn var_decl(&self, name: &str, initializer: Option<ExprId>) -> StmtId {
        let name = self.ident(name);
        let span = match initializer {
            Some(init) => name.span.merge(self.span_of(init)),
            None => name.span,
        };
        self.stmt(StmtKind::Var { name, initializer }, span)
    }

    pub fn block(&self, stmts: impl IntoIterator<Item = StmtId>) -> StmtId {
        let stmts: Vec<StmtId> = stmts.into_iter().collect();
        let range = self.arena.borrow_mut().alloc_stmt_list(stmts);
        self.stmt(StmtKind::Block(range), self.fresh_span())
    }

    pub fn if_(&self, condition: ExprId, then_branch: StmtId, else_branch: Option<StmtId>) -> StmtId {
        self.stmt(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            self.span_of(condition),
        )
    }

    pub fn while_(&self, condition: ExprId, body: StmtId) -> StmtId {
        self.while_with_increment(condition, body, None)
    }

    pub fn while_with_increment(
        &self,
        condition: ExprId,
        body: StmtId,
        increment: Option<ExprId>,
    ) -> StmtId {
        self.stmt(
            StmtKind::While {
                condition,
                body,
                increment,
            },
            self.span_of(condition),
        )
    }

    /// `for (init; condition; increment) body`, desugared to
    /// `{ init; while (condition) [increment] body }`.
    ///
    /// A missing condition loops forever; the increment stays on the loop so
    /// `continue` still runs it.
    pub fn for_loop(
        &self,
        initializer: Option<StmtId>,
        condition: Option<ExprId>,
        increment: Option<ExprId>,
        body: StmtId,
    ) -> StmtId {
        let condition = match condition {
            Some(cond) => cond,
            None => self.bool(true),
        };
        let looped = self.while_with_increment(condition, body, increment);
        match initializer {
            Some(init) => self.block([init, looped]),
            None => looped,
        }
    }

    pub fn break_(&self) -> StmtId {
        let keyword = self.keyword(TokenKind::Break);
        self.stmt(StmtKind::Break(keyword), keyword.span)
    }

    pub fn continue_(&self) -> StmtId {
        let keyword = self.keyword(TokenKind::Continue);
        self.stmt(StmtKind::Continue(keyword), keyword.span)
    }

    pub fn return_(&self, value: Option<ExprId>) -> StmtId {
        let keyword = self.keyword(TokenKind::Return);
        let span = match value {
            Some(v) => keyword.span.merge(self.span_of(v)),
            None => keyword.span,
        };
        self.stmt(StmtKind::Return { keyword, value }, span)
    }

    // Declarations

    /// Method declaration, for use in [`AstBuilder::class`].
    pub fn method(
        &self,
        name: &str,
        params: &[&str],
        body: impl IntoIterator<Item = StmtId>,
    ) -> FunctionId {
        let name = self.ident(name);
        let params = params.iter().map(|p| self.ident(p)).collect();
        let body: Vec<StmtId> = body.into_iter().collect();
        let body = self.arena.borrow_mut().alloc_stmt_list(body);
        let span = name.span.merge(self.fresh_span());
        self.arena.borrow_mut().alloc_function(FunctionDecl {
            name,
            params,
            body,
            span,
        })
    }

    /// `fun name(params) { body }`
    pub fn function(
        &self,
        name: &str,
        params: &[&str],
        body: impl IntoIterator<Item = StmtId>,
    ) -> StmtId {
        let id = self.method(name, params, body);
        let span = self.arena.borrow().function(id).span;
        self.stmt(StmtKind::Function(id), span)
    }

    /// `class name [< superclass] { methods }`
    pub fn class(
        &self,
        name: &str,
        superclass: Option<&str>,
        methods: impl IntoIterator<Item = FunctionId>,
    ) -> StmtId {
        let name = self.ident(name);
        let superclass = superclass.map(|s| self.var(s));
        let methods: Vec<FunctionId> = methods.into_iter().collect();
        let methods = self.arena.borrow_mut().alloc_function_list(methods);
        let span = name.span.merge(self.fresh_span());
        self.stmt(
            StmtKind::Class {
                name,
                superclass,
                methods,
            },
            span,
        )
    }

    /// Close the program with its top-level statements.
    pub fn finish(self, body: impl IntoIterator<Item = StmtId>) -> Program {
        let mut arena = self.arena.into_inner();
        let body = arena.alloc_stmt_list(body);
        Program::new(arena, body)
    }
}
