//! Runtime error types.
//!
//! `EvalErrorKind` gives each failure a typed category; the factory functions
//! below are the public way to build an error, and fill in both `kind` and
//! `message`. The offending token is attached by the evaluator at the node
//! that failed, unless a deeper node already attached one.

use crate::value::Value;
use lox_ir::{SourcePosition, Token};
use std::fmt;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
///
/// The `Display` impl produces the user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,

    // Operators
    OperandMustBeNumber,
    OperandsMustBeNumbers,
    OperandsNotStringConvertible,
    OperandsMustBeNumbersOrStrings,

    // Access
    UndefinedVariable { name: String },
    UninitializedVariable { name: String },
    UndefinedProperty { name: String },
    OnlyInstancesHaveProperties,
    OnlyInstancesHaveFields,

    // Classes
    SuperclassMustBeClass,

    // Calls
    NotCallable,
    ArityMismatch { expected: usize, got: usize },
    StackOverflow { depth: usize },

    /// Resolver and evaluator disagree, or a control signal escaped its
    /// boundary. Never caused by user code alone.
    Internal { detail: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "Attempt to divide by 0."),

            Self::OperandMustBeNumber => write!(f, "Operand must be a number."),
            Self::OperandsMustBeNumbers => write!(f, "Operands must be numbers."),
            Self::OperandsNotStringConvertible => {
                write!(f, "Operands must be string-convertible.")
            }
            Self::OperandsMustBeNumbersOrStrings => {
                write!(f, "Operands must be two numbers or two strings.")
            }

            Self::UndefinedVariable { name } => write!(f, "Undefined variable '{name}'."),
            Self::UninitializedVariable { name } => write!(f, "Uninitialized variable '{name}'."),
            Self::UndefinedProperty { name } => write!(f, "Undefined property '{name}'."),
            Self::OnlyInstancesHaveProperties => write!(f, "Only instances have properties."),
            Self::OnlyInstancesHaveFields => write!(f, "Only instances have fields."),

            Self::SuperclassMustBeClass => write!(f, "Superclass must be a class."),

            Self::NotCallable => write!(f, "Can only call functions and classes."),
            Self::ArityMismatch { expected, got } => {
                write!(f, "Expected {expected} arguments but got {got}.")
            }
            Self::StackOverflow { depth } => {
                write!(f, "Stack overflow: maximum call depth {depth} exceeded.")
            }

            Self::Internal { detail } => write!(f, "Internal error: {detail}"),
        }
    }
}

/// A runtime error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured category.
    pub kind: EvalErrorKind,
    /// User-facing message, derived from `kind`.
    pub message: String,
    /// Token of the node that failed, for its source position.
    pub token: Option<Token>,
}

impl EvalError {
    /// Create an error from a structured kind.
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            token: None,
        }
    }

    /// Attach the failing token, replacing any previous one.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Attach the failing token unless a deeper node already did.
    #[must_use]
    pub fn with_token_if_absent(mut self, token: Token) -> Self {
        if self.token.is_none() {
            self.token = Some(token);
        }
        self
    }

    /// Source position of the failure, if known.
    pub fn position(&self) -> Option<SourcePosition> {
        self.token.map(|token| token.position())
    }

    /// Line of the failure, if known.
    pub fn line(&self) -> Option<u32> {
        self.token.map(|token| token.line)
    }

    /// Whether this error points at an evaluator bug rather than user code.
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, EvalErrorKind::Internal { .. })
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Operator errors

/// Division or modulo by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Unary minus on a non-number.
#[cold]
pub fn operand_must_be_number() -> EvalError {
    EvalError::from_kind(EvalErrorKind::OperandMustBeNumber)
}

/// Arithmetic on non-numbers.
#[cold]
pub fn operands_must_be_numbers() -> EvalError {
    EvalError::from_kind(EvalErrorKind::OperandsMustBeNumbers)
}

/// Concatenating text with a callable or instance.
#[cold]
pub fn operands_not_string_convertible() -> EvalError {
    EvalError::from_kind(EvalErrorKind::OperandsNotStringConvertible)
}

/// `+` or an ordering comparison on mismatched operands.
#[cold]
pub fn operands_must_be_numbers_or_strings() -> EvalError {
    EvalError::from_kind(EvalErrorKind::OperandsMustBeNumbersOrStrings)
}

// Variable and property errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// Read of a variable declared without an initializer and never assigned.
#[cold]
pub fn uninitialized_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UninitializedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_property(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedProperty {
        name: name.to_string(),
    })
}

#[cold]
pub fn only_instances_have_properties() -> EvalError {
    EvalError::from_kind(EvalErrorKind::OnlyInstancesHaveProperties)
}

#[cold]
pub fn only_instances_have_fields() -> EvalError {
    EvalError::from_kind(EvalErrorKind::OnlyInstancesHaveFields)
}

#[cold]
pub fn superclass_must_be_class() -> EvalError {
    EvalError::from_kind(EvalErrorKind::SuperclassMustBeClass)
}

// Call errors

#[cold]
pub fn not_callable() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable)
}

#[cold]
pub fn arity_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch { expected, got })
}

/// Maximum call depth exceeded.
#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

/// Evaluator invariant failure.
#[cold]
pub fn internal_error(detail: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Internal {
        detail: detail.into(),
    })
}
