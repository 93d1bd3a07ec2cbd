use quill_utils::{diag::CompileError, span::Span};
use thiserror::Error;

/// Why checking or evaluating a node produced no result.
#[derive(Debug)]
pub enum Fault {
    /// the type is unknowable while a recursive definition is being checked
    Void,
    /// `None` means the error was already reported
    Error(Option<Box<CompileError>>),
}

impl Fault {
    pub fn is_void(&self) -> bool {
        matches!(self, Fault::Void)
    }
    pub fn error(&self) -> Option<&CompileError> {
        match self {
            | Fault::Error(Some(err)) => Some(err.as_ref()),
            | _ => None,
        }
    }
}

impl From<CompileError> for Fault {
    fn from(err: CompileError) -> Self {
        Fault::Error(Some(Box::new(err)))
    }
}

impl From<TyckError> for Fault {
    fn from(err: TyckError) -> Self {
        CompileError::from(err).into()
    }
}

pub type Result<T> = std::result::Result<T, Fault>;

/// Diagnostics of the checker and the evaluator. Nodes are carried pre-rendered.
#[derive(Error, Debug, Clone)]
pub enum TyckError {
    #[error("alias `{name}` does not exist")]
    AliasNotFound { name: String, site: Span },
    #[error("`{name}` is already defined")]
    AlreadyDefined { name: String, site: Span, prev: Span },
    #[error("cannot bind a value to `{target}`")]
    InvalidBindingTarget { target: String, site: Span },
    #[error("cannot call type `{ty}`")]
    NotCallable { ty: String, site: Span },
    #[error("argument type mismatch: expected `{expected}`, found `{found}`")]
    ArgumentMismatch { expected: String, found: String, call: Span, arg: Span, def: Span },
    #[error("operator `{op}` expects `Number`, found `{found}`")]
    OperandNotNumber { op: String, found: String, operand: Span },
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String, site: Span },
    #[error("branches have different types: `{lhs}` and `{rhs}`")]
    BranchMismatch { lhs: String, rhs: String, lhs_site: Span, rhs_site: Span },
    #[error("condition must be `Bool`, found `{found}`")]
    ConditionNotBool { found: String, site: Span },
    #[error("cannot infer a type: every branch is still being checked recursively")]
    CannotInfer { site: Span },
    #[error("an empty sequence has no value")]
    EmptySequence { site: Span },
    #[error("`{found}` is not a type")]
    NotAType { found: String, site: Span },
    #[error("cannot construct an instance of `{ty}`")]
    NotInstantiable { ty: String, site: Span },
    #[error("no field `{field}` on `{ty}`")]
    NoSuchField { field: String, ty: String, site: Span },
    #[error("missing field `{field}` of `{ty}`")]
    MissingField { field: String, ty: String, site: Span },
    #[error("`{name}` is not a member of `{ty}`")]
    NotAMember { name: String, ty: String, site: Span },
    #[error("{value} is outside of {lo}..{hi}")]
    OutOfRange { value: f64, lo: f64, hi: f64, site: Span },
    #[error("no case matches `{scrut}`")]
    NoMatchingCase { scrut: String, site: Span },
}

impl TyckError {
    pub fn indicators(&self) -> Vec<(&Span, &'static str)> {
        match self {
            | TyckError::AliasNotFound { site, .. } => vec![(site, "not found in any scope")],
            | TyckError::AlreadyDefined { site, prev, .. } => {
                vec![(site, "redefined here"), (prev, "previously defined here")]
            }
            | TyckError::InvalidBindingTarget { site, .. } => vec![(site, "binding target")],
            | TyckError::NotCallable { site, .. } => vec![(site, "called here")],
            | TyckError::ArgumentMismatch { call, arg, def, .. } => vec![
                (call, "call site"),
                (arg, "argument"),
                (def, "function definition"),
            ],
            | TyckError::OperandNotNumber { operand, .. } => vec![(operand, "this operand")],
            | TyckError::TypeMismatch { site, .. } => vec![(site, "mismatched value")],
            | TyckError::BranchMismatch { lhs_site, rhs_site, .. } => {
                vec![(lhs_site, "this branch"), (rhs_site, "that branch")]
            }
            | TyckError::ConditionNotBool { site, .. } => vec![(site, "condition")],
            | TyckError::CannotInfer { site } => vec![(site, "recursive reference")],
            | TyckError::EmptySequence { site } => vec![(site, "empty")],
            | TyckError::NotAType { site, .. } => vec![(site, "expected a type")],
            | TyckError::NotInstantiable { site, .. } => vec![(site, "template")],
            | TyckError::NoSuchField { site, .. } => vec![(site, "field access")],
            | TyckError::MissingField { site, .. } => vec![(site, "instance")],
            | TyckError::NotAMember { site, .. } => vec![(site, "member")],
            | TyckError::OutOfRange { site, .. } => vec![(site, "value")],
            | TyckError::NoMatchingCase { site, .. } => vec![(site, "match")],
        }
    }
}

impl From<TyckError> for CompileError {
    fn from(err: TyckError) -> Self {
        let mut diag = CompileError::new(err.to_string());
        for (span, label) in err.indicators() {
            diag.add_indicator(span, label);
        }
        diag
    }
}
