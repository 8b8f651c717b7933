//! Crate-wide error taxonomy.
//!
//! Direct API misuse (bad syntax, malformed queries, a corrupted snapshot)
//! surfaces as `Result<_, NarError>`. Internal derivation faults
//! (`RuleExecutionFault`, `CyclicDerivation`) never do — they degrade to a
//! dropped derivation plus an `error.raised` event on the `EventBus`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NarError {
    #[error(transparent)]
    Term(#[from] TermError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Stamp(#[from] StampError),
    #[error(transparent)]
    Unify(#[from] UnifyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TermError {
    #[error("compound operator {op:?} requires at least {min} subterms, got {got}")]
    Arity { op: &'static str, min: usize, got: usize },
    #[error("variable name {0:?} is empty")]
    EmptyVariableName(String),
    #[error("unsupported operator for this construction")]
    Unsupported,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("unexpected end of input")]
    Eof,
    #[error("syntax error at position {pos}: {message}")]
    Syntax { pos: usize, message: String },
    #[error(transparent)]
    Term(#[from] TermError),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StampError {
    #[error("evidence sets are not disjoint, cannot revise")]
    NotDisjoint,
    #[error("stamp exceeds configured maximum length {max}")]
    TooLong { max: usize },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum UnifyError {
    #[error("occurs check failed: variable would bind to a term containing itself")]
    OccursCheck,
    #[error("structural mismatch between pattern and term")]
    Mismatch,
    #[error("commutative permutation search exceeded the configured bound")]
    PermutationBudgetExceeded,
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("{field} must be greater than zero, got {value}")]
    MustBePositive { field: &'static str, value: f64 },
    #[error("{field} must be in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PersistError {
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: &'static str, found: String },
    #[error("snapshot is corrupted: {0}")]
    Corrupted(String),
}
