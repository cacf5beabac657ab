//! FILENAME: engine/src/error.rs
//! PURPOSE: The six-variant failure taxonomy a `try_update` transaction
//! can return.
//! CONTEXT: Distinct from `cell::CellError`, which is a *stored* display
//! value (what a cell shows, e.g. `#DIV/0!`). `EngineError` is a
//! *transaction outcome* — what the scheduler hands back to the caller
//! when an update is rejected. The parser's `ParseError` and the
//! persistence crate's errors both fold into this taxonomy at their
//! respective boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("could not parse formula: {0}")]
    ParseError(String),

    #[error("bad cell or range name: {0}")]
    BadName(String),

    #[error("evaluation error: {0}")]
    EvaluationError(String),

    #[error("division by zero")]
    ZeroDivision,

    #[error("update would introduce a circular dependency")]
    CircularDependencies,

    #[error("unexpected error: {0}")]
    UnexpectedError(String),
}

impl From<crate::coord::CoordError> for EngineError {
    fn from(err: crate::coord::CoordError) -> Self {
        EngineError::BadName(err.to_string())
    }
}

impl From<parser::ParseError> for EngineError {
    fn from(err: parser::ParseError) -> Self {
        EngineError::ParseError(err.to_string())
    }
}
