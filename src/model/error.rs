//! Error types for the console facade.
//!
//! Only two kinds of failure interrupt the caller: a malformed session entry
//! ([`UsageError`]) and a call missing a required argument
//! ([`ConsoleError::MissingArgument`]). Everything else that can go wrong
//! while keeping history degrades to a recorded warning.

use super::MethodKind;
use thiserror::Error;

/// A value raised by a user callback.
pub type Thrown = Box<dyn std::error::Error + 'static>;

/// Errors returned from an intercepted console call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// A save hook needs an argument the caller did not pass.
    ///
    /// Raised by `time` without a timer name, since an unnamed timer can
    /// never be ended.
    #[error("console.{method} needs {what}, like console.{method}(\"lookup\")")]
    MissingArgument {
        /// Method that was called.
        method: MethodKind,
        /// Description of the missing argument.
        what: &'static str,
    },
}

/// The session entry point was called with the wrong arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Not exactly one callback was supplied.
    #[error("historical_console expects exactly one callback, got {0}")]
    WrongArgumentCount(usize),

    /// The callback does not take exactly one parameter (the console).
    #[error("historical_console expects a callback taking one parameter (the console), got one taking {0}")]
    WrongArity(usize),
}

/// Caller introspection is not possible for this call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectionError {
    /// The innermost frame runs in strict mode and forbids inspection.
    #[error("caller of a strict-mode function cannot be inspected")]
    StrictMode,

    /// The frame stack is being modified by the current call.
    #[error("frame stack is busy")]
    FrameStackBusy,
}
