//! Replaying a call script through a session.

use crate::model::{ConsoleError, FunctionRef, HistoryLog, MethodKind};
use crate::session::{Callback, Session};
use crate::source::ScriptCall;
use thiserror::Error;

/// A scripted call failed while replaying.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The intercepted call itself failed, e.g. `time` without a name.
    #[error("Line {line}: {method} failed: {source}")]
    Call {
        /// 1-based line number of the call.
        line: usize,
        /// Method that failed.
        method: MethodKind,
        /// Error raised by the call.
        #[source]
        source: ConsoleError,
    },

    /// The session reported some other error.
    #[error("Replay session failed: {0}")]
    Session(String),
}

/// Run `calls` in order inside `session` and return the resulting history.
///
/// Records are attributed to a frame named `replay`.
///
/// # Errors
///
/// Stops at the first failing call.
pub fn replay(calls: Vec<ScriptCall>, session: Session) -> Result<HistoryLog, ReplayError> {
    let callback = Callback::new(FunctionRef::named("replay").with_arity(1), move |console| {
        for call in &calls {
            console
                .call(call.method, call.args.as_slice())
                .map_err(|source| ReplayError::Call {
                    line: call.line,
                    method: call.method,
                    source,
                })?;
        }
        Ok(())
    });

    let mut invoker = session
        .bind(vec![callback])
        .map_err(|e| ReplayError::Session(e.to_string()))?;

    invoker
        .invoke()
        .map_err(|thrown| match thrown.downcast::<ReplayError>() {
            Ok(err) => *err,
            Err(other) => ReplayError::Session(other.to_string()),
        })?;

    Ok(invoker.console().history())
}
