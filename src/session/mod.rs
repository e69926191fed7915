//! Scoped sessions.
//!
//! A session wraps a user callback. Invoking it installs the session's
//! console as the active backend, runs the callback with the console, and
//! puts the previous backend back on every way out: normal return, returned
//! error, or unwinding panic.

use crate::backend::{self, ConsoleBackend};
use crate::console::Console;
use crate::model::{FunctionRef, Thrown, UsageError};
use std::rc::Rc;

pub mod uncaught;

pub use uncaught::{has_uncaught_handler, set_uncaught_handler, take_uncaught_handler};

/// Warning recorded when a callback error escapes with no handler installed.
pub const NO_HANDLER_WARNING: &str = "Register an uncaught exception handler with \
     set_uncaught_handler to capture errors escaping the console callback";

type Body = Box<dyn FnMut(&Console) -> Result<(), Thrown>>;

/// A user callback with a description of the function it came from.
pub struct Callback {
    function: FunctionRef,
    body: Body,
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("function", &self.function)
            .finish_non_exhaustive()
    }
}

impl Callback {
    /// Pair `body` with its description. The declared arity of `function`
    /// is what session validation checks.
    pub fn new(
        function: FunctionRef,
        body: impl FnMut(&Console) -> Result<(), Thrown> + 'static,
    ) -> Self {
        Self {
            function,
            body: Box::new(body),
        }
    }

    /// An anonymous one-parameter callback.
    pub fn unary(body: impl FnMut(&Console) -> Result<(), Thrown> + 'static) -> Self {
        Self::new(FunctionRef::new("|console| { .. }").with_arity(1), body)
    }

    /// Description of the callback function.
    pub fn function(&self) -> &FunctionRef {
        &self.function
    }
}

/// Builds a [`Callback`] whose description is taken from its own source.
///
/// ```
/// use historical_console::{callback, session::historical_console};
///
/// let mut invoker = historical_console(vec![callback!(|console| {
///     console.debug("x");
///     Ok(())
/// })])
/// .unwrap();
/// invoker.invoke().unwrap();
/// ```
#[macro_export]
macro_rules! callback {
    (|$console:ident| $body:expr) => {
        $crate::session::Callback::new(
            $crate::FunctionRef::new(stringify!(|$console| $body)).with_arity(1),
            move |$console: &$crate::Console| -> ::std::result::Result<(), $crate::Thrown> { $body },
        )
    };
}

/// A console waiting to be bound to a callback.
#[derive(Debug, Clone)]
pub struct Session {
    console: Console,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session whose console forwards to the backend active when the
    /// session is invoked.
    pub fn new() -> Self {
        Self::from_console(Console::new())
    }

    /// A session whose console always forwards to `backend`.
    pub fn with_backend(backend: Rc<dyn ConsoleBackend>) -> Self {
        Self::from_console(Console::with_backend(backend))
    }

    /// A session around an existing console.
    pub fn from_console(console: Console) -> Self {
        Self { console }
    }

    /// The console the callback will receive.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Validate the entry arguments and produce an invoker.
    ///
    /// # Errors
    ///
    /// Fails unless `args` holds exactly one callback declared with exactly
    /// one parameter. The violation is also alerted and recorded as an error
    /// on the session's console.
    pub fn bind(self, args: Vec<Callback>) -> Result<Invoker, UsageError> {
        let violation = match args.as_slice() {
            [callback] if callback.function.arity() == 1 => None,
            [callback] => Some(UsageError::WrongArity(callback.function.arity())),
            _ => Some(UsageError::WrongArgumentCount(args.len())),
        };

        if let Some(error) = violation {
            let message = format!(
                "{error}. Use it like historical_console(vec![callback!(|console| {{ /* your whole program */ Ok(()) }})])"
            );
            tracing::warn!(%error, "rejected console session entry");
            self.console.alert(message.as_str());
            self.console.error((message, "You passed in these arguments:", describe(&args)));
            return Err(error);
        }

        let callback = args
            .into_iter()
            .next()
            .ok_or(UsageError::WrongArgumentCount(0))?;
        Ok(Invoker {
            console: self.console,
            callback,
        })
    }
}

fn describe(args: &[Callback]) -> serde_json::Value {
    args.iter()
        .map(|c| {
            serde_json::json!({
                "name": c.function.name(),
                "arity": c.function.arity(),
            })
        })
        .collect()
}

/// Validate `args` and bind them to a fresh console on the active backend.
///
/// # Errors
///
/// See [`Session::bind`].
pub fn historical_console(args: Vec<Callback>) -> Result<Invoker, UsageError> {
    Session::new().bind(args)
}

/// Bind a closure taking the console. The closure type fixes the arity, so
/// this cannot fail.
pub fn run(body: impl FnMut(&Console) -> Result<(), Thrown> + 'static) -> Invoker {
    Invoker {
        console: Console::new(),
        callback: Callback::unary(body),
    }
}

/// A bound session, ready to run.
pub struct Invoker {
    console: Console,
    callback: Callback,
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("console", &self.console)
            .field("callback", &self.callback)
            .finish()
    }
}

impl Invoker {
    /// The console passed to the callback.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Run the callback with the console installed as the active backend.
    ///
    /// # Errors
    ///
    /// An error returned by the callback is passed to the uncaught handler
    /// when one is registered, and `Ok(())` is returned. Without a handler a
    /// warning is recorded and the error is returned.
    pub fn invoke(&mut self) -> Result<(), Thrown> {
        self.console.follow_active_backend();
        let _installed = backend::install(Rc::new(self.console.clone()));
        let _frame = self.console.enter(self.callback.function.clone());

        let Err(thrown) = (self.callback.body)(&self.console) else {
            return Ok(());
        };

        if let Some(handler) = uncaught::uncaught_handler() {
            tracing::debug!(error = %thrown, "callback error routed to uncaught handler");
            handler(thrown);
            return Ok(());
        }
        self.console.warn(NO_HANDLER_WARNING);
        Err(thrown)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
