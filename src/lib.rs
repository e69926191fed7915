//! Historical Console
//!
//! A console-style logging shim that forwards every call to an underlying
//! backend and also keeps an in-memory history of what was logged, who
//! logged it, and with what arguments.
//!
//! Code runs inside a [`Session`]: while the callback runs, the session's
//! [`Console`] is the active backend, so calls made through
//! [`backend::emit`] from anywhere on the thread are intercepted too. When
//! the callback finishes, however it finishes, the previous backend is put
//! back.
//!
//! ```
//! use historical_console::{callback, historical_console, MethodKind};
//!
//! let mut invoker = historical_console(vec![callback!(|console| {
//!     console.count(Some("retries"));
//!     console.count(Some("retries"));
//!     Ok(())
//! })])
//! .unwrap();
//! invoker.invoke().unwrap();
//!
//! let history = invoker.console().history();
//! assert_eq!(history.of_kind(MethodKind::Count).count(), 2);
//! ```

pub mod backend;
pub mod caller;
pub mod config;
pub mod console;
pub mod hooks;
pub mod logging;
pub mod model;
pub mod options;
pub mod replay;
pub mod session;
pub mod source;

pub use backend::ConsoleBackend;
pub use console::{Console, ConsoleBuilder};
pub use model::{
    ConsoleError, FunctionRef, HistoryLog, HistoryRecord, IntoArgs, IntrospectionError,
    MethodKind, Thrown, UsageError,
};
pub use options::OptionName;
pub use session::{historical_console, run, set_uncaught_handler, Callback, Invoker, Session};
