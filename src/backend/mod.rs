//! Logging backends and the active-backend slot.
//!
//! A backend is the sink console calls end up in. The active backend is a
//! thread-local slot: code that logs through [`emit`] reaches whatever is
//! installed, which is how a session intercepts calls made by code that was
//! never handed the console explicitly. Installation is scoped by
//! [`BackendGuard`], so installs and restores always pair up.

use crate::console::Console;
use crate::model::{ConsoleError, MethodKind};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub mod memory;
pub mod tracing_backend;

pub use memory::MemoryBackend;
pub use tracing_backend::TracingBackend;

/// A console-style logging sink.
pub trait ConsoleBackend {
    /// Whether the sink has a dedicated method for `kind`. Calls for kinds
    /// without one are routed to [`MethodKind::Log`].
    fn has_method(&self, _kind: MethodKind) -> bool {
        true
    }

    /// Deliver one call.
    ///
    /// # Errors
    ///
    /// Plain sinks never fail. An installed console returns the error of the
    /// intercepted call, e.g. `time` without a name.
    fn write(&self, kind: MethodKind, args: &[Value]) -> Result<(), ConsoleError>;

    /// The console behind this sink, when the sink is an installed console.
    fn as_console(&self) -> Option<&Console> {
        None
    }
}

thread_local! {
    static ACTIVE: RefCell<Rc<dyn ConsoleBackend>> = RefCell::new(Rc::new(TracingBackend));
}

/// The backend currently installed on this thread.
pub fn active() -> Rc<dyn ConsoleBackend> {
    ACTIVE.with(|slot| Rc::clone(&slot.borrow()))
}

/// Send one call to the active backend.
///
/// # Errors
///
/// Propagates the active backend's error.
pub fn emit(kind: MethodKind, args: &[Value]) -> Result<(), ConsoleError> {
    active().write(kind, args)
}

/// Install `backend` as the active backend until the guard drops.
pub fn install(backend: Rc<dyn ConsoleBackend>) -> BackendGuard {
    let previous = ACTIVE.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), backend));
    tracing::trace!("console backend installed");
    BackendGuard {
        previous: Some(previous),
    }
}

/// Restores the previously active backend on drop, including during unwind.
#[must_use = "the previous backend is restored when the guard drops"]
pub struct BackendGuard {
    previous: Option<Rc<dyn ConsoleBackend>>,
}

impl Drop for BackendGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            ACTIVE.with(|slot| *slot.borrow_mut() = previous);
            tracing::trace!("console backend restored");
        }
    }
}
