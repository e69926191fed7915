//! Per-method interception.
//!
//! Every console entry point runs through a [`MethodInterceptor`]: forward
//! the raw arguments to the backend, normalize them with the save hook,
//! attach the caller label, and append the record to history.

use super::Console;
use crate::hooks::SaveHookRegistry;
use crate::model::{ConsoleError, HistoryRecord, IntrospectionError, MethodKind};
use serde_json::Value;

/// Warning recorded the first time caller introspection fails.
pub const STRICT_MODE_WARNING: &str = "A caller is running in strict mode; \
     history records cannot include the caller of that function";

/// Interception entry for one method kind, resolved at console construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodInterceptor {
    kind: MethodKind,
    target: MethodKind,
    hooked: bool,
}

impl MethodInterceptor {
    /// Route `kind` to the backend's own method when it has one, else to `log`.
    pub fn new(kind: MethodKind, backend_has_method: bool) -> Self {
        Self {
            kind,
            target: if backend_has_method {
                kind
            } else {
                MethodKind::Log
            },
            hooked: SaveHookRegistry::has_hook(kind),
        }
    }

    /// Method kind this entry intercepts.
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Backend method the raw arguments are delivered to.
    pub fn target(&self) -> MethodKind {
        self.target
    }

    /// Whether a save hook normalizes the arguments.
    pub fn is_hooked(&self) -> bool {
        self.hooked
    }

    /// Run one intercepted call.
    ///
    /// # Errors
    ///
    /// Propagates save hook errors, e.g. `time` without a name. The backend
    /// has already received the call when that happens.
    pub fn invoke(&self, console: &Console, raw: &[Value]) -> Result<(), ConsoleError> {
        let inner = &console.inner;

        // Sink results are not inspected.
        let _ = console.backend().write(self.target, raw);

        let mut args = raw.to_vec();
        if self.hooked {
            args = inner.hooks.borrow_mut().apply(self.kind, args)?;
        }

        let caller = if inner.options.borrow().add_caller() {
            match console.resolve_caller() {
                Ok(label) => Some(label),
                Err(error) => {
                    report_introspection_failure(console, &error);
                    None
                }
            }
        } else {
            None
        };

        inner
            .history
            .borrow_mut()
            .push(HistoryRecord::new(self.kind, args, caller));
        Ok(())
    }
}

/// Warn through the console itself, once per console.
fn report_introspection_failure(console: &Console, error: &IntrospectionError) {
    tracing::debug!(%error, "caller introspection failed");
    if console.inner.introspection_warned.replace(true) {
        return;
    }
    console.warn(STRICT_MODE_WARNING);
}

impl Console {
    fn resolve_caller(&self) -> Result<String, IntrospectionError> {
        let frames = self
            .inner
            .frames
            .try_borrow()
            .map_err(|_| IntrospectionError::FrameStackBusy)?;
        let snippet_length = self.inner.options.borrow().function_snippet_length();
        self.inner.resolver.resolve(frames.last(), snippet_length)
    }
}
