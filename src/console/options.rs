//! Option accessors on a console.

use super::Console;
use crate::options::{OptionChange, OptionName, SetOutcome};
use serde_json::Value;
use std::sync::mpsc::{channel, Receiver};

/// Getter/setter handle for a console's options.
///
/// Writes that change a value are published to every subscriber; writes
/// that change the value's kind are also recorded as a console warning.
pub struct Options<'a> {
    console: &'a Console,
}

impl<'a> Options<'a> {
    pub(super) fn new(console: &'a Console) -> Self {
        Self { console }
    }

    /// Whether records get a caller label.
    pub fn add_caller(&self) -> bool {
        self.console.inner.options.borrow().add_caller()
    }

    /// Turn caller labels on or off.
    pub fn set_add_caller(&self, add_caller: bool) {
        self.set(OptionName::AddCaller, add_caller);
    }

    /// Snippet length for unnamed callers.
    pub fn function_snippet_length(&self) -> usize {
        self.console.inner.options.borrow().function_snippet_length()
    }

    /// Set the snippet length for unnamed callers.
    pub fn set_function_snippet_length(&self, length: usize) {
        self.set(OptionName::FunctionSnippetLength, length);
    }

    /// Raw stored value of `name`.
    pub fn get(&self, name: OptionName) -> Value {
        self.console.inner.options.borrow().get(name).clone()
    }

    /// Store `value` under `name`. Equal values are ignored.
    pub fn set(&self, name: OptionName, value: impl Into<Value>) {
        let outcome = self.console.inner.options.borrow_mut().set(name, value.into());
        let SetOutcome::Changed { change, mismatch } = outcome else {
            return;
        };
        if let Some(mismatch) = mismatch {
            self.console.warn(mismatch.to_string());
        }
        self.publish(change);
    }

    /// Receive every subsequent option change.
    ///
    /// Delivery never blocks the writer; a dropped receiver is forgotten.
    pub fn subscribe(&self) -> Receiver<OptionChange> {
        let (tx, rx) = channel();
        self.console.inner.subscribers.borrow_mut().push(tx);
        rx
    }

    fn publish(&self, change: OptionChange) {
        tracing::debug!(option = %change.option, value = %change.value, "console option changed");
        self.console
            .inner
            .subscribers
            .borrow_mut()
            .retain(|tx| tx.send(change.clone()).is_ok());
    }
}
