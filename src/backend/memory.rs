//! In-memory backend that keeps every delivered call.

use super::ConsoleBackend;
use crate::model::value::display_value;
use crate::model::{ConsoleError, MethodKind};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;

/// One call as the backend received it.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    /// Backend method that received the call.
    pub method: MethodKind,
    /// Raw arguments, as passed by the caller.
    pub args: Vec<Value>,
}

/// Records calls instead of printing them.
///
/// By default every method kind is supported. [`MemoryBackend::with_methods`]
/// restricts the set, so that other kinds arrive as [`MethodKind::Log`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    methods: Option<HashSet<MethodKind>>,
    calls: RefCell<Vec<BackendCall>>,
}

impl MemoryBackend {
    /// A backend supporting every method kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with dedicated methods only for `methods`.
    pub fn with_methods(methods: impl IntoIterator<Item = MethodKind>) -> Self {
        Self {
            methods: Some(methods.into_iter().collect()),
            calls: RefCell::default(),
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    /// Calls delivered to `method`.
    pub fn calls_of(&self, method: MethodKind) -> Vec<BackendCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Each call's arguments joined by spaces.
    pub fn messages(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| {
                c.args
                    .iter()
                    .map(display_value)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl ConsoleBackend for MemoryBackend {
    fn has_method(&self, kind: MethodKind) -> bool {
        self.methods.as_ref().map_or(true, |m| m.contains(&kind))
    }

    fn write(&self, kind: MethodKind, args: &[Value]) -> Result<(), ConsoleError> {
        self.calls.borrow_mut().push(BackendCall {
            method: kind,
            args: args.to_vec(),
        });
        Ok(())
    }
}
