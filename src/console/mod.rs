//! The intercepting console facade.
//!
//! A [`Console`] exposes one entry point per [`MethodKind`]. Each call is
//! forwarded to the real backend and recorded in the console's own history.
//! Consoles are cheap handles onto shared single-threaded state; clones
//! observe the same history and options.

use crate::backend::{self, ConsoleBackend};
use crate::caller::{CallerResolver, EnvironmentProbe, LegacyNames, NativeNames};
use crate::config::ResolvedConfig;
use crate::hooks::SaveHookRegistry;
use crate::model::{ConsoleError, FunctionRef, HistoryLog, IntoArgs, MethodKind};
use crate::options::{
    OptionChange, OptionStore, DEFAULT_ADD_CALLER, DEFAULT_FUNCTION_SNIPPET_LENGTH,
};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::Sender;

pub mod interceptor;
pub mod options;

pub use interceptor::MethodInterceptor;
pub use options::Options;

/// Console facade recording a history of every call.
#[derive(Clone)]
pub struct Console {
    inner: Rc<ConsoleInner>,
}

struct ConsoleInner {
    backend: RefCell<Rc<dyn ConsoleBackend>>,
    interceptors: RefCell<Vec<MethodInterceptor>>,
    follows_active: bool,
    hooks: RefCell<SaveHookRegistry>,
    options: RefCell<OptionStore>,
    history: RefCell<HistoryLog>,
    frames: RefCell<Vec<FunctionRef>>,
    resolver: CallerResolver,
    subscribers: RefCell<Vec<Sender<OptionChange>>>,
    introspection_warned: Cell<bool>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("records", &self.inner.history.borrow().len())
            .field("options", &*self.inner.options.borrow())
            .field("frames", &self.inner.frames.borrow().len())
            .finish()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Console`] with non-default backend or options.
pub struct ConsoleBuilder {
    backend: Option<Rc<dyn ConsoleBackend>>,
    add_caller: bool,
    function_snippet_length: usize,
    probe: Box<dyn EnvironmentProbe>,
}

impl Default for ConsoleBuilder {
    fn default() -> Self {
        Self {
            backend: None,
            add_caller: DEFAULT_ADD_CALLER,
            function_snippet_length: DEFAULT_FUNCTION_SNIPPET_LENGTH,
            probe: Box::new(NativeNames),
        }
    }
}

impl ConsoleBuilder {
    /// Sink the console forwards to. Defaults to the backend active when
    /// the console is built; a session re-targets such a console at the
    /// backend active when it is invoked.
    pub fn backend(mut self, backend: Rc<dyn ConsoleBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Initial `addCaller` option.
    pub fn add_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    /// Initial `functionSnippetLength` option.
    pub fn function_snippet_length(mut self, length: usize) -> Self {
        self.function_snippet_length = length;
        self
    }

    /// How caller names are found.
    pub fn probe(mut self, probe: impl EnvironmentProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Seed options and name resolution from resolved configuration.
    pub fn config(self, config: &ResolvedConfig) -> Self {
        let builder = self
            .add_caller(config.add_caller)
            .function_snippet_length(config.function_snippet_length);
        if config.legacy_function_names {
            builder.probe(LegacyNames)
        } else {
            builder.probe(NativeNames)
        }
    }

    /// Assemble the console with one interceptor per method kind.
    pub fn build(self) -> Console {
        let follows_active = self.backend.is_none();
        let backend = self.backend.unwrap_or_else(backend::active);
        let interceptors = interceptor_table(backend.as_ref());

        Console {
            inner: Rc::new(ConsoleInner {
                backend: RefCell::new(backend),
                interceptors: RefCell::new(interceptors),
                follows_active,
                hooks: RefCell::new(SaveHookRegistry::new()),
                options: RefCell::new(OptionStore::new(
                    self.add_caller,
                    self.function_snippet_length,
                )),
                history: RefCell::new(HistoryLog::new()),
                frames: RefCell::new(Vec::new()),
                resolver: CallerResolver::from_boxed(self.probe),
                subscribers: RefCell::new(Vec::new()),
                introspection_warned: Cell::new(false),
            }),
        }
    }
}

impl Console {
    /// A console forwarding to the currently active backend.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A console forwarding to `backend`.
    pub fn with_backend(backend: Rc<dyn ConsoleBackend>) -> Self {
        Self::builder().backend(backend).build()
    }

    /// Start configuring a console.
    pub fn builder() -> ConsoleBuilder {
        ConsoleBuilder::default()
    }

    /// Whether two handles share the same underlying console.
    pub fn ptr_eq(&self, other: &Console) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The interception entry for `kind`.
    pub fn interceptor(&self, kind: MethodKind) -> MethodInterceptor {
        self.inner.interceptors.borrow()[kind.index()]
    }

    /// Re-target a console built without an explicit backend at the backend
    /// active right now. Sessions do this before installing their console,
    /// so an invoker created inside another session does not keep writing
    /// into that session's history after it has ended.
    pub(crate) fn follow_active_backend(&self) {
        if !self.inner.follows_active {
            return;
        }
        let active = backend::active();
        if active.as_console().is_some_and(|console| console.ptr_eq(self)) {
            return;
        }
        *self.inner.interceptors.borrow_mut() = interceptor_table(active.as_ref());
        *self.inner.backend.borrow_mut() = active;
        tracing::trace!("console re-targeted at the active backend");
    }

    fn backend(&self) -> Rc<dyn ConsoleBackend> {
        Rc::clone(&self.inner.backend.borrow())
    }

    /// Call the `kind` entry point with variadic arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::MissingArgument`] when a save hook requires an
    /// argument that is absent (`time` without a name).
    pub fn call(&self, kind: MethodKind, args: impl IntoArgs) -> Result<(), ConsoleError> {
        self.interceptor(kind).invoke(self, &args.into_args())
    }

    /// Entry point for the typed methods. Their signatures always supply the
    /// arguments a save hook requires (`time` takes a name), so they cannot
    /// fail; [`Console::call`] is the path that surfaces missing arguments.
    fn emit(&self, kind: MethodKind, args: Vec<Value>) {
        let result = self.interceptor(kind).invoke(self, &args);
        debug_assert!(result.is_ok(), "typed console.{kind} failed: {result:?}");
        if let Err(error) = result {
            tracing::warn!(method = %kind, %error, "console call failed");
        }
    }

    /// Snapshot of the history so far.
    pub fn history(&self) -> HistoryLog {
        self.inner.history.borrow().clone()
    }

    /// Number of records so far.
    pub fn history_len(&self) -> usize {
        self.inner.history.borrow().len()
    }

    /// History as a JSON array of records, for attaching to error reports.
    pub fn history_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.inner.history.borrow())
    }

    /// Getter/setter view of the options.
    pub fn options(&self) -> Options<'_> {
        Options::new(self)
    }

    /// Enter a function frame. Calls made until the guard drops are
    /// attributed to `function`.
    pub fn enter(&self, function: FunctionRef) -> FrameGuard {
        self.inner.frames.borrow_mut().push(function);
        FrameGuard {
            console: self.clone(),
        }
    }

    /// Run `body` inside the frame of `function`.
    pub fn within<R>(&self, function: FunctionRef, body: impl FnOnce(&Console) -> R) -> R {
        let _frame = self.enter(function);
        body(self)
    }

    /// Depth of the entered frame stack.
    pub fn frame_depth(&self) -> usize {
        self.inner.frames.borrow().len()
    }

    /// Record whether `is_ok` held, with `message`.
    pub fn assert(&self, is_ok: bool, message: impl Into<Value>) {
        self.emit(MethodKind::Assert, vec![Value::from(is_ok), message.into()]);
    }

    /// `console.clear`.
    pub fn clear(&self) {
        self.emit(MethodKind::Clear, Vec::new());
    }

    /// Count calls per title; `None` counts under a synthesized title.
    pub fn count(&self, title: Option<&str>) {
        self.emit(MethodKind::Count, title.into_iter().map(Value::from).collect());
    }

    /// `console.debug`.
    pub fn debug(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Debug, args.into_args());
    }

    /// `console.dir`.
    pub fn dir(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Dir, args.into_args());
    }

    /// `console.dirxml`.
    pub fn dirxml(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Dirxml, args.into_args());
    }

    /// `console.error`.
    pub fn error(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Error, args.into_args());
    }

    /// `console.exception`.
    pub fn exception(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Exception, args.into_args());
    }

    /// `console.group`.
    pub fn group(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Group, args.into_args());
    }

    /// `console.groupCollapsed`.
    pub fn group_collapsed(&self, args: impl IntoArgs) {
        self.emit(MethodKind::GroupCollapsed, args.into_args());
    }

    /// `console.groupEnd`.
    pub fn group_end(&self) {
        self.emit(MethodKind::GroupEnd, Vec::new());
    }

    /// `console.info`.
    pub fn info(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Info, args.into_args());
    }

    /// `console.log`.
    pub fn log(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Log, args.into_args());
    }

    /// `console.profile`.
    pub fn profile(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Profile, args.into_args());
    }

    /// `console.profileEnd`.
    pub fn profile_end(&self, args: impl IntoArgs) {
        self.emit(MethodKind::ProfileEnd, args.into_args());
    }

    /// `console.table`.
    pub fn table(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Table, args.into_args());
    }

    /// Start a named timer.
    pub fn time(&self, name: impl Into<Value>) {
        self.emit(MethodKind::Time, vec![name.into()]);
    }

    /// Record the time elapsed since `time` was called with `name`.
    pub fn time_end(&self, name: impl Into<Value>) {
        self.emit(MethodKind::TimeEnd, vec![name.into()]);
    }

    /// Record the current epoch milliseconds with an optional label.
    pub fn time_stamp(&self, label: Option<&str>) {
        self.emit(MethodKind::TimeStamp, label.into_iter().map(Value::from).collect());
    }

    /// Record a backtrace of the current thread.
    pub fn trace(&self) {
        self.emit(MethodKind::Trace, Vec::new());
    }

    /// `console.warn`.
    pub fn warn(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Warn, args.into_args());
    }

    /// `console.alert`.
    pub fn alert(&self, args: impl IntoArgs) {
        self.emit(MethodKind::Alert, args.into_args());
    }
}

/// An installed console intercepts calls routed through [`backend::emit`].
impl ConsoleBackend for Console {
    fn write(&self, kind: MethodKind, args: &[Value]) -> Result<(), ConsoleError> {
        self.interceptor(kind).invoke(self, args)
    }

    fn as_console(&self) -> Option<&Console> {
        Some(self)
    }
}

fn interceptor_table(backend: &dyn ConsoleBackend) -> Vec<MethodInterceptor> {
    MethodKind::ALL
        .iter()
        .map(|&kind| MethodInterceptor::new(kind, backend.has_method(kind)))
        .collect()
}

/// Pops the entered frame on drop.
#[must_use = "the frame is exited when the guard drops"]
pub struct FrameGuard {
    console: Console,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        self.console.inner.frames.borrow_mut().pop();
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
