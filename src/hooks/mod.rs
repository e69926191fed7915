//! Save hooks: per-method transforms from raw call arguments to the
//! normalized arguments stored in history.
//!
//! The backend never sees hook output; it always receives the raw arguments.
//! Methods without a hook are recorded verbatim.

use crate::model::value::{display_arg, is_truthy};
use crate::model::{ConsoleError, MethodKind};
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// Recorded by `trace` when the platform cannot capture a backtrace.
pub const TRACE_UNSUPPORTED: &str = "stack traces not supported";

/// Upper bound of synthesized titles for untitled counters.
const SYNTHETIC_TITLE_MAX: u64 = 100_000;

/// Random draws before falling back to sequential titles above the range.
const SYNTHETIC_TITLE_DRAWS: usize = 32;

/// Per-title call counts for `count`.
#[derive(Debug, Default, Clone)]
pub struct CounterState {
    counters: HashMap<String, u64>,
}

impl CounterState {
    /// Bump `title`, starting at 1, and return the new count.
    pub fn increment(&mut self, title: &str) -> u64 {
        let count = self.counters.entry(title.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Current count of `title`.
    pub fn get(&self, title: &str) -> Option<u64> {
        self.counters.get(title).copied()
    }

    /// Whether `title` has been counted.
    pub fn contains(&self, title: &str) -> bool {
        self.counters.contains_key(title)
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// Start instants of named timers. Entries are read by `timeEnd`, never
/// removed.
#[derive(Debug, Default, Clone)]
pub struct TimerState {
    starts: HashMap<String, Instant>,
}

impl TimerState {
    /// Start (or restart) the timer `name` at `at`.
    pub fn start(&mut self, name: &str, at: Instant) {
        self.starts.insert(name.to_string(), at);
    }

    /// When `name` was started, if ever.
    pub fn started_at(&self, name: &str) -> Option<Instant> {
        self.starts.get(name).copied()
    }
}

/// The save hooks together with the state `count` and `time` keep.
#[derive(Debug, Default)]
pub struct SaveHookRegistry {
    counters: CounterState,
    timers: TimerState,
    overflow_title: u64,
}

impl SaveHookRegistry {
    /// A registry with no counters or timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `kind` has a hook; kinds without one pass arguments through.
    pub fn has_hook(kind: MethodKind) -> bool {
        matches!(
            kind,
            MethodKind::Assert
                | MethodKind::Count
                | MethodKind::Time
                | MethodKind::TimeEnd
                | MethodKind::TimeStamp
                | MethodKind::Trace
        )
    }

    /// Normalize `args` for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::MissingArgument`] for `time` without a name.
    pub fn apply(&mut self, kind: MethodKind, args: Vec<Value>) -> Result<Vec<Value>, ConsoleError> {
        let first = args.first();
        let normalized = match kind {
            MethodKind::Assert => assert_hook(first, args.get(1)),
            MethodKind::Count => self.count_hook(first),
            MethodKind::Time => self.time_hook(first, Instant::now())?,
            MethodKind::TimeEnd => self.time_end_hook(first, Instant::now()),
            MethodKind::TimeStamp => time_stamp_hook(first, chrono::Utc::now().timestamp_millis()),
            MethodKind::Trace => trace_hook(),
            _ => return Ok(args),
        };
        Ok(normalized)
    }

    /// State kept by `count`.
    pub fn counters(&self) -> &CounterState {
        &self.counters
    }

    /// State kept by `time`.
    pub fn timers(&self) -> &TimerState {
        &self.timers
    }

    fn count_hook(&mut self, title: Option<&Value>) -> Vec<Value> {
        let title = match title {
            Some(value) if is_truthy(value) => display_arg(Some(value)),
            _ => self.synthesize_title(),
        };
        let count = self.counters.increment(&title);
        vec![Value::from(format!("{title} {count}"))]
    }

    /// A numeric title not already used by a counter.
    ///
    /// Titles are drawn at random from `1..=100_000`. Once draws keep hitting
    /// used titles, titles are handed out in sequence above that range.
    fn synthesize_title(&mut self) -> String {
        let mut rng = rand::thread_rng();
        for _ in 0..SYNTHETIC_TITLE_DRAWS {
            let title = rng.gen_range(1..=SYNTHETIC_TITLE_MAX).to_string();
            if !self.counters.contains(&title) {
                return title;
            }
        }

        loop {
            self.overflow_title = self.overflow_title.max(SYNTHETIC_TITLE_MAX) + 1;
            let title = self.overflow_title.to_string();
            if !self.counters.contains(&title) {
                tracing::debug!(%title, "synthetic count titles exhausted, using sequence");
                return title;
            }
        }
    }

    fn time_hook(&mut self, name: Option<&Value>, now: Instant) -> Result<Vec<Value>, ConsoleError> {
        let name = name.ok_or(ConsoleError::MissingArgument {
            method: MethodKind::Time,
            what: "a title for the timer",
        })?;
        self.timers.start(&display_arg(Some(name)), now);
        Ok(vec![name.clone()])
    }

    fn time_end_hook(&self, name: Option<&Value>, now: Instant) -> Vec<Value> {
        let name = display_arg(name);
        let elapsed = match self.timers.started_at(&name) {
            Some(start) => now.saturating_duration_since(start).as_millis().to_string(),
            None => "NaN".to_string(),
        };
        vec![Value::from(format!("{name}: {elapsed}ms"))]
    }
}

fn assert_hook(is_ok: Option<&Value>, message: Option<&Value>) -> Vec<Value> {
    let outcome = if is_ok.is_some_and(is_truthy) {
        "successful"
    } else {
        "failed"
    };
    vec![Value::from(format!(
        "Assertion {outcome}: {}",
        display_arg(message)
    ))]
}

fn time_stamp_hook(label: Option<&Value>, now_millis: i64) -> Vec<Value> {
    vec![Value::from(now_millis), label.cloned().unwrap_or(Value::Null)]
}

fn trace_hook() -> Vec<Value> {
    use std::backtrace::{Backtrace, BacktraceStatus};

    let backtrace = Backtrace::force_capture();
    let text = match backtrace.status() {
        BacktraceStatus::Captured => backtrace.to_string(),
        _ => TRACE_UNSUPPORTED.to_string(),
    };
    vec![Value::from(text)]
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
