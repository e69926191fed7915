//! Default backend: forwards console calls to `tracing` events.

use super::ConsoleBackend;
use crate::model::value::display_value;
use crate::model::{ConsoleError, MethodKind};
use serde_json::Value;
use tracing::Level;

/// Emits each call as a `tracing` event under the `console` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackend;

impl TracingBackend {
    /// Event level used for `kind`.
    pub fn level(kind: MethodKind) -> Level {
        match kind {
            MethodKind::Error | MethodKind::Exception | MethodKind::Assert | MethodKind::Alert => {
                Level::ERROR
            }
            MethodKind::Warn => Level::WARN,
            MethodKind::Debug => Level::DEBUG,
            MethodKind::Trace => Level::TRACE,
            _ => Level::INFO,
        }
    }
}

impl ConsoleBackend for TracingBackend {
    fn write(&self, kind: MethodKind, args: &[Value]) -> Result<(), ConsoleError> {
        let message = args
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(" ");
        let method = kind.as_str();

        // `tracing` needs the level as a constant at each call site.
        match Self::level(kind) {
            Level::ERROR => tracing::error!(target: "console", method, "{message}"),
            Level::WARN => tracing::warn!(target: "console", method, "{message}"),
            Level::DEBUG => tracing::debug!(target: "console", method, "{message}"),
            Level::TRACE => tracing::trace!(target: "console", method, "{message}"),
            _ => tracing::info!(target: "console", method, "{message}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn levels_follow_method_severity() {
        assert_eq!(TracingBackend::level(MethodKind::Error), Level::ERROR);
        assert_eq!(TracingBackend::level(MethodKind::Alert), Level::ERROR);
        assert_eq!(TracingBackend::level(MethodKind::Warn), Level::WARN);
        assert_eq!(TracingBackend::level(MethodKind::Debug), Level::DEBUG);
        assert_eq!(TracingBackend::level(MethodKind::Trace), Level::TRACE);
        assert_eq!(TracingBackend::level(MethodKind::Table), Level::INFO);
    }

    #[test]
    fn writing_never_fails() {
        for kind in MethodKind::ALL {
            assert!(TracingBackend.write(kind, &[json!("x"), json!(1)]).is_ok());
        }
    }
}
