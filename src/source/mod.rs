//! Call script input.
//!
//! A script is JSONL: each non-blank line is a JSON array whose first element
//! is a method tag and whose remaining elements are the call's arguments,
//! i.e. the same shape as a history record without the caller element.
//!
//! ```text
//! ["time", "load"]
//! ["debug", {"user": 7}, "loaded"]
//! ["timeEnd", "load"]
//! ```

use crate::model::{MethodKind, UnknownMethod};
use serde_json::Value;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or parsing a call script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file does not exist.
    #[error("Script file not found: {0}")]
    FileNotFound(PathBuf),

    /// No file was given and stdin is a terminal.
    #[error("No input: pass a script file or pipe one to stdin")]
    NoInput,

    /// Reading the script failed.
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a JSON array starting with a string tag.
    #[error("Line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// A line names a method the console does not have.
    #[error("Line {line}: {source}")]
    UnknownMethod {
        /// 1-based line number.
        line: usize,
        /// The unrecognized tag.
        #[source]
        source: UnknownMethod,
    },
}

/// One scripted console call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptCall {
    /// 1-based line number in the script.
    pub line: usize,
    /// Method to call.
    pub method: MethodKind,
    /// Arguments of the call.
    pub args: Vec<Value>,
}

/// Parse a script. Blank lines are skipped.
///
/// # Errors
///
/// Returns the first malformed line or unknown method.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCall>, ScriptError> {
    text.lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(index, raw)| parse_line(index + 1, raw))
        .collect()
}

fn parse_line(line: usize, raw: &str) -> Result<ScriptCall, ScriptError> {
    let values: Vec<Value> = serde_json::from_str(raw).map_err(|e| ScriptError::Malformed {
        line,
        reason: format!("expected a JSON array: {e}"),
    })?;

    let mut values = values.into_iter();
    let tag = match values.next() {
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(ScriptError::Malformed {
                line,
                reason: format!("method tag must be a string, got {other}"),
            })
        }
        None => {
            return Err(ScriptError::Malformed {
                line,
                reason: "empty call".to_string(),
            })
        }
    };

    let method = tag
        .parse::<MethodKind>()
        .map_err(|source| ScriptError::UnknownMethod { line, source })?;

    Ok(ScriptCall {
        line,
        method,
        args: values.collect(),
    })
}

/// Read a script from `file`, or from stdin when no file is given.
///
/// # Errors
///
/// Returns [`ScriptError::NoInput`] if no file is given and stdin is a
/// terminal, [`ScriptError::FileNotFound`] for a missing file, and parse
/// errors for malformed content.
pub fn read_script(file: Option<PathBuf>) -> Result<Vec<ScriptCall>, ScriptError> {
    let text = match file {
        Some(path) => {
            if !path.exists() {
                return Err(ScriptError::FileNotFound(path));
            }
            std::fs::read_to_string(&path)?
        }
        None => {
            let stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err(ScriptError::NoInput);
            }
            let mut text = String::new();
            stdin.lock().read_to_string(&mut text)?;
            text
        }
    };

    let calls = parse_script(&text)?;
    tracing::debug!(calls = calls.len(), "parsed call script");
    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn parses_calls_with_line_numbers() {
        let script = "[\"time\", \"load\"]\n\n[\"debug\", {\"user\": 7}, \"loaded\"]\n";

        let calls = parse_script(script).unwrap();

        assert_eq!(
            calls,
            vec![
                ScriptCall {
                    line: 1,
                    method: MethodKind::Time,
                    args: vec![json!("load")],
                },
                ScriptCall {
                    line: 3,
                    method: MethodKind::Debug,
                    args: vec![json!({"user": 7}), json!("loaded")],
                },
            ]
        );
    }

    #[test]
    fn rejects_non_array_lines() {
        let err = parse_script("{\"debug\": 1}").unwrap_err();
        assert!(matches!(err, ScriptError::Malformed { line: 1, .. }), "{err}");
    }

    #[test]
    fn rejects_empty_and_non_string_tags() {
        assert!(matches!(
            parse_script("[]"),
            Err(ScriptError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("[\"log\"]\n[3, \"x\"]"),
            Err(ScriptError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_unknown_methods() {
        let err = parse_script("[\"shout\", \"x\"]").unwrap_err();
        assert_eq!(err.to_string(), "Line 1: Unknown console method: \"shout\"");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_script(Some(PathBuf::from("/nonexistent/calls.jsonl"))).unwrap_err();
        assert!(matches!(err, ScriptError::FileNotFound(_)));
    }

    #[test]
    fn reads_script_file() {
        let path = std::env::temp_dir().join("hcon_read_script.jsonl");
        fs::write(&path, "[\"count\"]\n[\"count\", \"x\"]\n").unwrap();

        let calls = read_script(Some(path.clone())).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(calls.len(), 2);
        assert!(calls[0].args.is_empty());
    }
}
