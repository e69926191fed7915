//! Runtime options governing interception.
//!
//! Values are stored as JSON so that a write of the wrong kind can still be
//! accepted (last write wins) and reported, rather than rejected.

use crate::model::value::{is_truthy, value_kind};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default of `addCaller`.
pub const DEFAULT_ADD_CALLER: bool = true;
/// Default of `functionSnippetLength`.
pub const DEFAULT_FUNCTION_SNIPPET_LENGTH: usize = 40;

/// A tunable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OptionName {
    /// `addCaller`: append the caller label to records.
    #[serde(rename = "addCaller")]
    AddCaller,
    /// `functionSnippetLength`: snippet length for unnamed callers.
    #[serde(rename = "functionSnippetLength")]
    FunctionSnippetLength,
}

impl OptionName {
    /// Every option.
    pub const ALL: [OptionName; 2] = [OptionName::AddCaller, OptionName::FunctionSnippetLength];

    /// The option's camelCase name.
    pub fn as_str(self) -> &'static str {
        match self {
            OptionName::AddCaller => "addCaller",
            OptionName::FunctionSnippetLength => "functionSnippetLength",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// No option has this name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown console option: {0:?}")]
pub struct UnknownOption(pub String);

impl FromStr for OptionName {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// An accepted option write, published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionChange {
    /// Option that changed.
    pub option: OptionName,
    /// Its new value.
    pub value: Value,
}

/// A write whose value kind differs from the value it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("console option {option} is currently a {current} and is being set to a {new}: {value}")]
pub struct TypeMismatch {
    /// Option being written.
    pub option: OptionName,
    /// Kind of the value being replaced.
    pub current: &'static str,
    /// Kind of the value being written.
    pub new: &'static str,
    /// The written value, rendered.
    pub value: String,
}

/// Result of [`OptionStore::set`].
#[derive(Debug, Clone, PartialEq)]
pub enum SetOutcome {
    /// The value equals the current one; nothing happened.
    Unchanged,
    /// The value was stored.
    Changed {
        /// The change to publish.
        change: OptionChange,
        /// Present when the value kind changed.
        mismatch: Option<TypeMismatch>,
    },
}

/// The option values of one console.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionStore {
    add_caller: Value,
    function_snippet_length: Value,
}

impl Default for OptionStore {
    fn default() -> Self {
        Self::new(DEFAULT_ADD_CALLER, DEFAULT_FUNCTION_SNIPPET_LENGTH)
    }
}

impl OptionStore {
    /// A store holding the given values.
    pub fn new(add_caller: bool, function_snippet_length: usize) -> Self {
        Self {
            add_caller: Value::from(add_caller),
            function_snippet_length: Value::from(function_snippet_length),
        }
    }

    /// Stored value of `name`.
    pub fn get(&self, name: OptionName) -> &Value {
        match name {
            OptionName::AddCaller => &self.add_caller,
            OptionName::FunctionSnippetLength => &self.function_snippet_length,
        }
    }

    /// Store `value` under `name`, last write wins.
    pub fn set(&mut self, name: OptionName, value: Value) -> SetOutcome {
        let slot = match name {
            OptionName::AddCaller => &mut self.add_caller,
            OptionName::FunctionSnippetLength => &mut self.function_snippet_length,
        };
        if *slot == value {
            return SetOutcome::Unchanged;
        }

        let mismatch = (value_kind(slot) != value_kind(&value)).then(|| TypeMismatch {
            option: name,
            current: value_kind(slot),
            new: value_kind(&value),
            value: value.to_string(),
        });
        *slot = value.clone();

        SetOutcome::Changed {
            change: OptionChange {
                option: name,
                value,
            },
            mismatch,
        }
    }

    /// Whether records get a caller element. Non-boolean values are read by
    /// truthiness.
    pub fn add_caller(&self) -> bool {
        is_truthy(&self.add_caller)
    }

    /// Snippet length for unnamed callers.
    ///
    /// Fractional numbers are truncated, negative ones read as zero, and
    /// non-numbers fall back to the default.
    pub fn function_snippet_length(&self) -> usize {
        match &self.function_snippet_length {
            Value::Number(n) => n
                .as_u64()
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
                .or_else(|| n.as_f64().map(|f| f.max(0.0) as usize))
                .unwrap_or(0),
            _ => DEFAULT_FUNCTION_SNIPPET_LENGTH,
        }
    }
}
