//! Caller identification.
//!
//! Turns the innermost entered function frame into a short display label:
//! its declared name when it has one, otherwise a snippet of its source text.

use crate::model::{FunctionRef, IntrospectionError};

/// Label for calls made outside of any function frame.
pub const NO_CALLER: &str = "null";

/// Source text beyond this many characters is ignored when labelling.
pub const SOURCE_SCAN_LIMIT: usize = 250;

/// Reports whether the runtime can supply function names natively.
///
/// In a legacy environment names are recovered from the source text
/// instead of trusted from the declaration.
pub trait EnvironmentProbe {
    /// Whether functions carry their declared names.
    fn has_native_names(&self) -> bool;
}

/// Function names come from their declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeNames;

impl EnvironmentProbe for NativeNames {
    fn has_native_names(&self) -> bool {
        true
    }
}

/// Function names are parsed out of the source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyNames;

impl EnvironmentProbe for LegacyNames {
    fn has_native_names(&self) -> bool {
        false
    }
}

/// Derives caller labels.
pub struct CallerResolver {
    probe: Box<dyn EnvironmentProbe>,
}

impl Default for CallerResolver {
    fn default() -> Self {
        Self::new(NativeNames)
    }
}

impl std::fmt::Debug for CallerResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallerResolver")
            .field("native_names", &self.probe.has_native_names())
            .finish()
    }
}

impl CallerResolver {
    /// A resolver consulting `probe` for how names are found.
    pub fn new(probe: impl EnvironmentProbe + 'static) -> Self {
        Self {
            probe: Box::new(probe),
        }
    }

    pub(crate) fn from_boxed(probe: Box<dyn EnvironmentProbe>) -> Self {
        Self { probe }
    }

    /// Resolve the display label for `caller`.
    ///
    /// `snippet_length` bounds the source snippet used for unnamed functions.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError::StrictMode`] when the caller is a strict
    /// function.
    pub fn resolve(
        &self,
        caller: Option<&FunctionRef>,
        snippet_length: usize,
    ) -> Result<String, IntrospectionError> {
        let Some(func) = caller else {
            return Ok(NO_CALLER.to_string());
        };
        if func.is_strict() {
            return Err(IntrospectionError::StrictMode);
        }

        let text = collapse_whitespace(truncate_chars(func.source(), SOURCE_SCAN_LIMIT));

        let name = if self.probe.has_native_names() {
            func.name().map(str::to_string)
        } else {
            name_from_source(&text)
        };

        Ok(name.unwrap_or_else(|| truncate_chars(&text, snippet_length).to_string()))
    }
}

/// First `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Replace each run of whitespace with a single space.
///
/// Leading and trailing runs are collapsed too, not trimmed.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Recover a name from source text like `fn name(..` or `function name(..`.
///
/// Returns `None` for anonymous forms such as `function () {` or closures.
fn name_from_source(text: &str) -> Option<String> {
    let rest = text.trim_start();
    let rest = rest
        .strip_prefix("function")
        .or_else(|| rest.strip_prefix("fn"))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let paren = rest.find('(')?;
    let name = rest[..paren].trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
#[path = "caller_tests.rs"]
mod tests;
