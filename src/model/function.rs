//! Descriptions of user functions.
//!
//! Rust closures carry neither a name nor their source text at runtime, so
//! code that wants a meaningful caller label describes its functions with a
//! [`FunctionRef`]. The [`function_ref!`](crate::function_ref) macro fills in
//! the source text and arity from the tokens themselves.

/// Name, source text, and declared arity of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRef {
    name: Option<String>,
    source: String,
    arity: usize,
    strict: bool,
}

impl FunctionRef {
    /// An unnamed function with the given source text and no parameters.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            name: None,
            source: source.into(),
            arity: 0,
            strict: false,
        }
    }

    /// A named function whose source text is just its signature.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: format!("fn {name}()"),
            name: Some(name),
            arity: 0,
            strict: false,
        }
    }

    /// Set the declared name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the declared parameter count.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Marks the function as running in strict mode, where callers may not
    /// inspect it.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Declared name; an empty name counts as no name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Source text of the function.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Whether the function forbids caller inspection.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// Builds a [`FunctionRef`] from a function or closure literal.
///
/// ```
/// use historical_console::function_ref;
///
/// let named = function_ref!(fn load_user(id) { fetch(id) });
/// assert_eq!(named.name(), Some("load_user"));
/// assert_eq!(named.arity(), 1);
///
/// let anonymous = function_ref!(|a, b| a + b);
/// assert_eq!(anonymous.name(), None);
/// assert_eq!(anonymous.arity(), 2);
/// ```
#[macro_export]
macro_rules! function_ref {
    (fn $name:ident ($($param:ident),* $(,)?) $body:block) => {
        $crate::FunctionRef::new(stringify!(fn $name($($param),*) $body))
            .with_name(stringify!($name))
            .with_arity($crate::function_ref!(@count $($param)*))
    };
    (|| $body:expr) => {
        $crate::FunctionRef::new(stringify!(|| $body))
    };
    (|$($param:ident),* $(,)?| $body:expr) => {
        $crate::FunctionRef::new(stringify!(|$($param),*| $body))
            .with_arity($crate::function_ref!(@count $($param)*))
    };
    (@count) => { 0usize };
    (@count $head:ident $($tail:ident)*) => {
        1usize + $crate::function_ref!(@count $($tail)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_function_has_signature_source() {
        let f = FunctionRef::named("someName");
        assert_eq!(f.name(), Some("someName"));
        assert_eq!(f.source(), "fn someName()");
        assert_eq!(f.arity(), 0);
    }

    #[test]
    fn empty_name_is_no_name() {
        let f = FunctionRef::new("|| {}").with_name("");
        assert_eq!(f.name(), None);
    }

    #[test]
    fn macro_counts_parameters() {
        let none = crate::function_ref!(|| 1);
        let one = crate::function_ref!(|console| console);
        let three = crate::function_ref!(fn add3(a, b, c) { a + b + c });
        assert_eq!(none.arity(), 0);
        assert_eq!(one.arity(), 1);
        assert_eq!(three.arity(), 3);
        assert_eq!(three.name(), Some("add3"));
    }

    #[test]
    fn macro_captures_source_text() {
        let f = crate::function_ref!(|console| console.debug("x"));
        assert!(f.source().contains("debug"), "source was {:?}", f.source());
        assert!(!f.is_strict());
    }
}
