//! Console argument values.
//!
//! Arguments are arbitrary JSON values. Hooks that need a boolean or a
//! string view of an argument use the loose truthiness and display rules
//! below, which mirror how a browser console stringifies its arguments.

use serde_json::Value;

/// Rendering used for an argument that was never passed.
pub const UNDEFINED: &str = "undefined";

/// Loose truthiness: `null`, `false`, `0`, and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display form of an argument. Strings render without quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display form of an optional argument; absent renders as `undefined`.
pub fn display_arg(value: Option<&Value>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), display_value)
}

/// Name of the value's kind, used in option type-mismatch warnings.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Conversion of call-site arguments into the variadic argument list.
///
/// Implemented for single values (`"x"`, `42`, `true`, [`Value`]), arrays,
/// vectors, slices of values, tuples up to four elements, and `()` for an
/// empty call.
pub trait IntoArgs {
    /// The argument list.
    fn into_args(self) -> Vec<Value>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoArgs for Value {
    fn into_args(self) -> Vec<Value> {
        vec![self]
    }
}

impl IntoArgs for &str {
    fn into_args(self) -> Vec<Value> {
        vec![Value::from(self)]
    }
}

impl IntoArgs for String {
    fn into_args(self) -> Vec<Value> {
        vec![Value::from(self)]
    }
}

impl IntoArgs for &[Value] {
    fn into_args(self) -> Vec<Value> {
        self.to_vec()
    }
}

impl<T: Into<Value>> IntoArgs for Vec<T> {
    fn into_args(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Value>, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! scalar_args {
    ($($ty:ty),*) => {
        $(
            impl IntoArgs for $ty {
                fn into_args(self) -> Vec<Value> {
                    vec![Value::from(self)]
                }
            }
        )*
    };
}

scalar_args!(bool, i32, i64, u32, u64, usize, f64);

macro_rules! tuple_args {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Value> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_args!(A);
tuple_args!(A, B);
tuple_args!(A, B, C);
tuple_args!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        for value in [json!(true), json!(1), json!(-3.5), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn strings_display_without_quotes() {
        assert_eq!(display_value(&json!("lookup")), "lookup");
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(display_arg(None), "undefined");
    }

    #[test]
    fn tuples_keep_argument_order() {
        let args = ("a", 1, true).into_args();
        assert_eq!(args, vec![json!("a"), json!(1), json!(true)]);
    }

    #[test]
    fn unit_is_an_empty_call() {
        assert!(().into_args().is_empty());
    }
}
