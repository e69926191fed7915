//! Core data model: method kinds, argument values, history records, function
//! descriptions, and errors.

pub mod error;
pub mod function;
pub mod method;
pub mod record;
pub mod value;

pub use error::{ConsoleError, IntrospectionError, Thrown, UsageError};
pub use function::FunctionRef;
pub use method::{MethodKind, UnknownMethod};
pub use record::{HistoryLog, HistoryRecord, CALLER_PREFIX};
pub use value::IntoArgs;
