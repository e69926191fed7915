//! History records and the append-only history log.

use super::MethodKind;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Prefix of the trailing caller element of a record.
pub const CALLER_PREFIX: &str = "caller:";

/// One intercepted console call.
///
/// In sequence form a record is `[method, args..., "caller:<label>"]`, where
/// the caller element is present only when caller tracking produced a label.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    method: MethodKind,
    args: Vec<Value>,
    caller: Option<String>,
}

impl HistoryRecord {
    /// A record of `method` with normalized `args` and an optional caller label.
    pub fn new(method: MethodKind, args: Vec<Value>, caller: Option<String>) -> Self {
        Self {
            method,
            args,
            caller,
        }
    }

    /// Method kind, element 0 of the sequence form.
    pub fn method(&self) -> MethodKind {
        self.method
    }

    /// Normalized arguments, excluding the method tag and the caller element.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Resolved caller label without the `caller:` prefix.
    pub fn caller(&self) -> Option<&str> {
        self.caller.as_deref()
    }

    /// The trailing `caller:<label>` element, if any.
    pub fn caller_element(&self) -> Option<String> {
        self.caller
            .as_ref()
            .map(|label| format!("{CALLER_PREFIX}{label}"))
    }

    /// The record as a flat value sequence.
    pub fn to_values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.args.len() + 2);
        values.push(Value::from(self.method.as_str()));
        values.extend(self.args.iter().cloned());
        if let Some(caller) = self.caller_element() {
            values.push(Value::from(caller));
        }
        values
    }
}

impl Serialize for HistoryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.args.len() + 1 + usize::from(self.caller.is_some());
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.method)?;
        for arg in &self.args {
            seq.serialize_element(arg)?;
        }
        if let Some(caller) = self.caller_element() {
            seq.serialize_element(&caller)?;
        }
        seq.end()
    }
}

/// Ordered, append-only sequence of records in call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    /// All records, in call order.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Iterate records in call order.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    /// Records of one method kind, in call order.
    pub fn of_kind(&self, method: MethodKind) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().filter(move |r| r.method == method)
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryRecord;
    type IntoIter = std::slice::Iter<'a, HistoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
