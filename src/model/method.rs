//! Console method kinds.
//!
//! The facade exposes a closed set of logging verbs. Each verb has a stable
//! camelCase tag, which is what appears as element 0 of a history record.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the fixed logging verbs the facade intercepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodKind {
    /// `console.assert`.
    Assert,
    /// `console.clear`.
    Clear,
    /// `console.count`.
    Count,
    /// `console.debug`.
    Debug,
    /// `console.dir`.
    Dir,
    /// `console.dirxml`.
    Dirxml,
    /// `console.error`.
    Error,
    /// `console.exception`.
    Exception,
    /// `console.group`.
    Group,
    /// `console.groupCollapsed`.
    GroupCollapsed,
    /// `console.groupEnd`.
    GroupEnd,
    /// `console.info`.
    Info,
    /// `console.log`.
    Log,
    /// `console.profile`.
    Profile,
    /// `console.profileEnd`.
    ProfileEnd,
    /// `console.table`.
    Table,
    /// `console.time`.
    Time,
    /// `console.timeEnd`.
    TimeEnd,
    /// `console.timeStamp`.
    TimeStamp,
    /// `console.trace`.
    Trace,
    /// `console.warn`.
    Warn,
    /// `console.alert`.
    Alert,
}

impl MethodKind {
    /// Every method kind, in facade declaration order.
    pub const ALL: [MethodKind; 22] = [
        MethodKind::Assert,
        MethodKind::Clear,
        MethodKind::Count,
        MethodKind::Debug,
        MethodKind::Dir,
        MethodKind::Dirxml,
        MethodKind::Error,
        MethodKind::Exception,
        MethodKind::Group,
        MethodKind::GroupCollapsed,
        MethodKind::GroupEnd,
        MethodKind::Info,
        MethodKind::Log,
        MethodKind::Profile,
        MethodKind::ProfileEnd,
        MethodKind::Table,
        MethodKind::Time,
        MethodKind::TimeEnd,
        MethodKind::TimeStamp,
        MethodKind::Trace,
        MethodKind::Warn,
        MethodKind::Alert,
    ];

    /// The tag recorded in history, e.g. `"groupCollapsed"`.
    pub fn as_str(self) -> &'static str {
        match self {
            MethodKind::Assert => "assert",
            MethodKind::Clear => "clear",
            MethodKind::Count => "count",
            MethodKind::Debug => "debug",
            MethodKind::Dir => "dir",
            MethodKind::Dirxml => "dirxml",
            MethodKind::Error => "error",
            MethodKind::Exception => "exception",
            MethodKind::Group => "group",
            MethodKind::GroupCollapsed => "groupCollapsed",
            MethodKind::GroupEnd => "groupEnd",
            MethodKind::Info => "info",
            MethodKind::Log => "log",
            MethodKind::Profile => "profile",
            MethodKind::ProfileEnd => "profileEnd",
            MethodKind::Table => "table",
            MethodKind::Time => "time",
            MethodKind::TimeEnd => "timeEnd",
            MethodKind::TimeStamp => "timeStamp",
            MethodKind::Trace => "trace",
            MethodKind::Warn => "warn",
            MethodKind::Alert => "alert",
        }
    }

    /// Position of this kind within [`MethodKind::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MethodKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A method tag that does not name any known console verb.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown console method: {0:?}")]
pub struct UnknownMethod(pub String);

impl FromStr for MethodKind {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MethodKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kinds_are_in_index_order() {
        for (position, kind) in MethodKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position, "{kind} is out of order");
        }
    }

    #[test]
    fn tags_parse_back_to_their_kind() {
        for kind in MethodKind::ALL {
            assert_eq!(kind.as_str().parse::<MethodKind>(), Ok(kind));
        }
    }

    #[test]
    fn camel_case_tags_are_preserved() {
        assert_eq!(MethodKind::GroupCollapsed.as_str(), "groupCollapsed");
        assert_eq!(MethodKind::TimeEnd.to_string(), "timeEnd");
        assert_eq!(MethodKind::TimeStamp.as_str(), "timeStamp");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "shout".parse::<MethodKind>().unwrap_err();
        assert_eq!(err, UnknownMethod("shout".to_string()));
    }

    #[test]
    fn serializes_as_tag_string() {
        let json = serde_json::to_string(&MethodKind::ProfileEnd).unwrap();
        assert_eq!(json, "\"profileEnd\"");
    }
}
