//! Lightweight, comparable descriptors for computation result types.

use std::fmt;

/// A comparable descriptor for the type a computation produces.
///
/// Real computation value types live outside this core (§1 Non-goals: "the
/// computation value type plumbing" is an external collaborator); this
/// crate only needs enough of a type description to compare an input key's
/// requested result type against a definition's declared result type.
/// `ResultType::UNKNOWN` is permitted only for leaf requests (§4.3), where
/// the caller accepts whatever type the resolved computation happens to
/// produce.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultType(Option<&'static str>);

impl ResultType {
    /// The unknown result type, used by leaf requests that accept any
    /// result type from the computation they resolve to.
    pub const UNKNOWN: ResultType = ResultType(None);

    /// Constructs a concrete, named result type.
    pub const fn of(type_name: &'static str) -> Self {
        ResultType(Some(type_name))
    }

    /// Returns `true` if this is [`ResultType::UNKNOWN`].
    pub fn is_unknown(&self) -> bool {
        self.0.is_none()
    }

    /// Returns `true` if `self` is compatible with `declared`: either
    /// `self` is unknown, or the two name the same type.
    pub fn matches(&self, declared: ResultType) -> bool {
        self.is_unknown() || *self == declared
    }
}

impl fmt::Debug for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(name) => write!(f, "ResultType({name})"),
            None => write!(f, "ResultType(unknown)"),
        }
    }
}
