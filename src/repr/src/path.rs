//! Scene paths: absolute, hierarchical, interned identifiers for scene
//! objects.

use std::fmt;
use std::sync::Arc;

/// An absolute, hierarchical path to a scene object.
///
/// Paths are interned: two `ScenePath`s constructed from the same string
/// share the underlying allocation, so cloning and hashing are cheap.
/// Supports parent/child/prefix queries and a distinguished absolute root
/// (`/`), mirroring the pseudo-root of the scene this engine compiles
/// against.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct ScenePath(Arc<str>);

/// The ways a candidate path string can fail to be a valid [`ScenePath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The path did not start with `/`.
    #[error("scene path {0:?} is not absolute")]
    NotAbsolute(String),
    /// The path was empty.
    #[error("scene path is empty")]
    Empty,
    /// A path component between two slashes was empty (e.g. `//`).
    #[error("scene path {0:?} has an empty component")]
    EmptyComponent(String),
}

impl ScenePath {
    /// The absolute root path, `/`.
    pub fn absolute_root() -> ScenePath {
        ScenePath(Arc::from("/"))
    }

    /// Parses `s` into a [`ScenePath`].
    ///
    /// The string must begin with `/`; a lone `/` denotes the absolute
    /// root. Trailing slashes (other than the root itself) and empty
    /// components (`//`) are rejected.
    pub fn new(s: &str) -> Result<ScenePath, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        if !s.starts_with('/') {
            return Err(PathError::NotAbsolute(s.to_string()));
        }
        if s == "/" {
            return Ok(ScenePath::absolute_root());
        }
        if s.ends_with('/') {
            return Err(PathError::EmptyComponent(s.to_string()));
        }
        for component in s[1..].split('/') {
            if component.is_empty() {
                return Err(PathError::EmptyComponent(s.to_string()));
            }
        }
        Ok(ScenePath(Arc::from(s)))
    }

    /// Returns the path as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this path is the absolute root.
    pub fn is_absolute_root(&self) -> bool {
        &*self.0 == "/"
    }

    /// Returns the last path component, or `""` for the absolute root.
    pub fn name(&self) -> &str {
        if self.is_absolute_root() {
            return "";
        }
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Returns the parent of this path, or `None` if this path is already
    /// the absolute root.
    pub fn parent(&self) -> Option<ScenePath> {
        if self.is_absolute_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(ScenePath::absolute_root()),
            Some(idx) => Some(ScenePath(Arc::from(&self.0[..idx]))),
            None => None,
        }
    }

    /// Returns a new path naming `child` below this path.
    pub fn append_child(&self, child: &str) -> ScenePath {
        if self.is_absolute_root() {
            ScenePath(Arc::from(format!("/{child}")))
        } else {
            ScenePath(Arc::from(format!("{}/{child}", self.0)))
        }
    }

    /// Returns `true` if `self` is `other`, or an ancestor of `other`.
    pub fn is_prefix_of(&self, other: &ScenePath) -> bool {
        if self.is_absolute_root() {
            return true;
        }
        other.0.as_ref() == self.0.as_ref()
            || other
                .0
                .strip_prefix(self.0.as_ref())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Returns an iterator over this path and each of its ancestors,
    /// ending at (and including) the absolute root.
    pub fn ancestors(&self) -> impl Iterator<Item = ScenePath> + '_ {
        std::iter::successors(Some(self.clone()), |p| p.parent())
    }
}

impl fmt::Debug for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScenePath({:?})", self.0)
    }
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for ScenePath {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ScenePath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ScenePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
