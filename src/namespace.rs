//! Event namespaces.
//!
//! A namespace is a string key identifying an event category. Namespaces
//! form an implicit hierarchy by dot-delimited prefix: `"slide.funny"` is
//! a descendant of `"slide"`, so subscribers of `"slide"` receive
//! emissions published to `"slide.funny"` (never the other way around).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NamespaceError;

/// A hierarchical, dot-delimited event namespace.
///
/// [`Namespace::new`] accepts any string: the registry performs no format
/// validation, and an unusual name simply matches (or fails to match)
/// by the prefix rule below. Callers wanting early validation can use
/// [`Namespace::parse`] instead.
///
/// Namespaces order byte-lexicographically. Dispatch walks matching
/// namespaces in descending order, which approximates "most specific
/// first" for typical dot hierarchies. It is a heuristic, not a
/// topological guarantee: for example `"slidex"` sorts after
/// `"slide.a"`, so oddly shaped sibling names can interleave. The
/// heuristic is part of the behavior contract and is kept as-is.
///
/// # Examples
///
/// ```
/// use herald::Namespace;
///
/// let ns = Namespace::new("slide");
/// assert!(ns.receives("slide"));
/// assert!(ns.receives("slide.funny.click"));
/// assert!(!ns.receives("slideshow"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace from any string, without validation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a namespace, rejecting empty names and empty segments.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError::Empty`] for `""` and
    /// [`NamespaceError::EmptySegment`] when any dot-delimited segment is
    /// empty (`".a"`, `"a."`, `"a..b"`).
    ///
    /// # Examples
    ///
    /// ```
    /// use herald::Namespace;
    ///
    /// assert!(Namespace::parse("slide.funny").is_ok());
    /// assert!(Namespace::parse("slide..funny").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, NamespaceError> {
        if name.is_empty() {
            return Err(NamespaceError::Empty);
        }
        if let Some(index) = name.split('.').position(str::is_empty) {
            return Err(NamespaceError::EmptySegment { index });
        }
        Ok(Self(name.to_string()))
    }

    /// The namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when an emission to `emitted` reaches subscribers of this
    /// namespace: `emitted` equals this namespace or is a dot-delimited
    /// descendant of it.
    #[must_use]
    pub fn receives(&self, emitted: &str) -> bool {
        covers(&self.0, emitted)
    }

    /// True when this namespace equals `ancestor` or is a dot-delimited
    /// descendant of it. This is the relation unsubscription uses: an
    /// `off` on `ancestor` covers every namespace within it.
    #[must_use]
    pub fn is_within(&self, ancestor: &str) -> bool {
        covers(ancestor, &self.0)
    }
}

/// `descendant` equals `ancestor` or starts with `ancestor + "."`.
fn covers(ancestor: &str, descendant: &str) -> bool {
    descendant == ancestor
        || descendant
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('.'))
}

impl From<&str> for Namespace {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Namespace {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Namespace {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
