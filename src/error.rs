//! Error types for herald.
//!
//! Registry operations are deliberately infallible: unknown events
//! dispatch to nobody, unmatched removals are no-ops, and degenerate
//! wrapper parameters fall back to plain subscription. The only fallible
//! surface is strict namespace parsing.

use thiserror::Error;

/// Errors reported by [`Namespace::parse`](crate::Namespace::parse).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The namespace string was empty.
    #[error("namespace cannot be empty")]
    Empty,

    /// A dot-delimited segment was empty (leading, trailing, or doubled dot).
    #[error("namespace segment {index} is empty")]
    EmptySegment {
        /// Zero-based index of the offending segment.
        index: usize,
    },
}
