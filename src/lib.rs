//! # Herald - hierarchical in-process publish/subscribe
//!
//! Herald is a single-process subscription registry with dot-delimited
//! event namespaces and ordered, synchronous delivery. Subscribing to a
//! namespace also receives emissions published to its descendants, so a
//! subscriber of `"slide"` sees `"slide.funny"` and
//! `"slide.funny.click"`.
//!
//! ## Core Concepts
//!
//! - **Namespace**: a string event key, hierarchical by dot-delimited prefix
//! - **Context**: an opaque identity grouping subscriptions for bulk removal
//! - **Subscription**: a (context, handler) pair registered under a namespace
//! - **Dispatch**: a snapshot of matching handlers, invoked in order on the
//!   caller's stack
//!
//! ## Usage
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use herald::{ContextId, Emitter};
//!
//! let emitter = Emitter::new();
//! let student = ContextId::new();
//!
//! let laughs = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&laughs);
//!
//! emitter
//!     .on("slide", student, move || seen.set(seen.get() + 1))
//!     .emit("slide.funny")
//!     .off("slide", student)
//!     .emit("slide.funny");
//!
//! assert_eq!(laughs.get(), 1);
//! ```
//!
//! Delivery is strictly single-threaded: handlers run in-line during
//! [`Emitter::emit`], and may themselves subscribe, unsubscribe, or emit
//! without affecting the dispatch already in progress.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod namespace;
pub mod registry;

// Re-export primary types at crate root for convenience
pub use error::NamespaceError;
pub use namespace::Namespace;
pub use registry::{ContextId, Emitter, SubscriptionId};
