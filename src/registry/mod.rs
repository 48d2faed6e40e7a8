//! Subscription registry subsystem.
//!
//! The registry owns a mapping from event namespace to an ordered
//! sequence of subscription records and dispatches emissions over it
//! synchronously. Subscription-lifetime wrappers (bounded count,
//! throttled, deadline-bounded) are policy layered on top of plain
//! subscription; the store itself knows nothing about them.

/// Public emitter handle.
pub mod emitter;
/// Namespace-keyed subscription storage.
pub(crate) mod store;
/// Subscription identities and records.
pub mod subscription;

pub use emitter::Emitter;
pub use subscription::{ContextId, SubscriptionId};
