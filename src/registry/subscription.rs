//! Subscription identities and records.
//!
//! Identity types are intentionally serializable so applications can log
//! or persist routing information alongside their own state.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a subscriber context.
///
/// The registry groups subscriptions by context so they can be removed
/// together with [`Emitter::off`](crate::Emitter::off). Handlers own
/// their state by closure capture; the context id carries identity only.
/// Copies of one id compare equal, which is how "same context" is
/// decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    /// Mint a new random context id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a single subscription record.
///
/// Lifetime wrappers use it to remove exactly their own record,
/// independent of other subscriptions sharing the same context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Mint a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered handler. Shared so a dispatch snapshot can outlive
/// removal of the record it was taken from.
pub(crate) type Handler = Rc<dyn Fn()>;

/// One (context, handler) registration under a namespace.
#[derive(Clone)]
pub(crate) struct SubscriptionRecord {
    pub(crate) id: SubscriptionId,
    pub(crate) context: ContextId,
    pub(crate) handler: Handler,
}
