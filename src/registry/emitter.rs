//! The public emitter handle.
//!
//! All registry operations run synchronously on the caller's stack.
//! `emit` computes its dispatch list once, before any handler runs, so
//! handlers may subscribe, unsubscribe, or emit re-entrantly without
//! disturbing the delivery already in flight.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::namespace::Namespace;
use crate::registry::store::SubscriptionStore;
use crate::registry::subscription::{ContextId, Handler, SubscriptionId, SubscriptionRecord};

/// An in-process publish/subscribe registry with hierarchical,
/// dot-delimited event namespaces.
///
/// Subscribing to a namespace also receives emissions published to any
/// of its descendants: a subscriber of `"slide"` sees `"slide"`,
/// `"slide.funny"`, and `"slide.funny.click"`. Delivery is synchronous
/// and ordered: more specific namespaces first (descending lexicographic
/// order), registration order within one namespace.
///
/// `Emitter` is a handle over shared state: clones operate on the same
/// registry, which lets a handler capture a clone and unsubscribe during
/// dispatch. Independently constructed emitters share nothing.
///
/// Every method returns `&Self`, so calls chain fluently.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use herald::{ContextId, Emitter};
///
/// let emitter = Emitter::new();
/// let ctx = ContextId::new();
///
/// let hits = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&hits);
/// emitter
///     .on("slide", ctx, move || seen.set(seen.get() + 1))
///     .emit("slide.funny")
///     .emit("slide");
/// assert_eq!(hits.get(), 2);
/// ```
#[derive(Clone)]
pub struct Emitter {
    store: Rc<RefCell<SubscriptionStore>>,
}

impl Emitter {
    /// Creates a fresh registry with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Rc::new(RefCell::new(SubscriptionStore::default())),
        }
    }

    /// Registers `handler` under `event` for the given context.
    ///
    /// The record is appended to the namespace's sequence, so handlers
    /// on one namespace fire in registration order. Any string is
    /// accepted as a namespace; nothing is validated.
    pub fn on(
        &self,
        event: impl Into<Namespace>,
        context: ContextId,
        handler: impl Fn() + 'static,
    ) -> &Self {
        self.register(event.into(), context, SubscriptionId::new(), Rc::new(handler));
        self
    }

    /// Removes every subscription of `context` under `event` and all of
    /// its descendant namespaces, regardless of handler.
    ///
    /// Removing from a namespace/context pair with no matches is a
    /// no-op. A dispatch already in flight is unaffected; the removal is
    /// visible to any later (or re-entrant) `emit`.
    pub fn off(&self, event: &str, context: ContextId) -> &Self {
        let removed = self.store.borrow_mut().remove_context(event, context);
        trace!(event, context = %context, removed, "subscriptions removed");
        self
    }

    /// Publishes `event`, synchronously invoking every matching handler.
    ///
    /// The dispatch list is computed once, before the first handler
    /// runs: namespaces matching `event` in descending lexicographic
    /// order, then each namespace's handlers in registration order.
    /// Unknown events invoke nothing. Handler panics are not caught;
    /// one panicking handler aborts delivery to the rest of that
    /// fan-out.
    pub fn emit(&self, event: &str) -> &Self {
        let dispatch = self.store.borrow().snapshot(event);
        trace!(event, fan_out = dispatch.len(), "dispatching");
        for handler in dispatch {
            handler();
        }
        self
    }

    /// Registers `handler` for at most `times` deliveries, after which
    /// the subscription removes itself.
    ///
    /// The countdown is private to this one subscription. Self-removal
    /// targets exactly this record, never other subscriptions of the
    /// same context. `times == 0` means no limit, identical to
    /// [`on`](Self::on).
    ///
    /// A dispatch list captured before the countdown ran out still
    /// delivers in full; the countdown saturates at zero, so such a late
    /// delivery invokes the handler once more and the removal stays
    /// idempotent.
    pub fn several(
        &self,
        event: impl Into<Namespace>,
        context: ContextId,
        handler: impl Fn() + 'static,
        times: usize,
    ) -> &Self {
        let namespace = event.into();
        if times == 0 {
            self.register(namespace, context, SubscriptionId::new(), Rc::new(handler));
            return self;
        }

        let id = SubscriptionId::new();
        let store = Rc::downgrade(&self.store);
        let home = namespace.clone();
        let remaining = Cell::new(times);
        let wrapper = move || {
            handler();
            remaining.set(remaining.get().saturating_sub(1));
            if remaining.get() == 0 {
                unsubscribe_by_id(&store, &home, id);
            }
        };
        self.register(namespace, context, id, Rc::new(wrapper));
        self
    }

    /// Registers `handler` to fire on every `frequency`-th delivery
    /// attempt, starting with the first.
    ///
    /// The attempt counter is private to this one subscription and
    /// advances whether or not the handler fired. The subscription never
    /// removes itself. `frequency == 0` means no gating, identical to
    /// [`on`](Self::on).
    pub fn through(
        &self,
        event: impl Into<Namespace>,
        context: ContextId,
        handler: impl Fn() + 'static,
        frequency: usize,
    ) -> &Self {
        let namespace = event.into();
        if frequency == 0 {
            self.register(namespace, context, SubscriptionId::new(), Rc::new(handler));
            return self;
        }

        let attempts = Cell::new(0_usize);
        let wrapper = move || {
            if attempts.get() % frequency == 0 {
                handler();
            }
            attempts.set(attempts.get().wrapping_add(1));
        };
        self.register(namespace, context, SubscriptionId::new(), Rc::new(wrapper));
        self
    }

    /// Registers `handler` until `deadline`, after which the
    /// subscription removes itself without firing.
    ///
    /// Expiry is lazy: the record lingers until the next matching
    /// dispatch touches it. A deadline already in the past yields a
    /// subscription that never fires.
    pub fn until(
        &self,
        event: impl Into<Namespace>,
        context: ContextId,
        handler: impl Fn() + 'static,
        deadline: DateTime<Utc>,
    ) -> &Self {
        let namespace = event.into();
        let id = SubscriptionId::new();
        let store = Rc::downgrade(&self.store);
        let home = namespace.clone();
        let wrapper = move || {
            if Utc::now() < deadline {
                handler();
            } else {
                unsubscribe_by_id(&store, &home, id);
            }
        };
        self.register(namespace, context, id, Rc::new(wrapper));
        self
    }

    /// The number of live subscriptions stored under exactly `event`
    /// (descendant namespaces are not counted).
    #[must_use]
    pub fn subscription_count(&self, event: &str) -> usize {
        self.store.borrow().count(event)
    }

    fn register(&self, namespace: Namespace, context: ContextId, id: SubscriptionId, handler: Handler) {
        trace!(namespace = %namespace, context = %context, "subscription registered");
        self.store
            .borrow_mut()
            .insert(namespace, SubscriptionRecord { id, context, handler });
    }
}

/// Identity-based removal used by lifetime wrappers. The weak reference
/// keeps wrappers from forming a reference cycle with the store that
/// owns them; once the registry is gone the removal has nothing to do.
fn unsubscribe_by_id(store: &Weak<RefCell<SubscriptionStore>>, namespace: &Namespace, id: SubscriptionId) {
    if let Some(store) = store.upgrade() {
        store.borrow_mut().remove_subscription(namespace.as_str(), id);
        trace!(namespace = %namespace, subscription = %id, "subscription expired");
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::Duration;

    use super::*;

    fn counting(hits: &Rc<Cell<usize>>) -> impl Fn() + 'static {
        let hits = Rc::clone(hits);
        move || hits.set(hits.get() + 1)
    }

    #[test]
    fn several_counts_down_and_removes_itself() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let hits = Rc::new(Cell::new(0));
        emitter.several("x", ctx, counting(&hits), 3);

        for _ in 0..4 {
            emitter.emit("x");
        }
        assert_eq!(hits.get(), 3);
        assert_eq!(emitter.subscription_count("x"), 0);
    }

    #[test]
    fn several_zero_never_expires() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let hits = Rc::new(Cell::new(0));
        emitter.several("x", ctx, counting(&hits), 0);

        for _ in 0..5 {
            emitter.emit("x");
        }
        assert_eq!(hits.get(), 5);
        assert_eq!(emitter.subscription_count("x"), 1);
    }

    #[test]
    fn several_self_removal_spares_same_context_neighbors() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let bounded = Rc::new(Cell::new(0));
        let unbounded = Rc::new(Cell::new(0));
        emitter
            .several("x", ctx, counting(&bounded), 1)
            .on("x", ctx, counting(&unbounded));

        emitter.emit("x").emit("x");
        assert_eq!(bounded.get(), 1);
        assert_eq!(unbounded.get(), 2);
        assert_eq!(emitter.subscription_count("x"), 1);
    }

    #[test]
    fn through_gates_by_attempt_counter() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let hits = Rc::new(Cell::new(0));
        emitter.through("x", ctx, counting(&hits), 2);

        for _ in 0..4 {
            emitter.emit("x");
        }
        // Attempts 0 and 2 fire.
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn through_zero_is_plain_subscription() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let hits = Rc::new(Cell::new(0));
        emitter.through("x", ctx, counting(&hits), 0);

        for _ in 0..3 {
            emitter.emit("x");
        }
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn through_counters_are_per_subscription() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        emitter
            .through("x", ctx, counting(&first), 2)
            .through("x", ctx, counting(&second), 3);

        for _ in 0..6 {
            emitter.emit("x");
        }
        assert_eq!(first.get(), 3);
        assert_eq!(second.get(), 2);
    }

    #[test]
    fn until_future_deadline_fires() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let hits = Rc::new(Cell::new(0));
        emitter.until("x", ctx, counting(&hits), Utc::now() + Duration::hours(1));

        emitter.emit("x").emit("x");
        assert_eq!(hits.get(), 2);
        assert_eq!(emitter.subscription_count("x"), 1);
    }

    #[test]
    fn until_past_deadline_never_fires_and_expires_lazily() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        let hits = Rc::new(Cell::new(0));
        emitter.until("x", ctx, counting(&hits), Utc::now() - Duration::seconds(1));

        assert_eq!(emitter.subscription_count("x"), 1);
        emitter.emit("x");
        assert_eq!(hits.get(), 0);
        assert_eq!(emitter.subscription_count("x"), 0);
    }

    #[test]
    fn subscription_count_is_exact_namespace_only() {
        let emitter = Emitter::new();
        let ctx = ContextId::new();
        emitter.on("slide", ctx, || {}).on("slide.funny", ctx, || {});
        assert_eq!(emitter.subscription_count("slide"), 1);
        assert_eq!(emitter.subscription_count("slide.funny"), 1);
        assert_eq!(emitter.subscription_count("deck"), 0);
    }
}
