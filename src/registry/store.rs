//! Namespace-keyed subscription storage.
//!
//! The store is a `BTreeMap` so dispatch can walk namespaces in
//! descending lexicographic order by reverse iteration. Within one
//! namespace, records keep registration order.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::namespace::Namespace;
use crate::registry::subscription::{ContextId, Handler, SubscriptionId, SubscriptionRecord};

#[derive(Default)]
pub(crate) struct SubscriptionStore {
    channels: BTreeMap<Namespace, Vec<SubscriptionRecord>>,
}

impl SubscriptionStore {
    /// Append a record to a namespace's sequence, creating it if absent.
    pub(crate) fn insert(&mut self, namespace: Namespace, record: SubscriptionRecord) {
        self.channels.entry(namespace).or_default().push(record);
    }

    /// Remove every record under `event` or a descendant of it whose
    /// context matches. Returns the number of records removed.
    ///
    /// A namespace left with an empty sequence may keep its key; an
    /// empty sequence contributes nothing to dispatch.
    pub(crate) fn remove_context(&mut self, event: &str, context: ContextId) -> usize {
        let mut removed = 0;
        for (name, records) in &mut self.channels {
            if !name.is_within(event) {
                continue;
            }
            let before = records.len();
            records.retain(|record| record.context != context);
            removed += before - records.len();
        }
        removed
    }

    /// Remove the one record carrying `id` from `namespace`. Returns
    /// whether a record was removed.
    pub(crate) fn remove_subscription(&mut self, namespace: &str, id: SubscriptionId) -> bool {
        let Some(records) = self.channels.get_mut(namespace) else {
            return false;
        };
        let before = records.len();
        records.retain(|record| record.id != id);
        records.len() != before
    }

    /// The dispatch list for `event`: handlers of every matching
    /// namespace, namespaces in descending lexicographic order,
    /// registration order within each namespace.
    ///
    /// Handlers are cloned out so the list is immune to any store
    /// mutation performed while it is being worked through.
    pub(crate) fn snapshot(&self, event: &str) -> Vec<Handler> {
        let mut handlers = Vec::new();
        for (name, records) in self.channels.iter().rev() {
            if name.receives(event) {
                handlers.extend(records.iter().map(|record| Rc::clone(&record.handler)));
            }
        }
        handlers
    }

    /// Live records stored under exactly `namespace`.
    pub(crate) fn count(&self, namespace: &str) -> usize {
        self.channels.get(namespace).map_or(0, Vec::len)
    }
}
