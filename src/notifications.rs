//! Read-state-preserving merge of freshly derived triggers into the
//! previous notification set.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::alerts::{LOW_BALANCE_PREFIX, OVERDUE_PREFIX, UPCOMING_PREFIX};
use crate::schema::Notification;

/// Ordered map of notifications keyed by their deterministic id.
///
/// This is the central data structure of the store: associativity of the
/// merge and the prune step both rely on id-keyed lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationSet {
    by_id: BTreeMap<String, Notification>,
}

impl NotificationSet {
    pub fn from_notifications(notifications: &[Notification]) -> Self {
        let by_id = notifications
            .iter()
            .map(|n| (n.id.clone(), n.clone()))
            .collect();
        Self { by_id }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.by_id.get(id)
    }

    pub fn unread_count(&self) -> usize {
        self.by_id.values().filter(|n| !n.read).count()
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.by_id.get_mut(id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for notification in self.by_id.values_mut() {
            notification.read = true;
        }
    }

    /// Notifications ordered newest first; ties broken by id ascending so
    /// the ordering is fully deterministic.
    pub fn sorted(&self) -> Vec<Notification> {
        let mut out: Vec<Notification> = self.by_id.values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        out
    }
}

/// True for ids produced by the alert rules; anything else is retained
/// across merges unconditionally.
fn is_alert_id(id: &str) -> bool {
    id.starts_with(OVERDUE_PREFIX)
        || id.starts_with(UPCOMING_PREFIX)
        || id.starts_with(LOW_BALANCE_PREFIX)
}

/// Merges freshly derived `triggers` into the `previous` notification set.
///
/// Where both sides carry an id, the trigger's fields win but the previous
/// entry's `read` flag is preserved. Alert ids absent from `triggers` are
/// stale and get pruned. Idempotent: merging the same triggers twice is a
/// no-op.
pub fn merge(previous: &[Notification], triggers: &[Notification]) -> Vec<Notification> {
    let previous_set = NotificationSet::from_notifications(previous);
    let trigger_set = NotificationSet::from_notifications(triggers);

    let mut merged: BTreeMap<String, Notification> = BTreeMap::new();

    for (id, old) in &previous_set.by_id {
        if is_alert_id(id) && !trigger_set.contains(id) {
            debug!("Pruning stale alert {}", id);
            continue;
        }
        merged.insert(id.clone(), old.clone());
    }

    for (id, trigger) in &trigger_set.by_id {
        let mut fresh = trigger.clone();
        if let Some(old) = previous_set.get(id) {
            fresh.read = old.read;
        }
        merged.insert(id.clone(), fresh);
    }

    NotificationSet { by_id: merged }.sorted()
}
