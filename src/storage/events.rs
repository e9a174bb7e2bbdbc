//! Change notifications for table rows
//!
//! Every repository owns an [`EventBus`]. After a row is inserted, updated or
//! deleted in memory the bus tells each subscriber, in registration order.
//! [`LiveCache`] is the stock subscriber: an id-indexed copy of one user's
//! rows that applies events as they arrive, so the last write wins. The
//! report service keeps one per table it reads.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::models::{
    Budget, BudgetId, Category, CategoryId, Goal, GoalId, RecurringId, RecurringTransaction,
    Transaction, TransactionId, UserId,
};

/// A row that can live in a JSON table
pub trait Row: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Key: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn key(&self) -> Self::Key;

    /// The user the row belongs to
    fn owner(&self) -> UserId;
}

impl Row for Transaction {
    type Key = TransactionId;

    fn key(&self) -> TransactionId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

impl Row for Category {
    type Key = CategoryId;

    fn key(&self) -> CategoryId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

impl Row for Budget {
    type Key = BudgetId;

    fn key(&self) -> BudgetId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

impl Row for Goal {
    type Key = GoalId;

    fn key(&self) -> GoalId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

impl Row for RecurringTransaction {
    type Key = RecurringId;

    fn key(&self) -> RecurringId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

/// What happened to a row
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent<T: Row> {
    Inserted(T),
    Updated(T),
    Deleted { key: T::Key, owner: UserId },
}

impl<T: Row> ChangeEvent<T> {
    pub fn key(&self) -> T::Key {
        match self {
            Self::Inserted(row) | Self::Updated(row) => row.key(),
            Self::Deleted { key, .. } => *key,
        }
    }

    pub fn owner(&self) -> UserId {
        match self {
            Self::Inserted(row) | Self::Updated(row) => row.owner(),
            Self::Deleted { owner, .. } => *owner,
        }
    }
}

/// Receives row changes from a repository
pub trait ChangeSubscriber<T: Row>: Send + Sync {
    fn on_change(&self, event: &ChangeEvent<T>);
}

/// Fan-out of change events to registered subscribers
pub struct EventBus<T: Row> {
    subscribers: RwLock<Vec<Arc<dyn ChangeSubscriber<T>>>>,
}

impl<T: Row> Default for EventBus<T> {
    fn default() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Row> EventBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: Arc<dyn ChangeSubscriber<T>>) {
        match self.subscribers.write() {
            Ok(mut subscribers) => subscribers.push(subscriber),
            Err(e) => warn!("Failed to register subscriber: {}", e),
        }
    }

    /// Deliver an event to every subscriber.
    ///
    /// Must be called without holding the repository's row lock, so a
    /// subscriber may read the repository back.
    pub fn publish(&self, event: &ChangeEvent<T>) {
        let subscribers = match self.subscribers.read() {
            Ok(subscribers) => subscribers.clone(),
            Err(e) => {
                warn!("Failed to read subscribers: {}", e);
                return;
            }
        };

        for subscriber in subscribers {
            subscriber.on_change(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }
}

/// An id-indexed view of one user's rows, kept current by change events
pub struct LiveCache<T: Row> {
    user_id: UserId,
    rows: RwLock<HashMap<T::Key, T>>,
}

impl<T: Row> LiveCache<T> {
    /// Start a cache from an initial fetch; rows owned by other users are
    /// dropped.
    pub fn new(user_id: UserId, initial: Vec<T>) -> Self {
        let rows = initial
            .into_iter()
            .filter(|row| row.owner() == user_id)
            .map(|row| (row.key(), row))
            .collect();

        Self {
            user_id,
            rows: RwLock::new(rows),
        }
    }

    pub fn get(&self, key: T::Key) -> Option<T> {
        self.rows.read().ok().and_then(|rows| rows.get(&key).cloned())
    }

    /// Snapshot of all cached rows, ordered by key
    pub fn rows(&self) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .read()
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        rows.sort_by_key(|row| row.key());
        rows
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Row> ChangeSubscriber<T> for LiveCache<T> {
    fn on_change(&self, event: &ChangeEvent<T>) {
        if event.owner() != self.user_id {
            return;
        }

        let Ok(mut rows) = self.rows.write() else {
            warn!("Live cache lock poisoned, dropping event for {}", event.key());
            return;
        };

        match event {
            ChangeEvent::Inserted(row) | ChangeEvent::Updated(row) => {
                rows.insert(row.key(), row.clone());
            }
            ChangeEvent::Deleted { key, .. } => {
                rows.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, Money};

    fn goal(user: UserId, name: &str) -> Goal {
        Goal::new(user, name, Money::from_units(100))
    }

    #[test]
    fn test_cache_applies_events_in_order() {
        let user = UserId::new();
        let cache = Arc::new(LiveCache::<Goal>::new(user, Vec::new()));
        let bus: EventBus<Goal> = EventBus::new();
        bus.subscribe(cache.clone());

        let mut car = goal(user, "Car");
        bus.publish(&ChangeEvent::Inserted(car.clone()));
        assert_eq!(cache.len(), 1);

        car.name = "New car".into();
        bus.publish(&ChangeEvent::Updated(car.clone()));
        assert_eq!(cache.get(car.id).unwrap().name, "New car");

        bus.publish(&ChangeEvent::Deleted { key: car.id, owner: user });
        assert!(cache.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let user = UserId::new();
        let cache = LiveCache::<Goal>::new(user, Vec::new());
        let mut first = goal(user, "A");
        let mut second = first.clone();
        first.name = "first".into();
        second.name = "second".into();

        cache.on_change(&ChangeEvent::Updated(first));
        cache.on_change(&ChangeEvent::Updated(second.clone()));
        assert_eq!(cache.get(second.id).unwrap().name, "second");
    }

    #[test]
    fn test_other_users_are_ignored() {
        let me = UserId::new();
        let other = UserId::new();
        let cache = LiveCache::new(me, vec![goal(me, "Mine"), goal(other, "Theirs")]);
        assert_eq!(cache.len(), 1);

        cache.on_change(&ChangeEvent::Inserted(goal(other, "Also theirs")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.rows()[0].name, "Mine");
    }

    #[test]
    fn test_deleting_unknown_key_is_noop() {
        let user = UserId::new();
        let cache = LiveCache::new(user, vec![goal(user, "Keep")]);
        cache.on_change(&ChangeEvent::Deleted { key: GoalId::new(), owner: user });
        assert_eq!(cache.len(), 1);
    }
}
