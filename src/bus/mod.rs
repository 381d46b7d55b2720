//! In-process event bus
//!
//! Synchronous publish/subscribe for domain events. Events published by one
//! caller are delivered to every current subscriber in publication order. A
//! failing subscriber is isolated: its panic is caught and logged, and
//! delivery continues to the remaining subscribers without the publisher
//! ever observing the failure.
//!
//! The bus holds no history. A subscriber only sees events published after
//! it subscribed.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::FileModelEvent;

/// Receives every event published on the bus after subscription
pub trait EventSubscriber: Send + Sync {
    /// Stable name used when reporting subscriber failures
    fn name(&self) -> &str;

    /// Handle one event. Called synchronously in publication order.
    fn on_event(&self, event: &FileModelEvent);
}

/// Process-wide event bus, constructed once at startup
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Arc<dyn EventSubscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for all future events
    pub fn subscribe(&self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Deliver an event to every current subscriber, in subscription order.
    /// Subscriber panics are caught and logged; they never propagate to the
    /// publisher or block later subscribers.
    pub fn publish(&self, event: &FileModelEvent) {
        // Snapshot the list so delivery runs without holding the lock
        let subscribers: Vec<Arc<dyn EventSubscriber>> = self.subscribers.read().clone();

        for subscriber in subscribers {
            let result = catch_unwind(AssertUnwindSafe(|| subscriber.on_event(event)));
            if result.is_err() {
                log::error!(
                    "event subscriber '{}' panicked; continuing delivery",
                    subscriber.name()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ColumnType, CsvColumn, CsvFileModel, FileModel, FileModelEvent, VersionedFileModel,
    };
    use chrono::{NaiveDate, Utc};
    use parking_lot::Mutex;

    struct Recording {
        label: &'static str,
        seen: Mutex<Vec<u64>>,
    }

    impl Recording {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl EventSubscriber for Recording {
        fn name(&self) -> &str {
            self.label
        }

        fn on_event(&self, event: &FileModelEvent) {
            if let FileModelEvent::Created { version } = event {
                self.seen.lock().push(version.version_id());
            }
        }
    }

    struct Panicking;

    impl EventSubscriber for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn on_event(&self, _event: &FileModelEvent) {
            panic!("subscriber failure");
        }
    }

    fn created_event(version_id: u64) -> FileModelEvent {
        let model = FileModel::Csv(
            CsvFileModel::new(
                0,
                0,
                ",",
                vec![CsvColumn::new("accountId", ColumnType::int(), true).unwrap()],
            )
            .unwrap(),
        );
        FileModelEvent::Created {
            version: VersionedFileModel::new(
                1,
                version_id,
                true,
                NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
                None,
                Utc::now(),
                "test",
                model,
            ),
        }
    }

    #[test]
    fn test_delivery_in_publication_order() {
        let bus = EventBus::new();
        let subscriber = Arc::new(Recording::new("a"));
        bus.subscribe(subscriber.clone());

        for id in 0..5 {
            bus.publish(&created_event(id));
        }

        assert_eq!(*subscriber.seen.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_panicking_subscriber_does_not_block_others() {
        let bus = EventBus::new();
        let before = Arc::new(Recording::new("before"));
        let after = Arc::new(Recording::new("after"));
        bus.subscribe(before.clone());
        bus.subscribe(Arc::new(Panicking));
        bus.subscribe(after.clone());

        bus.publish(&created_event(7));

        assert_eq!(*before.seen.lock(), vec![7]);
        assert_eq!(*after.seen.lock(), vec![7]);
    }

    #[test]
    fn test_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(&created_event(0));

        let late = Arc::new(Recording::new("late"));
        bus.subscribe(late.clone());
        bus.publish(&created_event(1));

        assert_eq!(*late.seen.lock(), vec![1]);
    }
}
