//! Notification emission and inbox operations.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Notification, NotificationKind};
use crate::store::NotificationStore;

use super::clock::Clock;

/// Writes notifications for users and serves their inbox.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn NotificationStore>,
    clock: Arc<dyn Clock>,
}

impl Notifier {
    /// Creates a notifier over `store`.
    pub fn new(store: Arc<dyn NotificationStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stores an unread notification for `user_id`.
    pub fn emit(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> EngineResult<Notification> {
        let notification = Notification::new(user_id, title, message, kind, self.clock.now());
        self.store.insert_notification(&notification)?;
        debug!(user_id = %user_id, kind = ?kind, title, "Notification emitted");
        Ok(notification)
    }

    /// Like [`Notifier::emit`], but a failure is logged and dropped.
    ///
    /// Used after a business transition has committed; the transition must
    /// not be undone because its notification could not be written.
    pub fn emit_best_effort(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Option<Notification> {
        match self.emit(user_id, title, message, kind) {
            Ok(notification) => Some(notification),
            Err(error) => {
                warn!(user_id = %user_id, title, error = %error, "Failed to emit notification");
                None
            }
        }
    }

    /// `user_id`'s notifications, newest first.
    pub fn list(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: Option<usize>,
    ) -> EngineResult<Vec<Notification>> {
        self.store.list_notifications(user_id, unread_only, limit)
    }

    /// Number of unread notifications for `user_id`.
    pub fn unread_count(&self, user_id: Uuid) -> EngineResult<usize> {
        self.store.count_unread_notifications(user_id)
    }

    /// Marks one of `user_id`'s notifications read.
    ///
    /// A notification owned by someone else is reported as not found.
    pub fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> EngineResult<Notification> {
        let not_found = || EngineError::NotFound {
            entity: "notification",
            key: notification_id.to_string(),
        };

        let owned = self
            .store
            .get_notification(notification_id)?
            .is_some_and(|n| n.user_id == user_id);
        if !owned {
            return Err(not_found());
        }
        self.store
            .mark_notification_read(notification_id)?
            .ok_or_else(not_found)
    }

    /// Marks every unread notification of `user_id` read; returns how many
    /// changed.
    pub fn mark_all_read(&self, user_id: Uuid) -> EngineResult<usize> {
        let changed = self.store.mark_all_notifications_read(user_id)?;
        debug!(user_id = %user_id, changed, "Notifications marked read");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::FixedClock;
    use crate::store::InMemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn setup() -> (Notifier, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap(),
        ));
        let notifier = Notifier::new(Arc::new(InMemoryStore::new()), clock.clone());
        (notifier, clock)
    }

    /// Store whose writes always fail.
    struct BrokenStore;

    impl NotificationStore for BrokenStore {
        fn insert_notification(&self, _: &Notification) -> EngineResult<()> {
            Err(EngineError::Storage {
                message: "unavailable".to_string(),
                transient: false,
            })
        }
        fn get_notification(&self, _: Uuid) -> EngineResult<Option<Notification>> {
            Ok(None)
        }
        fn list_notifications(
            &self,
            _: Uuid,
            _: bool,
            _: Option<usize>,
        ) -> EngineResult<Vec<Notification>> {
            Ok(Vec::new())
        }
        fn mark_notification_read(&self, _: Uuid) -> EngineResult<Option<Notification>> {
            Ok(None)
        }
        fn mark_all_notifications_read(&self, _: Uuid) -> EngineResult<usize> {
            Ok(0)
        }
        fn count_unread_notifications(&self, _: Uuid) -> EngineResult<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_emitted_notifications_list_newest_first() {
        let (notifier, clock) = setup();
        let user = Uuid::new_v4();

        notifier
            .emit(user, "First", "one", NotificationKind::Info)
            .unwrap();
        clock.advance(Duration::minutes(1));
        notifier
            .emit(user, "Second", "two", NotificationKind::Success)
            .unwrap();

        let titles: Vec<String> = notifier
            .list(user, false, None)
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert_eq!(notifier.unread_count(user).unwrap(), 2);
    }

    #[test]
    fn test_mark_read_requires_ownership() {
        let (notifier, _) = setup();
        let owner = Uuid::new_v4();
        let notification = notifier
            .emit(owner, "Hi", "there", NotificationKind::Info)
            .unwrap();

        let stranger = notifier.mark_read(Uuid::new_v4(), notification.id);
        assert!(stranger.unwrap_err().is_not_found());

        let read = notifier.mark_read(owner, notification.id).unwrap();
        assert!(read.is_read);
        assert_eq!(notifier.unread_count(owner).unwrap(), 0);
    }

    #[test]
    fn test_mark_all_read_returns_count() {
        let (notifier, _) = setup();
        let user = Uuid::new_v4();
        for _ in 0..3 {
            notifier.emit(user, "t", "m", NotificationKind::Warning).unwrap();
        }
        assert_eq!(notifier.mark_all_read(user).unwrap(), 3);
        assert_eq!(notifier.mark_all_read(user).unwrap(), 0);
        assert!(notifier.list(user, true, Some(5)).unwrap().is_empty());
    }

    #[test]
    fn test_best_effort_swallows_failures() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let notifier = Notifier::new(Arc::new(BrokenStore), clock);

        assert!(notifier
            .emit(Uuid::new_v4(), "t", "m", NotificationKind::Error)
            .is_err());
        assert!(notifier
            .emit_best_effort(Uuid::new_v4(), "t", "m", NotificationKind::Error)
            .is_none());
    }
}
