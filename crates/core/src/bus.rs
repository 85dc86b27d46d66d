//! Notification bus - synchronous fan-out of session events
//!
//! Listeners are boxed `FnMut(&Notification)` closures. `post` calls every
//! matching listener in registration order before returning.

use crate::types::{Notification, NotificationKind};

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&Notification)>;

struct Listener {
    id: ListenerId,
    filter: Option<NotificationKind>,
    callback: Callback,
}

#[derive(Default)]
pub struct NotificationBus {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to every notification
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.add(None, Box::new(callback))
    }

    /// Listen to one kind of notification only
    pub fn subscribe_to<F>(&mut self, kind: NotificationKind, callback: F) -> ListenerId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.add(Some(kind), Box::new(callback))
    }

    fn add(&mut self, filter: Option<NotificationKind>, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            filter,
            callback,
        });
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn post(&mut self, notification: &Notification) {
        let kind = notification.kind();
        for listener in &mut self.listeners {
            if listener.filter.is_none_or(|k| k == kind) {
                (listener.callback)(notification);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
