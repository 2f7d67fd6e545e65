//! Notification queue
//!
//! Fire-and-forget toasts are published on a broadcast channel. Any number of
//! subscribers may listen; publishing with nobody listening is fine. The most
//! recent messages are kept for clients that poll.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::models::{Notification, NotificationVariant};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
    history: Arc<Mutex<VecDeque<Notification>>>,
    history_limit: usize,
}

impl Notifier {
    pub fn new(history_limit: usize) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            history: Arc::new(Mutex::new(VecDeque::with_capacity(history_limit))),
            history_limit,
        }
    }

    /// Publish a toast
    pub fn notify(&self, title: impl Into<String>, description: impl Into<String>, variant: NotificationVariant) {
        self.publish(Notification::new(title, description, variant));
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.notify(title, description, NotificationVariant::Success);
    }

    pub fn destructive(&self, title: impl Into<String>, description: impl Into<String>) {
        self.notify(title, description, NotificationVariant::Destructive);
    }

    pub fn publish(&self, notification: Notification) {
        if self.history_limit > 0 {
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            while history.len() >= self.history_limit {
                history.pop_front();
            }
            history.push_back(notification.clone());
        }
        // Err only means there are no receivers right now
        let _ = self.tx.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Most recent notifications, newest last
    pub fn recent(&self) -> Vec<Notification> {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.iter().cloned().collect()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(50)
    }
}
