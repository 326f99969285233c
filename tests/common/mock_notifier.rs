//! Recording chat notifier

#![allow(dead_code)]

use async_trait::async_trait;
use automerge::error::{Error, Result};
use automerge::notify::{ChatNotifier, Notification};
use std::sync::Mutex;

/// Records every notification; can be told to fail delivery
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
    fail_with: Mutex<Option<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `send` fail (the notification is still recorded)
    pub fn fail_sends(&self, msg: &str) {
        *self.fail_with.lock().unwrap() = Some(msg.to_string());
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatNotifier for MockNotifier {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        match self.fail_with.lock().unwrap().as_ref() {
            Some(msg) => Err(Error::Notify(msg.clone())),
            None => Ok(()),
        }
    }
}
