//! Single-slot notification channel
//!
//! At most one notification is visible. A new call replaces the current
//! one, and a replaced notification's dismiss timer can never clear its
//! successor: each call bumps a generation and timers only clear their own.

use crate::severity::{DismissPolicy, Severity};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub msg: String,
    pub status: Severity,
    /// `false` closes whatever is currently shown
    #[serde(default = "default_show")]
    pub show: bool,
}

fn default_show() -> bool {
    true
}

impl Notification {
    /// Visible notification
    #[must_use]
    pub fn new(msg: impl Into<String>, status: Severity) -> Self {
        Self {
            msg: msg.into(),
            status,
            show: true,
        }
    }

    /// Informational message
    #[inline]
    #[must_use]
    pub fn info(msg: impl Into<String>) -> Self {
        Self::new(msg, Severity::Info)
    }

    /// Success message
    #[inline]
    #[must_use]
    pub fn success(msg: impl Into<String>) -> Self {
        Self::new(msg, Severity::Success)
    }

    /// Warning message
    #[inline]
    #[must_use]
    pub fn warning(msg: impl Into<String>) -> Self {
        Self::new(msg, Severity::Warning)
    }

    /// Error message
    #[inline]
    #[must_use]
    pub fn error(msg: impl Into<String>) -> Self {
        Self::new(msg, Severity::Error)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Inner {
    tx: watch::Sender<Option<Notification>>,
    slot: Mutex<Slot>,
    policy: DismissPolicy,
}

impl Inner {
    fn expire(&self, generation: u64) {
        let mut slot = self.slot.lock();
        if slot.generation == generation {
            slot.timer = None;
            self.tx.send_replace(None);
            tracing::debug!(generation, "notification auto-dismissed");
        }
    }
}

/// Shared handle to the notification slot
///
/// Cheap to clone; every clone drives the same slot.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    /// Notifier with the default dismiss policy
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(DismissPolicy::default())
    }

    /// Notifier with a custom dismiss policy
    #[must_use]
    pub fn with_policy(policy: DismissPolicy) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                tx,
                slot: Mutex::new(Slot {
                    generation: 0,
                    timer: None,
                }),
                policy,
            }),
        }
    }

    /// Show `notification`, replacing anything currently shown
    ///
    /// Auto-dismiss needs a Tokio runtime; without one the notification
    /// stays until replaced or dismissed.
    pub fn notify(&self, notification: Notification) {
        let mut slot = self.inner.slot.lock();
        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        if !notification.show {
            self.inner.tx.send_replace(None);
            return;
        }

        let delay = self.inner.policy.delay(notification.status);
        tracing::debug!(
            status = notification.status.code(),
            generation = slot.generation,
            "showing notification"
        );
        self.inner.tx.send_replace(Some(notification));

        let Some(delay) = delay else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let generation = slot.generation;
                let inner = Arc::downgrade(&self.inner);
                slot.timer = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(inner) = inner.upgrade() {
                        inner.expire(generation);
                    }
                }));
            }
            Err(_) => tracing::warn!("no runtime for notification timer; message stays until replaced"),
        }
    }

    /// Show an error with the text of `err`
    #[inline]
    pub fn error(&self, err: &impl Display) {
        self.notify(Notification::error(err.to_string()));
    }

    /// Show a success message
    #[inline]
    pub fn success(&self, msg: impl Into<String>) {
        self.notify(Notification::success(msg));
    }

    /// Close the current notification
    pub fn dismiss(&self) {
        let mut slot = self.inner.slot.lock();
        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        self.inner.tx.send_replace(None);
    }

    /// Notification currently shown
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.inner.tx.borrow().clone()
    }

    /// Observe every change of the slot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    async fn settle() {
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn success_auto_dismisses_after_six_seconds() {
        let notifier = Notifier::new();
        notifier.notify(Notification::success("saved"));
        assert_eq!(notifier.current().unwrap().msg, "saved");

        sleep(Duration::from_millis(5999)).await;
        settle().await;
        assert!(notifier.current().is_some());

        sleep(Duration::from_millis(2)).await;
        settle().await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn error_never_auto_dismisses() {
        let notifier = Notifier::new();
        notifier.notify(Notification::error("fetch failed"));
        sleep(Duration::from_secs(600)).await;
        settle().await;
        assert_eq!(notifier.current().unwrap().status, Severity::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn second_call_replaces_first() {
        let notifier = Notifier::new();
        notifier.notify(Notification::info("first"));
        sleep(Duration::from_millis(4000)).await;
        notifier.notify(Notification::success("second"));
        assert_eq!(notifier.current().unwrap().msg, "second");

        // The first timer would have fired at 6000ms
        sleep(Duration::from_millis(3000)).await;
        settle().await;
        assert_eq!(notifier.current().unwrap().msg, "second");

        sleep(Duration::from_millis(3500)).await;
        settle().await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn sticky_replacing_timed_stays() {
        let notifier = Notifier::new();
        notifier.notify(Notification::success("ok"));
        notifier.notify(Notification::warning("careful"));
        sleep(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(notifier.current().unwrap().msg, "careful");
    }

    #[tokio::test(start_paused = true)]
    async fn show_false_and_dismiss_close() {
        let notifier = Notifier::new();
        notifier.notify(Notification::error("boom"));
        notifier.notify(Notification {
            msg: String::new(),
            status: Severity::Info,
            show: false,
        });
        assert!(notifier.current().is_none());

        notifier.error(&"again");
        notifier.dismiss();
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_changes() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        notifier.success("done");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().msg, "done");

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn without_runtime_message_stays() {
        let notifier = Notifier::new();
        notifier.notify(Notification::info("no timer"));
        assert_eq!(notifier.current().unwrap().msg, "no timer");
    }

    #[test]
    fn deserializes_call_shape() {
        let n: Notification =
            serde_json::from_str(r#"{"msg":"Saved","status":2,"show":true}"#).unwrap();
        assert_eq!(n, Notification::success("Saved"));
        let n: Notification = serde_json::from_str(r#"{"msg":"x","status":3}"#).unwrap();
        assert!(n.show);
    }
}
