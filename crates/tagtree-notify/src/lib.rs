//! tagtree Notifications
//!
//! The shared "show a transient message" side channel used by every editor.
//!
//! # Core Concepts
//!
//! - [`Notification`]: `{msg, status, show}` as passed by calling views
//! - [`Severity`]: Status codes `0` info, `1` warning, `2` success, `3` error
//! - [`DismissPolicy`]: Auto-dismiss delay per severity (6000 ms info/success)
//! - [`Notifier`]: Single visible slot; new calls replace, never stack
//!
//! # Example
//!
//! ```rust,ignore
//! use tagtree_notify::{Notification, Notifier};
//!
//! let notifier = Notifier::new();
//! notifier.notify(Notification::success("Policy saved"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod notifier;
mod severity;

pub use notifier::{Notification, Notifier};
pub use severity::{DismissPolicy, Severity, UnknownStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
