//! Single-writer tree store
//!
//! The parent view owns a [`TreeStore`]; nested editors never mutate the
//! tree they were handed. They either submit a complete replacement value
//! or an [`Edit`] message, and every subscriber observes the new value.

use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::watch;

/// A pure edit over a value of type `T`
///
/// Implement this for domain-specific edit messages.
pub trait Edit<T>: Debug {
    /// Error produced when the edit is rejected
    type Error;

    /// Produce the edited value, leaving `value` untouched
    ///
    /// # Errors
    /// Returns error if the edit is invalid for `value`
    fn apply(&self, value: &T) -> Result<T, Self::Error>;

    /// Describe the edit
    fn describe(&self) -> String;
}

/// Owner of the single source of truth for one tree
///
/// Snapshots are shared through `Arc`, so readers keep a consistent value
/// while the store moves on.
#[derive(Debug)]
pub struct TreeStore<T> {
    tx: watch::Sender<Arc<T>>,
    revision: u64,
}

impl<T: Debug> TreeStore<T> {
    /// Create store holding `initial`
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx, revision: 0 }
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.tx.borrow())
    }

    /// Number of values published since creation
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the value wholesale
    ///
    /// Returns the new revision.
    pub fn replace(&mut self, value: T) -> u64 {
        self.tx.send_replace(Arc::new(value));
        self.revision += 1;
        tracing::debug!(revision = self.revision, "tree store replaced");
        self.revision
    }

    /// Apply an edit message against the current value
    ///
    /// # Errors
    /// Returns the edit's error; the store is left unchanged.
    pub fn apply<E: Edit<T>>(&mut self, edit: &E) -> Result<u64, E::Error> {
        let current = self.get();
        let next = edit.apply(&current)?;
        tracing::debug!(edit = %edit.describe(), "applying edit");
        Ok(self.replace(next))
    }

    /// Observe every published value
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

impl<T: Debug + Default> Default for TreeStore<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
