//! The input source that raw key listeners attach to.
//!
//! An [`InputSource`] is a small broadcaster in the spirit of a signal: the
//! host pushes every raw [`KeyEvent`] into [`InputSource::emit`], and each
//! attached listener sees it. With no listeners attached, events go nowhere.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use keychord_core::{InputSource, KeyEvent};
//!
//! let source = InputSource::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = seen.clone();
//! let id = source.connect(move |_event| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! source.emit(&KeyEvent::key_down("a"));
//! source.disconnect(id);
//! source.emit(&KeyEvent::key_down("b"));
//!
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::event::KeyEvent;
use crate::logging::targets;

new_key_type! {
    /// Identifies an attached listener.
    ///
    /// Returned by [`InputSource::connect`] and consumed by
    /// [`InputSource::disconnect`].
    pub struct ListenerId;
}

type Listener = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

/// A broadcaster of raw key events.
///
/// Cloning yields another handle to the same source.
#[derive(Clone, Default)]
pub struct InputSource {
    listeners: Arc<Mutex<SlotMap<ListenerId, Listener>>>,
}

impl InputSource {
    /// Create a source with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener.
    pub fn connect<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&KeyEvent) + Send + Sync + 'static,
    {
        let id = self.listeners.lock().insert(Arc::new(listener));
        tracing::trace!(target: targets::SOURCE, ?id, "listener attached");
        id
    }

    /// Detach a listener.
    ///
    /// Returns `true` if the listener was attached.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let removed = self.listeners.lock().remove(id).is_some();
        if removed {
            tracing::trace!(target: targets::SOURCE, ?id, "listener detached");
        }
        removed
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver an event to every attached listener.
    ///
    /// Listeners run after the internal lock is released, so a listener may
    /// connect or disconnect listeners on this same source. Changes take
    /// effect from the next event.
    pub fn emit(&self, event: &KeyEvent) {
        let listeners: Vec<Listener> = self.listeners.lock().values().cloned().collect();
        tracing::trace!(
            target: targets::SOURCE,
            ?event,
            listener_count = listeners.len(),
            "emitting key event"
        );

        for listener in listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSource")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(InputSource: Send, Sync);
