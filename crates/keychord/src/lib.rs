//! Keyboard shortcut dispatcher.
//!
//! keychord matches presses of physical keys against registered shortcuts:
//!
//! - **Combos**: keys held together, like `Ctrl+K`. Press order inside a
//!   combo does not matter.
//! - **Sequences**: chains of combos, like `Ctrl+K Ctrl+S` or `g g`. A
//!   partially typed sequence is abandoned after an idle debounce window.
//! - **Scopes**: named contexts. Only the active scope's shortcuts fire, so
//!   a dialog can switch to its own scope and bind `Esc` there.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use keychord::{HotkeyRegistry, InputSource, KeyEvent};
//!
//! let source = InputSource::new();
//! let registry = HotkeyRegistry::new(source.clone());
//!
//! let dismissed = Arc::new(AtomicBool::new(false));
//! let flag = dismissed.clone();
//! let esc = registry
//!     .register("Esc", "modal", move |_| flag.store(true, Ordering::SeqCst))
//!     .into_guard();
//!
//! // Not active yet: the modal scope is not the active one.
//! source.emit(&KeyEvent::key_down("Escape"));
//! source.emit(&KeyEvent::key_up("Escape"));
//! assert!(!dismissed.load(Ordering::SeqCst));
//!
//! registry.set_active_scope("modal");
//! source.emit(&KeyEvent::key_down("Escape"));
//! assert!(dismissed.load(Ordering::SeqCst));
//!
//! drop(esc);
//! assert!(!registry.listeners_attached());
//! ```
//!
//! Hosts drive the debounce timer by calling
//! [`HotkeyRegistry::process_timers`] from their event loop.

mod combo;
mod config;
mod dispatch;
mod error;
mod key;
mod registry;
mod scope;
mod trie;

#[cfg(feature = "winit")]
pub mod winit;

pub use combo::{Combo, Sequence};
pub use config::{BindingSpec, HotkeyConfig, ListenerTracking, DEFAULT_DEBOUNCE_MS};
pub use error::{Error, Result};
pub use key::{normalize, Token};
pub use registry::{BindingGuard, Callback, HotkeyBinding, HotkeyRegistry};
pub use scope::DEFAULT_SCOPE;
pub use trie::TrieNode;

pub use keychord_core::{Clock, InputSource, KeyEvent, ManualClock, SystemClock};
