//! Core plumbing for keychord.
//!
//! This crate holds the parts of the shortcut dispatcher that know nothing
//! about shortcuts:
//!
//! - **Events**: [`KeyEvent`], the raw key-down / key-up / focus-loss stream
//! - **Input source**: [`InputSource`], the broadcaster raw listeners attach to
//! - **Clocks**: [`SystemClock`] and the virtual [`ManualClock`] for tests
//! - **Timers**: [`TimerManager`], cancelable one-shot timers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use keychord_core::{ManualClock, TimerManager};
//!
//! let clock = ManualClock::new();
//! let mut timers = TimerManager::with_clock(Arc::new(clock.clone()));
//!
//! let id = timers.start_one_shot(Duration::from_millis(1500));
//! clock.advance(Duration::from_millis(1500));
//!
//! assert_eq!(timers.process_expired(), vec![id]);
//! ```

mod clock;
mod error;
mod event;
pub mod logging;
mod source;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TimerError};
pub use event::KeyEvent;
pub use logging::EventSpan;
pub use source::{InputSource, ListenerId};
pub use timer::{TimerId, TimerManager};
