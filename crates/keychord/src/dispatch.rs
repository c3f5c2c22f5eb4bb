//! The key event state machine.
//!
//! Every raw event is matched against the *active* scope only:
//!
//! - **key-down**: auto-repeats are dropped. Otherwise the debounce timer is
//!   rescheduled, the key joins the held-key buffer (Shift, OS and Meta keys
//!   and keys already held are skipped), and the buffer, read as one combo,
//!   is looked up below the scope's cursor. A terminal match fires its
//!   callback and sends the cursor back to the root; a non-terminal match
//!   moves the cursor down; no match changes nothing.
//! - **key-up**: the key leaves the buffer. The cursor stays where it is, so
//!   `g` then `g` can be typed as two separate presses.
//! - **blur**: the buffer is cleared and the cursor goes back to the root,
//!   so a key released while unfocused cannot stay stuck in the buffer.
//! - **debounce**: when no key-down arrives within the window, the active
//!   scope's cursor goes back to the root.

use keychord_core::logging::targets;
use keychord_core::{EventSpan, KeyEvent};

use crate::combo::Combo;
use crate::key::normalize;
use crate::registry::{Callback, RegistryState};

impl RegistryState {
    /// Handle one raw event and return the callback to invoke, if any.
    ///
    /// The callback is returned rather than called so the caller can drop
    /// the registry lock first.
    pub(crate) fn handle_event(&mut self, event: &KeyEvent) -> Option<Callback> {
        self.process_timers();

        match event {
            KeyEvent::KeyDown { key, repeat } => {
                let _span = EventSpan::new("keydown");
                self.key_down(key, *repeat)
            }
            KeyEvent::KeyUp { key } => {
                let _span = EventSpan::new("keyup");
                self.key_up(key);
                None
            }
            KeyEvent::Blur => {
                let _span = EventSpan::new("blur");
                self.blur();
                None
            }
        }
    }

    fn key_down(&mut self, raw: &str, repeat: bool) -> Option<Callback> {
        if repeat {
            return None;
        }
        if !self.scopes.contains_key(&self.active_scope) {
            tracing::trace!(target: targets::DISPATCH, scope = %self.active_scope, "no such scope");
            return None;
        }

        self.reschedule_debounce();

        let token = normalize(raw);
        if token.is_ignored_modifier() || self.buffer.contains(&token) {
            tracing::trace!(target: targets::DISPATCH, %token, "key ignored");
            return None;
        }
        self.buffer.insert(token);

        let combo = Combo::from_tokens(&self.buffer);
        let scope = self.scopes.get_mut(&self.active_scope)?;
        let node = scope.cursor_node().lookup(&combo)?;

        if let Some(callback) = node.callback().cloned() {
            scope.reset_cursor();
            tracing::debug!(
                target: targets::DISPATCH,
                scope = %self.active_scope,
                %combo,
                "hotkey matched"
            );
            return Some(callback);
        }

        scope.advance(combo);
        tracing::trace!(
            target: targets::DISPATCH,
            scope = %self.active_scope,
            depth = scope.cursor_path().len(),
            "cursor advanced"
        );
        None
    }

    fn key_up(&mut self, raw: &str) {
        let token = normalize(raw);
        self.buffer.remove(&token);
        tracing::trace!(target: targets::DISPATCH, %token, held = self.buffer.len(), "key released");
    }

    fn blur(&mut self) {
        self.buffer.clear();
        if let Some(scope) = self.scopes.get_mut(&self.active_scope) {
            scope.reset_cursor();
        }
        tracing::trace!(target: targets::DISPATCH, "focus lost, buffer cleared");
    }

    /// Stop the pending debounce timer and start a fresh one.
    fn reschedule_debounce(&mut self) {
        if let Some(id) = self.debounce_timer.take() {
            if let Err(err) = self.timers.stop(id) {
                tracing::trace!(target: targets::DISPATCH, %err, "debounce timer already gone");
            }
        }

        let window = self
            .listeners
            .as_ref()
            .map_or(self.default_debounce, |listeners| listeners.debounce);
        self.debounce_timer = Some(self.timers.start_one_shot(window));
    }

    /// Fire the debounce timer if it has expired.
    pub(crate) fn process_timers(&mut self) {
        let fired = self.timers.process_expired();
        let Some(pending) = self.debounce_timer else {
            return;
        };
        if !fired.contains(&pending) {
            return;
        }

        self.debounce_timer = None;
        if let Some(scope) = self.scopes.get_mut(&self.active_scope) {
            if !scope.is_at_root() {
                tracing::debug!(
                    target: targets::DISPATCH,
                    scope = %self.active_scope,
                    "debounce window elapsed, cursor reset"
                );
            }
            scope.reset_cursor();
        }
    }
}
