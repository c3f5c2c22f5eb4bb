//! Conversion from winit window events.
//!
//! Enabled with the `winit` feature. Hosts running a winit event loop feed
//! their window events through [`window_event`] and emit whatever comes out
//! on the registry's [`InputSource`](keychord_core::InputSource):
//!
//! ```ignore
//! if let Some(event) = keychord::winit::window_event(&window_event) {
//!     source.emit(&event);
//! }
//! registry.process_timers();
//! ```

use keychord_core::KeyEvent;
use ::winit::event::{ElementState, WindowEvent};
use ::winit::keyboard::{Key, NamedKey};

/// The DOM-style name of a winit logical key.
///
/// Named keys use their variant name (`"Escape"`, `"Control"`, `"ArrowUp"`),
/// except `Super`, which reports as `"Meta"`, and `Space`, which reports as
/// `" "`. Characters pass through unchanged.
pub fn key_name(key: &Key) -> String {
    match key {
        Key::Named(NamedKey::Super) => "Meta".to_owned(),
        Key::Named(NamedKey::Space) => " ".to_owned(),
        Key::Named(named) => format!("{named:?}"),
        Key::Character(text) => text.to_string(),
        Key::Unidentified(_) => "Unidentified".to_owned(),
        Key::Dead(_) => "Dead".to_owned(),
    }
}

/// Convert a winit keyboard event.
pub fn key_event(event: &::winit::event::KeyEvent) -> KeyEvent {
    let key = key_name(&event.logical_key);
    match event.state {
        ElementState::Pressed => KeyEvent::KeyDown {
            key,
            repeat: event.repeat,
        },
        ElementState::Released => KeyEvent::KeyUp { key },
    }
}

/// Convert the window events the dispatcher cares about.
///
/// Keyboard input becomes key-down / key-up, losing focus becomes
/// [`KeyEvent::Blur`]. Everything else is `None`.
pub fn window_event(event: &WindowEvent) -> Option<KeyEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => Some(key_event(event)),
        WindowEvent::Focused(false) => Some(KeyEvent::Blur),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    #[test]
    fn test_named_keys() {
        assert_eq!(key_name(&Key::Named(NamedKey::Escape)), "Escape");
        assert_eq!(key_name(&Key::Named(NamedKey::Control)), "Control");
        assert_eq!(key_name(&Key::Named(NamedKey::Super)), "Meta");
        assert_eq!(key_name(&Key::Named(NamedKey::Space)), " ");
    }

    #[test]
    fn test_character_keys() {
        assert_eq!(key_name(&Key::Character("k".into())), "k");
        assert_eq!(key_name(&Key::Character("K".into())), "K");
    }

    #[test]
    fn test_names_normalize_like_specs() {
        assert_eq!(normalize(&key_name(&Key::Named(NamedKey::Escape))), normalize("Esc"));
        assert_eq!(normalize(&key_name(&Key::Named(NamedKey::Control))), normalize("Ctrl"));
        assert!(normalize(&key_name(&Key::Named(NamedKey::Shift))) == "shift");
    }

    #[test]
    fn test_focus_events() {
        assert_eq!(window_event(&WindowEvent::Focused(false)), Some(KeyEvent::Blur));
        assert_eq!(window_event(&WindowEvent::Focused(true)), None);
    }
}
