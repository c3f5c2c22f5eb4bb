//! Raw keyboard events as delivered by the host.

/// A raw input event consumed by the shortcut dispatcher.
///
/// Key names follow the DOM `KeyboardEvent.key` convention: `"Control"`,
/// `"Escape"`, `"k"`, `"K"`, `"Shift"`, `"OS"`. No normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A key went down.
    KeyDown {
        /// The raw key name.
        key: String,
        /// Whether this is an auto-repeat of a held key.
        repeat: bool,
    },

    /// A key was released.
    KeyUp {
        /// The raw key name.
        key: String,
    },

    /// The input source lost focus.
    Blur,
}

impl KeyEvent {
    /// Create a (non-repeat) key-down event.
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::KeyDown {
            key: key.into(),
            repeat: false,
        }
    }

    /// Create an auto-repeat key-down event.
    pub fn key_repeat(key: impl Into<String>) -> Self {
        Self::KeyDown {
            key: key.into(),
            repeat: true,
        }
    }

    /// Create a key-up event.
    pub fn key_up(key: impl Into<String>) -> Self {
        Self::KeyUp { key: key.into() }
    }

    /// The raw key name, if this event carries one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::KeyDown { key, .. } | Self::KeyUp { key } => Some(key.as_str()),
            Self::Blur => None,
        }
    }

    /// Whether this is an auto-repeat key-down.
    pub fn is_repeat(&self) -> bool {
        matches!(self, Self::KeyDown { repeat: true, .. })
    }
}
