//! Dispatcher configuration.
//!
//! Configuration is plain data that can be built in code or read from TOML:
//!
//! ```toml
//! debounce_ms = 1200
//! initial_scope = "global"
//! listener_tracking = "ref_count"
//!
//! [[bindings]]
//! keys = "Ctrl+K Ctrl+S"
//! action = "save-all"
//!
//! [[bindings]]
//! keys = "Esc"
//! scope = "modal"
//! action = "dismiss"
//! ```

use std::path::Path;
use std::time::Duration;

use keychord_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scope::DEFAULT_SCOPE;

/// Default idle time before a partially typed sequence is abandoned.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1500;

/// How the registry decides when to detach its raw key listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerTracking {
    /// Detach when the last bound registration unbinds.
    #[default]
    RefCount,
    /// One shared flag: any `unbind` detaches the listeners, even while
    /// other registrations are still bound.
    Flag,
}

/// One declarative shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSpec {
    /// Sequence spec, e.g. `"Ctrl+K Ctrl+S"`.
    pub keys: String,
    /// Scope to register in.
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Name the host resolves to a callback.
    pub action: String,
    /// Per-binding debounce override.
    #[serde(default)]
    pub debounce_ms: Option<u64>,
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Default debounce window for registrations, in milliseconds.
    pub debounce_ms: u64,
    /// Scope active when the registry is created.
    pub initial_scope: String,
    /// Listener attachment policy.
    pub listener_tracking: ListenerTracking,
    /// Declarative keymap, registered by
    /// [`HotkeyRegistry::register_actions`](crate::HotkeyRegistry::register_actions).
    pub bindings: Vec<BindingSpec>,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            initial_scope: default_scope(),
            listener_tracking: ListenerTracking::default(),
            bindings: Vec::new(),
        }
    }
}

impl HotkeyConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            bindings = config.bindings.len(),
            "loaded hotkey config"
        );
        Ok(config)
    }

    /// The default debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Builder-style setter for the listener policy.
    pub fn with_listener_tracking(mut self, tracking: ListenerTracking) -> Self {
        self.listener_tracking = tracking;
        self
    }

    /// Builder-style setter for the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

impl BindingSpec {
    /// The debounce override, if any.
    pub fn debounce(&self) -> Option<Duration> {
        self.debounce_ms.map(Duration::from_millis)
    }
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_owned()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = HotkeyConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(1500));
        assert_eq!(config.initial_scope, "global");
        assert_eq!(config.listener_tracking, ListenerTracking::RefCount);
        assert!(config.bindings.is_empty());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(HotkeyConfig::from_toml_str("").unwrap(), HotkeyConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let config = HotkeyConfig::from_toml_str(
            r#"
            debounce_ms = 800
            initial_scope = "editor"
            listener_tracking = "flag"

            [[bindings]]
            keys = "Ctrl+K Ctrl+S"
            action = "save-all"

            [[bindings]]
            keys = "Esc"
            scope = "modal"
            action = "dismiss"
            debounce_ms = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.debounce_ms, 800);
        assert_eq!(config.initial_scope, "editor");
        assert_eq!(config.listener_tracking, ListenerTracking::Flag);
        assert_eq!(config.bindings.len(), 2);
        assert_eq!(config.bindings[0].scope, "global");
        assert_eq!(config.bindings[0].debounce(), None);
        assert_eq!(config.bindings[1].scope, "modal");
        assert_eq!(config.bindings[1].debounce(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn test_parse_error() {
        let err = HotkeyConfig::from_toml_str("listener_tracking = \"sometimes\"").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().starts_with("Invalid hotkey config"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms = 42").unwrap();

        let config = HotkeyConfig::load(file.path()).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(42));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HotkeyConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_builders() {
        let config = HotkeyConfig::default()
            .with_debounce(Duration::from_millis(250))
            .with_listener_tracking(ListenerTracking::Flag);
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.listener_tracking, ListenerTracking::Flag);
    }
}
