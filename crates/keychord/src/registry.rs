//! Scope registry and registration API.
//!
//! [`HotkeyRegistry`] owns one trie per named scope, the name of the active
//! scope, the set of keys currently held down, and the subscription to the
//! [`InputSource`] that delivers raw key events.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use keychord::{HotkeyRegistry, InputSource, KeyEvent};
//!
//! let source = InputSource::new();
//! let registry = HotkeyRegistry::new(source.clone());
//!
//! let saves = Arc::new(AtomicUsize::new(0));
//! let counter = saves.clone();
//! let binding = registry.register("Ctrl+K Ctrl+S", "global", move |_event| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! for event in [
//!     KeyEvent::key_down("Control"),
//!     KeyEvent::key_down("K"),
//!     KeyEvent::key_up("K"),
//!     KeyEvent::key_down("S"),
//! ] {
//!     source.emit(&event);
//! }
//! assert_eq!(saves.load(Ordering::SeqCst), 1);
//!
//! binding.unbind();
//! assert!(!registry.listeners_attached());
//! ```
//!
//! # Listener attachment
//!
//! Raw listeners are attached to the input source by the first `bind()`.
//! When they are detached again depends on [`ListenerTracking`]: with the
//! default `RefCount` policy, only when the last bound registration unbinds;
//! with `Flag`, on any `unbind()`.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use keychord_core::logging::targets;
use keychord_core::{
    Clock, InputSource, KeyEvent, ListenerId, SystemClock, TimerId, TimerManager,
};
use parking_lot::Mutex;

use crate::combo::{Combo, Sequence};
use crate::config::{HotkeyConfig, ListenerTracking};
use crate::key::Token;
use crate::scope::Scope;

/// A shortcut callback. Receives the key-down event that completed the match.
pub type Callback = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

/// Listeners currently attached to the input source.
pub(crate) struct AttachedListeners {
    pub(crate) id: ListenerId,
    /// Debounce window of the registration that attached them.
    pub(crate) debounce: Duration,
}

/// Mutable state shared by the registry handle, its bindings and the
/// attached listener.
pub(crate) struct RegistryState {
    pub(crate) scopes: HashMap<String, Scope>,
    pub(crate) active_scope: String,
    pub(crate) buffer: BTreeSet<Token>,
    pub(crate) listeners: Option<AttachedListeners>,
    pub(crate) live_bindings: usize,
    pub(crate) tracking: ListenerTracking,
    pub(crate) default_debounce: Duration,
    pub(crate) timers: TimerManager,
    pub(crate) debounce_timer: Option<TimerId>,
}

impl RegistryState {
    fn scope_mut(&mut self, name: &str) -> &mut Scope {
        self.scopes.entry(name.to_owned()).or_insert_with(Scope::new)
    }
}

/// The shortcut dispatcher.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct HotkeyRegistry {
    state: Arc<Mutex<RegistryState>>,
    source: InputSource,
}

impl HotkeyRegistry {
    /// Create a registry with the default configuration.
    pub fn new(source: InputSource) -> Self {
        Self::with_config(source, &HotkeyConfig::default())
    }

    /// Create a registry with the given configuration.
    ///
    /// The keymap in `config.bindings` is not registered here; see
    /// [`register_actions`](Self::register_actions).
    pub fn with_config(source: InputSource, config: &HotkeyConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    /// Create a registry whose debounce timer reads time from `clock`.
    pub fn with_clock(source: InputSource, config: &HotkeyConfig, clock: Arc<dyn Clock>) -> Self {
        let state = RegistryState {
            scopes: HashMap::new(),
            active_scope: config.initial_scope.clone(),
            buffer: BTreeSet::new(),
            listeners: None,
            live_bindings: 0,
            tracking: config.listener_tracking,
            default_debounce: config.debounce(),
            timers: TimerManager::with_clock(clock),
            debounce_timer: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            source,
        }
    }

    /// Register a shortcut with the default debounce window and bind it.
    ///
    /// `spec` is a space-separated chain of `+`-joined key names, e.g.
    /// `"Ctrl+K Ctrl+S"`, `"Esc"` or `"g g"`.
    pub fn register<F>(&self, spec: &str, scope: &str, callback: F) -> HotkeyBinding
    where
        F: Fn(&KeyEvent) + Send + Sync + 'static,
    {
        let debounce = self.state.lock().default_debounce;
        self.register_with_debounce(spec, scope, callback, debounce)
    }

    /// Register a shortcut with an explicit debounce window and bind it.
    pub fn register_with_debounce<F>(
        &self,
        spec: &str,
        scope: &str,
        callback: F,
        debounce: Duration,
    ) -> HotkeyBinding
    where
        F: Fn(&KeyEvent) + Send + Sync + 'static,
    {
        self.register_callback(spec, scope, Arc::new(callback), debounce)
    }

    /// Register an already shared callback and bind it.
    pub fn register_callback(
        &self,
        spec: &str,
        scope: &str,
        callback: Callback,
        debounce: Duration,
    ) -> HotkeyBinding {
        let sequence = Sequence::parse(spec);
        self.state.lock().scope_mut(scope);

        let binding = HotkeyBinding {
            registry: self.clone(),
            scope: scope.to_owned(),
            sequence,
            callback,
            debounce,
            bound: AtomicBool::new(false),
        };
        binding.bind();
        binding
    }

    /// Register every binding in `config.bindings`.
    ///
    /// `resolve` maps an action name to its callback. Actions it does not
    /// know are skipped with a warning.
    pub fn register_actions<R>(&self, config: &HotkeyConfig, mut resolve: R) -> Vec<HotkeyBinding>
    where
        R: FnMut(&str) -> Option<Callback>,
    {
        let mut bindings = Vec::with_capacity(config.bindings.len());
        for spec in &config.bindings {
            let Some(callback) = resolve(&spec.action) else {
                tracing::warn!(
                    target: targets::CONFIG,
                    action = %spec.action,
                    keys = %spec.keys,
                    "no callback for action, skipping binding"
                );
                continue;
            };
            let debounce = spec.debounce().unwrap_or_else(|| config.debounce());
            bindings.push(self.register_callback(&spec.keys, &spec.scope, callback, debounce));
        }
        bindings
    }

    /// Switch the scope whose shortcuts are live.
    ///
    /// The scope does not need to exist; an unknown scope simply matches
    /// nothing until something registers into it.
    pub fn set_active_scope(&self, name: &str) {
        let mut state = self.state.lock();
        if state.active_scope != name {
            tracing::debug!(
                target: targets::REGISTRY,
                from = %state.active_scope,
                to = name,
                "active scope changed"
            );
        }
        state.active_scope = name.to_owned();
    }

    /// Name of the active scope.
    pub fn active_scope(&self) -> String {
        self.state.lock().active_scope.clone()
    }

    /// Names of every scope created so far, sorted.
    pub fn scope_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().scopes.keys().cloned().collect();
        names.sort();
        names
    }

    /// How far into `scope`'s trie the user has typed.
    ///
    /// An empty path means the cursor is at the root. Returns `None` for a
    /// scope that was never created.
    pub fn cursor(&self, scope: &str) -> Option<Vec<Combo>> {
        self.state
            .lock()
            .scopes
            .get(scope)
            .map(|s| s.cursor_path().to_vec())
    }

    /// Keys currently held down, in canonical order.
    pub fn buffer(&self) -> Vec<Token> {
        self.state.lock().buffer.iter().cloned().collect()
    }

    /// Whether `sequence` ends at a callback in `scope`.
    pub fn has_sequence(&self, scope: &str, sequence: &Sequence) -> bool {
        self.state
            .lock()
            .scopes
            .get(scope)
            .and_then(|s| s.root().descend(sequence.combos()))
            .is_some_and(|node| node.is_terminal())
    }

    /// Whether raw key listeners are attached to the input source.
    pub fn listeners_attached(&self) -> bool {
        self.state.lock().listeners.is_some()
    }

    /// Number of registrations currently bound.
    pub fn live_bindings(&self) -> usize {
        self.state.lock().live_bindings
    }

    /// The input source this registry listens to.
    pub fn source(&self) -> &InputSource {
        &self.source
    }

    /// Fire the debounce timer if its window has elapsed.
    ///
    /// Call this from the host event loop; [`time_until_next_timer`]
    /// tells how long it may sleep. Every raw event also does this first.
    ///
    /// [`time_until_next_timer`]: Self::time_until_next_timer
    pub fn process_timers(&self) {
        self.state.lock().process_timers();
    }

    /// Time until the pending debounce timer fires, if one is pending.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.state.lock().timers.time_until_next()
    }

    fn attach(&self, state: &mut RegistryState, debounce: Duration) {
        let weak: Weak<Mutex<RegistryState>> = Arc::downgrade(&self.state);
        let id = self.source.connect(move |event| {
            if let Some(state) = weak.upgrade() {
                dispatch(&state, event);
            }
        });
        state.listeners = Some(AttachedListeners { id, debounce });
        tracing::debug!(target: targets::REGISTRY, ?debounce, "key listeners attached");
    }

    fn detach(&self, state: &mut RegistryState) {
        if let Some(listeners) = state.listeners.take() {
            self.source.disconnect(listeners.id);
            tracing::debug!(
                target: targets::REGISTRY,
                live_bindings = state.live_bindings,
                "key listeners detached"
            );
        }
    }
}

impl std::fmt::Debug for HotkeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HotkeyRegistry")
            .field("active_scope", &state.active_scope)
            .field("scopes", &state.scopes.len())
            .field("buffer", &state.buffer)
            .field("listeners_attached", &state.listeners.is_some())
            .field("live_bindings", &state.live_bindings)
            .finish()
    }
}

/// Run one raw event through the state machine, then invoke the matched
/// callback with no lock held.
fn dispatch(state: &Mutex<RegistryState>, event: &KeyEvent) {
    let matched = state.lock().handle_event(event);
    if let Some(callback) = matched {
        callback(event);
    }
}

/// One registered shortcut.
///
/// Returned already bound. [`unbind`](Self::unbind) takes it out of its
/// scope's trie; [`bind`](Self::bind) puts it back. Dropping a binding does
/// not unbind it; use [`into_guard`](Self::into_guard) for that.
pub struct HotkeyBinding {
    registry: HotkeyRegistry,
    scope: String,
    sequence: Sequence,
    callback: Callback,
    debounce: Duration,
    bound: AtomicBool,
}

impl HotkeyBinding {
    /// Insert the shortcut into its scope, attaching the raw listeners if
    /// none are attached.
    pub fn bind(&self) {
        let registry = &self.registry;
        let mut state = registry.state.lock();

        if !self.bound.swap(true, Ordering::SeqCst) {
            state.live_bindings += 1;
        }
        state
            .scope_mut(&self.scope)
            .root_mut()
            .insert(self.sequence.combos(), self.callback.clone());
        tracing::debug!(
            target: targets::REGISTRY,
            scope = %self.scope,
            sequence = %self.sequence,
            "hotkey bound"
        );

        if state.listeners.is_none() {
            registry.attach(&mut state, self.debounce);
        }
    }

    /// Remove the shortcut from its scope.
    ///
    /// Removing a shortcut that is not in the trie is a no-op. Whether the
    /// raw listeners detach depends on the registry's [`ListenerTracking`].
    pub fn unbind(&self) {
        let registry = &self.registry;
        let mut state = registry.state.lock();

        if self.bound.swap(false, Ordering::SeqCst) {
            state.live_bindings -= 1;
        }
        let removed = state
            .scopes
            .get_mut(&self.scope)
            .and_then(|scope| scope.remove(self.sequence.combos()))
            .is_some();
        tracing::debug!(
            target: targets::REGISTRY,
            scope = %self.scope,
            sequence = %self.sequence,
            removed,
            "hotkey unbound"
        );

        let detach = match state.tracking {
            ListenerTracking::Flag => true,
            ListenerTracking::RefCount => state.live_bindings == 0,
        };
        if detach {
            registry.detach(&mut state);
        }
    }

    /// Whether this registration is currently bound.
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::SeqCst)
    }

    /// The parsed sequence.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// The scope this shortcut lives in.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The debounce window this registration was created with.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Turn this binding into a guard that unbinds when dropped.
    pub fn into_guard(self) -> BindingGuard {
        BindingGuard { binding: self }
    }
}

impl std::fmt::Debug for HotkeyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotkeyBinding")
            .field("scope", &self.scope)
            .field("sequence", &self.sequence.to_string())
            .field("debounce", &self.debounce)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Unbinds its shortcut when dropped.
#[derive(Debug)]
pub struct BindingGuard {
    binding: HotkeyBinding,
}

impl BindingGuard {
    /// The guarded binding.
    pub fn binding(&self) -> &HotkeyBinding {
        &self.binding
    }
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        self.binding.unbind();
    }
}

static_assertions::assert_impl_all!(HotkeyRegistry: Send, Sync);
static_assertions::assert_impl_all!(HotkeyBinding: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HotkeyConfig;

    fn registry(tracking: ListenerTracking) -> (HotkeyRegistry, InputSource) {
        let source = InputSource::new();
        let config = HotkeyConfig::default().with_listener_tracking(tracking);
        (HotkeyRegistry::with_config(source.clone(), &config), source)
    }

    #[test]
    fn test_default_scope() {
        let (registry, _) = registry(ListenerTracking::RefCount);
        assert_eq!(registry.active_scope(), "global");
        registry.set_active_scope("modal");
        assert_eq!(registry.active_scope(), "modal");
        // Switching does not create the scope.
        assert!(registry.scope_names().is_empty());
    }

    #[test]
    fn test_register_creates_scope_and_binds() {
        let (registry, source) = registry(ListenerTracking::RefCount);
        let binding = registry.register("Esc", "modal", |_| {});

        assert!(binding.is_bound());
        assert_eq!(registry.scope_names(), vec!["modal".to_owned()]);
        assert!(registry.has_sequence("modal", &Sequence::parse("escape")));
        assert!(registry.listeners_attached());
        assert_eq!(source.listener_count(), 1);
    }

    #[test]
    fn test_unbind_keeps_scope() {
        let (registry, _) = registry(ListenerTracking::RefCount);
        let binding = registry.register("Esc", "modal", |_| {});
        binding.unbind();

        assert!(!binding.is_bound());
        assert!(!registry.has_sequence("modal", &Sequence::parse("Esc")));
        assert_eq!(registry.scope_names(), vec!["modal".to_owned()]);
    }

    #[test]
    fn test_rebind() {
        let (registry, source) = registry(ListenerTracking::RefCount);
        let binding = registry.register("g g", "global", |_| {});
        binding.unbind();
        binding.bind();

        assert!(registry.has_sequence("global", &Sequence::parse("g g")));
        assert_eq!(registry.live_bindings(), 1);
        assert_eq!(source.listener_count(), 1);
    }

    #[test]
    fn test_double_unbind_is_noop() {
        let (registry, _) = registry(ListenerTracking::RefCount);
        let binding = registry.register("a", "global", |_| {});
        binding.unbind();
        binding.unbind();
        assert_eq!(registry.live_bindings(), 0);
        assert!(!registry.listeners_attached());
    }

    #[test]
    fn test_bind_twice_counts_once() {
        let (registry, source) = registry(ListenerTracking::RefCount);
        let binding = registry.register("a", "global", |_| {});
        binding.bind();
        assert_eq!(registry.live_bindings(), 1);
        assert_eq!(source.listener_count(), 1);

        binding.unbind();
        assert!(!registry.listeners_attached());
    }

    #[test]
    fn test_guard_unbinds_on_drop() {
        let (registry, source) = registry(ListenerTracking::RefCount);
        {
            let guard = registry.register("Esc", "modal", |_| {}).into_guard();
            assert!(guard.binding().is_bound());
            assert_eq!(source.listener_count(), 1);
        }
        assert!(!registry.has_sequence("modal", &Sequence::parse("Esc")));
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_register_actions_skips_unknown() {
        let (registry, _) = registry(ListenerTracking::RefCount);
        let config = HotkeyConfig::from_toml_str(
            r#"
            [[bindings]]
            keys = "Ctrl+S"
            action = "save"

            [[bindings]]
            keys = "Ctrl+Q"
            action = "quit"
            "#,
        )
        .unwrap();

        let bindings = registry.register_actions(&config, |action| {
            (action == "save").then(|| Arc::new(|_: &KeyEvent| {}) as Callback)
        });

        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].sequence(), &Sequence::parse("Ctrl+S"));
        assert!(registry.has_sequence("global", &Sequence::parse("Ctrl+S")));
        assert!(!registry.has_sequence("global", &Sequence::parse("Ctrl+Q")));
    }

    #[test]
    fn test_register_actions_debounce() {
        let (registry, _) = registry(ListenerTracking::RefCount);
        let config = HotkeyConfig::from_toml_str(
            r#"
            debounce_ms = 900

            [[bindings]]
            keys = "g g"
            action = "top"

            [[bindings]]
            keys = "Esc"
            action = "close"
            debounce_ms = 100
            "#,
        )
        .unwrap();

        let bindings =
            registry.register_actions(&config, |_| Some(Arc::new(|_: &KeyEvent| {}) as Callback));

        assert_eq!(bindings[0].debounce(), Duration::from_millis(900));
        assert_eq!(bindings[1].debounce(), Duration::from_millis(100));
    }
}
