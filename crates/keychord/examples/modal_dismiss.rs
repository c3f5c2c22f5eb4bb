//! A dialog that takes over the keyboard while it is open.
//!
//! The dialog switches the registry to its own scope, binds `Esc` there, and
//! hands the scope back when dismissed. Global shortcuts stay registered the
//! whole time but only fire while `global` is active.
//!
//! Run with `RUST_LOG=keychord=debug cargo run --example modal_dismiss`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use keychord::{BindingGuard, Callback, HotkeyConfig, HotkeyRegistry, InputSource, KeyEvent};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

const KEYMAP: &str = r#"
[[bindings]]
keys = "Ctrl+K Ctrl+S"
action = "save-all"

[[bindings]]
keys = "g g"
action = "go-to-top"
"#;

struct Dialog {
    registry: HotkeyRegistry,
    escape: Mutex<Option<BindingGuard>>,
    open: AtomicBool,
}

impl Dialog {
    fn open(registry: &HotkeyRegistry) -> Arc<Self> {
        let dialog = Arc::new(Self {
            registry: registry.clone(),
            escape: Mutex::new(None),
            open: AtomicBool::new(true),
        });

        registry.set_active_scope("modal");
        let weak = Arc::downgrade(&dialog);
        let guard = registry
            .register("Esc", "modal", move |_| {
                if let Some(dialog) = weak.upgrade() {
                    dialog.dismiss();
                }
            })
            .into_guard();
        *dialog.escape.lock() = Some(guard);

        println!("dialog opened");
        dialog
    }

    fn dismiss(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            self.escape.lock().take();
            self.registry.set_active_scope("global");
            println!("dialog dismissed");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = HotkeyConfig::from_toml_str(KEYMAP)?;
    let source = InputSource::new();
    let registry = HotkeyRegistry::with_config(source.clone(), &config);

    let _keymap = registry.register_actions(&config, |action| {
        let action = action.to_owned();
        Some(Arc::new(move |_: &KeyEvent| println!("action: {action}")) as Callback)
    });

    let press = |keys: &[&str]| {
        for key in keys {
            source.emit(&KeyEvent::key_down(*key));
        }
        for key in keys.iter().rev() {
            source.emit(&KeyEvent::key_up(*key));
        }
        registry.process_timers();
    };

    press(&["g"]);
    press(&["g"]);

    let dialog = Dialog::open(&registry);
    // Swallowed: the modal scope has no "Ctrl+K Ctrl+S".
    press(&["Control", "K"]);
    press(&["Control", "S"]);
    press(&["Escape"]);
    assert!(!dialog.open.load(Ordering::SeqCst));

    press(&["Control", "K"]);
    press(&["Control", "S"]);

    println!("active scope: {}", registry.active_scope());
    Ok(())
}
