//! Key name normalization.
//!
//! Every key name that enters the dispatcher, whether typed into a shortcut
//! spec or reported by the host, goes through [`normalize`] and comes out as
//! a [`Token`]. Two names that refer to the same physical key produce equal
//! tokens.
//!
//! - Single characters keep their case, so `"a"` and `"A"` stay distinct.
//! - Longer names are lower-cased and then aliased: `esc` becomes `escape`,
//!   `ctrl` becomes `control`, `option` becomes `alt`.

use std::borrow::Borrow;
use std::fmt;

/// Canonical name of one physical key.
///
/// Tokens are only produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(String);

impl Token {
    /// The canonical key name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this token is a key the dispatcher never puts in the buffer.
    ///
    /// Shift is ignored because it already shows up in the produced
    /// character (`"a"` vs `"A"`). OS/meta keys never take part in combos.
    pub(crate) fn is_ignored_modifier(&self) -> bool {
        matches!(self.0.as_str(), "shift" | "os" | "meta")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Canonicalize a raw key name.
///
/// Never fails; unknown names simply pass through lower-cased.
///
/// ```
/// use keychord::normalize;
///
/// assert_eq!(normalize("Esc"), "escape");
/// assert_eq!(normalize("CTRL"), "control");
/// assert_eq!(normalize("A"), "A");
/// ```
pub fn normalize(raw: &str) -> Token {
    // The space bar reports " ", which must survive trimming.
    if raw.chars().count() == 1 {
        return Token(raw.to_owned());
    }

    let raw = raw.trim();
    if raw.chars().count() == 1 {
        return Token(raw.to_owned());
    }

    let lower = raw.to_lowercase();
    let canonical = match lower.as_str() {
        "esc" => "escape".to_owned(),
        "ctrl" => "control".to_owned(),
        "option" => "alt".to_owned(),
        _ => lower,
    };
    Token(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(normalize("Esc"), "escape");
        assert_eq!(normalize("esc"), "escape");
        assert_eq!(normalize("Escape"), "escape");
        assert_eq!(normalize("CTRL"), "control");
        assert_eq!(normalize("Control"), "control");
        assert_eq!(normalize("Option"), "alt");
        assert_eq!(normalize("Alt"), "alt");
    }

    #[test]
    fn test_single_characters_keep_case() {
        assert_eq!(normalize("A"), "A");
        assert_eq!(normalize("a"), "a");
        assert_ne!(normalize("A"), normalize("a"));
        assert_eq!(normalize("?"), "?");
    }

    #[test]
    fn test_unknown_names_lowercase() {
        assert_eq!(normalize("ArrowUp"), "arrowup");
        assert_eq!(normalize("F12"), "f12");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["Esc", "ctrl", "A", "b", "Option", "PageDown", "", "  K  ", "é"] {
            let once = normalize(raw);
            assert_eq!(normalize(once.as_str()), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize(" Ctrl "), "control");
        assert_eq!(normalize(" k"), "k");
        assert_eq!(normalize(" "), " ");
    }

    #[test]
    fn test_ignored_modifiers() {
        assert!(normalize("Shift").is_ignored_modifier());
        assert!(normalize("OS").is_ignored_modifier());
        assert!(normalize("Meta").is_ignored_modifier());
        assert!(!normalize("Control").is_ignored_modifier());
        assert!(!normalize("s").is_ignored_modifier());
    }
}
