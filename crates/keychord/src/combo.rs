//! Key combinations and sequences.
//!
//! A [`Combo`] is a set of keys held down together, such as `Ctrl+K`. A
//! [`Sequence`] is an ordered chain of combos, such as `Ctrl+K Ctrl+S` or
//! `g g`.
//!
//! # String Format
//!
//! - Combos inside a sequence are separated by single spaces
//! - Keys inside a combo are joined with `+`
//! - Key names are case-insensitive except for single characters, and
//!   accept the aliases understood by [`normalize`](crate::normalize)
//!
//! ```
//! use keychord::Sequence;
//!
//! let save = Sequence::parse("Ctrl+K Ctrl+S");
//! assert_eq!(save.len(), 2);
//! assert_eq!(save.to_string(), "K+control S+control");
//!
//! // Order of keys inside a combo does not matter.
//! assert_eq!(Sequence::parse("K+Ctrl"), Sequence::parse("ctrl+K"));
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::key::{normalize, Token};

/// Keys pressed simultaneously.
///
/// Stored in canonical form: tokens sorted and joined by `+`. Two combos are
/// equal exactly when their canonical forms are equal, so the order in which
/// the keys went down is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Combo(String);

impl Combo {
    /// Build a combo from already-normalized tokens.
    pub fn from_tokens<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let mut names: Vec<&str> = tokens.into_iter().map(Token::as_str).collect();
        names.sort_unstable();
        Combo(names.join("+"))
    }

    /// Parse a `+`-joined combo such as `"Ctrl+Alt+Delete"`.
    pub fn parse(spec: &str) -> Self {
        let tokens: Vec<Token> = spec.split('+').map(normalize).collect();
        Self::from_tokens(&tokens)
    }

    /// The canonical `+`-joined form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered chain of combos bound to a single callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    combos: Vec<Combo>,
}

impl Sequence {
    /// Parse a space-separated sequence of combos.
    ///
    /// Never fails. Malformed input (empty strings, doubled separators,
    /// unknown names) produces combos that simply never match a key press.
    pub fn parse(spec: &str) -> Self {
        Self {
            combos: spec.split(' ').map(Combo::parse).collect(),
        }
    }

    /// Build a sequence from combos.
    pub fn from_combos(combos: Vec<Combo>) -> Self {
        Self { combos }
    }

    /// The combos in order.
    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    /// Number of combos.
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    /// Whether the sequence has no combos.
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}

impl FromStr for Sequence {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Sequence {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, combo) in self.combos.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(combo.as_str())?;
        }
        Ok(())
    }
}
