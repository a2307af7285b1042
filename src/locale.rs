//! Locale codes and layout direction.
//!
//! The direction mapping is a closed enumeration: exactly the codes in
//! [`RTL_LANGUAGES`] render right-to-left, everything else renders
//! left-to-right. The set is not inferred from content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language codes that render right-to-left.
pub const RTL_LANGUAGES: [&str; 2] = ["he", "fa"];

/// Two-letter language tag (e.g. `en`, `he`).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocaleCode(pub String);

impl LocaleCode {
    pub fn new(code: impl Into<String>) -> Self {
        LocaleCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocaleCode({})", self.0)
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout writing direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Map a locale code to its layout direction.
    pub fn of(code: &LocaleCode) -> Self {
        if RTL_LANGUAGES.contains(&code.as_str()) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Ltr
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-view render state.
///
/// Direction is an explicit value threaded through the owning view rather
/// than a process-wide mutation, so concurrently-mounted views cannot
/// clobber each other's layout direction.
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    direction: Direction,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Apply a direction. Idempotent: re-applying the current direction
    /// reports no change and has no effect.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction == direction {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Value for the document-level writing-direction attribute.
    pub fn dir_attr(&self) -> &'static str {
        self.direction.as_str()
    }

    /// Root layout class for the affected view.
    pub fn layout_class(&self) -> &'static str {
        self.direction.as_str()
    }
}
