//! Markup rendering for assistant replies.
//!
//! Raw reply text goes through an ordered list of rewrite passes (see
//! [`rules`]) and comes out as escaped presentation markup. The pipeline is
//! not idempotent: feeding markup back in escapes it a second time. Rendered
//! output is therefore wrapped in [`Markup`], which has no path back into
//! [`render`] short of an explicit `as_str()`.

pub mod rules;
mod table;

use std::fmt;

pub use rules::{RenderRule, rules};

/// Rendered presentation markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can turn raw reply text into markup.
///
/// The session holds one of these so hosts (and tests) can observe or
/// replace rendering without touching session logic.
pub trait Render: Send + Sync {
    fn render(&self, raw: &str) -> Markup;
}

/// The standard rule-table renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRenderer;

impl Render for MarkupRenderer {
    fn render(&self, raw: &str) -> Markup {
        render(raw)
    }
}

/// Renders raw assistant text into markup.
///
/// Total over arbitrary input: unmatched text passes through (escaped).
pub fn render(raw: &str) -> Markup {
    let out = rules()
        .iter()
        .fold(raw.to_string(), |text, rule| rule.apply(&text));
    Markup(out)
}
