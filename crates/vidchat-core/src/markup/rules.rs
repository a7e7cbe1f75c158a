//! The ordered rewrite rules behind [`super::render`].
//!
//! Each rule runs over the whole cumulative output of the rules before it.
//! Later rules may see markup produced by earlier ones, so the order here is
//! part of the output contract. Line-anchored patterns use `(?mR)`: `\r` and
//! `\n` both end a line and `.` never crosses a line terminator.

use std::sync::OnceLock;

use regex::Regex;

use super::table;

static RULES: OnceLock<Vec<RenderRule>> = OnceLock::new();

/// One rewrite pass.
#[derive(Debug)]
pub struct RenderRule {
    /// Short identifier (e.g. "heading-h2").
    pub name: &'static str,
    /// Position in the pipeline; lower runs first.
    pub precedence: u16,
    pattern: Pattern,
}

#[derive(Debug)]
enum Pattern {
    /// Entity-encode `&`, `<`, `>`.
    Escape,
    /// Regex substitution; the replacement uses `${n}` capture references.
    Regex {
        regex: Regex,
        replacement: &'static str,
    },
    /// Plain substring substitution.
    Literal {
        needle: &'static str,
        replacement: &'static str,
    },
    /// Table rows and containers (see `table`).
    Tables,
}

impl RenderRule {
    fn regex(name: &'static str, precedence: u16, pattern: &str, replacement: &'static str) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("render rule {name} has an invalid pattern: {e}"));
        Self {
            name,
            precedence,
            pattern: Pattern::Regex { regex, replacement },
        }
    }

    fn literal(
        name: &'static str,
        precedence: u16,
        needle: &'static str,
        replacement: &'static str,
    ) -> Self {
        Self {
            name,
            precedence,
            pattern: Pattern::Literal {
                needle,
                replacement,
            },
        }
    }

    /// Applies this rule to `text`.
    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Pattern::Escape => text
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;"),
            Pattern::Regex { regex, replacement } => {
                regex.replace_all(text, *replacement).into_owned()
            }
            Pattern::Literal {
                needle,
                replacement,
            } => text.replace(*needle, replacement),
            Pattern::Tables => table::rewrite_tables(text),
        }
    }

    /// Source pattern, for diagnostics.
    pub fn pattern(&self) -> &str {
        match &self.pattern {
            Pattern::Escape => "[&<>]",
            Pattern::Regex { regex, .. } => regex.as_str(),
            Pattern::Literal { needle, .. } => *needle,
            Pattern::Tables => table::ROW_PATTERN,
        }
    }
}

/// Returns the process-wide rule list, in application order.
pub fn rules() -> &'static [RenderRule] {
    RULES.get_or_init(build_rules)
}

fn build_rules() -> Vec<RenderRule> {
    vec![
        RenderRule {
            name: "escape",
            precedence: 10,
            pattern: Pattern::Escape,
        },
        // Longest marker first.
        RenderRule::regex(
            "heading-h4",
            20,
            r"(?mR)^### (.*?)$",
            r#"<h4 class="chat-h4">${1}</h4>"#,
        ),
        RenderRule::regex(
            "heading-h3",
            21,
            r"(?mR)^## (.*?)$",
            r#"<h3 class="chat-h3">${1}</h3>"#,
        ),
        RenderRule::regex(
            "heading-h2",
            22,
            r"(?mR)^# (.*?)$",
            r#"<h2 class="chat-h2">${1}</h2>"#,
        ),
        RenderRule::regex(
            "code-block",
            30,
            r"```([A-Za-z0-9_]*)\n((?s:.)*?)\n```",
            r#"<pre class="chat-code-block"><code class="language-${1}">${2}</code></pre>"#,
        ),
        RenderRule::regex(
            "inline-code",
            40,
            r"`([^`]+)`",
            r#"<code class="chat-inline-code">${1}</code>"#,
        ),
        RenderRule::regex(
            "timeline-item",
            50,
            r"(?mR)^\[(.*?)\](.*?)$",
            r#"<div class="chat-timeline-item"><span class="timeline-date">[${1}]</span>${2}</div>"#,
        ),
        RenderRule::literal(
            "timeline-connector",
            51,
            "\u{2502}",
            r#"<div class="timeline-connector"></div>"#,
        ),
        RenderRule::regex(
            "definition",
            60,
            r"(?mR)^(.*?)\n:(.*?)$",
            r#"<dl class="chat-definition"><dt>${1}</dt><dd>${2}</dd></dl>"#,
        ),
        // Input `>` is already `&gt;` by the time this runs.
        RenderRule::regex(
            "blockquote",
            70,
            r"(?mR)^&gt; (.*?)$",
            r#"<blockquote class="chat-quote">${1}</blockquote>"#,
        ),
        RenderRule::regex("rule", 80, r"(?mR)^---$", r#"<hr class="chat-hr">"#),
        RenderRule::regex(
            "list-numbered",
            90,
            r"(?mR)^[0-9]+\.\s+(.*?)$",
            r#"<div class="chat-list-item numbered">${0}</div>"#,
        ),
        RenderRule::regex(
            "list-bullet",
            91,
            r"(?mR)^-\s+(.*?)$",
            r#"<div class="chat-list-item bullet">${1}</div>"#,
        ),
        RenderRule::regex(
            "list-sub-bullet",
            92,
            r"(?mR)^\s\s-\s+(.*?)$",
            r#"<div class="chat-list-item sub-bullet">${1}</div>"#,
        ),
        RenderRule::regex("bold", 100, r"(?R)\*\*(.*?)\*\*", "<strong>${1}</strong>"),
        RenderRule {
            name: "tables",
            precedence: 110,
            pattern: Pattern::Tables,
        },
        RenderRule::literal(
            "section-break",
            120,
            "\n\n",
            r#"<div class="chat-section-break"></div>"#,
        ),
        RenderRule::literal("line-break", 121, "\n", "<br>"),
    ]
}
