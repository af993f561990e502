//! Keyword-based note suggestions.
//!
//! Pure function of the note content; no model calls, no store access.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Suggestion;

struct Rule {
    pattern: Regex,
    kind: &'static str,
    title: &'static str,
    description: &'static str,
}

fn rule(words: &str, kind: &'static str, title: &'static str, description: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(&format!(r"(?i)\b(?:{words})\b")).expect("static pattern"),
        kind,
        title,
        description,
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(
            "meetings?",
            "calendar",
            "Schedule a meeting",
            "This note mentions a meeting. Add it to your calendar so it is not missed.",
        ),
        rule(
            "todo|to-do|tasks?",
            "checklist",
            "Turn this into a checklist",
            "This note looks like a list of things to do. Track each item as a checklist entry.",
        ),
        rule(
            "ideas?",
            "brainstorm",
            "Expand this idea",
            "Capture related thoughts, pros and cons, and next steps while the idea is fresh.",
        ),
        rule(
            "deadline|due",
            "reminder",
            "Set a reminder",
            "This note mentions a due date. Set a reminder ahead of it.",
        ),
    ]
});

/// Suggestions for `content`, at most one per rule, in rule order.
pub fn suggest(content: &str) -> Vec<Suggestion> {
    RULES
        .iter()
        .filter(|r| r.pattern.is_match(content))
        .map(|r| Suggestion {
            kind: r.kind.to_string(),
            title: r.title.to_string(),
            description: r.description.to_string(),
        })
        .collect()
}
