//! Rule-based extraction of fiscal records from document text.
//!
//! Both parsers share the same machinery: a record starts out fully
//! populated with the "not found" sentinel, and a table of independent
//! anchored rules overwrites only the fields whose anchors match. A
//! rule that fails to match leaves its fields at the sentinel and never
//! affects the others.

pub mod cupom;
pub mod danfe;
pub mod patterns;

pub use cupom::parse_receipt_text;
pub use danfe::parse_danfe_text;

use regex::{Captures, Regex};
use tracing::debug;

/// One independent extraction rule: an anchoring pattern plus a field
/// splitter that populates the record from the captures.
pub(crate) struct FieldRule<R> {
    /// Rule name, used only in logs.
    pub name: &'static str,
    /// Anchor pattern; no match means the rule is skipped.
    pub anchor: &'static Regex,
    /// Populates record fields from the anchored captures.
    pub apply: fn(&Captures<'_>, &mut R),
}

/// Apply every rule to the text, independently.
pub(crate) fn apply_rules<R>(rules: &[FieldRule<R>], text: &str, record: &mut R) {
    for rule in rules {
        match rule.anchor.captures(text) {
            Some(caps) => (rule.apply)(&caps, record),
            None => debug!(rule = rule.name, "anchor did not match, keeping sentinel"),
        }
    }
}

/// Collapse horizontal whitespace runs and blank lines, as the upstream
/// PDF text extractor produces both liberally.
pub(crate) fn normalize_text(text: &str) -> String {
    let collapsed = patterns::HORIZONTAL_WS.replace_all(text, " ");
    let collapsed = patterns::BLANK_LINES.replace_all(&collapsed, "\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalization_collapses_whitespace() {
        let text = "a \t b\n\n\nc  d\n";
        assert_eq!(normalize_text(text), "a b\nc d");
    }
}
