//! Batch label canonicalization.
//!
//! Raw exports spell cohorts either as "Winter 2014" or as "W14". The
//! canonical form is the short code. Recognition is driven by an ordered rule
//! table, so supporting a new season is a new table entry.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::constants::UNSPECIFIED_BATCH;

/// What a matching rule does to the label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// Long form "<Season> <YYYY>": prefix plus the last two digits of the year
    SeasonYear { prefix: &'static str },
    /// Already canonical, returned unchanged
    Canonical,
}

/// A single recognition rule
pub struct BatchRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub rewrite: Rewrite,
}

impl BatchRule {
    fn new(name: &'static str, pattern: &str, rewrite: Rewrite) -> Self {
        Self {
            name,
            // Patterns are compile-time literals exercised by the tests below
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid batch rule {name}: {e}")),
            rewrite,
        }
    }

    fn apply(&self, label: &str) -> Option<String> {
        let captures = self.pattern.captures(label)?;
        Some(match self.rewrite {
            Rewrite::SeasonYear { prefix } => format!("{}{}", prefix, year_suffix(&captures)),
            Rewrite::Canonical => label.to_string(),
        })
    }
}

/// Last two digits of the captured four-digit year. Sliced on char
/// boundaries so a non-ASCII capture can never split a character.
fn year_suffix<'a>(captures: &Captures<'a>) -> &'a str {
    let year = captures.get(1).map_or("", |m| m.as_str());
    year.char_indices()
        .rev()
        .nth(1)
        .map_or(year, |(i, _)| &year[i..])
}

/// Ordered rule table. First match wins; long forms come before short codes.
/// Digits are `[0-9]` rather than `\d`, which would also accept non-ASCII digits.
pub static BATCH_RULES: Lazy<Vec<BatchRule>> = Lazy::new(|| {
    vec![
        BatchRule::new("winter", r"^Winter ([0-9]{4})$", Rewrite::SeasonYear { prefix: "W" }),
        BatchRule::new("summer", r"^Summer ([0-9]{4})$", Rewrite::SeasonYear { prefix: "S" }),
        BatchRule::new("fall", r"^Fall ([0-9]{4})$", Rewrite::SeasonYear { prefix: "F" }),
        BatchRule::new("spring", r"^Spring ([0-9]{4})$", Rewrite::SeasonYear { prefix: "Sp" }),
        BatchRule::new("winter_code", r"^W[0-9]{2}$", Rewrite::Canonical),
        BatchRule::new("summer_code", r"^S[0-9]{2}$", Rewrite::Canonical),
        BatchRule::new("fall_code", r"^F[0-9]{2}$", Rewrite::Canonical),
        BatchRule::new("spring_code", r"^Sp[0-9]{2}$", Rewrite::Canonical),
    ]
});

static LONG_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Winter|Summer|Fall|Spring) [0-9]{4}").unwrap_or_else(|e| panic!("invalid long-form pattern: {e}"))
});

/// Map a raw batch label to its canonical form.
///
/// Absent or empty labels become "Unspecified". Labels no rule recognizes
/// (e.g. "IK12") are returned unchanged; judging them is the validator's job.
pub fn normalize_batch(raw: Option<&str>) -> String {
    let label = match raw {
        Some(label) if !label.is_empty() => label,
        _ => return UNSPECIFIED_BATCH.to_string(),
    };

    BATCH_RULES
        .iter()
        .find_map(|rule| rule.apply(label))
        .unwrap_or_else(|| label.to_string())
}

/// Name of the first rule matching `label`, if any
pub fn matching_rule(label: &str) -> Option<&'static str> {
    BATCH_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(label))
        .map(|rule| rule.name)
}

/// Whether the label starts with a spelled-out season and year
pub fn is_long_form(label: &str) -> bool {
    LONG_FORM.is_match(label)
}
