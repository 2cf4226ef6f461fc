// crates/dirmap-core/src/text.rs

//! # Location Normalizer
//!
//! Birthplace strings come from free-text biographies ("Kyiv, Ukrainian SSR,
//! USSR", "Berlin [citation needed], West Germany") and need cleaning before a
//! geocoder understands them. Cleaning is an ordered list of
//! [`CleanupRule`]s followed by a trim of surrounding whitespace and trailing
//! commas, repeated until the string stops changing.

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;

/// One `(pattern, replacement)` step. Every match is replaced.
#[derive(Debug, Clone)]
pub struct CleanupRule {
    pattern: Regex,
    replacement: String,
}

impl CleanupRule {
    /// A rule matching `needle` literally.
    pub fn literal(needle: &str, replacement: &str) -> Self {
        CleanupRule {
            pattern: Regex::new(&regex::escape(needle)).expect("escaped literal is a valid pattern"),
            replacement: replacement.to_owned(),
        }
    }

    /// A rule from a regular expression.
    pub fn pattern(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(CleanupRule {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_owned(),
        })
    }

    fn apply(&self, s: &str) -> String {
        self.pattern
            .replace_all(s, regex::NoExpand(&self.replacement))
            .into_owned()
    }
}

static DEFAULT_RULES: Lazy<Vec<CleanupRule>> = Lazy::new(|| {
    vec![
        // Footnote markers and annotations: "[1]", "[citation needed]".
        CleanupRule {
            pattern: Regex::new(r"\[.*?\]").expect("bracket pattern"),
            replacement: String::new(),
        },
        CleanupRule::literal("West Germany", "Germany"),
        CleanupRule::literal("USSR", ""),
        CleanupRule::literal("Ukrainian SSR", ""),
    ]
});

static DEFAULT_NORMALIZER: Lazy<LocationNormalizer> = Lazy::new(LocationNormalizer::default);

/// Applies cleanup rules in order, then tidies the ends of the string.
#[derive(Debug, Clone)]
pub struct LocationNormalizer {
    rules: Vec<CleanupRule>,
}

impl Default for LocationNormalizer {
    fn default() -> Self {
        LocationNormalizer {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl LocationNormalizer {
    /// A normalizer without any rule; only the trim step runs.
    pub fn empty() -> Self {
        LocationNormalizer { rules: Vec::new() }
    }

    /// Appends a rule after the existing ones.
    pub fn with_rule(mut self, rule: CleanupRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[CleanupRule] {
        &self.rules
    }

    /// Returns the geocoder query for `raw`. An empty result means the
    /// location must be skipped.
    ///
    /// The rules and the trim are applied again until the string no longer
    /// changes, so a removal that forms a new match ("West West Germany",
    /// "USUSSRSR") is handled too and `clean(clean(x)) == clean(x)`.
    pub fn clean(&self, raw: &str) -> String {
        let mut current = self.clean_once(raw);
        for _ in 1..MAX_PASSES {
            let next = self.clean_once(&current);
            // A configured rule that grows the string would never settle.
            if next == current || next.len() > current.len() {
                break;
            }
            current = next;
        }
        current
    }

    fn clean_once(&self, s: &str) -> String {
        let replaced = self
            .rules
            .iter()
            .fold(s.to_owned(), |acc, rule| rule.apply(&acc));
        tidy(&replaced).to_owned()
    }
}

/// Upper bound on cleaning passes. The built-in rules only shorten the
/// string and settle long before this.
const MAX_PASSES: usize = 32;

/// Trims whitespace on both sides and any run of trailing commas, so that
/// "Kyiv, , " and "Kyiv," both end up as "Kyiv".
fn tidy(s: &str) -> &str {
    s.trim_start()
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}

/// Cleans `raw` with the default rule set.
///
/// ```rust
/// use dirmap_core::text::clean_birthplace;
///
/// assert_eq!(clean_birthplace("[1] London"), "London");
/// assert_eq!(clean_birthplace("Munich, Bavaria, West Germany"), "Munich, Bavaria, Germany");
/// assert_eq!(clean_birthplace("Kyiv, Ukrainian SSR, USSR"), "Kyiv");
/// assert_eq!(clean_birthplace("[unknown]"), "");
/// ```
pub fn clean_birthplace(raw: &str) -> String {
    DEFAULT_NORMALIZER.clean(raw)
}

/// Convert a string into a folded key suitable for sorting and comparison.
///
/// Transliterates Unicode to ASCII with `deunicode`, then lowercases, so
/// "Żuławski" sorts next to "Zulawski".
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_every_bracket_group() {
        assert_eq!(
            clean_birthplace("Paris[1], France [citation needed]"),
            "Paris, France"
        );
    }

    #[test]
    fn historical_names() {
        assert_eq!(clean_birthplace("Moscow, Russian SFSR, USSR"), "Moscow, Russian SFSR");
        assert_eq!(clean_birthplace("Odesa, Ukrainian SSR"), "Odesa");
        assert_eq!(clean_birthplace("Hamburg, West Germany"), "Hamburg, Germany");
    }

    #[test]
    fn strips_trailing_comma_and_space() {
        assert_eq!(clean_birthplace("  Rome, Italy, "), "Rome, Italy");
        assert_eq!(clean_birthplace(" , "), "");
    }

    #[test]
    fn idempotent_on_samples() {
        for raw in [
            "[1] London",
            "Kyiv, Ukrainian SSR, USSR",
            "Tbilisi, Georgian SSR, USSR [2]",
            "Berlin, West Germany,",
            "USSR USSR",
            "Mexico City, Mexico",
            "",
        ] {
            let once = clean_birthplace(raw);
            assert_eq!(clean_birthplace(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn removals_that_form_new_matches_settle() {
        assert_eq!(clean_birthplace("West West Germany"), "Germany");
        assert_eq!(clean_birthplace("USUSSRSR"), "");
        assert_eq!(clean_birthplace("[[1]] Oslo"), "] Oslo");
        for raw in ["West West Germany", "USUSSRSR", "Riga, USUSSRSR,", "[a[b]c] Paris"] {
            let once = clean_birthplace(raw);
            assert_eq!(clean_birthplace(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn growing_rule_runs_once() {
        let n = LocationNormalizer::empty().with_rule(CleanupRule::literal("a", "aa"));
        assert_eq!(n.clean("a"), "aa");
    }

    #[test]
    fn length_preserving_cycle_is_bounded() {
        let n = LocationNormalizer::empty()
            .with_rule(CleanupRule::literal("ab", "ba"))
            .with_rule(CleanupRule::literal("ba", "ab"));
        assert_eq!(n.clean("ab"), "ab");
    }

    #[test]
    fn extra_rules_run_after_defaults() {
        let n = LocationNormalizer::default()
            .with_rule(CleanupRule::literal("Czechoslovakia", "Czech Republic"));
        assert_eq!(n.clean("Prague, Czechoslovakia"), "Prague, Czech Republic");
        assert_eq!(n.rules().len(), 5);
    }

    #[test]
    fn pattern_rule_rejects_bad_regex() {
        assert!(CleanupRule::pattern("(", "").is_err());
        let r = CleanupRule::pattern(r"\s*\(.*?\)", "").unwrap();
        assert_eq!(LocationNormalizer::empty().with_rule(r).clean("Gori (Georgia)"), "Gori");
    }

    #[test]
    fn fold_key_transliterates() {
        assert_eq!(fold_key("Żuławski"), "zulawski");
        assert_eq!(fold_key("Almodóvar"), "almodovar");
    }
}
