//! Placement group status classification.
//!
//! A raw PG status label such as `active+recovering+degraded` is mapped onto
//! one of the fixed [`PgCategory`] buckets by an ordered, data-driven rule
//! table. Rules are evaluated top to bottom and the first match wins; a label
//! no rule matches is [`PgCategory::Unknown`].

use std::collections::BTreeSet;

use healthpie_types::PgCategory;
use serde::{Deserialize, Serialize};

/// Separator between the state flags of a combined PG status label.
pub const STATE_SEPARATOR: char = '+';

/// States of a healthy placement group.
pub const CLEAN_STATES: &[&str] = &["active", "clean"];

/// States of a placement group that is busy but expected to settle.
pub const WORKING_STATES: &[&str] = &[
    "activating",
    "backfill_wait",
    "backfilling",
    "creating",
    "deep",
    "degraded",
    "forced_backfill",
    "forced_recovery",
    "peering",
    "peered",
    "recovering",
    "recovery_wait",
    "repair",
    "scrubbing",
    "snaptrim",
    "snaptrim_wait",
];

/// States that need operator attention.
pub const WARNING_STATES: &[&str] = &[
    "backfill_toofull",
    "backfill_unfound",
    "down",
    "incomplete",
    "inconsistent",
    "recovery_toofull",
    "recovery_unfound",
    "remapped",
    "snaptrim_error",
    "stale",
    "undersized",
];

/// Predicate over a raw status label.
///
/// In configuration files matchers are written as single-key tables:
///
/// ```toml
/// [[rules]]
/// category = "working"
/// matcher = { contains = "recovering" }
///
/// [[rules]]
/// category = "warning"
/// matcher = { any_state = ["down", "stale"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// The label contains the text.
    Contains(String),
    /// The label equals the text.
    Exact(String),
    /// At least one state flag of the label is in the set.
    AnyState(BTreeSet<String>),
    /// The label has at least one state flag and every flag is in the set.
    OnlyStates(BTreeSet<String>),
    /// Every inner matcher matches. An empty list matches nothing.
    All(Vec<Matcher>),
}

impl Matcher {
    /// Build a [`Matcher::AnyState`] from a list of states.
    pub fn any_state(states: &[&str]) -> Self {
        Matcher::AnyState(to_set(states))
    }

    /// Build a [`Matcher::OnlyStates`] from a list of states.
    pub fn only_states(states: &[&str]) -> Self {
        Matcher::OnlyStates(to_set(states))
    }

    /// Check whether the label satisfies this matcher.
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Matcher::Contains(text) => label.contains(text.as_str()),
            Matcher::Exact(text) => label == text,
            Matcher::AnyState(set) => states(label).any(|s| set.contains(s)),
            Matcher::OnlyStates(set) => {
                let mut flags = states(label).peekable();
                flags.peek().is_some() && flags.all(|s| set.contains(s))
            }
            Matcher::All(inner) => !inner.is_empty() && inner.iter().all(|m| m.matches(label)),
        }
    }
}

/// One entry of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: PgCategory,
    pub matcher: Matcher,
}

impl CategoryRule {
    pub fn new(category: PgCategory, matcher: Matcher) -> Self {
        Self { category, matcher }
    }
}

/// Maps raw PG status labels to categories using an ordered rule table.
///
/// The table is fixed at construction and never mutated afterwards.
///
/// # Example
///
/// ```
/// use healthpie::{CategoryClassifier, CategoryRule, Matcher};
/// use healthpie_types::PgCategory;
///
/// let classifier = CategoryClassifier::new(vec![
///     CategoryRule::new(PgCategory::Clean, Matcher::Contains("clean".into())),
///     CategoryRule::new(PgCategory::Working, Matcher::Contains("recovering".into())),
/// ]);
///
/// assert_eq!(classifier.classify("active+clean"), PgCategory::Clean);
/// assert_eq!(classifier.classify("active+recovering"), PgCategory::Working);
/// assert_eq!(classifier.classify("odd-state"), PgCategory::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
}

impl CategoryClassifier {
    /// Create a classifier from an ordered rule table.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The storage cluster's standard classification.
    ///
    /// Any warning flag makes the PG a warning; otherwise a PG whose flags
    /// are all clean-or-working states with at least one working state is
    /// working; a PG made only of `active`/`clean` flags is clean.
    pub fn ceph_default() -> Self {
        Self::new(default_rules())
    }

    /// The rule table, in evaluation order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classify a raw status label. First matching rule wins.
    pub fn classify(&self, label: &str) -> PgCategory {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(label))
            .map(|rule| rule.category)
            .unwrap_or(PgCategory::Unknown)
    }

    /// All categories in fixed display order, regardless of which ones
    /// occur in a given snapshot.
    pub fn all_categories(&self) -> &'static [PgCategory] {
        &PgCategory::ALL
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::ceph_default()
    }
}

/// The rule table behind [`CategoryClassifier::ceph_default`].
pub fn default_rules() -> Vec<CategoryRule> {
    let clean_or_working: Vec<&str> = CLEAN_STATES.iter().chain(WORKING_STATES).copied().collect();

    vec![
        CategoryRule::new(PgCategory::Warning, Matcher::any_state(WARNING_STATES)),
        CategoryRule::new(
            PgCategory::Working,
            Matcher::All(vec![
                Matcher::only_states(&clean_or_working),
                Matcher::any_state(WORKING_STATES),
            ]),
        ),
        CategoryRule::new(PgCategory::Clean, Matcher::only_states(CLEAN_STATES)),
    ]
}

/// Split a combined label into its state flags.
fn states(label: &str) -> impl Iterator<Item = &str> {
    label
        .split(STATE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn to_set(states: &[&str]) -> BTreeSet<String> {
    states.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substring_rules() -> CategoryClassifier {
        CategoryClassifier::new(vec![
            CategoryRule::new(PgCategory::Clean, Matcher::Contains("clean".into())),
            CategoryRule::new(PgCategory::Working, Matcher::Contains("recovering".into())),
        ])
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let classifier = substring_rules();
        // Matches both rules; the clean rule comes first.
        assert_eq!(classifier.classify("active+clean+recovering"), PgCategory::Clean);
        assert_eq!(classifier.classify("active+recovering"), PgCategory::Working);
    }

    #[test]
    fn test_unmatched_label_is_unknown() {
        let classifier = substring_rules();
        assert_eq!(classifier.classify("odd-state"), PgCategory::Unknown);
        assert_eq!(classifier.classify(""), PgCategory::Unknown);
    }

    #[test]
    fn test_empty_table_classifies_everything_unknown() {
        let classifier = CategoryClassifier::new(Vec::new());
        assert_eq!(classifier.classify("active+clean"), PgCategory::Unknown);
    }

    #[test]
    fn test_all_categories_fixed_order() {
        let classifier = CategoryClassifier::new(Vec::new());
        assert_eq!(
            classifier.all_categories(),
            &[
                PgCategory::Clean,
                PgCategory::Working,
                PgCategory::Warning,
                PgCategory::Unknown
            ]
        );
    }

    #[test]
    fn test_matchers() {
        assert!(Matcher::Exact("active+clean".into()).matches("active+clean"));
        assert!(!Matcher::Exact("active+clean".into()).matches("active+clean+scrubbing"));

        let any = Matcher::any_state(&["stale", "down"]);
        assert!(any.matches("stale+active+clean"));
        assert!(!any.matches("active+clean"));
        // Flags are compared whole, not as substrings.
        assert!(!any.matches("downloading"));

        let only = Matcher::only_states(&["active", "clean"]);
        assert!(only.matches("active+clean"));
        assert!(only.matches("active"));
        assert!(!only.matches("active+clean+scrubbing"));
        assert!(!only.matches(""));

        assert!(!Matcher::All(Vec::new()).matches("active"));
    }

    #[test]
    fn test_ceph_default_clean() {
        let classifier = CategoryClassifier::ceph_default();
        assert_eq!(classifier.classify("active+clean"), PgCategory::Clean);
        assert_eq!(classifier.classify("clean+active"), PgCategory::Clean);
        assert_eq!(classifier.classify("active"), PgCategory::Clean);
    }

    #[test]
    fn test_ceph_default_working() {
        let classifier = CategoryClassifier::ceph_default();
        assert_eq!(
            classifier.classify("active+clean+scrubbing+deep"),
            PgCategory::Working
        );
        assert_eq!(
            classifier.classify("active+recovering+degraded"),
            PgCategory::Working
        );
        assert_eq!(classifier.classify("peering"), PgCategory::Working);
    }

    #[test]
    fn test_ceph_default_warning_beats_working() {
        let classifier = CategoryClassifier::ceph_default();
        assert_eq!(
            classifier.classify("active+undersized+degraded"),
            PgCategory::Warning
        );
        assert_eq!(
            classifier.classify("active+recovering+remapped"),
            PgCategory::Warning
        );
        assert_eq!(classifier.classify("stale+down"), PgCategory::Warning);
    }

    #[test]
    fn test_ceph_default_unrecognised_flag_is_unknown() {
        let classifier = CategoryClassifier::ceph_default();
        assert_eq!(classifier.classify("active+clean+laggy"), PgCategory::Unknown);
        assert_eq!(classifier.classify("unknown"), PgCategory::Unknown);
        assert_eq!(classifier.classify(""), PgCategory::Unknown);
    }

    #[test]
    fn test_rules_deserialize_from_json() {
        let json = r#"[
            { "category": "warning", "matcher": { "any_state": ["down", "stale"] } },
            { "category": "clean", "matcher": { "contains": "clean" } },
            { "category": "working", "matcher": { "all": [
                { "contains": "active" }, { "exact": "active+peered" }
            ] } }
        ]"#;

        let rules: Vec<CategoryRule> = serde_json::from_str(json).unwrap();
        let classifier = CategoryClassifier::new(rules);
        assert_eq!(classifier.rules().len(), 3);
        assert_eq!(classifier.classify("stale+active+clean"), PgCategory::Warning);
        assert_eq!(classifier.classify("active+clean"), PgCategory::Clean);
        assert_eq!(classifier.classify("active+peered"), PgCategory::Working);
    }
}
