//! Percentage and ratio math for chart segments.
//!
//! Division by zero and non-finite inputs never raise; they yield a 0%
//! segment. Each segment is rounded on its own, so a distribution may sum to
//! slightly more or less than 100.

use std::collections::BTreeMap;
use std::ops::Index;

use healthpie_types::{Percent, PgCategory};

use crate::classify::CategoryClassifier;

/// `round(100 * dividend / divisor)`, rounding half away from zero.
///
/// Returns 0 when `divisor <= 0` or either input is not finite. The result is
/// clamped to `0..=100`, so a dividend larger than the divisor reads as 100%
/// and a negative one as 0%.
pub fn percentage(dividend: f64, divisor: f64) -> Percent {
    if !dividend.is_finite() || !divisor.is_finite() || divisor <= 0.0 {
        return 0;
    }
    let value = (100.0 * dividend / divisor).round();
    value.clamp(0.0, 100.0) as Percent
}

/// Percentage of each count against the sum of all counts.
///
/// A zero total yields all zeros of the same length.
pub fn distribute(counts: &[f64]) -> Vec<Percent> {
    let total: f64 = counts.iter().sum();
    distribute_against(counts, total)
}

/// Percentage of each count against an explicit total.
pub fn distribute_against(counts: &[f64], total: f64) -> Vec<Percent> {
    if total == 0.0 {
        return vec![0; counts.len()];
    }
    counts.iter().map(|&c| percentage(c, total)).collect()
}

/// Per-category counts, addressed by [`PgCategory::index`].
///
/// Every category is always present; absent ones are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts([u64; PgCategory::COUNT]);

impl CategoryCounts {
    /// Add to a category's count, saturating on overflow.
    pub fn add(&mut self, category: PgCategory, count: u64) {
        let slot = &mut self.0[category.index()];
        *slot = slot.saturating_add(count);
    }

    /// Count for a category.
    pub fn get(&self, category: PgCategory) -> u64 {
        self.0[category.index()]
    }

    /// Iterate in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (PgCategory, u64)> + '_ {
        PgCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    /// Counts in fixed category order, as chart inputs.
    pub fn as_f64(&self) -> [f64; PgCategory::COUNT] {
        self.0.map(|c| c as f64)
    }
}

impl Index<PgCategory> for CategoryCounts {
    type Output = u64;

    fn index(&self, category: PgCategory) -> &u64 {
        &self.0[category.index()]
    }
}

/// Fold raw status counts into category buckets.
///
/// Returns the per-category counts (all four categories, zero-filled) and
/// the total of all input counts.
pub fn classify_and_total(
    status_counts: &BTreeMap<String, u64>,
    classifier: &CategoryClassifier,
) -> (CategoryCounts, u64) {
    status_counts.iter().fold(
        (CategoryCounts::default(), 0u64),
        |(mut counts, total), (label, count)| {
            counts.add(classifier.classify(label), *count);
            (counts, total.saturating_add(*count))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{CategoryRule, Matcher};

    #[test]
    fn test_percentage_rounds_half_away_from_zero() {
        assert_eq!(percentage(1.0, 8.0), 13); // 12.5
        assert_eq!(percentage(1.0, 3.0), 33);
        assert_eq!(percentage(2.0, 3.0), 67);
        assert_eq!(percentage(80.0, 100.0), 80);
        assert_eq!(percentage(0.0, 5.0), 0);
        assert_eq!(percentage(5.0, 5.0), 100);
    }

    #[test]
    fn test_percentage_zero_or_negative_divisor() {
        for x in [0.0, 1.0, 42.5, -3.0, 1e12] {
            assert_eq!(percentage(x, 0.0), 0);
            assert_eq!(percentage(x, -10.0), 0);
        }
    }

    #[test]
    fn test_percentage_non_finite_inputs() {
        assert_eq!(percentage(f64::NAN, 10.0), 0);
        assert_eq!(percentage(10.0, f64::NAN), 0);
        assert_eq!(percentage(f64::INFINITY, 10.0), 0);
        assert_eq!(percentage(10.0, f64::INFINITY), 0);
    }

    #[test]
    fn test_percentage_stays_in_range() {
        assert_eq!(percentage(150.0, 100.0), 100);
        assert_eq!(percentage(-5.0, 100.0), 0);

        for divisor in 1..=50 {
            for dividend in 0..=divisor {
                let expected = (100.0 * dividend as f64 / divisor as f64).round() as Percent;
                let p = percentage(dividend as f64, divisor as f64);
                assert_eq!(p, expected);
                assert!(p <= 100);
            }
        }
    }

    #[test]
    fn test_distribute_zero_total() {
        assert_eq!(distribute(&[0.0, 0.0, 0.0]), vec![0, 0, 0]);
        assert_eq!(distribute(&[]), Vec::<Percent>::new());
    }

    #[test]
    fn test_distribute_sum_is_within_rounding_bound() {
        let cases: &[&[f64]] = &[
            &[80.0, 20.0],
            &[1.0, 1.0, 1.0],
            &[10.0, 5.0, 0.0, 3.0],
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            &[7.0, 13.0, 29.0, 51.0, 3.0],
        ];

        for counts in cases {
            let segments = distribute(counts);
            assert_eq!(segments.len(), counts.len());
            let sum: i64 = segments.iter().map(|s| i64::from(*s)).sum();
            assert!(
                (sum - 100).abs() <= counts.len() as i64 - 1,
                "{:?} -> {:?}",
                counts,
                segments
            );
        }
    }

    #[test]
    fn test_distribute_is_not_corrected() {
        // 33 + 33 + 33: each segment stays consistent with its own count.
        assert_eq!(distribute(&[1.0, 1.0, 1.0]), vec![33, 33, 33]);
        assert_eq!(distribute(&[10.0, 5.0, 0.0, 3.0]), vec![56, 28, 0, 17]);
    }

    #[test]
    fn test_distribute_against_explicit_total() {
        assert_eq!(distribute_against(&[30.0, 10.0], 200.0), vec![15, 5]);
        assert_eq!(distribute_against(&[30.0, 10.0], 0.0), vec![0, 0]);
    }

    #[test]
    fn test_classify_and_total() {
        let classifier = CategoryClassifier::new(vec![
            CategoryRule::new(PgCategory::Clean, Matcher::Contains("clean".into())),
            CategoryRule::new(PgCategory::Working, Matcher::Contains("recovering".into())),
        ]);

        let mut statuses = BTreeMap::new();
        statuses.insert("active+clean".to_string(), 10);
        statuses.insert("active+recovering".to_string(), 5);
        statuses.insert("odd-state".to_string(), 3);

        let (counts, total) = classify_and_total(&statuses, &classifier);
        assert_eq!(total, 18);
        assert_eq!(counts[PgCategory::Clean], 10);
        assert_eq!(counts[PgCategory::Working], 5);
        assert_eq!(counts[PgCategory::Warning], 0);
        assert_eq!(counts[PgCategory::Unknown], 3);
        assert_eq!(distribute(&counts.as_f64()), vec![56, 28, 0, 17]);
    }

    #[test]
    fn test_classify_and_total_accumulates_same_category() {
        let classifier = CategoryClassifier::ceph_default();

        let mut statuses = BTreeMap::new();
        statuses.insert("active+clean".to_string(), 100);
        statuses.insert("active".to_string(), 4);
        statuses.insert("stale".to_string(), 2);
        statuses.insert("down".to_string(), 1);

        let (counts, total) = classify_and_total(&statuses, &classifier);
        assert_eq!(total, 107);
        let all: Vec<_> = counts.iter().collect();
        assert_eq!(
            all,
            vec![
                (PgCategory::Clean, 104),
                (PgCategory::Working, 0),
                (PgCategory::Warning, 3),
                (PgCategory::Unknown, 0),
            ]
        );
    }

    #[test]
    fn test_classify_and_total_empty_input() {
        let (counts, total) = classify_and_total(&BTreeMap::new(), &CategoryClassifier::default());
        assert_eq!(total, 0);
        assert_eq!(counts, CategoryCounts::default());
        assert_eq!(counts.iter().count(), PgCategory::COUNT);
    }
}
