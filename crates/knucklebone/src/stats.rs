//! Sample summaries for batched rolls.
//!
//! Replications are spread over threads, so both summaries merge: per-chunk
//! results fold into one without revisiting the samples.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Running statistics for a stream of scalar samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance (σ²)
    pub variance: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Number of samples contributing to these stats
    pub sample_count: u64,
}

impl ScalarStats {
    /// Create empty stats.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            mean: 0.0,
            variance: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sample_count: 0,
        }
    }

    /// Summarise a batch in one pass (Welford).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut stats = Self::empty();
        let mut m2 = 0.0;
        for value in samples {
            stats.sample_count += 1;
            let delta = value - stats.mean;
            stats.mean += delta / stats.sample_count as f64;
            m2 += delta * (value - stats.mean);
            stats.min = stats.min.min(value);
            stats.max = stats.max.max(value);
        }
        if stats.sample_count > 0 {
            stats.variance = m2 / stats.sample_count as f64;
        }
        stats
    }

    /// Combine the summaries of two disjoint batches.
    ///
    /// Chan's pairwise update: means weighted by count, and the variance
    /// corrected by the squared gap between the means.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn merge(a: &Self, b: &Self) -> Self {
        if a.sample_count == 0 {
            return *b;
        }
        if b.sample_count == 0 {
            return *a;
        }

        let n_a = a.sample_count as f64;
        let n_b = b.sample_count as f64;
        let n_total = n_a + n_b;

        let delta = b.mean - a.mean;
        let mean = a.mean + delta * (n_b / n_total);
        let variance = (a.variance * n_a + b.variance * n_b + delta * delta * n_a * n_b / n_total)
            / n_total;

        Self {
            mean,
            variance,
            min: a.min.min(b.min),
            max: a.max.max(b.max),
            sample_count: a.sample_count + b.sample_count,
        }
    }

    /// Fold batch summaries left to right. The float result depends on the
    /// order, so callers that need reproducible output keep it fixed.
    #[must_use]
    pub fn merge_many(stats: &[Self]) -> Self {
        stats
            .iter()
            .fold(Self::empty(), |acc, s| Self::merge(&acc, s))
    }

    /// Standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

impl Default for ScalarStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Counts of each distinct value seen, in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Ord + Serialize",
    deserialize = "K: Ord + Deserialize<'de>"
))]
pub struct Tally<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Tally<K> {
    /// An empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Record one observation.
    pub fn record(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Observations of `key`.
    #[must_use]
    pub fn count(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Total observations.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Distinct values seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(value, count)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Add another tally's counts to this one.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
        self
    }
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.record(key);
        }
        tally
    }
}
