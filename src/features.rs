/// Feature sets: normalized free-text tags attached to places
///
/// A feature is a free-text tag, either selected by a user or detected from
/// an image label. This module provides [`FeatureSet`], an ordered,
/// de-duplicated set of normalized feature strings, together with the
/// matching and merging rules the save-place flow depends on.
///
/// # Example
///
/// ```
/// use placetag::features::FeatureSet;
///
/// let selected = FeatureSet::from_list(["  WiFi ", "parking"]);
/// assert_eq!(selected.join(), "parking,wifi");
///
/// let labels = vec!["free wifi zone".to_string(), "parking lot".to_string()];
/// assert!(selected.matched_by(&labels));
/// ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalizes a raw feature or label: trim whitespace, lowercase.
///
/// Returns `None` for strings that are empty after trimming, so blank
/// entries never make it into a set.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes a whole list, dropping blank entries.
pub fn normalize_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .filter_map(|item| normalize(item.as_ref()))
        .collect()
}

/// An ordered, de-duplicated set of normalized feature strings
///
/// Backed by a `BTreeSet`, so iteration order (and therefore the serialized
/// comma-joined form) is lexicographic and stable across merges. Duplicate
/// entries across merges collapse to one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<String>);

impl FeatureSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw strings, normalizing each entry
    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .filter_map(|item| normalize(item.as_ref()))
                .collect(),
        )
    }

    /// Parses the stored comma-joined form back into a set
    ///
    /// Entries are re-normalized on the way in, so a hand-edited document
    /// with stray whitespace or casing still parses cleanly.
    pub fn parse(joined: &str) -> Self {
        Self::from_list(joined.split(','))
    }

    /// Serializes the set to its stored comma-joined form
    pub fn join(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(",")
    }

    /// True when the set holds no features
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of features in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when `feature` is present (exact match on the normalized form)
    pub fn contains(&self, feature: &str) -> bool {
        self.0.contains(feature)
    }

    /// Returns the union of this set and `other`
    pub fn merged(&self, other: &FeatureSet) -> FeatureSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Returns the features present in both sets
    pub fn intersect(&self, other: &FeatureSet) -> FeatureSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    /// Checks this set of selected features against detected image labels
    ///
    /// A selected feature is satisfied when it appears as a **substring** of
    /// at least one normalized label; the whole set matches only if every
    /// feature is satisfied. Note this is deliberately containment, not
    /// exact equality: selecting "chair" matches a detected "office chair".
    /// `labels` must already be normalized (see [`normalize_list`]).
    pub fn matched_by(&self, labels: &[String]) -> bool {
        self.0
            .iter()
            .all(|feature| labels.iter().any(|label| label.contains(feature.as_str())))
    }

    /// Iterates over the features in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Collects the set into an ordered `Vec` for JSON responses
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_list(iter)
    }
}
