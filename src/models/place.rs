/// Place model and coordinate key
///
/// Places live in the document store's `places` collection. The document
/// key is derived from the geocoded coordinate pair, so two submissions
/// that resolve to the same coordinates land on the same document and
/// their feature sets merge instead of creating duplicates.

use crate::features::FeatureSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Composite document key formed from a coordinate pair
///
/// Rendered as `"<lat>_<lon>"` using Rust's shortest-roundtrip float
/// formatting, which is deterministic: equal `f64` pairs always produce
/// the same key string, so merges reliably coalesce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlaceKey(String);

impl PlaceKey {
    /// Derives the key for a coordinate pair
    pub fn from_point(point: GeoPoint) -> Self {
        Self(format!("{}_{}", point.latitude, point.longitude))
    }

    /// Wraps an already-formatted key, e.g. one read back from the store
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The key's string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved place
///
/// `name`, `address`, and `location` come from the first writer for a key;
/// later saves at the same key only union their features in.
#[derive(Debug, Clone, Serialize)]
pub struct Place {
    /// Document key, derived from `location`
    pub key: PlaceKey,

    /// Display name from the first submission
    pub name: String,

    /// Postal address from the first submission
    pub address: String,

    /// Geocoded coordinates
    pub location: GeoPoint,

    /// De-duplicated feature set, unioned across submissions
    pub features: FeatureSet,
}
