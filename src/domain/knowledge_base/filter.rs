//! Metadata filtering for vector queries

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Metadata;

/// Conjunction of metadata equality conditions
///
/// A record matches only if every filter key is present in its metadata with an
/// equal value. An empty filter matches everything. Keys the record does not
/// carry never match, so filters on unknown keys simply select nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataFilter {
    conditions: BTreeMap<String, serde_json::Value>,
}

impl MetadataFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition
    pub fn eq(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.conditions.insert(key.into(), value.into());
        self
    }

    /// Add an equality condition only when a value is present
    pub fn eq_opt<V: Into<serde_json::Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(key, value),
            None => self,
        }
    }

    /// Check whether the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Number of conditions
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Iterate over the conditions in key order
    pub fn conditions(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.conditions.iter()
    }

    /// Check whether metadata satisfies every condition
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.conditions
            .iter()
            .all(|(key, expected)| metadata.get(key) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("country".into(), serde_json::json!("USA"));
        metadata.insert("visa_type".into(), serde_json::json!("Tourist"));
        metadata.insert("chunk_index".into(), serde_json::json!(1));
        metadata
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(MetadataFilter::new().matches(&metadata()));
        assert!(MetadataFilter::new().matches(&Metadata::new()));
    }

    #[test]
    fn test_conjunction() {
        let filter = MetadataFilter::new()
            .eq("country", "USA")
            .eq("visa_type", "Tourist");
        assert!(filter.matches(&metadata()));

        let filter = MetadataFilter::new().eq("country", "USA").eq("visa_type", "Work");
        assert!(!filter.matches(&metadata()));
    }

    #[test]
    fn test_unknown_key_matches_nothing() {
        let filter = MetadataFilter::new().eq("embassy", "Berlin");
        assert!(!filter.matches(&metadata()));
    }

    #[test]
    fn test_numeric_values() {
        assert!(MetadataFilter::new().eq("chunk_index", 1).matches(&metadata()));
        assert!(!MetadataFilter::new().eq("chunk_index", 2).matches(&metadata()));
    }

    #[test]
    fn test_eq_opt_skips_none() {
        let filter = MetadataFilter::new()
            .eq_opt("country", Some("USA"))
            .eq_opt::<&str>("visa_type", None);

        assert_eq!(filter.len(), 1);
        assert!(filter.matches(&metadata()));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let filter = MetadataFilter::new().eq("country", "USA");
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            serde_json::json!({"country": "USA"})
        );
    }
}
