//! Extraction result types

use serde::Serialize;
use std::fmt;

/// A single feature value: a computed number or a diagnostic string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(v) => write!(f, "{}", v),
            FeatureValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Insertion-ordered mapping from feature name to value.
///
/// Repeated extraction over the same inputs yields the same entries in
/// the same order, so reported output is reproducible line-for-line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureMap {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named value
    pub fn push(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.entries.push((name.into(), value));
    }

    /// Append a numeric feature
    pub fn push_number(&mut self, name: impl Into<String>, value: f64) {
        self.push(name, FeatureValue::Number(value));
    }

    /// Append a diagnostic string
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.push(name, FeatureValue::Text(value.into()));
    }

    /// Look up a value by exact name
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Look up a numeric value by exact name
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(FeatureValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(String, FeatureValue)> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all entries starting with a prefix
    pub fn names_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .map(|(n, _)| n.as_str())
            .filter(move |n| n.starts_with(prefix))
    }
}

impl<'a> IntoIterator for &'a FeatureMap {
    type Item = &'a (String, FeatureValue);
    type IntoIter = std::slice::Iter<'a, (String, FeatureValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for FeatureMap {
    type Item = (String, FeatureValue);
    type IntoIter = std::vec::IntoIter<(String, FeatureValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = FeatureMap::new();
        map.push_number("b_second", 2.0);
        map.push_number("a_first", 1.0);
        map.push_text("c_third", "three");

        let names: Vec<&str> = map.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b_second", "a_first", "c_third"]);
    }

    #[test]
    fn test_lookup() {
        let mut map = FeatureMap::new();
        map.push_number("original_firstorder_Mean", 100.0);
        assert_eq!(map.number("original_firstorder_Mean"), Some(100.0));
        assert_eq!(map.number("missing"), None);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(FeatureValue::Number(27.0).to_string(), "27");
        assert_eq!(FeatureValue::Number(0.5).to_string(), "0.5");
        assert_eq!(FeatureValue::Text("(10, 10, 10)".into()).to_string(), "(10, 10, 10)");
    }

    #[test]
    fn test_prefix_filter() {
        let mut map = FeatureMap::new();
        map.push_number("original_shape_VoxelVolume", 27.0);
        map.push_number("original_firstorder_Mean", 100.0);
        map.push_number("original_shape_Sphericity", 0.9);

        assert_eq!(map.names_with_prefix("original_shape_").count(), 2);
    }
}
