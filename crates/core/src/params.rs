use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Key suffix scoping a parameter to side A.
pub const SUFFIX_A: &str = "_a";
/// Key suffix scoping a parameter to side B.
pub const SUFFIX_B: &str = "_b";

/// One of the two parallel query/selection tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn suffix(self) -> &'static str {
        match self {
            Side::A => SUFFIX_A,
            Side::B => SUFFIX_B,
        }
    }

    /// Scope a parameter name to this side, e.g. `expression` → `expression_a`.
    pub fn key(self, name: &str) -> String {
        format!("{name}{}", self.suffix())
    }

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// A single query-parameter value.
///
/// Navigation layers may deliver a repeated key as a list, so both shapes
/// are preserved as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// The value as one string; repeated values are comma-joined.
    pub fn join(&self) -> String {
        match self {
            ParamValue::Single(value) => value.clone(),
            ParamValue::Many(values) => values.join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values)
    }
}

/// Flat, string-keyed parameter bag — the in-memory form of a URL query
/// string.
///
/// Keys follow the convention `<name>` for shared parameters (e.g.
/// `currentProfileView`) and `<name>_a` / `<name>_b` for side-scoped ones.
/// Insertion order is irrelevant; entries are kept sorted by key so two
/// bags with the same content are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBag {
    entries: BTreeMap<String, ParamValue>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (with or without a leading `?`). A repeated
    /// key accumulates into [`ParamValue::Many`] in order of appearance.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut bag = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            bag.push(key.into_owned(), value.into_owned());
        }
        bag
    }

    /// Serialize back to a query string. `Many` values are emitted as
    /// repeated keys; keys and values are percent-encoded.
    pub fn to_query_str(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            match value {
                ParamValue::Single(v) => {
                    serializer.append_pair(key, v);
                }
                ParamValue::Many(values) => {
                    for v in values {
                        serializer.append_pair(key, v);
                    }
                }
            }
        }
        serializer.finish()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// The value under `key` as a string slice; for a repeated key, the
    /// first occurrence.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            ParamValue::Single(value) => Some(value.as_str()),
            ParamValue::Many(values) => values.first().map(String::as_str),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Overlay `other` onto this bag; on key collision, `other` wins.
    pub fn merge(&mut self, other: ParameterBag) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    fn push(&mut self, key: String, value: String) {
        match self.entries.entry(key) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(ParamValue::Single(value));
            }
            btree_map::Entry::Occupied(mut entry) => match entry.get_mut() {
                ParamValue::Single(prev) => {
                    let prev = std::mem::take(prev);
                    *entry.get_mut() = ParamValue::Many(vec![prev, value]);
                }
                ParamValue::Many(values) => values.push(value),
            },
        }
    }
}

impl FromIterator<(String, ParamValue)> for ParameterBag {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Remove every key ending with `suffix`; all other keys pass through
/// unchanged, including keys ending with a different suffix.
pub fn filter_suffix(bag: &ParameterBag, suffix: &str) -> ParameterBag {
    bag.iter()
        .filter(|(key, _)| !key.ends_with(suffix))
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// For every key ending with `from`, copy its value onto the key with
/// `from` replaced by `to`. The original entries are retained, so the net
/// effect of `swap_suffix(bag, "_b", "_a")` is side B's values landing on
/// side A's keys.
pub fn swap_suffix(bag: &ParameterBag, from: &str, to: &str) -> ParameterBag {
    let mut next = bag.clone();
    for (key, value) in bag.iter() {
        if let Some(stem) = key.strip_suffix(from) {
            next.insert(format!("{stem}{to}"), value.clone());
        }
    }
    next
}

/// Rewrite every key of `partial` by appending `suffix`. Used to merge a
/// selection's native (unsuffixed) parameter names into one side's scope.
pub fn suffix_params(partial: &ParameterBag, suffix: &str) -> ParameterBag {
    partial
        .iter()
        .map(|(key, value)| (format!("{key}{suffix}"), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bag() -> ParameterBag {
        let mut bag = ParameterBag::new();
        bag.insert("expression_a", "cpu");
        bag.insert("from_a", "100");
        bag.insert("expression_b", "mem");
        bag.insert("currentProfileView", "icicle");
        bag
    }

    #[test]
    fn filter_suffix_removes_only_matching_keys() {
        let filtered = filter_suffix(&sample_bag(), "_a");
        assert!(filtered.keys().all(|k| !k.ends_with("_a")));
        assert_eq!(filtered.get_str("expression_b"), Some("mem"));
        assert_eq!(filtered.get_str("currentProfileView"), Some("icicle"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn filter_suffix_on_empty_bag() {
        assert!(filter_suffix(&ParameterBag::new(), "_a").is_empty());
    }

    #[test]
    fn swap_suffix_copies_b_onto_a() {
        let mut bag = ParameterBag::new();
        bag.insert("expression_b", "mem");
        bag.insert("from_b", "300");
        bag.insert("expression_a", "cpu");
        let swapped = swap_suffix(&bag, "_b", "_a");
        assert_eq!(swapped.get_str("expression_a"), Some("mem"));
        assert_eq!(swapped.get_str("from_a"), Some("300"));
        // originals retained
        assert_eq!(swapped.get_str("expression_b"), Some("mem"));
    }

    #[test]
    fn swap_suffix_without_matches_is_identity() {
        let bag = {
            let mut bag = ParameterBag::new();
            bag.insert("expression_a", "cpu");
            bag
        };
        assert_eq!(swap_suffix(&bag, "_b", "_a"), bag);
    }

    #[test]
    fn suffix_params_appends_to_every_key() {
        let mut native = ParameterBag::new();
        native.insert("expression", "cpu");
        native.insert("time", "150");
        let scoped = suffix_params(&native, "_b");
        assert_eq!(scoped.get_str("expression_b"), Some("cpu"));
        assert_eq!(scoped.get_str("time_b"), Some("150"));
        assert_eq!(scoped.len(), 2);
    }

    #[test]
    fn repeated_keys_accumulate_in_order() {
        let bag = ParameterBag::from_query_str("labels_a=x&labels_a=y&from_a=1");
        assert_eq!(
            bag.get("labels_a"),
            Some(&ParamValue::Many(vec!["x".into(), "y".into()]))
        );
        assert_eq!(bag.get_str("labels_a"), Some("x"));
    }

    #[test]
    fn query_string_round_trip() {
        let bag = ParameterBag::from_query_str("?expression_a=a%20b&labels_a=x&labels_a=y");
        let rebuilt = ParameterBag::from_query_str(&bag.to_query_str());
        assert_eq!(bag, rebuilt);
        assert_eq!(bag.get_str("expression_a"), Some("a b"));
    }

    #[test]
    fn merge_overlays_and_wins_on_collision() {
        let mut bag = sample_bag();
        let mut overlay = ParameterBag::new();
        overlay.insert("expression_a", "heap");
        overlay.insert("time_a", "9");
        bag.merge(overlay);
        assert_eq!(bag.get_str("expression_a"), Some("heap"));
        assert_eq!(bag.get_str("time_a"), Some("9"));
        assert_eq!(bag.get_str("expression_b"), Some("mem"));
    }

    #[test]
    fn param_value_join_flattens_lists() {
        assert_eq!(ParamValue::from("cpu").join(), "cpu");
        assert_eq!(
            ParamValue::Many(vec!["a".into(), "b".into()]).join(),
            "a,b"
        );
    }

    #[test]
    fn side_keys_and_other() {
        assert_eq!(Side::A.key("expression"), "expression_a");
        assert_eq!(Side::B.key("from"), "from_b");
        assert_eq!(Side::A.other(), Side::B);
    }
}
