//! The `Stream` collection and its operations.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::pipeline::{PipelineError, Verdict};

/// An eager, ordered mapping from keys to values.
///
/// Keys are unique: adding an existing key overwrites its value in place
/// and keeps the original position. Backed by an `IndexMap`, so inserts
/// and lookups stay constant-time however many keys a request carries.
#[derive(Debug, Clone)]
pub struct Stream<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> Default for Stream<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }
}

/// Streams are equal when they hold the same entries in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for Stream<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

/// Turns a predicate result into a boolean or an `InvariantViolation`.
fn decide<R: Verdict>(operation: &'static str, verdict: R) -> Result<bool, PipelineError> {
    verdict.as_bool().ok_or_else(|| {
        PipelineError::InvariantViolation(format!(
            "{} predicate must return boolean, got {}",
            operation,
            verdict.describe()
        ))
    })
}

impl<K, V> Stream<K, V> {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the stream holds at least one entry (`any` without a predicate).
    pub fn has_any(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Run `logic` against every entry and keep chaining.
    pub fn on_each<F>(self, mut logic: F) -> Self
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in &self.entries {
            logic(k, v);
        }
        self
    }

    /// Run `logic` against every entry.
    pub fn for_each<F>(self, logic: F)
    where
        F: FnMut(&K, &V),
    {
        self.on_each(logic);
    }

    /// Value of the first entry whose predicate holds.
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub fn first<R, F>(self, logic: F) -> Result<Option<V>, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        self.first_where(Some(logic))
    }

    /// Like [`Stream::first`], with an optional predicate. No predicate
    /// means nothing can match.
    pub fn first_where<R, F>(self, logic: Option<F>) -> Result<Option<V>, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        let Some(mut logic) = logic else {
            return Ok(None);
        };
        for (k, v) in self.entries {
            if decide("first", logic(&k, &v))? {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    pub fn all<R, F>(self, mut logic: F) -> Result<bool, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        for (k, v) in &self.entries {
            if !decide("all", logic(k, v))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn any<R, F>(self, mut logic: F) -> Result<bool, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        for (k, v) in &self.entries {
            if decide("any", logic(k, v))? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn none<R, F>(self, mut logic: F) -> Result<bool, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        for (k, v) in &self.entries {
            if decide("none", logic(k, v))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Left-to-right accumulation seeded with `initial`.
    pub fn fold<A, F>(self, initial: A, mut logic: F) -> A
    where
        F: FnMut(A, K, V) -> A,
    {
        let mut result = initial;
        for (k, v) in self.entries {
            result = logic(result, k, v);
        }
        result
    }

    /// Accumulation with an empty seed: the first call receives `None`.
    ///
    /// An empty stream reduces to `None`. Use [`Stream::fold`] when a
    /// typed seed is needed.
    pub fn reduce<A, F>(self, mut logic: F) -> Option<A>
    where
        F: FnMut(Option<A>, K, V) -> A,
    {
        let mut result = None;
        for (k, v) in self.entries {
            result = Some(logic(result, k, v));
        }
        result
    }

    /// The ordered entries.
    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries.into_iter().collect()
    }

    pub fn into_values(self) -> Vec<V> {
        self.entries.into_values().collect()
    }
}

impl<K: Hash + Eq, V> Stream<K, V> {
    /// Replace every value, keeping keys and order.
    pub fn map<W, F>(self, mut logic: F) -> Stream<K, W>
    where
        F: FnMut(&K, V) -> W,
    {
        Stream {
            entries: self
                .entries
                .into_iter()
                .map(|(k, v)| {
                    let w = logic(&k, v);
                    (k, w)
                })
                .collect(),
        }
    }

    /// Keep the entries whose predicate holds.
    pub fn filter<R, F>(self, logic: F) -> Result<Self, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        self.retain("filter", true, logic)
    }

    /// Drop the entries whose predicate holds.
    pub fn reject<R, F>(self, logic: F) -> Result<Self, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        self.retain("reject", false, logic)
    }

    fn retain<R, F>(mut self, operation: &'static str, keep: bool, mut logic: F) -> Result<Self, PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        // The first failed verdict stops evaluation; remaining entries are dropped.
        let mut failure = None;
        self.entries.retain(|k, v| {
            if failure.is_some() {
                return false;
            }
            match decide(operation, logic(k, v)) {
                Ok(verdict) => verdict == keep,
                Err(e) => {
                    failure = Some(e);
                    false
                }
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// Split into (predicate true, predicate false), both in original order.
    pub fn partition<R, F>(self, mut logic: F) -> Result<(Self, Self), PipelineError>
    where
        R: Verdict,
        F: FnMut(&K, &V) -> R,
    {
        let mut first = IndexMap::new();
        let mut second = IndexMap::new();
        for (k, v) in self.entries {
            if decide("partition", logic(&k, &v))? {
                first.insert(k, v);
            } else {
                second.insert(k, v);
            }
        }
        Ok((Self { entries: first }, Self { entries: second }))
    }

    /// Split into consecutive groups of at most `size` entries.
    ///
    /// An empty stream yields a single empty group.
    pub fn chunked(self, size: usize) -> Result<Vec<Self>, PipelineError> {
        if size < 1 {
            return Err(PipelineError::InvalidArgument(
                "chunk size must be at least one".to_string(),
            ));
        }

        let mut result = vec![Self::new()];
        for (k, v) in self.entries {
            if result.last().map_or(false, |chunk| chunk.len() == size) {
                result.push(Self::new());
            }
            if let Some(chunk) = result.last_mut() {
                chunk.entries.insert(k, v);
            }
        }
        Ok(result)
    }

    /// Insert or overwrite the entry at `key`.
    pub fn add(mut self, key: K, value: V) -> Self {
        self.entries.insert(key, value);
        self
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Keyed view of the entries. Order is not kept.
    pub fn into_map(self) -> HashMap<K, V> {
        self.entries.into_iter().collect()
    }
}

impl<V> Stream<usize, V> {
    /// A stream keyed by position.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self {
            entries: values.into_iter().enumerate().collect(),
        }
    }
}

impl Stream<String, Value> {
    /// Decode a JSON object (or array, keyed by position) into a stream.
    pub fn from_json(text: &str) -> Result<Self, PipelineError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PipelineError::InvalidArgument(format!("invalid JSON: {}", e)))?;

        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Array(items) => Ok(items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect()),
            other => Err(PipelineError::InvalidArgument(format!(
                "expected a JSON object or array, got {}",
                other.describe()
            ))),
        }
    }
}

impl<K: Serialize, V: Serialize> Stream<K, V> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<K: Serialize, V: Serialize> Serialize for Stream<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Later duplicates overwrite earlier values at the first position.
impl<K: Hash + Eq, V> FromIterator<(K, V)> for Stream<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for Stream<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
