//!
//! Converts a [`WeightedSet`] to and from an ordered list of `{ key, weight }` entries.
//!
//! Serialized sets keep their iteration order. When a list holds the same key twice, the first
//! occurrence wins and later ones are dropped with a warning. Negative or non-finite weights
//! fail deserialization.
//!
use super::{WeightError, WeightedSet};
use log::warn;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<K> {
    pub key: K,
    pub weight: f64,
}

#[derive(Serialize)]
struct EntryRef<'a, K> {
    key: &'a K,
    weight: f64,
}

impl<K: Eq + Hash + Clone> WeightedSet<K> {
    pub fn entries(&self) -> Vec<Entry<K>> {
        self.iter()
            .map(|(key, weight)| Entry {
                key: key.clone(),
                weight,
            })
            .collect()
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = Entry<K>>,
    ) -> Result<Self, WeightError> {
        let mut set = WeightedSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            if set.contains(&entry.key) {
                warn!("Skipping entry {}: key already present", index);
                continue;
            }
            set.insert(entry.key, entry.weight)?;
        }
        Ok(set)
    }
}

impl<K: Eq + Hash + Serialize> Serialize for WeightedSet<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(key, weight)| EntryRef { key, weight }))
    }
}

impl<'de, K: Eq + Hash + Clone + Deserialize<'de>> Deserialize<'de> for WeightedSet<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Entry<K>>::deserialize(deserializer)?;
        WeightedSet::from_entries(entries).map_err(D::Error::custom)
    }
}
