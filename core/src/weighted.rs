//! A list that keeps its values ordered by an integer weight, heaviest first.
//!
//! Values are deduplicated by equality: adding a value that is already present
//! bumps its weight instead of inserting a second entry. Every mutating call
//! leaves the list sorted by weight descending. The relative order of entries
//! with equal weights is unspecified and may change between mutations.
//!
//! The list performs no internal locking. Sharing one instance between threads
//! requires the caller to serialize mutation (e.g. behind a `RwLock`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use thiserror::Error;

pub type Weight = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightedListError {
    #[error("index {index} out of bounds for weighted list of length {len}")]
    OutOfBounds { index: usize, len: usize },
    #[error("value not present in weighted list")]
    NotFound,
}

/// A value paired with its weight. Equality and hashing look at the value only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry<T> {
    pub value: T,
    #[serde(default)]
    pub weight: Weight,
}

impl<T> WeightEntry<T> {
    pub fn new(value: T) -> Self { Self { value, weight: 0 } }

    pub fn with_weight(value: T, weight: Weight) -> Self { Self { value, weight } }
}

impl<T: PartialEq> PartialEq for WeightEntry<T> {
    fn eq(&self, other: &Self) -> bool { self.value == other.value }
}

impl<T: Eq> Eq for WeightEntry<T> {}

impl<T: Hash> Hash for WeightEntry<T> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.value.hash(state) }
}

#[derive(Debug, Clone)]
pub struct WeightedList<T> {
    entries: Vec<WeightEntry<T>>,
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self { Self { entries: Vec::new() } }
}

impl<T> WeightedList<T> {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Value at position `index` in weight order.
    pub fn get(&self, index: usize) -> Result<&T, WeightedListError> {
        self.entry_at(index).map(|e| &e.value)
    }

    /// Weight of the entry at position `index`.
    pub fn weight_at(&self, index: usize) -> Result<Weight, WeightedListError> {
        self.entry_at(index).map(|e| e.weight)
    }

    fn entry_at(&self, index: usize) -> Result<&WeightEntry<T>, WeightedListError> {
        self.entries
            .get(index)
            .ok_or(WeightedListError::OutOfBounds { index, len: self.entries.len() })
    }

    /// Values in weight order, heaviest first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.entries.iter() }
    }

    /// `(value, weight)` pairs in weight order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&T, Weight)> + '_ {
        self.entries.iter().map(|e| (&e.value, e.weight))
    }

    /// Sum of all weights, saturating at the `Weight` bounds.
    pub fn total_weight(&self) -> Weight {
        self.entries.iter().fold(0, |acc: Weight, e| acc.saturating_add(e.weight))
    }

    pub fn clear(&mut self) { self.entries.clear() }

    /// Keeps only the entries for which `keep(value, weight)` returns true.
    /// Removal never disturbs the relative order of the survivors.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T, Weight) -> bool,
    {
        self.entries.retain(|e| keep(&e.value, e.weight));
    }

    fn sort(&mut self) { quicksort(&mut self.entries) }
}

impl<T: PartialEq> WeightedList<T> {
    /// Position of `value` in weight order, if present.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.entries.iter().position(|e| e.value == *value)
    }

    pub fn contains(&self, value: &T) -> bool { self.index_of(value).is_some() }

    pub fn contains_all<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        values.into_iter().all(|v| self.contains(v))
    }

    pub fn weight_of(&self, value: &T) -> Option<Weight> {
        self.index_of(value).map(|i| self.entries[i].weight)
    }

    /// Inserts `value` with weight 0, or adds 1 to its weight if already present.
    /// Returns true when a new entry was created.
    pub fn add(&mut self, value: T) -> bool { self.add_with_weight(value, 0) }

    /// Inserts `value` with `weight`. If the value is already present its weight
    /// goes up by 1 and `weight` is ignored. Returns true when a new entry was created.
    pub fn add_with_weight(&mut self, value: T, weight: Weight) -> bool {
        let inserted = self.insert_unsorted(value, weight);
        self.sort();
        inserted
    }

    /// Adds every value as [`add`](Self::add) would, sorting once at the end.
    /// Returns true only if every value produced a new entry.
    pub fn bulk_add<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut all_new = true;
        for value in values {
            if !self.insert_unsorted(value, 0) {
                all_new = false;
            }
        }
        self.sort();
        all_new
    }

    pub fn increment_weight(&mut self, value: &T) -> Result<(), WeightedListError> {
        let idx = self.index_of(value).ok_or(WeightedListError::NotFound)?;
        self.entries[idx].weight = self.entries[idx].weight.saturating_add(1);
        self.sort();
        Ok(())
    }

    pub fn set_weight(&mut self, value: &T, weight: Weight) -> Result<(), WeightedListError> {
        let idx = self.index_of(value).ok_or(WeightedListError::NotFound)?;
        self.entries[idx].weight = weight;
        self.sort();
        Ok(())
    }

    /// Removes `value`. Returns whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.index_of(value) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every listed value. Returns whether anything was removed.
    pub fn remove_all<'a, I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut removed = false;
        for value in values {
            removed |= self.remove(value);
        }
        removed
    }

    fn insert_unsorted(&mut self, value: T, weight: Weight) -> bool {
        match self.index_of(&value) {
            Some(idx) => {
                self.entries[idx].weight = self.entries[idx].weight.saturating_add(1);
                false
            }
            None => {
                self.entries.push(WeightEntry::with_weight(value, weight));
                true
            }
        }
    }
}

impl<T: Clone> WeightedList<T> {
    /// Snapshot of the values in weight order.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().map(|e| e.value.clone()).collect()
    }
}

/// Descending quicksort, last element as pivot. Recurses into the smaller
/// partition and loops on the larger one, so stack depth stays logarithmic.
fn quicksort<T>(entries: &mut [WeightEntry<T>]) {
    let mut slice = entries;
    while slice.len() > 1 {
        let pivot = partition(slice);
        let (left, rest) = std::mem::take(&mut slice).split_at_mut(pivot);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            quicksort(left);
            slice = right;
        } else {
            quicksort(right);
            slice = left;
        }
    }
}

fn partition<T>(entries: &mut [WeightEntry<T>]) -> usize {
    let high = entries.len() - 1;
    let pivot = entries[high].weight;
    let mut store = 0;
    for i in 0..high {
        if entries[i].weight > pivot {
            entries.swap(store, i);
            store += 1;
        }
    }
    entries.swap(store, high);
    store
}

pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, WeightEntry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> { self.inner.next().map(|e| &e.value) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a WeightedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<T> IntoIterator for WeightedList<T> {
    type Item = T;
    type IntoIter = std::iter::Map<std::vec::IntoIter<WeightEntry<T>>, fn(WeightEntry<T>) -> T>;

    fn into_iter(self) -> Self::IntoIter {
        let unwrap: fn(WeightEntry<T>) -> T = |e| e.value;
        self.entries.into_iter().map(unwrap)
    }
}

impl<T: PartialEq> FromIterator<T> for WeightedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = WeightedList::new();
        list.bulk_add(iter);
        list
    }
}

impl<T: PartialEq> Extend<T> for WeightedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.bulk_add(iter);
    }
}

impl<T: Serialize> Serialize for WeightedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for WeightedList<T>
where
    T: Deserialize<'de> + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Vec<WeightEntry<T>> = Vec::deserialize(deserializer)?;
        let mut list = WeightedList::with_capacity(raw.len());
        for entry in raw {
            list.insert_unsorted(entry.value, entry.weight);
        }
        list.sort();
        Ok(list)
    }
}
