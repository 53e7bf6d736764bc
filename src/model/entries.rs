//! Growable collections of committed sub-records, e.g. the businesses under business income or the
//! vehicles in a wealth statement.
//!
//! Every operation returns a new collection and leaves the receiver untouched. Each appended record
//! is given a fresh `EntryId`, so removing one entry never changes the identity of another.

use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// The opaque identity of a committed entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A committed record together with its identity. On the wire the `id` sits beside the record's
/// own fields.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    id: EntryId,
    #[serde(flatten)]
    record: T,
}

impl<T> Entry<T> {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn record(&self) -> &T {
        &self.record
    }
}

/// An ordered sequence of committed entries of one record type.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entries<T> {
    data: Vec<Entry<T>>,
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> Entries<T>
where
    T: Clone,
{
    /// Returns a copy of this collection with `record` appended under a fresh id.
    pub fn append(&self, record: T) -> Self {
        let mut data = self.data.clone();
        data.push(Entry {
            id: EntryId::generate(),
            record,
        });
        Self { data }
    }

    /// Returns a copy of this collection without the entry identified by `id`. Unknown ids leave
    /// the content unchanged.
    pub fn remove_by_id(&self, id: EntryId) -> Self {
        Self {
            data: self.data.iter().filter(|e| e.id != id).cloned().collect(),
        }
    }
}

impl<T> Entries<T> {
    /// Sums `selector` over every entry; zero when empty.
    pub fn sum_by<F>(&self, selector: F) -> Amount
    where
        F: Fn(&T) -> Amount,
    {
        self.data.iter().map(|e| selector(&e.record)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.data.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.data.iter().map(|e| &e.record)
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.data.iter().find(|e| e.id == id).map(|e| &e.record)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.data.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
