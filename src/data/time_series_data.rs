use crate::data::Data;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// [Data] taken at several timesteps
///
/// Iteration is in ascending timestep order whatever the order of insertion.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesData {
    data: BTreeMap<u64, Data>,
}

impl TimeSeriesData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the data previously stored for `timestep`
    pub fn insert(&mut self, timestep: u64, data: Data) -> Option<Data> {
        self.data.insert(timestep, data)
    }

    pub fn get(&self, timestep: u64) -> Option<&Data> {
        self.data.get(&timestep)
    }

    /// The `index`-th data in time order together with its timestep
    pub fn nth(&self, index: usize) -> Option<(u64, &Data)> {
        self.iter().nth(index)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn timesteps(&self) -> impl Iterator<Item = u64> + '_ {
        self.data.keys().copied()
    }

    /// Number of steps from time zero to the first timestep and between successive timesteps
    pub fn intervals(&self) -> impl Iterator<Item = u64> + '_ {
        std::iter::once(0)
            .chain(self.timesteps())
            .tuple_windows()
            .map(|(previous, next)| next - previous)
    }

    pub fn iter(&self) -> TimeSeriesIter<'_> {
        TimeSeriesIter(self.data.iter())
    }
}

/// Iterator over `(timestep, data)` pairs of a [TimeSeriesData]
#[derive(Clone, Debug)]
pub struct TimeSeriesIter<'a>(btree_map::Iter<'a, u64, Data>);

impl<'a> Iterator for TimeSeriesIter<'a> {
    type Item = (u64, &'a Data);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&timestep, data)| (timestep, data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for TimeSeriesIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(&timestep, data)| (timestep, data))
    }
}

impl ExactSizeIterator for TimeSeriesIter<'_> {}

impl<'a> IntoIterator for &'a TimeSeriesData {
    type Item = (u64, &'a Data);
    type IntoIter = TimeSeriesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for TimeSeriesData {
    type Item = (u64, Data);
    type IntoIter = btree_map::IntoIter<u64, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl FromIterator<(u64, Data)> for TimeSeriesData {
    fn from_iter<I: IntoIterator<Item = (u64, Data)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}
