use crate::species::SpeciesId;

use std::collections::BTreeMap;

/// Interaction value used when none was recorded
///
/// Zero means the other species neither suppresses nor boosts growth.
pub const DEFAULT_INTERACTION: f64 = 0.0;

/// Interaction coefficients one species records for others, keyed by their identities
///
/// Absent entries read as the default value, reading never inserts.
#[derive(Clone, Debug, PartialEq)]
pub struct Interactions {
    default: f64,
    values: BTreeMap<SpeciesId, f64>,
}

impl Interactions {
    pub fn new(default: f64) -> Self {
        Self {
            default,
            values: BTreeMap::new(),
        }
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// Recorded value for `species`, or the default
    pub fn get(&self, species: SpeciesId) -> f64 {
        self.get_explicit(species).unwrap_or(self.default)
    }

    /// Recorded value for `species`, `None` if nothing was recorded
    pub fn get_explicit(&self, species: SpeciesId) -> Option<f64> {
        self.values.get(&species).copied()
    }

    pub fn contains(&self, species: SpeciesId) -> bool {
        self.values.contains_key(&species)
    }

    pub fn set(&mut self, species: SpeciesId, value: f64) {
        self.values.insert(species, value);
    }

    pub fn remove(&mut self, species: SpeciesId) -> Option<f64> {
        self.values.remove(&species)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, f64)> + '_ {
        self.values.iter().map(|(&id, &value)| (id, value))
    }

    pub(crate) fn get_ref(&self, species: SpeciesId) -> &f64 {
        self.values.get(&species).unwrap_or(&self.default)
    }

    pub(crate) fn get_or_insert_default(&mut self, species: SpeciesId) -> &mut f64 {
        self.values.entry(species).or_insert(self.default)
    }
}

impl Default for Interactions {
    fn default() -> Self {
        Self::new(DEFAULT_INTERACTION)
    }
}

impl FromIterator<(SpeciesId, f64)> for Interactions {
    fn from_iter<I: IntoIterator<Item = (SpeciesId, f64)>>(iter: I) -> Self {
        Self {
            default: DEFAULT_INTERACTION,
            values: iter.into_iter().collect(),
        }
    }
}
