use crate::matrix::MatrixItem;
use crate::observable::Observable;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

mod collection;
pub use collection::SpeciesCollection;

mod interactions;
pub use interactions::{DEFAULT_INTERACTION, Interactions};

mod observables;
pub use observables::SpeciesObservables;

static NEXT_SPECIES_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a [Species]
///
/// Allocated from a monotonic atomic counter via [SpeciesId::next], so two species built
/// separately never share an identity, even with identical growth rates and observables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(u64);

impl SpeciesId {
    pub fn next() -> Self {
        Self(NEXT_SPECIES_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A species with an intrinsic growth rate and interaction coefficients with other species
///
/// Cloning keeps the identity: the clone is the same species for the purpose of interactions.
#[derive(Clone, Debug, PartialEq)]
pub struct Species {
    id: SpeciesId,
    /// Rate of growth in the absence of any interaction
    pub growth_rate: f64,
    interactions: Interactions,
    pub observables: BTreeMap<String, Observable>,
}

impl Species {
    pub fn new(growth_rate: f64) -> Self {
        Self::with_observables(growth_rate, BTreeMap::new())
    }

    pub fn with_observables(growth_rate: f64, observables: BTreeMap<String, Observable>) -> Self {
        Self {
            id: SpeciesId::next(),
            growth_rate,
            interactions: Interactions::default(),
            observables,
        }
    }

    #[inline]
    pub fn default_growth_rate() -> f64 {
        1.0
    }

    pub fn id(&self) -> SpeciesId {
        self.id
    }

    pub fn interactions(&self) -> &Interactions {
        &self.interactions
    }

    pub fn interactions_mut(&mut self) -> &mut Interactions {
        &mut self.interactions
    }

    pub(crate) fn set_interactions(&mut self, interactions: Interactions) {
        self.interactions = interactions;
    }

    /// The negative impact the presence of `other` has on the growth of this species
    pub fn interaction_with(&self, other: &Species) -> f64 {
        self.interactions.get(other.id)
    }

    pub fn set_interaction_with(&mut self, other: &Species, interaction: f64) {
        self.interactions.set(other.id, interaction);
    }
}

impl Default for Species {
    fn default() -> Self {
        Self::new(Self::default_growth_rate())
    }
}

impl Index<SpeciesId> for Species {
    type Output = f64;

    fn index(&self, species: SpeciesId) -> &Self::Output {
        self.interactions.get_ref(species)
    }
}

impl IndexMut<SpeciesId> for Species {
    fn index_mut(&mut self, species: SpeciesId) -> &mut Self::Output {
        self.interactions.get_or_insert_default(species)
    }
}

impl MatrixItem for Species {
    type Id = SpeciesId;
    type Interaction = f64;

    fn id(&self) -> SpeciesId {
        self.id
    }

    fn interaction(&self, other: SpeciesId) -> f64 {
        self.interactions.get(other)
    }

    fn set_interaction(&mut self, other: SpeciesId, value: f64) {
        self.interactions.set(other, value);
    }
}
