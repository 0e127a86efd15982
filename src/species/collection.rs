use crate::matrix::Matrix;
use crate::species::{DEFAULT_INTERACTION, Species};

use ndarray::Array1;
use std::ops::{Index, IndexMut};

/// A collection of species which interact with each other
///
/// Construction records an interaction for every ordered pair of members, self-pairs included,
/// using the collection default wherever nothing was set before. The order of the species is the
/// order of both [Matrix::interaction_matrix] rows and [SpeciesCollection::growth_rate_vector].
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesCollection {
    species: Vec<Species>,
    default_interaction: f64,
}

impl SpeciesCollection {
    pub fn new(species: impl IntoIterator<Item = Species>) -> Self {
        Self::with_default_interaction(species, DEFAULT_INTERACTION)
    }

    pub fn with_default_interaction(
        species: impl IntoIterator<Item = Species>,
        default_interaction: f64,
    ) -> Self {
        let mut species: Vec<_> = species.into_iter().collect();
        let ids: Vec<_> = species.iter().map(Species::id).collect();
        for species_a in species.iter_mut() {
            for &id_b in ids.iter() {
                if !species_a.interactions().contains(id_b) {
                    species_a.interactions_mut().set(id_b, default_interaction);
                }
            }
        }
        Self {
            species,
            default_interaction,
        }
    }

    pub fn default_interaction(&self) -> f64 {
        self.default_interaction
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn into_species(self) -> Vec<Species> {
        self.species
    }

    /// Growth rate of each species, in collection order
    pub fn growth_rate_vector(&self) -> Array1<f64> {
        self.species.iter().map(|s| s.growth_rate).collect()
    }
}

impl Matrix for SpeciesCollection {
    type Item = Species;

    fn items(&self) -> &[Species] {
        &self.species
    }

    fn items_mut(&mut self) -> &mut [Species] {
        &mut self.species
    }
}

impl Index<usize> for SpeciesCollection {
    type Output = Species;

    fn index(&self, i: usize) -> &Self::Output {
        &self.species[i]
    }
}

impl IndexMut<usize> for SpeciesCollection {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.species[i]
    }
}

impl Index<(usize, usize)> for SpeciesCollection {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        let target = self.species[j].id();
        &self.species[i][target]
    }
}

impl IndexMut<(usize, usize)> for SpeciesCollection {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let target = self.species[j].id();
        &mut self.species[i][target]
    }
}

impl FromIterator<Species> for SpeciesCollection {
    fn from_iter<I: IntoIterator<Item = Species>>(iter: I) -> Self {
        Self::new(iter)
    }
}
