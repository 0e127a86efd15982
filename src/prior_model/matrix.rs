use crate::error::ModelError;
use crate::matrix::Matrix;
use crate::prior::{Arguments, Parameter, Prior, PriorId};
use crate::prior_model::{ModelId, PriorModel, SpeciesPriorModel};
use crate::species::{Interactions, Species, SpeciesCollection, SpeciesId};

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Collection built from concrete species whose interactions are already attached
pub trait FromSpecies {
    fn from_species(species: Vec<Species>) -> Self;
}

impl FromSpecies for SpeciesCollection {
    fn from_species(species: Vec<Species>) -> Self {
        Self::new(species)
    }
}

impl FromSpecies for Vec<Species> {
    fn from_species(species: Vec<Species>) -> Self {
        species
    }
}

/// Symbolic counterpart of a [Matrix] of species, instantiated into a `C`
///
/// Element `(i, j)` is the interaction model `i` records for model `j`, like for
/// [SpeciesCollection].
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixPriorModel<C = SpeciesCollection> {
    species: Vec<SpeciesPriorModel>,
    collection: PhantomData<fn() -> C>,
}

impl<C> MatrixPriorModel<C> {
    pub fn new(species: impl IntoIterator<Item = SpeciesPriorModel>) -> Self {
        Self {
            species: species.into_iter().collect(),
            collection: PhantomData,
        }
    }

    pub fn species(&self) -> &[SpeciesPriorModel] {
        &self.species
    }

    /// Human-readable model summary: one block per species model
    pub fn info(&self) -> String {
        const WIDTH: usize = 60;
        let mut info = String::new();
        for (i, model) in self.species.iter().enumerate() {
            if i > 0 {
                info.push('\n');
            }
            info.push_str(&format!(
                "{i}\n    {:<w$}{}",
                "growth_rate",
                model.growth_rate,
                w = WIDTH - 4
            ));
            if !model.interactions().is_empty() {
                info.push_str("\n    interactions");
                for (id, parameter) in model.interactions() {
                    let label = format!("SpeciesPriorModel {id}");
                    info.push_str(&format!("\n        {label:<w$}{parameter}", w = WIDTH - 8));
                }
            }
            if !model.observables.is_empty() {
                info.push_str("\n    observables");
                for (name, observable) in model.observables.iter() {
                    info.push_str(&format!("\n        {name}"));
                    let values = [("mean", &observable.mean), ("deviation", &observable.deviation)];
                    for (label, value) in values {
                        info.push_str(&format!("\n            {label:<w$}{value}", w = WIDTH - 12));
                    }
                }
            }
        }
        info
    }

    /// Concrete species in model order together with the model identity each one came from
    fn instantiate_species(
        &self,
        arguments: &Arguments,
    ) -> Result<(Vec<Species>, BTreeMap<ModelId, SpeciesId>), ModelError> {
        let species = self
            .species
            .iter()
            .map(|model| model.instance_for_arguments(arguments))
            .collect::<Result<Vec<_>, _>>()?;
        let ids = self
            .species
            .iter()
            .zip(species.iter())
            .map(|(model, species)| (model.id(), species.id()))
            .collect();
        Ok((species, ids))
    }
}

impl<C> Default for MatrixPriorModel<C> {
    fn default() -> Self {
        Self::new([])
    }
}

impl<C> Matrix for MatrixPriorModel<C> {
    type Item = SpeciesPriorModel;

    fn items(&self) -> &[SpeciesPriorModel] {
        &self.species
    }

    fn items_mut(&mut self) -> &mut [SpeciesPriorModel] {
        &mut self.species
    }
}

impl<C: FromSpecies> PriorModel for MatrixPriorModel<C> {
    type Instance = C;

    fn collect_priors<'a>(&'a self, priors: &mut BTreeMap<PriorId, &'a Prior>) {
        for model in self.species.iter() {
            model.collect_priors(priors);
        }
    }

    /// Builds all the species first, then attaches interactions keyed by the new species
    ///
    /// Interactions with models outside of this matrix are dropped.
    fn instance_for_arguments(&self, arguments: &Arguments) -> Result<C, ModelError> {
        let (mut species, ids) = self.instantiate_species(arguments)?;
        for (model, species) in self.species.iter().zip(species.iter_mut()) {
            let mut interactions = Interactions::default();
            for (model_id, value) in model.interactions_for_arguments(arguments)? {
                match ids.get(&model_id) {
                    Some(&species_id) => interactions.set(species_id, value),
                    None => tracing::debug!(
                        "dropping interaction of model {} with model {} outside of the matrix",
                        model.id(),
                        model_id
                    ),
                }
            }
            species.set_interactions(interactions);
        }
        Ok(C::from_species(species))
    }
}

impl<C> Index<usize> for MatrixPriorModel<C> {
    type Output = SpeciesPriorModel;

    fn index(&self, i: usize) -> &Self::Output {
        &self.species[i]
    }
}

impl<C> IndexMut<usize> for MatrixPriorModel<C> {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.species[i]
    }
}

impl<C> Index<(usize, usize)> for MatrixPriorModel<C> {
    type Output = Parameter;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        let target = self.species[j].id();
        &self.species[i][target]
    }
}

impl<C> IndexMut<(usize, usize)> for MatrixPriorModel<C> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let target = self.species[j].id();
        &mut self.species[i][target]
    }
}

impl<C> FromIterator<SpeciesPriorModel> for MatrixPriorModel<C> {
    fn from_iter<I: IntoIterator<Item = SpeciesPriorModel>>(iter: I) -> Self {
        Self::new(iter)
    }
}
