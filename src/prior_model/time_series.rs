use crate::error::ModelError;
use crate::prior::{Arguments, Parameter, Prior, PriorId};
use crate::prior_model::{FromSpecies, MatrixPriorModel, PriorModel};
use crate::species::SpeciesCollection;

use std::collections::BTreeMap;

/// Initial abundances and interacting species, as consumed by the analyses
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInstance<C = SpeciesCollection> {
    pub abundances: Vec<f64>,
    pub species_collection: C,
}

/// Model of a [ModelInstance]
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesModel<C = SpeciesCollection> {
    pub abundances: Vec<Parameter>,
    pub species_collection: MatrixPriorModel<C>,
}

impl<C> TimeSeriesModel<C> {
    pub fn new(
        abundances: impl IntoIterator<Item = impl Into<Parameter>>,
        species_collection: MatrixPriorModel<C>,
    ) -> Self {
        Self {
            abundances: abundances.into_iter().map(Into::into).collect(),
            species_collection,
        }
    }
}

impl<C: FromSpecies> PriorModel for TimeSeriesModel<C> {
    type Instance = ModelInstance<C>;

    fn collect_priors<'a>(&'a self, priors: &mut BTreeMap<PriorId, &'a Prior>) {
        for abundance in self.abundances.iter() {
            abundance.collect_priors(priors);
        }
        self.species_collection.collect_priors(priors);
    }

    fn instance_for_arguments(
        &self,
        arguments: &Arguments,
    ) -> Result<ModelInstance<C>, ModelError> {
        let abundances = self
            .abundances
            .iter()
            .map(|abundance| abundance.value(arguments))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ModelInstance {
            abundances,
            species_collection: self.species_collection.instance_for_arguments(arguments)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::matrix::Matrix;
    use crate::prior_model::SpeciesPriorModel;

    #[test]
    fn instance() {
        let species: MatrixPriorModel =
            MatrixPriorModel::new([SpeciesPriorModel::new(1.0), SpeciesPriorModel::new(2.0)]);
        let abundances = [Prior::uniform(0.0, 2.0), Prior::uniform(0.0, 4.0)];
        let model = TimeSeriesModel::new(abundances, species);
        assert_eq!(model.prior_count(), 2);

        let instance = model.instance_from_prior_medians().unwrap();
        assert_eq!(instance.abundances, vec![1.0, 2.0]);
        assert_eq!(instance.species_collection.len(), 2);
        assert_eq!(
            instance.species_collection.growth_rate_vector(),
            ndarray::array![1.0, 2.0]
        );
    }

    #[test]
    fn vector_order_follows_prior_creation() {
        let abundance = Prior::uniform(0.0, 1.0);
        let mut species: MatrixPriorModel = MatrixPriorModel::new([SpeciesPriorModel::new(1.0)]);
        species[(0, 0)] = Prior::uniform(0.0, 1.0).into();
        let model = TimeSeriesModel::new([abundance], species);

        let instance = model.instance_from_vector(&[0.2, 0.7]).unwrap();
        assert_eq!(instance.abundances, vec![0.2]);
        assert_eq!(instance.species_collection[(0, 0)], 0.7);
    }

    #[test]
    fn fixed_abundances() {
        let species = [SpeciesPriorModel::new(1.0), SpeciesPriorModel::new(1.0)];
        let model: TimeSeriesModel =
            TimeSeriesModel::new([1.0, 1.0], MatrixPriorModel::new(species));
        assert_eq!(model.prior_count(), 0);
        let instance = model.instance_from_vector(&[]).unwrap();
        assert_eq!(instance.abundances, vec![1.0, 1.0]);
    }
}
