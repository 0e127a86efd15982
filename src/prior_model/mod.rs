//! Symbolic models which turn into concrete values once every free parameter is known
//!
//! A model is a tree of [Parameter]s. [PriorModel::priors] lists the distinct free parameters
//! ordered by identity, this order defines the meaning of the physical and unit vectors accepted
//! by the `instance_from_*` methods.

use crate::error::ModelError;
use crate::prior::{Arguments, Prior, PriorId};

use std::collections::BTreeMap;

mod matrix;
pub use matrix::{FromSpecies, MatrixPriorModel};

mod observable;
pub use observable::ObservablePriorModel;

mod species;
pub use species::{ModelId, SpeciesPriorModel};

mod time_series;
pub use time_series::{ModelInstance, TimeSeriesModel};

pub trait PriorModel {
    type Instance;

    /// Insert every free parameter of the model into `priors`
    fn collect_priors<'a>(&'a self, priors: &mut BTreeMap<PriorId, &'a Prior>);

    /// Concrete instance with every free parameter replaced by its value from `arguments`
    fn instance_for_arguments(&self, arguments: &Arguments) -> Result<Self::Instance, ModelError>;

    /// Distinct free parameters ordered by identity
    fn priors(&self) -> Vec<&Prior> {
        let mut priors = BTreeMap::new();
        self.collect_priors(&mut priors);
        priors.into_values().collect()
    }

    fn prior_count(&self) -> usize {
        self.priors().len()
    }

    /// Pair physical values with the free parameters in [PriorModel::priors] order
    fn arguments_for_vector(&self, vector: &[f64]) -> Result<Arguments, ModelError> {
        let priors = self.priors();
        ModelError::check_lengths("parameter vector and priors", vector.len(), priors.len())?;
        Ok(priors
            .into_iter()
            .zip(vector.iter())
            .map(|(prior, &value)| (prior.id(), value))
            .collect())
    }

    fn instance_from_vector(&self, vector: &[f64]) -> Result<Self::Instance, ModelError> {
        let arguments = self.arguments_for_vector(vector)?;
        self.instance_for_arguments(&arguments)
    }

    /// Instance for a point of the unit hypercube mapped through the prior distributions
    fn instance_from_unit_vector(&self, unit_vector: &[f64]) -> Result<Self::Instance, ModelError> {
        let vector = self.vector_from_unit_vector(unit_vector)?;
        self.instance_from_vector(&vector)
    }

    fn vector_from_unit_vector(&self, unit_vector: &[f64]) -> Result<Vec<f64>, ModelError> {
        let priors = self.priors();
        ModelError::check_lengths(
            "unit vector and priors",
            unit_vector.len(),
            priors.len(),
        )?;
        Ok(priors
            .iter()
            .zip(unit_vector.iter())
            .map(|(prior, &unit)| prior.value_for_unit(unit))
            .collect())
    }

    fn instance_from_prior_medians(&self) -> Result<Self::Instance, ModelError> {
        let medians: Vec<_> = self.priors().iter().map(|prior| prior.median()).collect();
        self.instance_from_vector(&medians)
    }

    /// Sum of the log-densities of the priors at `vector`
    fn ln_prior(&self, vector: &[f64]) -> Result<f64, ModelError> {
        let priors = self.priors();
        ModelError::check_lengths("parameter vector and priors", vector.len(), priors.len())?;
        Ok(priors
            .iter()
            .zip(vector.iter())
            .map(|(prior, &value)| prior.ln_prior(value))
            .sum())
    }
}
