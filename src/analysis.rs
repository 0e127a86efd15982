use crate::data::{Data, TimeSeriesData};
use crate::error::ModelError;
use crate::fit::{Fit, MultiTimeFit};
use crate::lotka_volterra::LotkaVolterraModel;
use crate::observable::ObservableTrait;
use crate::prior_model::ModelInstance;
use crate::species::SpeciesObservables;

use ndarray::Array1;

/// Scores model instances against data
pub trait Analysis {
    type Instance;

    /// Fitness of `instance`, higher is better
    fn fit(&self, instance: &Self::Instance) -> Result<f64, ModelError>;

    fn visualize(&self, _instance: &Self::Instance, _during_analysis: bool) {}
}

/// Fits of every observable of `data` for a population with the given `abundances`
fn fits_for_data(
    data: &Data,
    abundances: Vec<f64>,
    instance: &ModelInstance,
) -> Result<Vec<Fit>, ModelError> {
    let species_observables =
        SpeciesObservables::new(abundances, instance.species_collection.species())?;
    data.observable_names()
        .into_iter()
        .map(|name| {
            let model_data = species_observables.get(name)?.pdf_on_grid(data.grid());
            Fit::new(model_data, data.pdf(name)?)
        })
        .collect()
}

/// Compares an evolving population with observations at several times
///
/// The population of the instance is the one at time zero, it is stepped with
/// [LotkaVolterraModel] up to every observed timestep in ascending order.
#[derive(Clone, Debug)]
pub struct TimeSeriesAnalysis {
    dataset: TimeSeriesData,
    capacity: f64,
}

impl TimeSeriesAnalysis {
    pub fn new(dataset: TimeSeriesData) -> Self {
        Self::with_capacity(dataset, LotkaVolterraModel::default_capacity())
    }

    /// `capacity` must be positive
    pub fn with_capacity(dataset: TimeSeriesData, capacity: f64) -> Self {
        assert!(capacity > 0.0, "capacity must be positive");
        Self { dataset, capacity }
    }

    pub fn dataset(&self) -> &TimeSeriesData {
        &self.dataset
    }

    pub fn multi_time_fit(&self, instance: &ModelInstance) -> Result<MultiTimeFit, ModelError> {
        let model = LotkaVolterraModel::with_capacity(&instance.species_collection, self.capacity);
        let mut population = Array1::from(instance.abundances.clone());
        let mut multi_time_fit = MultiTimeFit::default();
        for (steps, (timestep, data)) in self.dataset.intervals().zip(self.dataset.iter()) {
            population = model.evolve(&population, steps as usize)?;
            for fit in fits_for_data(data, population.to_vec(), instance)? {
                tracing::trace!("timestep {timestep}: chi squared {}", fit.chi_squared());
                multi_time_fit.push(fit);
            }
        }
        Ok(multi_time_fit)
    }
}

impl Analysis for TimeSeriesAnalysis {
    type Instance = ModelInstance;

    fn fit(&self, instance: &ModelInstance) -> Result<f64, ModelError> {
        Ok(-self.multi_time_fit(instance)?.chi_squared())
    }
}

/// Compares a population with observations taken at a single time
#[derive(Clone, Debug)]
pub struct SingleTimeAnalysis {
    dataset: Data,
}

impl SingleTimeAnalysis {
    pub fn new(dataset: Data) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Data {
        &self.dataset
    }
}

impl Analysis for SingleTimeAnalysis {
    type Instance = ModelInstance;

    fn fit(&self, instance: &ModelInstance) -> Result<f64, ModelError> {
        let fits = fits_for_data(&self.dataset, instance.abundances.clone(), instance)?;
        Ok(-fits.iter().map(Fit::chi_squared).sum::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    use crate::matrix::Matrix;
    use crate::observable::CompoundObservable;
    use approx::assert_relative_eq;

    fn instance(abundances: Vec<f64>) -> ModelInstance {
        ModelInstance {
            abundances,
            species_collection: reference_collection(),
        }
    }

    /// What the reference species look like with `abundances`
    fn data_for(instance: &ModelInstance, abundances: &[f64]) -> Data {
        let species_observables =
            SpeciesObservables::new(abundances.to_vec(), instance.species_collection.species())
                .unwrap();
        species_observables
            .observable_names()
            .into_iter()
            .map(|name| (name, species_observables.get(name).unwrap()))
            .collect()
    }

    #[test]
    fn reference_collection_is_self_limited() {
        let collection = reference_collection();
        assert_eq!(collection.len(), REFERENCE_GROWTH_RATES.len());
        assert_eq!(collection[(0, 0)], 1.0);
        assert_eq!(collection[(1, 1)], 1.0);
        assert_eq!(collection[(0, 1)], collection.default_interaction());
    }

    #[test]
    fn single_time_perfect_fit() {
        let instance = instance(vec![1.0, 1.0]);
        let analysis = SingleTimeAnalysis::new(data_for(&instance, &[1.0, 1.0]));
        assert_eq!(analysis.fit(&instance), Ok(0.0));
    }

    #[test]
    fn single_time_imperfect_fit() {
        let instance = instance(vec![1.0, 1.0]);
        let analysis = SingleTimeAnalysis::new(data_for(&instance, &[1.0, 0.5]));
        let fitness = analysis.fit(&instance).unwrap();
        assert!(fitness < 0.0);

        let data = analysis.dataset();
        let expected: f64 = ["a", "b"]
            .iter()
            .map(|&name| {
                let model: CompoundObservable = instance
                    .species_collection
                    .species()
                    .iter()
                    .map(|species| (1.0, species.observables[name]))
                    .collect();
                Fit::new(model.pdf_on_grid(data.grid()), data.pdf(name).unwrap())
                    .unwrap()
                    .chi_squared()
            })
            .sum();
        assert_relative_eq!(fitness, -expected, max_relative = 1e-12);
    }

    #[test]
    fn time_series_follows_population() {
        let instance = instance(vec![0.2, 0.4]);
        let model = LotkaVolterraModel::new(&instance.species_collection);
        let initial = Array1::from(instance.abundances.clone());

        let mut dataset = TimeSeriesData::new();
        for timestep in [7, 0, 3] {
            let population = model.evolve(&initial, timestep as usize).unwrap();
            dataset.insert(timestep, data_for(&instance, population.as_slice().unwrap()));
        }
        let analysis = TimeSeriesAnalysis::new(dataset);

        let multi_time_fit = analysis.multi_time_fit(&instance).unwrap();
        assert_eq!(multi_time_fit.fits().len(), 6);
        assert_eq!(multi_time_fit.chi_squared(), 0.0);
        assert_eq!(analysis.fit(&instance), Ok(0.0));
    }

    #[test]
    fn time_series_penalises_wrong_population() {
        let instance = instance(vec![0.2, 0.4]);
        let mut dataset = TimeSeriesData::new();
        dataset.insert(5, data_for(&instance, &[0.2, 0.4]));
        let analysis = TimeSeriesAnalysis::new(dataset);
        // the population has grown by timestep 5
        assert!(analysis.fit(&instance).unwrap() < 0.0);
    }

    #[test]
    fn abundances_must_match_species() {
        let instance = instance(vec![1.0]);
        let analysis = SingleTimeAnalysis::new(data_for(&instance, &[1.0, 1.0]));
        assert_eq!(
            analysis.fit(&instance),
            Err(ModelError::LengthMismatch {
                what: "abundances and species",
                first: 1,
                second: 2,
            })
        );
        let analysis = TimeSeriesAnalysis::new([(0, Data::new())].into_iter().collect());
        assert!(analysis.fit(&instance).is_err());
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn non_positive_capacity() {
        let _ = TimeSeriesAnalysis::with_capacity(TimeSeriesData::new(), 0.0);
    }

    #[test]
    fn missing_observable_in_model() {
        let mut instance = instance(vec![1.0, 1.0]);
        let mut data = data_for(&instance, &[1.0, 1.0]);
        data.insert("c", Observable::new(1.0, 1.0));
        instance.species_collection[0].observables.remove("b");
        let analysis = SingleTimeAnalysis::new(data);
        assert!(matches!(
            analysis.fit(&instance),
            Err(ModelError::MissingObservable(_))
        ));
    }
}
