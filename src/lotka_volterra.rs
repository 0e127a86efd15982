use crate::error::ModelError;
use crate::matrix::Matrix;
use crate::species::SpeciesCollection;

use ndarray::{Array1, ArrayView1};

/// Discrete-time competitive Lotka-Volterra population model
///
/// One step updates every population $x_i$ as
///
/// $$
/// x_i \leftarrow x_i + r_i x_i \left(1 - \frac{\sum_j A_{ij} x_j}{K}\right),
/// $$
///
/// where $r_i$ is the growth rate of species $i$, $A$ is the interaction matrix of the collection
/// and $K$ is the carrying capacity. Steps are explicit and fixed in size; a trajectory is
/// strictly sequential.
#[derive(Clone, Debug)]
pub struct LotkaVolterraModel<'a> {
    species_collection: &'a SpeciesCollection,
    capacity: f64,
}

impl<'a> LotkaVolterraModel<'a> {
    pub fn new(species_collection: &'a SpeciesCollection) -> Self {
        Self::with_capacity(species_collection, Self::default_capacity())
    }

    /// `capacity` must be positive
    pub fn with_capacity(species_collection: &'a SpeciesCollection, capacity: f64) -> Self {
        assert!(capacity > 0.0, "capacity must be positive");
        Self {
            species_collection,
            capacity,
        }
    }

    #[inline]
    pub fn default_capacity() -> f64 {
        1.0
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn species_collection(&self) -> &'a SpeciesCollection {
        self.species_collection
    }

    fn check_population(&self, population: &ArrayView1<f64>) -> Result<(), ModelError> {
        ModelError::check_lengths(
            "population and species",
            population.len(),
            self.species_collection.len(),
        )
    }

    /// Density-dependent factor `1 - A x / K` of every species
    ///
    /// Negative values mean the weighted population exceeds the capacity and the species dies
    /// off.
    pub fn growth_rates<'p>(
        &self,
        population: impl Into<ArrayView1<'p, f64>>,
    ) -> Result<Array1<f64>, ModelError> {
        let population = population.into();
        self.check_population(&population)?;
        let weighted = self.species_collection.interaction_matrix().dot(&population);
        Ok(weighted.mapv_into(|x| 1.0 - x / self.capacity))
    }

    /// Net change of every population over one step
    pub fn change<'p>(
        &self,
        population: impl Into<ArrayView1<'p, f64>>,
    ) -> Result<Array1<f64>, ModelError> {
        let population = population.into();
        let growth_rates = self.growth_rates(population)?;
        Ok(&population * &self.species_collection.growth_rate_vector() * growth_rates)
    }

    /// Population after one step
    pub fn step<'p>(
        &self,
        population: impl Into<ArrayView1<'p, f64>>,
    ) -> Result<Array1<f64>, ModelError> {
        let population = population.into();
        let change = self.change(population)?;
        Ok(change + population)
    }

    /// Population after `n` steps
    pub fn evolve<'p>(
        &self,
        population: impl Into<ArrayView1<'p, f64>>,
        n: usize,
    ) -> Result<Array1<f64>, ModelError> {
        let population = population.into();
        self.check_population(&population)?;
        (0..n).try_fold(population.to_owned(), |x, _| self.step(&x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::species::Species;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn self_limited(growth_rates: &[f64]) -> SpeciesCollection {
        let mut collection: SpeciesCollection =
            growth_rates.iter().map(|&r| Species::new(r)).collect();
        for i in 0..collection.len() {
            collection[(i, i)] = 1.0;
        }
        collection
    }

    #[test]
    fn default_capacity() {
        let collection = self_limited(&[1.0, 2.0]);
        let model = LotkaVolterraModel::new(&collection);
        assert_eq!(model.capacity(), 1.0);
    }

    #[test]
    fn equilibrium_is_fixed_point() {
        let collection = self_limited(&[1.0]);
        let model = LotkaVolterraModel::new(&collection);
        assert_eq!(model.change(&array![1.0]).unwrap(), array![0.0]);
        assert_eq!(model.step(&array![1.0]).unwrap(), array![1.0]);
    }

    /// Every step moves each population towards the unit equilibrium of [self_limited]
    fn assert_approaches_equilibrium(start: Array1<f64>) {
        let collection = self_limited(&vec![1.0; start.len()]);
        let model = LotkaVolterraModel::new(&collection);
        let equilibrium = 1.0;

        let mut population = start;
        for _ in 0..12 {
            let change = model.change(&population).unwrap();
            let next = model.step(&population).unwrap();
            for i in 0..population.len() {
                let offset = population[i] - equilibrium;
                assert!(
                    change[i] * offset <= 0.0,
                    "change {} does not oppose offset {}",
                    change[i],
                    offset
                );
                assert!((next[i] - equilibrium).abs() <= offset.abs());
            }
            population = next;
        }
        assert_abs_diff_eq!(
            population,
            Array1::from_elem(collection.len(), equilibrium),
            epsilon = 1e-12
        );
    }

    #[test]
    fn approaches_equilibrium_from_above() {
        assert_approaches_equilibrium(array![1.1, 1.1]);
    }

    #[test]
    fn approaches_equilibrium_from_below() {
        assert_approaches_equilibrium(array![0.9, 0.9]);
    }

    #[test]
    fn approaches_equilibrium_from_both_sides() {
        assert_approaches_equilibrium(array![0.9, 1.1]);
    }

    #[test]
    fn over_capacity_is_negative() {
        let collection = self_limited(&[1.0]);
        let model = LotkaVolterraModel::new(&collection);
        assert_abs_diff_eq!(
            model.growth_rates(&array![3.0]).unwrap(),
            array![-2.0],
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            model.step(&array![3.0]).unwrap(),
            array![-3.0],
            epsilon = 1e-15
        );
    }

    #[test]
    fn competition() {
        let mut collection = self_limited(&[1.0, 0.5]);
        collection[(0, 1)] = 0.5;
        let model = LotkaVolterraModel::with_capacity(&collection, 2.0);
        // species 0 feels 0.5 * 1.0 from species 1 on top of itself
        assert_abs_diff_eq!(
            model.growth_rates(&array![1.0, 1.0]).unwrap(),
            array![1.0 - 1.5 / 2.0, 1.0 - 1.0 / 2.0],
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            model.change(&array![1.0, 1.0]).unwrap(),
            array![0.25, 0.25],
            epsilon = 1e-15
        );
    }

    #[test]
    fn evolve() {
        let collection = self_limited(&[1.0]);
        let model = LotkaVolterraModel::new(&collection);
        let once = model.step(&array![0.5]).unwrap();
        let twice = model.step(&once).unwrap();
        assert_eq!(model.evolve(&array![0.5], 2).unwrap(), twice);
        assert_eq!(model.evolve(&array![0.5], 0).unwrap(), array![0.5]);
    }

    #[test]
    fn wrong_population_size() {
        let collection = self_limited(&[1.0, 1.0]);
        let model = LotkaVolterraModel::new(&collection);
        assert_eq!(
            model.step(&array![1.0]),
            Err(ModelError::LengthMismatch {
                what: "population and species",
                first: 1,
                second: 2
            })
        );
    }

    #[test]
    #[should_panic]
    fn non_positive_capacity() {
        let collection = self_limited(&[1.0]);
        let _ = LotkaVolterraModel::with_capacity(&collection, 0.0);
    }
}
