use crate::data::{Data, TimeSeriesData};
use crate::observable::{CompoundObservable, Observable};
use crate::pdf_grid::PdfGrid;

use rand::Rng;

const MIN_DEVIATION: f64 = 1.0;
const MAX_DEVIATION: f64 = 4.0;

/// Random observable of every species for each of the observable names "0", "1", ...
fn random_shapes<R: Rng>(
    rng: &mut R,
    number_of_observables: usize,
    number_of_species: usize,
) -> Vec<(String, Vec<Observable>)> {
    let grid = PdfGrid::default();
    (0..number_of_observables)
        .map(|i| {
            let observables = (0..number_of_species)
                .map(|_| {
                    Observable::new(
                        rng.random_range(grid.lower_limit..=grid.upper_limit),
                        rng.random_range(MIN_DEVIATION..MAX_DEVIATION),
                    )
                })
                .collect();
            (i.to_string(), observables)
        })
        .collect()
}

fn random_abundances<R: Rng>(rng: &mut R, number_of_species: usize) -> Vec<f64> {
    (0..number_of_species).map(|_| rng.random::<f64>()).collect()
}

/// Every observable name gets the same abundance vector
fn data_with_abundances(shapes: &[(String, Vec<Observable>)], abundances: &[f64]) -> Data {
    shapes
        .iter()
        .map(|(name, observables)| {
            let compound: CompoundObservable = abundances
                .iter()
                .copied()
                .zip(observables.iter().copied())
                .collect();
            (name.clone(), compound)
        })
        .collect()
}

/// Random data with `number_of_observables` observables of a mix of `number_of_species` species
///
/// Observable names are "0", "1", .... Each species has a Gaussian observable with a mean inside
/// the default [PdfGrid] limits, species abundances are uniform in `[0, 1)`.
pub fn generate_data<R: Rng>(
    rng: &mut R,
    number_of_observables: usize,
    number_of_species: usize,
) -> Data {
    let shapes = random_shapes(rng, number_of_observables, number_of_species);
    let abundances = random_abundances(rng, number_of_species);
    data_with_abundances(&shapes, &abundances)
}

/// Random data at each of `timesteps`
///
/// The observables of the species are drawn once and shared by all timesteps, only the
/// abundances are drawn anew for every timestep.
pub fn generate_data_at_timesteps<R: Rng>(
    rng: &mut R,
    number_of_observables: usize,
    number_of_species: usize,
    timesteps: &[u64],
) -> TimeSeriesData {
    let shapes = random_shapes(rng, number_of_observables, number_of_species);
    timesteps
        .iter()
        .map(|&timestep| {
            let abundances = random_abundances(rng, number_of_species);
            (timestep, data_with_abundances(&shapes, &abundances))
        })
        .collect()
}
