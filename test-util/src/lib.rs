use lazy_static::lazy_static;
use rand::SeedableRng;
use rand::rngs::StdRng;
use species_time_series::{
    Observable, Species, SpeciesCollection, TimeSeriesData, generate_data_at_timesteps,
};
use std::collections::BTreeMap;

/// Growth rates of the two reference species
pub const REFERENCE_GROWTH_RATES: [f64; 2] = [1.0, 2.0];

/// `(name, mean, deviation)` of the observables of the two reference species
pub const REFERENCE_OBSERVABLES: [[(&str, f64, f64); 2]; 2] = [
    [("a", 3.0, 2.0), ("b", 13.0, 2.0)],
    [("a", 15.0, 4.0), ("b", 7.0, 1.0)],
];

/// Timesteps of [struct@REFERENCE_TIME_SERIES]
pub const REFERENCE_TIMESTEPS: [u64; 3] = [5, 7, 13];

pub fn reference_species() -> Vec<Species> {
    REFERENCE_GROWTH_RATES
        .iter()
        .zip(REFERENCE_OBSERVABLES.iter())
        .map(|(&growth_rate, observables)| {
            let observables: BTreeMap<_, _> = observables
                .iter()
                .map(|&(name, mean, deviation)| (name.to_owned(), Observable::new(mean, deviation)))
                .collect();
            Species::with_observables(growth_rate, observables)
        })
        .collect()
}

/// Reference species with unit self-interactions
pub fn reference_collection() -> SpeciesCollection {
    let mut collection = SpeciesCollection::new(reference_species());
    for i in 0..REFERENCE_GROWTH_RATES.len() {
        collection[(i, i)] = 1.0;
    }
    collection
}

lazy_static! {
    /// Three observables of four species at [REFERENCE_TIMESTEPS], generated from a fixed seed
    pub static ref REFERENCE_TIME_SERIES: TimeSeriesData = {
        let mut rng = StdRng::seed_from_u64(0);
        generate_data_at_timesteps(&mut rng, 3, 4, &REFERENCE_TIMESTEPS)
    };
}
