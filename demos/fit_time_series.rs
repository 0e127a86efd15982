use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use species_time_series::{
    Data, MatrixPriorModel, McmcSearch, ObservablePayload, ObservablePriorModel, Prior,
    PriorModel, SearchError, SpeciesPriorModel, TimeSeriesAnalysis, TimeSeriesModel,
    generate_data_at_timesteps,
};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

/// Fit a Lotka-Volterra model to a random time series of observable densities
#[derive(Parser)]
#[clap(about)]
struct Opts {
    /// Number of sampler iterations
    #[clap(long, default_value_t = 128)]
    iterations: usize,
    /// Number of walkers per free parameter
    #[clap(long, default_value_t = 4)]
    walkers_per_parameter: usize,
    /// Seed of both the generated data and the sampler
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// Number of observables per species
    #[clap(long, default_value_t = 2)]
    observables: usize,
    /// Number of species
    #[clap(long, default_value_t = 2)]
    species: usize,
    /// Timesteps of the observations
    #[clap(long, multiple_values = true, default_values = &["1", "2", "4"])]
    timesteps: Vec<u64>,
}

/// Fixed observables of every species, read back from the generated compounds
fn species_observables(data: &Data, species: usize) -> Vec<BTreeMap<String, ObservablePriorModel>> {
    let mut observables = vec![BTreeMap::new(); species];
    for (name, payload) in data.iter() {
        if let ObservablePayload::Compound(compound) = payload {
            for (species_observables, observable) in
                observables.iter_mut().zip(compound.observables())
            {
                species_observables.insert(
                    name.to_owned(),
                    ObservablePriorModel::new(observable.mean, observable.deviation),
                );
            }
        }
    }
    observables
}

fn main() -> Result<(), SearchError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let dataset =
        generate_data_at_timesteps(&mut rng, opts.observables, opts.species, &opts.timesteps);
    let Some((_, first)) = dataset.nth(0) else {
        println!("No timesteps to fit");
        return Ok(());
    };

    // free abundances, a single self-interaction shared by all species
    let self_interaction = Prior::uniform(0.0, 2.0);
    let mut matrix: MatrixPriorModel = species_observables(first, opts.species)
        .into_iter()
        .map(|observables| SpeciesPriorModel::with_observables(1.0, observables))
        .collect();
    for i in 0..opts.species {
        matrix[(i, i)] = self_interaction.clone().into();
    }
    println!("{}", matrix.info());
    let abundances = (0..opts.species).map(|_| Prior::uniform(0.0, 1.0));
    let model: TimeSeriesModel = TimeSeriesModel::new(abundances, matrix);

    let search = McmcSearch::new(opts.walkers_per_parameter, opts.iterations, opts.seed);
    let analysis = TimeSeriesAnalysis::new(dataset);
    let result = search.fit(&model, &analysis)?;

    println!("free parameters: {}", model.prior_count());
    println!("best parameters: {:?}", result.parameters);
    println!("best abundances: {:?}", result.instance.abundances);
    println!("fitness: {}", result.log_likelihood);
    Ok(())
}
