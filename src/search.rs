use crate::analysis::Analysis;
use crate::error::{ModelError, SearchError};
use crate::prior_model::PriorModel;

use emcee::{EnsembleSampler, Guess, Prob};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Best point found by a search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<I> {
    pub instance: I,
    /// Physical values of the free parameters, in [PriorModel::priors] order
    pub parameters: Vec<f64>,
    /// Fitness of the instance
    pub log_likelihood: f64,
}

/// Non-linear search with the affine-invariant ensemble sampler of [emcee]
///
/// The log-likelihood is the fitness given by the analysis, the log-prior is the sum of the
/// log-densities of the priors. Walkers start at random draws from the priors.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct McmcSearch {
    /// Walkers per free parameter, at least `2 * dimensions + 2` walkers are used in any case
    pub nwalkers_per_parameter: usize,
    pub niterations: usize,
    pub seed: u64,
}

impl McmcSearch {
    pub fn new(nwalkers_per_parameter: usize, niterations: usize, seed: u64) -> Self {
        Self {
            nwalkers_per_parameter,
            niterations,
            seed,
        }
    }

    #[inline]
    pub fn default_nwalkers_per_parameter() -> usize {
        4
    }

    #[inline]
    pub fn default_niterations() -> usize {
        128
    }

    #[inline]
    pub fn default_seed() -> u64 {
        0
    }

    /// Even number of walkers exceeding twice the number of dimensions
    fn nwalkers(&self, dimensions: usize) -> usize {
        let nwalkers = usize::max(
            self.nwalkers_per_parameter * dimensions,
            2 * dimensions + 2,
        );
        nwalkers + nwalkers % 2
    }

    pub fn fit<M, A>(
        &self,
        model: &M,
        analysis: &A,
    ) -> Result<SearchResult<M::Instance>, SearchError>
    where
        M: PriorModel,
        A: Analysis<Instance = M::Instance>,
    {
        let dimensions = model.prior_count();
        if dimensions == 0 {
            tracing::debug!("model has no free parameters, evaluating it directly");
            return evaluate(model, analysis, vec![]);
        }

        let problem = Problem {
            model,
            analysis,
            error: RefCell::new(None),
        };
        let nwalkers = self.nwalkers(dimensions);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let initial_guesses = (0..nwalkers)
            .map(|_| {
                let unit: Vec<_> = (0..dimensions).map(|_| rng.random::<f64>()).collect();
                let values: Vec<f32> = model
                    .vector_from_unit_vector(&unit)?
                    .into_iter()
                    .map(|x| x as f32)
                    .collect();
                Ok(Guess::new(&values))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        let mut sampler = EnsembleSampler::new(nwalkers, dimensions, &problem)
            .map_err(|err| SearchError::Sampler(err.to_string()))?;
        sampler.seed(&[self.seed as usize]);

        let mut best: Option<(f32, Vec<f32>)> = None;
        let sampling = sampler.sample(&initial_guesses, self.niterations, |step| {
            for (position, &lnprob) in step.pos.iter().zip(step.lnprob.iter()) {
                let is_better = best
                    .as_ref()
                    .is_none_or(|(best_lnprob, _)| lnprob > *best_lnprob);
                if lnprob.is_finite() && is_better {
                    best = Some((lnprob, position.values.clone()));
                }
            }
        });
        if let Some(error) = problem.error.borrow_mut().take() {
            return Err(error.into());
        }
        sampling.map_err(|err| SearchError::Sampler(err.to_string()))?;
        let (best_lnprob, best_values) = best.ok_or(SearchError::NoFiniteProbability)?;
        tracing::debug!(
            "best log-probability after {} iterations: {best_lnprob}",
            self.niterations
        );
        evaluate(
            model,
            analysis,
            best_values.into_iter().map(f64::from).collect(),
        )
    }
}

impl Default for McmcSearch {
    fn default() -> Self {
        Self::new(
            Self::default_nwalkers_per_parameter(),
            Self::default_niterations(),
            Self::default_seed(),
        )
    }
}

fn evaluate<M, A>(
    model: &M,
    analysis: &A,
    parameters: Vec<f64>,
) -> Result<SearchResult<M::Instance>, SearchError>
where
    M: PriorModel,
    A: Analysis<Instance = M::Instance>,
{
    let instance = model.instance_from_vector(&parameters)?;
    let log_likelihood = analysis.fit(&instance)?;
    analysis.visualize(&instance, false);
    Ok(SearchResult {
        instance,
        parameters,
        log_likelihood,
    })
}

/// Probability of the sampler, keeps the first error instead of losing it
struct Problem<'a, M, A> {
    model: &'a M,
    analysis: &'a A,
    error: RefCell<Option<ModelError>>,
}

impl<M, A> Problem<'_, M, A>
where
    M: PriorModel,
    A: Analysis<Instance = M::Instance>,
{
    fn record(&self, error: ModelError) -> f32 {
        tracing::warn!("model evaluation failed during sampling: {error}");
        self.error.borrow_mut().get_or_insert(error);
        f32::NEG_INFINITY
    }

    fn vector(guess: &Guess) -> Vec<f64> {
        guess.values.iter().map(|&x| f64::from(x)).collect()
    }
}

impl<M, A> Prob for Problem<'_, M, A>
where
    M: PriorModel,
    A: Analysis<Instance = M::Instance>,
{
    fn lnlike(&self, params: &Guess) -> f32 {
        let fitness = self
            .model
            .instance_from_vector(&Self::vector(params))
            .and_then(|instance| self.analysis.fit(&instance));
        match fitness {
            Ok(fitness) => fitness as f32,
            Err(error) => self.record(error),
        }
    }

    fn lnprior(&self, params: &Guess) -> f32 {
        match self.model.ln_prior(&Self::vector(params)) {
            Ok(ln_prior) => ln_prior as f32,
            Err(error) => self.record(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    use crate::observable::ObservableTrait;
    use crate::prior::{Arguments, Prior, PriorId};
    use crate::prior_model::ObservablePriorModel;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    /// Fitness of an observable against a single target density
    struct ObservableAnalysis {
        target: Array2<f64>,
    }

    impl Analysis for ObservableAnalysis {
        type Instance = Observable;

        fn fit(&self, instance: &Observable) -> Result<f64, ModelError> {
            let model = instance.pdf(0.0, 20.0, 40);
            Ok(-crate::fit::Fit::new(model, self.target.clone())?.chi_squared())
        }
    }

    struct FailingModel(Prior);

    impl PriorModel for FailingModel {
        type Instance = Observable;

        fn collect_priors<'a>(&'a self, priors: &mut BTreeMap<PriorId, &'a Prior>) {
            priors.insert(self.0.id(), &self.0);
        }

        fn instance_for_arguments(&self, _arguments: &Arguments) -> Result<Observable, ModelError> {
            Err(ModelError::MissingObservable("x".to_owned()))
        }
    }

    fn target() -> Array2<f64> {
        Observable::new(10.0, 2.0).pdf(0.0, 20.0, 40)
    }

    #[test]
    fn nwalkers() {
        let search = McmcSearch::new(1, 0, 0);
        assert_eq!(search.nwalkers(3), 8);
        let search = McmcSearch::new(5, 0, 0);
        assert_eq!(search.nwalkers(3), 16);
        assert_eq!(McmcSearch::default().nwalkers(2), 8);
    }

    #[test]
    fn finds_mean() {
        let model = ObservablePriorModel::new(Prior::uniform(0.0, 20.0), 2.0);
        let analysis = ObservableAnalysis { target: target() };
        let search = McmcSearch::new(8, 64, 0);
        let result = search.fit(&model, &analysis).unwrap();
        assert_eq!(result.parameters.len(), 1);
        assert_abs_diff_eq!(result.instance.mean, 10.0, epsilon = 0.5);
        assert_eq!(result.instance.mean, result.parameters[0]);
        assert!(result.log_likelihood <= 0.0);
    }

    #[test]
    fn fixed_model_is_evaluated_directly() {
        let model = ObservablePriorModel::new(10.0, 2.0);
        let analysis = ObservableAnalysis { target: target() };
        let result = McmcSearch::default().fit(&model, &analysis).unwrap();
        assert!(result.parameters.is_empty());
        assert_eq!(result.log_likelihood, 0.0);
    }

    #[test]
    fn errors_are_surfaced() {
        let model = FailingModel(Prior::default());
        let analysis = ObservableAnalysis { target: target() };
        let result = McmcSearch::new(4, 4, 0).fit(&model, &analysis);
        assert_eq!(
            result,
            Err(SearchError::Model(ModelError::MissingObservable("x".to_owned())))
        );
    }

    check_serde!(mcmc_search_serde, McmcSearch, McmcSearch::new(3, 10, 42));
}
