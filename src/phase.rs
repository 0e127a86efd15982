use crate::analysis::SingleTimeAnalysis;
use crate::data::TimeSeriesData;
use crate::error::{ModelError, SearchError};
use crate::prior_model::{ModelInstance, PriorModel};
use crate::search::{McmcSearch, SearchResult};

/// Fit of a model to the data of one timestep of a time series
#[derive(Clone, Debug, PartialEq)]
pub struct SingleTimePhase {
    name: String,
    data_index: usize,
    search: McmcSearch,
}

impl SingleTimePhase {
    /// The phase is named `"{phase_name}_{data_index}"`
    pub fn new(phase_name: &str, data_index: usize, search: McmcSearch) -> Self {
        Self {
            name: format!("{phase_name}_{data_index}"),
            data_index,
            search,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the data in time order, not a timestep
    pub fn data_index(&self) -> usize {
        self.data_index
    }

    pub fn search(&self) -> &McmcSearch {
        &self.search
    }

    pub fn make_analysis(
        &self,
        dataset: &TimeSeriesData,
    ) -> Result<SingleTimeAnalysis, ModelError> {
        let (_, data) = dataset
            .nth(self.data_index)
            .ok_or(ModelError::IndexOutOfBounds {
                index: self.data_index,
                len: dataset.len(),
            })?;
        Ok(SingleTimeAnalysis::new(data.clone()))
    }

    pub fn run<M>(
        &self,
        model: &M,
        dataset: &TimeSeriesData,
    ) -> Result<SearchResult<ModelInstance>, SearchError>
    where
        M: PriorModel<Instance = ModelInstance>,
    {
        let analysis = self.make_analysis(dataset)?;
        tracing::debug!(
            "phase {}: fitting {} free parameters",
            self.name,
            model.prior_count()
        );
        self.search.fit(model, &analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    use crate::analysis::Analysis;
    use crate::data::Data;
    use crate::prior::Prior;
    use crate::prior_model::{
        MatrixPriorModel, ObservablePriorModel, SpeciesPriorModel, TimeSeriesModel,
    };

    fn dataset() -> TimeSeriesData {
        let [[a_0, b_0], [a_1, b_1]] = REFERENCE_OBSERVABLES
            .map(|observables| observables.map(|(_, mean, std)| Observable::new(mean, std)));
        let first: Data = [("a", a_0 + a_1), ("b", b_0 + b_1)].into_iter().collect();
        let second: Data = [("a", a_0 + a_0)].into_iter().collect();
        [(20, second), (10, first)].into_iter().collect()
    }

    fn fixed_species(observables: [(&str, f64, f64); 2]) -> SpeciesPriorModel {
        let observables = observables
            .iter()
            .map(|&(name, mean, std)| (name.to_owned(), ObservablePriorModel::new(mean, std)))
            .collect();
        SpeciesPriorModel::with_observables(1.0, observables)
    }

    #[test]
    fn name() {
        let phase = SingleTimePhase::new("phase", 3, McmcSearch::default());
        assert_eq!(phase.name(), "phase_3");
        assert_eq!(phase.data_index(), 3);
    }

    #[test]
    fn analysis_uses_time_order() {
        let dataset = dataset();
        let phase = SingleTimePhase::new("phase", 0, McmcSearch::default());
        let analysis = phase.make_analysis(&dataset).unwrap();
        assert_eq!(analysis.dataset(), dataset.get(10).unwrap());

        let phase = SingleTimePhase::new("phase", 2, McmcSearch::default());
        assert_eq!(
            phase.make_analysis(&dataset).unwrap_err(),
            ModelError::IndexOutOfBounds { index: 2, len: 2 }
        );
    }

    #[test]
    fn run() {
        let species: MatrixPriorModel =
            REFERENCE_OBSERVABLES.into_iter().map(fixed_species).collect();
        let abundances = [Prior::uniform(0.0, 2.0), Prior::uniform(0.0, 2.0)];
        let model: TimeSeriesModel = TimeSeriesModel::new(abundances, species);
        let phase = SingleTimePhase::new("phase", 0, McmcSearch::new(4, 32, 1));
        let result = phase.run(&model, &dataset()).unwrap();
        assert_eq!(result.parameters.len(), 2);
        assert_eq!(result.instance.abundances, result.parameters);

        let analysis = phase.make_analysis(&dataset()).unwrap();
        assert_eq!(analysis.fit(&result.instance), Ok(result.log_likelihood));
        assert!(result.log_likelihood <= 0.0);
    }
}
