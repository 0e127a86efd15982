use crate::error::ModelError;
use crate::matrix::MatrixItem;
use crate::prior::{Arguments, Parameter, Prior, PriorId};
use crate::prior_model::{ObservablePriorModel, PriorModel};
use crate::species::{DEFAULT_INTERACTION, Species};

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(0);

static DEFAULT_INTERACTION_PARAMETER: Parameter = Parameter::Fixed(DEFAULT_INTERACTION);

/// Identity of a [SpeciesPriorModel], used as the key of interactions before any concrete
/// [Species] exists
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

impl ModelId {
    pub fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Model of a [Species]
///
/// Interactions are keyed by the identities of other species models. A model alone can only
/// give a [Species] with its self-interaction, [crate::MatrixPriorModel] attaches the others
/// once all the concrete species of the matrix are known.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesPriorModel {
    id: ModelId,
    pub growth_rate: Parameter,
    interactions: BTreeMap<ModelId, Parameter>,
    pub observables: BTreeMap<String, ObservablePriorModel>,
}

impl SpeciesPriorModel {
    pub fn new(growth_rate: impl Into<Parameter>) -> Self {
        Self::with_observables(growth_rate, BTreeMap::new())
    }

    pub fn with_observables(
        growth_rate: impl Into<Parameter>,
        observables: BTreeMap<String, ObservablePriorModel>,
    ) -> Self {
        Self {
            id: ModelId::next(),
            growth_rate: growth_rate.into(),
            interactions: BTreeMap::new(),
            observables,
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Interactions set explicitly, everything else is [DEFAULT_INTERACTION]
    pub fn interactions(&self) -> &BTreeMap<ModelId, Parameter> {
        &self.interactions
    }

    pub fn interaction(&self, other: ModelId) -> &Parameter {
        self.interactions
            .get(&other)
            .unwrap_or(&DEFAULT_INTERACTION_PARAMETER)
    }

    pub fn set_interaction(&mut self, other: ModelId, value: impl Into<Parameter>) {
        self.interactions.insert(other, value.into());
    }

    /// Concrete interaction values, still keyed by model identities
    pub fn interactions_for_arguments(
        &self,
        arguments: &Arguments,
    ) -> Result<BTreeMap<ModelId, f64>, ModelError> {
        self.interactions
            .iter()
            .map(|(&id, parameter)| Ok((id, parameter.value(arguments)?)))
            .collect()
    }
}

impl Default for SpeciesPriorModel {
    /// Growth rate with a unit uniform prior, no observables
    fn default() -> Self {
        Self::new(Prior::default())
    }
}

impl PriorModel for SpeciesPriorModel {
    type Instance = Species;

    fn collect_priors<'a>(&'a self, priors: &mut BTreeMap<PriorId, &'a Prior>) {
        self.growth_rate.collect_priors(priors);
        for parameter in self.interactions.values() {
            parameter.collect_priors(priors);
        }
        for observable in self.observables.values() {
            observable.collect_priors(priors);
        }
    }

    /// Only the self-interaction is attached, other models have no concrete species yet
    fn instance_for_arguments(&self, arguments: &Arguments) -> Result<Species, ModelError> {
        let observables = self
            .observables
            .iter()
            .map(|(name, model)| Ok((name.clone(), model.instance_for_arguments(arguments)?)))
            .collect::<Result<_, ModelError>>()?;
        let mut species =
            Species::with_observables(self.growth_rate.value(arguments)?, observables);
        if let Some(parameter) = self.interactions.get(&self.id) {
            let id = species.id();
            species.interactions_mut().set(id, parameter.value(arguments)?);
        }
        Ok(species)
    }
}

impl Index<ModelId> for SpeciesPriorModel {
    type Output = Parameter;

    fn index(&self, other: ModelId) -> &Self::Output {
        self.interaction(other)
    }
}

impl IndexMut<ModelId> for SpeciesPriorModel {
    fn index_mut(&mut self, other: ModelId) -> &mut Self::Output {
        self.interactions
            .entry(other)
            .or_insert_with(|| DEFAULT_INTERACTION_PARAMETER.clone())
    }
}

impl MatrixItem for SpeciesPriorModel {
    type Id = ModelId;
    type Interaction = Parameter;

    fn id(&self) -> ModelId {
        self.id
    }

    fn interaction(&self, other: ModelId) -> Parameter {
        SpeciesPriorModel::interaction(self, other).clone()
    }

    fn set_interaction(&mut self, other: ModelId, value: Parameter) {
        SpeciesPriorModel::set_interaction(self, other, value);
    }
}
