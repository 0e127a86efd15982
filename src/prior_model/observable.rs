use crate::error::ModelError;
use crate::observable::Observable;
use crate::prior::{Arguments, Parameter, Prior, PriorId};
use crate::prior_model::PriorModel;

use std::collections::BTreeMap;

/// Model of an [Observable]
#[derive(Clone, Debug, PartialEq)]
pub struct ObservablePriorModel {
    pub mean: Parameter,
    pub deviation: Parameter,
}

impl ObservablePriorModel {
    pub fn new(mean: impl Into<Parameter>, deviation: impl Into<Parameter>) -> Self {
        Self {
            mean: mean.into(),
            deviation: deviation.into(),
        }
    }
}

impl Default for ObservablePriorModel {
    /// Independent unit uniform priors
    fn default() -> Self {
        Self::new(Prior::default(), Prior::default())
    }
}

impl PriorModel for ObservablePriorModel {
    type Instance = Observable;

    fn collect_priors<'a>(&'a self, priors: &mut BTreeMap<PriorId, &'a Prior>) {
        self.mean.collect_priors(priors);
        self.deviation.collect_priors(priors);
    }

    fn instance_for_arguments(&self, arguments: &Arguments) -> Result<Observable, ModelError> {
        Ok(Observable::new(
            self.mean.value(arguments)?,
            self.deviation.value(arguments)?,
        ))
    }
}
