use crate::error::ModelError;

use enum_dispatch::enum_dispatch;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::{SQRT_2, TAU};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PRIOR_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a free parameter
///
/// Clones of a [Prior] share the identity, so one prior placed at several places of a model is a
/// single free parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PriorId(u64);

impl PriorId {
    pub fn next() -> Self {
        Self(NEXT_PRIOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PriorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[enum_dispatch]
pub trait PriorKindTrait {
    /// Value splitting the probability mass in halves
    fn median(&self) -> f64;

    /// Physical value of the unit-cube coordinate `unit`, the inverse cumulative distribution
    fn value_for_unit(&self, unit: f64) -> f64;

    /// Natural logarithm of the probability density at `x`, minus infinity outside the support
    fn ln_prior(&self, x: f64) -> f64;
}

/// Distribution of a free parameter
#[enum_dispatch(PriorKindTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum PriorKind {
    Uniform(UniformPrior),
    LogUniform(LogUniformPrior),
    Gaussian(GaussianPrior),
}

impl PriorKind {
    pub fn uniform(lower_limit: f64, upper_limit: f64) -> Self {
        UniformPrior::new(lower_limit, upper_limit).into()
    }

    pub fn log_uniform(lower_limit: f64, upper_limit: f64) -> Self {
        LogUniformPrior::new(lower_limit, upper_limit).into()
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Self {
        GaussianPrior::new(mean, sigma).into()
    }
}

impl fmt::Display for PriorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(prior) => write!(
                f,
                "UniformPrior, lower_limit = {:?}, upper_limit = {:?}",
                prior.lower_limit, prior.upper_limit
            ),
            Self::LogUniform(prior) => write!(
                f,
                "LogUniformPrior, lower_limit = {:?}, upper_limit = {:?}",
                prior.lower_limit, prior.upper_limit
            ),
            Self::Gaussian(prior) => write!(
                f,
                "GaussianPrior, mean = {:?}, sigma = {:?}",
                prior.mean, prior.sigma
            ),
        }
    }
}

/// Uniform distribution over `[lower_limit, upper_limit]`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(into = "LimitsParameters", try_from = "LimitsParameters")]
pub struct UniformPrior {
    pub lower_limit: f64,
    pub upper_limit: f64,
}

impl UniformPrior {
    pub fn new(lower_limit: f64, upper_limit: f64) -> Self {
        match Self::try_new(lower_limit, upper_limit) {
            Ok(prior) => prior,
            Err(error) => panic!("{error}"),
        }
    }

    /// Fails with [ModelError::InvalidPrior] unless `lower_limit < upper_limit`
    pub fn try_new(lower_limit: f64, upper_limit: f64) -> Result<Self, ModelError> {
        if lower_limit < upper_limit {
            Ok(Self {
                lower_limit,
                upper_limit,
            })
        } else {
            Err(ModelError::InvalidPrior(
                "lower_limit must be less than upper_limit",
            ))
        }
    }

    #[inline]
    pub fn default_lower_limit() -> f64 {
        0.0
    }

    #[inline]
    pub fn default_upper_limit() -> f64 {
        1.0
    }

    fn width(&self) -> f64 {
        self.upper_limit - self.lower_limit
    }
}

impl Default for UniformPrior {
    fn default() -> Self {
        Self::new(Self::default_lower_limit(), Self::default_upper_limit())
    }
}

impl PriorKindTrait for UniformPrior {
    fn median(&self) -> f64 {
        0.5 * (self.lower_limit + self.upper_limit)
    }

    fn value_for_unit(&self, unit: f64) -> f64 {
        self.lower_limit + unit * self.width()
    }

    fn ln_prior(&self, x: f64) -> f64 {
        if (self.lower_limit..=self.upper_limit).contains(&x) {
            -f64::ln(self.width())
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Distribution uniform in the logarithm over `[lower_limit, upper_limit]`, both positive
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(into = "LimitsParameters", try_from = "LimitsParameters")]
pub struct LogUniformPrior {
    pub lower_limit: f64,
    pub upper_limit: f64,
}

impl LogUniformPrior {
    pub fn new(lower_limit: f64, upper_limit: f64) -> Self {
        match Self::try_new(lower_limit, upper_limit) {
            Ok(prior) => prior,
            Err(error) => panic!("{error}"),
        }
    }

    /// Fails with [ModelError::InvalidPrior] unless `0 < lower_limit < upper_limit`
    pub fn try_new(lower_limit: f64, upper_limit: f64) -> Result<Self, ModelError> {
        if lower_limit <= 0.0 || lower_limit.is_nan() {
            return Err(ModelError::InvalidPrior("lower_limit must be positive"));
        }
        let UniformPrior {
            lower_limit,
            upper_limit,
        } = UniformPrior::try_new(lower_limit, upper_limit)?;
        Ok(Self {
            lower_limit,
            upper_limit,
        })
    }

    fn ln_width(&self) -> f64 {
        f64::ln(self.upper_limit) - f64::ln(self.lower_limit)
    }
}

impl PriorKindTrait for LogUniformPrior {
    fn median(&self) -> f64 {
        f64::sqrt(self.lower_limit * self.upper_limit)
    }

    fn value_for_unit(&self, unit: f64) -> f64 {
        f64::exp(f64::ln(self.lower_limit) + unit * self.ln_width())
    }

    fn ln_prior(&self, x: f64) -> f64 {
        if (self.lower_limit..=self.upper_limit).contains(&x) {
            -f64::ln(x) - f64::ln(self.ln_width())
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Normal distribution
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(into = "GaussianParameters", try_from = "GaussianParameters")]
pub struct GaussianPrior {
    pub mean: f64,
    pub sigma: f64,
}

impl GaussianPrior {
    /// Bracket of the standard score searched by [PriorKindTrait::value_for_unit]
    const Z_LIMIT: f64 = 40.0;
    const BISECTION_STEPS: usize = 128;

    pub fn new(mean: f64, sigma: f64) -> Self {
        match Self::try_new(mean, sigma) {
            Ok(prior) => prior,
            Err(error) => panic!("{error}"),
        }
    }

    /// Fails with [ModelError::InvalidPrior] unless `sigma` is positive
    pub fn try_new(mean: f64, sigma: f64) -> Result<Self, ModelError> {
        if sigma > 0.0 {
            Ok(Self { mean, sigma })
        } else {
            Err(ModelError::InvalidPrior("sigma must be positive"))
        }
    }

    fn standard_cdf(z: f64) -> f64 {
        0.5 * (1.0 + libm::erf(z / SQRT_2))
    }
}

impl PriorKindTrait for GaussianPrior {
    fn median(&self) -> f64 {
        self.mean
    }

    fn value_for_unit(&self, unit: f64) -> f64 {
        let (mut left, mut right) = (-Self::Z_LIMIT, Self::Z_LIMIT);
        for _ in 0..Self::BISECTION_STEPS {
            let middle = 0.5 * (left + right);
            if Self::standard_cdf(middle) < unit {
                left = middle;
            } else {
                right = middle;
            }
        }
        self.mean + 0.5 * (left + right) * self.sigma
    }

    fn ln_prior(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sigma;
        -0.5 * z * z - f64::ln(self.sigma) - 0.5 * f64::ln(TAU)
    }
}

#[derive(Clone, Serialize, Deserialize, JsonSchema)]
struct LimitsParameters {
    lower_limit: f64,
    upper_limit: f64,
}

impl From<UniformPrior> for LimitsParameters {
    fn from(value: UniformPrior) -> Self {
        Self {
            lower_limit: value.lower_limit,
            upper_limit: value.upper_limit,
        }
    }
}

impl From<LogUniformPrior> for LimitsParameters {
    fn from(value: LogUniformPrior) -> Self {
        Self {
            lower_limit: value.lower_limit,
            upper_limit: value.upper_limit,
        }
    }
}

impl TryFrom<LimitsParameters> for UniformPrior {
    type Error = ModelError;

    fn try_from(value: LimitsParameters) -> Result<Self, Self::Error> {
        Self::try_new(value.lower_limit, value.upper_limit)
    }
}

impl TryFrom<LimitsParameters> for LogUniformPrior {
    type Error = ModelError;

    fn try_from(value: LimitsParameters) -> Result<Self, Self::Error> {
        Self::try_new(value.lower_limit, value.upper_limit)
    }
}

#[derive(Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "GaussianPrior")]
struct GaussianParameters {
    mean: f64,
    sigma: f64,
}

impl From<GaussianPrior> for GaussianParameters {
    fn from(value: GaussianPrior) -> Self {
        Self {
            mean: value.mean,
            sigma: value.sigma,
        }
    }
}

impl TryFrom<GaussianParameters> for GaussianPrior {
    type Error = ModelError;

    fn try_from(value: GaussianParameters) -> Result<Self, Self::Error> {
        Self::try_new(value.mean, value.sigma)
    }
}

macro_rules! json_schema_via {
    ($prior: ty, $parameters: ty, $name: literal) => {
        impl JsonSchema for $prior {
            fn is_referenceable() -> bool {
                false
            }

            fn schema_name() -> String {
                $name.to_owned()
            }

            fn json_schema(
                r#gen: &mut schemars::r#gen::SchemaGenerator,
            ) -> schemars::schema::Schema {
                <$parameters>::json_schema(r#gen)
            }
        }
    };
}

json_schema_via!(UniformPrior, LimitsParameters, "UniformPrior");
json_schema_via!(LogUniformPrior, LimitsParameters, "LogUniformPrior");
json_schema_via!(GaussianPrior, GaussianParameters, "GaussianPrior");

/// A free parameter: an identity and the distribution of its value
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Prior {
    /// A deserialized prior is a new free parameter
    #[serde(skip, default = "PriorId::next")]
    #[schemars(skip)]
    id: PriorId,
    kind: PriorKind,
}

impl Prior {
    pub fn new(kind: impl Into<PriorKind>) -> Self {
        Self {
            id: PriorId::next(),
            kind: kind.into(),
        }
    }

    pub fn uniform(lower_limit: f64, upper_limit: f64) -> Self {
        Self::new(PriorKind::uniform(lower_limit, upper_limit))
    }

    pub fn log_uniform(lower_limit: f64, upper_limit: f64) -> Self {
        Self::new(PriorKind::log_uniform(lower_limit, upper_limit))
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Self {
        Self::new(PriorKind::gaussian(mean, sigma))
    }

    pub fn id(&self) -> PriorId {
        self.id
    }

    pub fn kind(&self) -> &PriorKind {
        &self.kind
    }

    pub fn median(&self) -> f64 {
        self.kind.median()
    }

    pub fn value_for_unit(&self, unit: f64) -> f64 {
        self.kind.value_for_unit(unit)
    }

    pub fn ln_prior(&self, x: f64) -> f64 {
        self.kind.ln_prior(x)
    }
}

impl Default for Prior {
    /// Uniform on `[0, 1]`
    fn default() -> Self {
        Self::new(UniformPrior::default())
    }
}

impl fmt::Display for Prior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

/// Value of a model attribute: either known or a free parameter
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub enum Parameter {
    Fixed(f64),
    Free(Prior),
}

impl Parameter {
    pub fn prior(&self) -> Option<&Prior> {
        match self {
            Self::Fixed(_) => None,
            Self::Free(prior) => Some(prior),
        }
    }

    /// Concrete value, free parameters are looked up in `arguments`
    pub fn value(&self, arguments: &Arguments) -> Result<f64, ModelError> {
        match self {
            Self::Fixed(value) => Ok(*value),
            Self::Free(prior) => arguments.value(prior.id()),
        }
    }

    pub(crate) fn collect_priors<'a>(&'a self, priors: &mut BTreeMap<PriorId, &'a Prior>) {
        if let Self::Free(prior) = self {
            priors.insert(prior.id(), prior);
        }
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

impl From<Prior> for Parameter {
    fn from(prior: Prior) -> Self {
        Self::Free(prior)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => write!(f, "{value:?}"),
            Self::Free(prior) => fmt::Display::fmt(prior, f),
        }
    }
}

/// Concrete values of free parameters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(BTreeMap<PriorId, f64>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PriorId, value: f64) -> Option<f64> {
        self.0.insert(id, value)
    }

    pub fn get(&self, id: PriorId) -> Option<f64> {
        self.0.get(&id).copied()
    }

    /// Fails with [ModelError::MissingArgument] if nothing is given for `id`
    pub fn value(&self, id: PriorId) -> Result<f64, ModelError> {
        self.get(id).ok_or(ModelError::MissingArgument(id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PriorId, f64)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (PriorId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
