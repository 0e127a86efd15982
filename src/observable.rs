use crate::error::ModelError;
use crate::pdf_grid::PdfGrid;

use enum_dispatch::enum_dispatch;
use ndarray::{Array1, Array2, Axis};
use ordered_float::OrderedFloat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::hash::{Hash, Hasher};
use std::ops::Add;

#[enum_dispatch]
pub trait ObservableTrait {
    /// Point density function evaluated at `number_points` evenly spaced points between the two
    /// limits, both included
    ///
    /// The result is a column: one row per point and one column for the single feature
    /// dimension, so that several properties could be stacked side by side.
    fn pdf(&self, lower_limit: f64, upper_limit: f64, number_points: usize) -> Array2<f64>;

    /// [ObservableTrait::pdf] over a [PdfGrid]
    fn pdf_on_grid(&self, grid: &PdfGrid) -> Array2<f64> {
        self.pdf(grid.lower_limit, grid.upper_limit, grid.number_of_points)
    }
}

/// An observable feature of one species, distributed as a Gaussian
///
/// `deviation` must be positive, densities are meaningless otherwise. Equality and hashing are
/// by value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema)]
pub struct Observable {
    pub mean: f64,
    pub deviation: f64,
}

impl Observable {
    pub fn new(mean: f64, deviation: f64) -> Self {
        Self { mean, deviation }
    }

    /// Gaussian density at a single point
    pub fn density(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.deviation;
        f64::exp(-0.5 * z * z) / (self.deviation * TAU.sqrt())
    }
}

impl ObservableTrait for Observable {
    fn pdf(&self, lower_limit: f64, upper_limit: f64, number_points: usize) -> Array2<f64> {
        Array1::linspace(lower_limit, upper_limit, number_points)
            .mapv_into(|x| self.density(x))
            .insert_axis(Axis(1))
    }
}

impl PartialEq for Observable {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.mean) == OrderedFloat(other.mean)
            && OrderedFloat(self.deviation) == OrderedFloat(other.deviation)
    }
}

impl Eq for Observable {}

impl Hash for Observable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.mean).hash(state);
        OrderedFloat(self.deviation).hash(state);
    }
}

impl Add for Observable {
    type Output = CompoundObservable;

    fn add(self, other: Self) -> Self::Output {
        CompoundObservable {
            abundances: vec![1.0, 1.0],
            observables: vec![self, other],
        }
    }
}

/// Abundance-weighted sum of observables of several species
///
/// Weights are used as given, they are not required to sum to unity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(
    into = "CompoundObservableParameters",
    try_from = "CompoundObservableParameters"
)]
pub struct CompoundObservable {
    abundances: Vec<f64>,
    observables: Vec<Observable>,
}

impl CompoundObservable {
    /// Fails if `abundances` and `observables` have different lengths
    pub fn new(abundances: Vec<f64>, observables: Vec<Observable>) -> Result<Self, ModelError> {
        ModelError::check_lengths(
            "abundances and observables",
            abundances.len(),
            observables.len(),
        )?;
        Ok(Self {
            abundances,
            observables,
        })
    }

    pub fn abundances(&self) -> &[f64] {
        &self.abundances
    }

    pub fn observables(&self) -> &[Observable] {
        &self.observables
    }
}

impl FromIterator<(f64, Observable)> for CompoundObservable {
    fn from_iter<I: IntoIterator<Item = (f64, Observable)>>(iter: I) -> Self {
        let (abundances, observables) = iter.into_iter().unzip();
        Self {
            abundances,
            observables,
        }
    }
}

impl ObservableTrait for CompoundObservable {
    fn pdf(&self, lower_limit: f64, upper_limit: f64, number_points: usize) -> Array2<f64> {
        self.abundances.iter().zip(self.observables.iter()).fold(
            Array2::zeros((number_points, 1)),
            |mut acc, (&abundance, observable)| {
                acc.scaled_add(
                    abundance,
                    &observable.pdf(lower_limit, upper_limit, number_points),
                );
                acc
            },
        )
    }
}

impl JsonSchema for CompoundObservable {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        CompoundObservableParameters::schema_name()
    }

    fn json_schema(r#gen: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        CompoundObservableParameters::json_schema(r#gen)
    }
}

#[derive(Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "CompoundObservable")]
struct CompoundObservableParameters {
    abundances: Vec<f64>,
    observables: Vec<Observable>,
}

impl From<CompoundObservable> for CompoundObservableParameters {
    fn from(value: CompoundObservable) -> Self {
        Self {
            abundances: value.abundances,
            observables: value.observables,
        }
    }
}

impl TryFrom<CompoundObservableParameters> for CompoundObservable {
    type Error = ModelError;

    fn try_from(value: CompoundObservableParameters) -> Result<Self, Self::Error> {
        Self::new(value.abundances, value.observables)
    }
}

#[enum_dispatch(ObservableTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub enum AnyObservable {
    Observable(Observable),
    Compound(CompoundObservable),
}

#[cfg(test)]
#[allow(clippy::excessive_precision)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::collections::HashSet;

    #[test]
    fn gaussian_pdf() {
        let observable = Observable::new(1.0, 0.5);
        let pdf = observable.pdf(0.0, 2.0, 3);
        assert_eq!(pdf.shape(), &[3, 1]);
        assert_abs_diff_eq!(
            pdf,
            array![[0.10798193], [0.79788456], [0.10798193]],
            epsilon = 1e-8
        );
    }

    #[test]
    fn pdf_on_grid() {
        let observable = Observable::new(3.0, 2.0);
        let grid = PdfGrid::new(0.0, 20.0, 40);
        assert_eq!(observable.pdf_on_grid(&grid), observable.pdf(0.0, 20.0, 40));
    }

    #[test]
    fn compound_is_sum() {
        let a = Observable::new(3.0, 2.0);
        let b = Observable::new(15.0, 4.0);
        let compound = CompoundObservable::new(vec![1.0, 1.0], vec![a, b]).unwrap();
        for (lower, upper, n) in [(0.0, 20.0, 400), (-2.0, 2.0, 40), (5.0, 5.0, 1)] {
            assert_eq!(
                compound.pdf(lower, upper, n),
                a.pdf(lower, upper, n) + b.pdf(lower, upper, n)
            );
        }
    }

    #[test]
    fn compound_is_not_normalised() {
        let a = Observable::new(1.0, 0.5);
        let compound = CompoundObservable::new(vec![3.0], vec![a]).unwrap();
        assert_abs_diff_eq!(
            compound.pdf(0.0, 2.0, 3),
            3.0 * a.pdf(0.0, 2.0, 3),
            epsilon = 1e-15
        );
    }

    #[test]
    fn add_operator() {
        let a = Observable::new(13.0, 2.0);
        let b = Observable::new(7.0, 1.0);
        let compound = a + b;
        assert_eq!(compound.abundances(), &[1.0, 1.0]);
        assert_eq!(compound.observables(), &[a, b]);
    }

    #[test]
    fn length_mismatch() {
        let a = Observable::new(1.0, 1.0);
        for (n_abundances, n_observables) in [(0, 1), (1, 0), (0, 3), (3, 0), (2, 3), (3, 2)] {
            let result = CompoundObservable::new(vec![1.0; n_abundances], vec![a; n_observables]);
            assert_eq!(
                result,
                Err(ModelError::LengthMismatch {
                    what: "abundances and observables",
                    first: n_abundances,
                    second: n_observables,
                })
            );
        }
    }

    check_serde!(
        compound_serde,
        CompoundObservable,
        Observable::new(3.0, 2.0) + Observable::new(15.0, 4.0)
    );

    #[test]
    fn deserialize_checks_lengths() {
        let json = r#"{"abundances":[1.0],"observables":[]}"#;
        assert!(serde_json::from_str::<CompoundObservable>(json).is_err());
    }

    #[test]
    fn collect_pairs() {
        let a = Observable::new(1.0, 1.0);
        let b = Observable::new(2.0, 1.0);
        let compound: CompoundObservable = [(0.5, a), (2.0, b)].into_iter().collect();
        assert_eq!(compound.abundances(), &[0.5, 2.0]);
        assert_eq!(compound.observables(), &[a, b]);
    }

    #[test]
    fn empty_compound_is_zero() {
        let compound = CompoundObservable::new(vec![], vec![]).unwrap();
        assert_eq!(compound.pdf(0.0, 1.0, 5), Array2::<f64>::zeros((5, 1)));
    }

    #[test]
    fn value_equality() {
        let mut set = HashSet::new();
        set.insert(Observable::new(1.0, 2.0));
        set.insert(Observable::new(1.0, 2.0));
        set.insert(Observable::new(2.0, 1.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn dispatch() {
        let a = Observable::new(1.0, 0.5);
        let any: AnyObservable = (a + a).into();
        assert_abs_diff_eq!(
            any.pdf(0.0, 2.0, 3),
            2.0 * a.pdf(0.0, 2.0, 3),
            epsilon = 1e-15
        );
    }
}
