use crate::error::ModelError;
use crate::observable::{AnyObservable, CompoundObservable, Observable, ObservableTrait};
use crate::pdf_grid::PdfGrid;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

mod generate;
pub use generate::{generate_data, generate_data_at_timesteps};

mod time_series_data;
pub use time_series_data::{TimeSeriesData, TimeSeriesIter};

/// What a [Data] holds for one observable name
///
/// Generated data keeps the observables themselves, observed data is a density column already.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ObservablePayload {
    Observable(Observable),
    Compound(CompoundObservable),
    Array(Array2<f64>),
}

impl ObservablePayload {
    /// Density column on `grid`, raw arrays are returned as they are
    pub fn pdf(&self, grid: &PdfGrid) -> Array2<f64> {
        match self {
            Self::Observable(observable) => observable.pdf_on_grid(grid),
            Self::Compound(compound) => compound.pdf_on_grid(grid),
            Self::Array(array) => array.clone(),
        }
    }
}

impl From<Observable> for ObservablePayload {
    fn from(value: Observable) -> Self {
        Self::Observable(value)
    }
}

impl From<CompoundObservable> for ObservablePayload {
    fn from(value: CompoundObservable) -> Self {
        Self::Compound(value)
    }
}

impl From<AnyObservable> for ObservablePayload {
    fn from(value: AnyObservable) -> Self {
        match value {
            AnyObservable::Observable(observable) => observable.into(),
            AnyObservable::Compound(compound) => compound.into(),
        }
    }
}

impl From<Array2<f64>> for ObservablePayload {
    fn from(value: Array2<f64>) -> Self {
        Self::Array(value)
    }
}

/// Named observations taken at a single point in time
///
/// Lookups by name always give a density column computed on the data grid.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Data {
    observables: BTreeMap<String, ObservablePayload>,
    grid: PdfGrid,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(grid: PdfGrid) -> Self {
        Self {
            observables: BTreeMap::new(),
            grid,
        }
    }

    pub fn grid(&self) -> &PdfGrid {
        &self.grid
    }

    /// Returns the payload previously stored under `name`
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        payload: impl Into<ObservablePayload>,
    ) -> Option<ObservablePayload> {
        self.observables.insert(name.into(), payload.into())
    }

    pub fn get(&self, name: &str) -> Option<&ObservablePayload> {
        self.observables.get(name)
    }

    pub fn observable_names(&self) -> BTreeSet<&str> {
        self.observables.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.observables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObservablePayload)> {
        self.observables
            .iter()
            .map(|(name, payload)| (name.as_str(), payload))
    }

    /// Density column of the observable `name`
    pub fn pdf(&self, name: &str) -> Result<Array2<f64>, ModelError> {
        self.get(name)
            .map(|payload| payload.pdf(&self.grid))
            .ok_or_else(|| ModelError::MissingObservable(name.to_owned()))
    }

    /// Same data with every payload replaced by its density column
    pub fn into_pdfs(self) -> Self {
        let grid = self.grid;
        let observables = self
            .observables
            .into_iter()
            .map(|(name, payload)| {
                let pdf = payload.pdf(&grid);
                (name, ObservablePayload::Array(pdf))
            })
            .collect();
        Self { observables, grid }
    }
}

impl<S: Into<String>, P: Into<ObservablePayload>> FromIterator<(S, P)> for Data {
    fn from_iter<I: IntoIterator<Item = (S, P)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (name, payload) in iter {
            data.insert(name, payload);
        }
        data
    }
}
