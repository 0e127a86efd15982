use crate::error::ModelError;

use ndarray::{Array, Dimension, Ix2};

/// Comparison of modelled and observed data
///
/// This is an unweighted sum of squared residuals: nothing is divided by a variance.
#[derive(Clone, Debug, PartialEq)]
pub struct Fit<D: Dimension = Ix2> {
    model_data: Array<f64, D>,
    observed_data: Array<f64, D>,
}

impl<D: Dimension> Fit<D> {
    /// Fails if the two arrays have different shapes
    pub fn new(
        model_data: Array<f64, D>,
        observed_data: Array<f64, D>,
    ) -> Result<Self, ModelError> {
        if model_data.shape() != observed_data.shape() {
            return Err(ModelError::ShapeMismatch {
                what: "model and observed data",
                first: model_data.shape().to_vec(),
                second: observed_data.shape().to_vec(),
            });
        }
        Ok(Self {
            model_data,
            observed_data,
        })
    }

    pub fn model_data(&self) -> &Array<f64, D> {
        &self.model_data
    }

    pub fn observed_data(&self) -> &Array<f64, D> {
        &self.observed_data
    }

    /// `observed - model`
    pub fn residuals(&self) -> Array<f64, D> {
        &self.observed_data - &self.model_data
    }

    pub fn chi_squared_list(&self) -> Array<f64, D> {
        self.residuals().mapv_into(|x| x * x)
    }

    pub fn chi_squared(&self) -> f64 {
        self.chi_squared_list().sum()
    }
}

/// Fits of several observations taken at different times
#[derive(Clone, Debug, PartialEq)]
pub struct MultiTimeFit<D: Dimension = Ix2> {
    fits: Vec<Fit<D>>,
}

impl<D: Dimension> MultiTimeFit<D> {
    pub fn new(fits: Vec<Fit<D>>) -> Self {
        Self { fits }
    }

    pub fn fits(&self) -> &[Fit<D>] {
        &self.fits
    }

    pub fn push(&mut self, fit: Fit<D>) {
        self.fits.push(fit);
    }

    /// Sum over all fits, zero if there are none
    pub fn chi_squared(&self) -> f64 {
        self.fits.iter().map(Fit::chi_squared).sum()
    }
}

impl<D: Dimension> Default for MultiTimeFit<D> {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl<D: Dimension> FromIterator<Fit<D>> for MultiTimeFit<D> {
    fn from_iter<I: IntoIterator<Item = Fit<D>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
