use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lower limit of the density grid used for datasets and analyses
pub const LOWER_LIMIT: f64 = 0.0;
/// Upper limit of the density grid used for datasets and analyses
pub const UPPER_LIMIT: f64 = 20.0;
/// Number of grid points the densities are evaluated at
pub const NUMBER_OF_POINTS: usize = 400;

/// Discretisation of the feature axis that observable densities are evaluated on
///
/// Points are evenly spaced over `[lower_limit, upper_limit]`, both ends included.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PdfGrid {
    pub lower_limit: f64,
    pub upper_limit: f64,
    pub number_of_points: usize,
}

impl PdfGrid {
    pub fn new(lower_limit: f64, upper_limit: f64, number_of_points: usize) -> Self {
        assert!(
            lower_limit <= upper_limit,
            "lower_limit must not exceed upper_limit"
        );
        Self {
            lower_limit,
            upper_limit,
            number_of_points,
        }
    }

    #[inline]
    pub fn default_lower_limit() -> f64 {
        LOWER_LIMIT
    }

    #[inline]
    pub fn default_upper_limit() -> f64 {
        UPPER_LIMIT
    }

    #[inline]
    pub fn default_number_of_points() -> usize {
        NUMBER_OF_POINTS
    }
}

impl Default for PdfGrid {
    fn default() -> Self {
        Self::new(
            Self::default_lower_limit(),
            Self::default_upper_limit(),
            Self::default_number_of_points(),
        )
    }
}
