use crate::prior::PriorId;

/// Error returned from model construction and evaluation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{what}: lengths {first} and {second} do not match")]
    LengthMismatch {
        what: &'static str,
        first: usize,
        second: usize,
    },

    #[error("{what}: shapes {first:?} and {second:?} do not match")]
    ShapeMismatch {
        what: &'static str,
        first: Vec<usize>,
        second: Vec<usize>,
    },

    #[error("observable {0:?} is not defined")]
    MissingObservable(String),

    #[error("no argument given for prior {0}")]
    MissingArgument(PriorId),

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("invalid prior: {0}")]
    InvalidPrior(&'static str),
}

impl ModelError {
    /// Fails with [ModelError::LengthMismatch] unless `first == second`
    pub fn check_lengths(what: &'static str, first: usize, second: usize) -> Result<(), Self> {
        if first == second {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                what,
                first,
                second,
            })
        }
    }
}

/// Error returned from [crate::McmcSearch]
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("ensemble sampler failed: {0}")]
    Sampler(String),

    #[error("no walker reached a finite log-probability")]
    NoFiniteProbability,
}
