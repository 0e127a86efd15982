#![doc = include_str!("../README.md")]


mod analysis;
pub use analysis::{Analysis, SingleTimeAnalysis, TimeSeriesAnalysis};

mod data;
pub use data::{
    Data, ObservablePayload, TimeSeriesData, TimeSeriesIter, generate_data,
    generate_data_at_timesteps,
};

mod error;
pub use error::{ModelError, SearchError};

mod fit;
pub use fit::{Fit, MultiTimeFit};

mod lotka_volterra;
pub use lotka_volterra::LotkaVolterraModel;

mod matrix;
pub use matrix::{Matrix, MatrixItem};

mod observable;
pub use observable::{AnyObservable, CompoundObservable, Observable, ObservableTrait};

mod pdf_grid;
pub use pdf_grid::{LOWER_LIMIT, NUMBER_OF_POINTS, PdfGrid, UPPER_LIMIT};

mod phase;
pub use phase::SingleTimePhase;

pub mod prior;
pub use prior::{Arguments, Parameter, Prior, PriorId, PriorKind};

pub mod prior_model;
pub use prior_model::{
    FromSpecies, MatrixPriorModel, ModelId, ModelInstance, ObservablePriorModel, PriorModel,
    SpeciesPriorModel, TimeSeriesModel,
};

mod search;
pub use search::{McmcSearch, SearchResult};

pub mod species;
pub use species::{
    DEFAULT_INTERACTION, Interactions, Species, SpeciesCollection, SpeciesId, SpeciesObservables,
};

pub use ndarray;
