//! Shelf-ordering pipeline: classification, name normalization, sorting,
//! price lookups, and the run configuration that drives them.

pub mod classify;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod price;
pub mod settings;
pub mod sort;

pub use classify::{ClassificationStats, Classifier, classify};
pub use config::{
    BoxSetPolicy, ClassifyPolicy, LpPolicy, NormalizeOptions, OutputOptions, PolicyParseError,
    PriceOptions, RunConfiguration, RunConfigurationBuilder, VariousPolicy,
};
pub use error::ShelfError;
pub use normalize::normalize;
pub use pipeline::{Arrangement, Pipeline, RunEvent, RunOutput, Shelf, arrange};
pub use price::{PriceProgress, PriceSummary, annotate, exceeds_threshold};
pub use sort::sort_items;
