//! mlproject - подготовка данных для предсказания оценки по математике

pub mod components;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod preprocessing;
pub mod types;
pub mod utils;

pub use config::{FeatureSchema, PipelineConfig};
pub use error::{ErrorKind, PipelineError, Result};
pub use types::Table;

// Re-export для удобства
pub use components::{DataIngestion, DataTransformation};
pub use preprocessing::{build_pipeline, Fit, FittedPreprocessor, Preprocessor, Transform};
