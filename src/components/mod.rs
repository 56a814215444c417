/// Этапы пайплайна

pub mod ingestion;
pub mod transformation;

pub use ingestion::{train_test_split, DataIngestion, IngestionArtifacts};
pub use transformation::{into_dataset, DataTransformation, TransformationArtifacts};
