//! Последовательный запуск этапов: загрузка -> трансформация

use crate::components::{
    DataIngestion, DataTransformation, IngestionArtifacts, TransformationArtifacts,
};
use crate::config::PipelineConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub ingestion: IngestionArtifacts,
    pub transformation: TransformationArtifacts,
}

/// Каждый запуск заново обучает препроцессор и перезаписывает артефакт
pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let ingestion = DataIngestion::new(config.ingestion.clone()).run()?;
    let transformation =
        DataTransformation::new(config.transformation.clone(), config.schema.clone())
            .run(&ingestion.train_path, &ingestion.test_path)?;

    Ok(PipelineOutput {
        ingestion,
        transformation,
    })
}
