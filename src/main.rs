//! Запуск пайплайна подготовки данных

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mlproject::{pipeline, PipelineConfig};

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PipelineConfig::load().context("failed to load pipeline configuration")?;
    let output = pipeline::run(&config).context("data preparation pipeline failed")?;

    tracing::info!(
        train = ?output.transformation.train.dim(),
        test = ?output.transformation.test.dim(),
        "Preprocessor saved at {}",
        output.transformation.preprocessor_path.display()
    );
    Ok(())
}
