//! Загрузка исходных данных и разбиение на обучающую и тестовую выборки

use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::IngestionConfig;
use crate::error::{PipelineError, Result, ResultExt};
use crate::types::Table;
use crate::utils::{read_csv, write_csv};

/// Пути к файлам, записанным этапом загрузки
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionArtifacts {
    pub raw_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

pub struct DataIngestion {
    config: IngestionConfig,
}

impl DataIngestion {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<IngestionArtifacts> {
        tracing::info!("Entered the data ingestion component");
        self.config.validate()?;

        let table = read_csv(&self.config.source_path)?;
        tracing::info!(
            rows = table.nrows(),
            columns = table.ncols(),
            "Read the dataset from {}",
            self.config.source_path.display()
        );

        fs::create_dir_all(&self.config.artifacts_dir).io_context(format!(
            "cannot create artifacts directory {}",
            self.config.artifacts_dir.display()
        ))?;

        let artifacts = IngestionArtifacts {
            raw_path: self.config.raw_path(),
            train_path: self.config.train_path(),
            test_path: self.config.test_path(),
        };
        write_csv(&table, &artifacts.raw_path)?;

        tracing::info!("Train test split initiated");
        let (train, test) = train_test_split(&table, self.config.test_size, self.config.seed)?;
        write_csv(&train, &artifacts.train_path)?;
        write_csv(&test, &artifacts.test_path)?;

        tracing::info!(
            train_rows = train.nrows(),
            test_rows = test.nrows(),
            "Ingestion of the data is completed"
        );
        Ok(artifacts)
    }
}

/// Индексы строк (train, test) для случайного разбиения с фиксированным зерном
pub fn split_indices(
    n_rows: usize,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::config(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_rows as f64).ceil() as usize;
    let n_train = n_rows.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PipelineError::data(format!(
            "cannot split {} rows with test_size {}: a partition would be empty",
            n_rows, test_size
        )));
    }

    let mut permutation: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    Ok((train, permutation))
}

/// Разбиение таблицы на (train, test)
pub fn train_test_split(table: &Table, test_size: f64, seed: u64) -> Result<(Table, Table)> {
    let (train_idx, test_idx) = split_indices(table.nrows(), test_size, seed)?;
    Ok((table.take_rows(&train_idx)?, table.take_rows(&test_idx)?))
}
