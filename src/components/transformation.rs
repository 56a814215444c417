//! Построение, обучение и применение препроцессора

use std::path::{Path, PathBuf};

use linfa::Dataset;
use ndarray::{concatenate, s, Array1, Array2, Axis, Ix1};

use crate::config::{FeatureSchema, TransformationConfig};
use crate::error::{PipelineError, Result};
use crate::preprocessing::{build_pipeline, Fit, FittedPreprocessor, Transform};
use crate::types::Table;
use crate::utils::{read_csv, save_object};

/// Результат этапа: признаки с целевой колонкой в конце и путь к препроцессору
#[derive(Debug, Clone)]
pub struct TransformationArtifacts {
    pub train: Array2<f64>,
    pub test: Array2<f64>,
    pub preprocessor_path: PathBuf,
}

pub struct DataTransformation {
    config: TransformationConfig,
    schema: FeatureSchema,
}

impl DataTransformation {
    pub fn new(config: TransformationConfig, schema: FeatureSchema) -> Self {
        Self { config, schema }
    }

    pub fn run(
        &self,
        train_path: impl AsRef<Path>,
        test_path: impl AsRef<Path>,
    ) -> Result<TransformationArtifacts> {
        tracing::info!("Entered the data transformation component");

        let train_df = read_csv(train_path)?;
        let test_df = read_csv(test_path)?;
        tracing::info!(
            train_rows = train_df.nrows(),
            test_rows = test_df.nrows(),
            "Read train and test tables"
        );

        let (train_features, train_target) = split_target(&train_df, &self.schema.target)?;
        let (test_features, test_target) = split_target(&test_df, &self.schema.target)?;

        tracing::info!("Obtaining preprocessor object");
        let preprocessor = build_pipeline(&self.schema)?;

        tracing::info!("Applying preprocessor to training and test tables");
        let fitted = preprocessor.fit(&train_features)?;
        let train = append_target(fitted.transform(&train_features)?, train_target)?;
        let test = append_target(fitted.transform(&test_features)?, test_target)?;

        tracing::info!("Saving preprocessor object");
        save_object(&self.config.preprocessor_path, &fitted)?;

        tracing::info!(
            features = fitted.n_features_out(),
            "Data transformation completed"
        );
        Ok(TransformationArtifacts {
            train,
            test,
            preprocessor_path: self.config.preprocessor_path.clone(),
        })
    }
}

/// Признаки (все колонки, кроме целевой) и целевая колонка
pub fn split_target(table: &Table, target: &str) -> Result<(Table, Array1<f64>)> {
    let values = table
        .numeric_column(target)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                PipelineError::data(format!("target '{}' is missing at row {}", target, row))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((table.drop_column(target)?, Array1::from(values)))
}

fn append_target(features: Array2<f64>, target: Array1<f64>) -> Result<Array2<f64>> {
    let target = target.insert_axis(Axis(1));
    concatenate(Axis(1), &[features.view(), target.view()])
        .map_err(|e| PipelineError::data("feature and target row counts differ").with_source(e))
}

/// Матрица (признаки + целевая колонка последней) -> linfa-датасет для обучения моделей
pub fn into_dataset(
    matrix: &Array2<f64>,
    fitted: &FittedPreprocessor,
) -> Result<Dataset<f64, f64, Ix1>> {
    let n_features = fitted.n_features_out();
    if matrix.ncols() != n_features + 1 {
        return Err(PipelineError::data(format!(
            "expected {} columns (features + target), got {}",
            n_features + 1,
            matrix.ncols()
        )));
    }

    let records = matrix.slice(s![.., ..n_features]).to_owned();
    let targets = matrix.column(n_features).to_owned();
    Ok(Dataset::new(records, targets).with_feature_names(fitted.feature_names_out()))
}
