//! Составной препроцессор: числовая и категориальная группы колонок

use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::config::FeatureSchema;
use crate::error::{PipelineError, Result};
use crate::types::Table;

use super::encoder::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder};
use super::imputer::{FittedImputer, ImputeStrategy, SimpleImputer};
use super::scaler::{FittedStandardScaler, StandardScaler};
use super::{Fit, Transform};

/// Медиана -> стандартизация
#[derive(Debug, Clone)]
pub struct NumericPipeline {
    columns: Vec<String>,
    imputer: SimpleImputer,
    scaler: StandardScaler,
}

/// Самое частое значение -> one-hot -> масштабирование без центрирования
#[derive(Debug, Clone)]
pub struct CategoricalPipeline {
    columns: Vec<String>,
    imputer: SimpleImputer,
    encoder: OneHotEncoder,
    scaler: StandardScaler,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedNumericPipeline {
    columns: Vec<String>,
    imputer: FittedImputer<f64>,
    scaler: FittedStandardScaler,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedCategoricalPipeline {
    columns: Vec<String>,
    imputer: FittedImputer<String>,
    encoder: FittedOneHotEncoder,
    scaler: FittedStandardScaler,
}

/// Необученный препроцессор (только конфигурация)
#[derive(Debug, Clone)]
pub struct Preprocessor {
    schema: FeatureSchema,
    numeric: NumericPipeline,
    categorical: CategoricalPipeline,
}

/// Обученный препроцессор - единица сериализации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    schema: FeatureSchema,
    numeric: FittedNumericPipeline,
    categorical: FittedCategoricalPipeline,
}

/// Построить необученный препроцессор по схеме признаков
pub fn build_pipeline(schema: &FeatureSchema) -> Result<Preprocessor> {
    schema.validate()?;

    let numeric = NumericPipeline {
        columns: schema.numerical.clone(),
        imputer: SimpleImputer::new(ImputeStrategy::Median),
        scaler: StandardScaler::new(true),
    };
    let categorical = CategoricalPipeline {
        columns: schema.categorical.clone(),
        imputer: SimpleImputer::new(ImputeStrategy::MostFrequent),
        encoder: OneHotEncoder::new(HandleUnknown::Ignore),
        scaler: StandardScaler::new(false),
    };
    tracing::debug!(
        numeric = numeric.columns.len(),
        categorical = categorical.columns.len(),
        "Numerical and categorical pipelines created"
    );

    Ok(Preprocessor {
        schema: schema.clone(),
        numeric,
        categorical,
    })
}

fn numeric_columns(table: &Table, names: &[String]) -> Result<Vec<Vec<Option<f64>>>> {
    names.iter().map(|name| table.numeric_column(name)).collect()
}

fn text_columns(table: &Table, names: &[String]) -> Result<Vec<Vec<Option<String>>>> {
    names.iter().map(|name| table.text_column(name)).collect()
}

fn to_matrix(n_rows: usize, columns: &[Vec<f64>]) -> Array2<f64> {
    Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| columns[j][i])
}

impl Fit for NumericPipeline {
    type Fitted = FittedNumericPipeline;

    fn fit(&self, table: &Table) -> Result<FittedNumericPipeline> {
        let raw = numeric_columns(table, &self.columns)?;
        let imputer = self.imputer.fit_numeric(&self.columns, &raw)?;
        let imputed = to_matrix(table.nrows(), &imputer.transform(&raw)?);
        let scaler = self.scaler.fit(&imputed)?;

        Ok(FittedNumericPipeline {
            columns: self.columns.clone(),
            imputer,
            scaler,
        })
    }
}

impl Transform for FittedNumericPipeline {
    fn transform(&self, table: &Table) -> Result<Array2<f64>> {
        let raw = numeric_columns(table, &self.columns)?;
        let imputed = to_matrix(table.nrows(), &self.imputer.transform(&raw)?);
        self.scaler.transform(&imputed)
    }

    fn n_features_out(&self) -> usize {
        self.columns.len()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns.iter().map(|c| format!("num__{}", c)).collect()
    }
}

impl FittedNumericPipeline {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn imputer(&self) -> &FittedImputer<f64> {
        &self.imputer
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }
}

impl Fit for CategoricalPipeline {
    type Fitted = FittedCategoricalPipeline;

    fn fit(&self, table: &Table) -> Result<FittedCategoricalPipeline> {
        let raw = text_columns(table, &self.columns)?;
        let imputer = self.imputer.fit_text(&self.columns, &raw)?;
        let imputed = imputer.transform(&raw)?;
        let encoder = self.encoder.fit(&imputed)?;
        let encoded = encoder.transform(table.nrows(), &imputed)?;
        let scaler = self.scaler.fit(&encoded)?;

        Ok(FittedCategoricalPipeline {
            columns: self.columns.clone(),
            imputer,
            encoder,
            scaler,
        })
    }
}

impl Transform for FittedCategoricalPipeline {
    fn transform(&self, table: &Table) -> Result<Array2<f64>> {
        let raw = text_columns(table, &self.columns)?;
        let imputed = self.imputer.transform(&raw)?;
        let encoded = self.encoder.transform(table.nrows(), &imputed)?;
        self.scaler.transform(&encoded)
    }

    fn n_features_out(&self) -> usize {
        self.encoder.n_features_out()
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns
            .iter()
            .zip(self.encoder.categories())
            .flat_map(|(column, vocabulary)| {
                vocabulary
                    .iter()
                    .map(move |category| format!("cat__{}_{}", column, category))
            })
            .collect()
    }
}

impl FittedCategoricalPipeline {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn imputer(&self) -> &FittedImputer<String> {
        &self.imputer
    }

    pub fn encoder(&self) -> &FittedOneHotEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }
}

impl Preprocessor {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }
}

impl Fit for Preprocessor {
    type Fitted = FittedPreprocessor;

    /// Обучение только на признаках обучающей выборки
    fn fit(&self, features: &Table) -> Result<FittedPreprocessor> {
        if features.is_empty() {
            return Err(PipelineError::data("cannot fit preprocessor on an empty table"));
        }

        let numeric = self.numeric.fit(features)?;
        let categorical = self.categorical.fit(features)?;
        tracing::debug!(
            n_features_out = numeric.n_features_out() + categorical.n_features_out(),
            "Preprocessor fitted"
        );

        Ok(FittedPreprocessor {
            schema: self.schema.clone(),
            numeric,
            categorical,
        })
    }
}

impl FittedPreprocessor {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn numeric(&self) -> &FittedNumericPipeline {
        &self.numeric
    }

    pub fn categorical(&self) -> &FittedCategoricalPipeline {
        &self.categorical
    }
}

impl Transform for FittedPreprocessor {
    /// Числовая группа, затем категориальная; остальные колонки отбрасываются
    fn transform(&self, features: &Table) -> Result<Array2<f64>> {
        let numeric = self.numeric.transform(features)?;
        let categorical = self.categorical.transform(features)?;
        concatenate(Axis(1), &[numeric.view(), categorical.view()]).map_err(|e| {
            PipelineError::data("cannot concatenate column groups").with_source(e)
        })
    }

    fn n_features_out(&self) -> usize {
        self.numeric.n_features_out() + self.categorical.n_features_out()
    }

    fn feature_names_out(&self) -> Vec<String> {
        let mut names = self.numeric.feature_names_out();
        names.extend(self.categorical.feature_names_out());
        names
    }
}
