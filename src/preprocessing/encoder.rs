//! One-hot кодирование категориальных признаков

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Поведение при категории, не встреченной при обучении
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Нулевой блок индикаторов
    Ignore,
    /// Ошибка данных
    Error,
}

#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
}

/// Обученный кодировщик: отсортированный словарь категорий для каждой колонки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedOneHotEncoder {
    handle_unknown: HandleUnknown,
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self { handle_unknown }
    }

    pub fn fit(&self, columns: &[Vec<String>]) -> Result<FittedOneHotEncoder> {
        let categories = columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        if categories.iter().any(Vec::is_empty) {
            return Err(PipelineError::data("cannot fit encoder on an empty column"));
        }

        Ok(FittedOneHotEncoder {
            handle_unknown: self.handle_unknown,
            categories,
        })
    }
}

impl FittedOneHotEncoder {
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    pub fn n_features_out(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    /// Кодирование; `n_rows` задает высоту результата и при отсутствии колонок
    pub fn transform(&self, n_rows: usize, columns: &[Vec<String>]) -> Result<Array2<f64>> {
        if columns.len() != self.categories.len() {
            return Err(PipelineError::data(format!(
                "encoder fitted on {} columns, got {}",
                self.categories.len(),
                columns.len()
            )));
        }

        let mut encoded = Array2::zeros((n_rows, self.n_features_out()));
        let mut offset = 0;

        for (col_idx, (column, vocabulary)) in columns.iter().zip(&self.categories).enumerate() {
            if column.len() != n_rows {
                return Err(PipelineError::data(format!(
                    "column {} has {} rows, expected {}",
                    col_idx,
                    column.len(),
                    n_rows
                )));
            }

            for (row, value) in column.iter().enumerate() {
                match vocabulary.binary_search(value) {
                    Ok(pos) => encoded[[row, offset + pos]] = 1.0,
                    Err(_) => {
                        if self.handle_unknown == HandleUnknown::Error {
                            return Err(PipelineError::data(format!(
                                "unknown category '{}' in column {} at row {}",
                                value, col_idx, row
                            )));
                        }
                    }
                }
            }

            offset += vocabulary.len();
        }

        Ok(encoded)
    }
}
