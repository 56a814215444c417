//! Заполнение пропусков

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Медиана наблюдаемых значений (только числовые колонки)
    Median,
    /// Самое частое значение; при равенстве - наименьшее
    MostFrequent,
}

#[derive(Debug, Clone)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
}

/// Обученный импьютер: по одному значению заполнения на колонку
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedImputer<T> {
    fill_values: Vec<T>,
}

impl SimpleImputer {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self { strategy }
    }

    pub fn fit_numeric(
        &self,
        names: &[String],
        columns: &[Vec<Option<f64>>],
    ) -> Result<FittedImputer<f64>> {
        let fill_values = names
            .iter()
            .zip(columns)
            .map(|(name, column)| {
                let observed: Vec<f64> = column.iter().flatten().copied().collect();
                let value = match self.strategy {
                    ImputeStrategy::Median => median(observed),
                    ImputeStrategy::MostFrequent => most_frequent(observed, f64::total_cmp),
                };
                value.ok_or_else(|| no_observed_values(name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FittedImputer { fill_values })
    }

    pub fn fit_text(
        &self,
        names: &[String],
        columns: &[Vec<Option<String>>],
    ) -> Result<FittedImputer<String>> {
        if self.strategy == ImputeStrategy::Median {
            return Err(PipelineError::config(
                "median imputation is not defined for categorical columns",
            ));
        }

        let fill_values = names
            .iter()
            .zip(columns)
            .map(|(name, column)| {
                let observed: Vec<String> = column.iter().flatten().cloned().collect();
                most_frequent(observed, Ord::cmp).ok_or_else(|| no_observed_values(name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FittedImputer { fill_values })
    }
}

impl<T: Clone> FittedImputer<T> {
    pub fn fill_values(&self) -> &[T] {
        &self.fill_values
    }

    pub fn transform(&self, columns: &[Vec<Option<T>>]) -> Result<Vec<Vec<T>>> {
        if columns.len() != self.fill_values.len() {
            return Err(PipelineError::data(format!(
                "imputer fitted on {} columns, got {}",
                self.fill_values.len(),
                columns.len()
            )));
        }

        Ok(columns
            .iter()
            .zip(&self.fill_values)
            .map(|(column, fill)| {
                column
                    .iter()
                    .map(|value| value.clone().unwrap_or_else(|| fill.clone()))
                    .collect()
            })
            .collect())
    }
}

fn no_observed_values(name: &str) -> PipelineError {
    PipelineError::data(format!(
        "column '{}' has no observed values to impute from",
        name
    ))
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn most_frequent<T, F>(mut values: Vec<T>, cmp: F) -> Option<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    values.sort_by(&cmp);

    let mut best: Option<(usize, usize)> = None; // (start, count)
    let mut start = 0;
    while start < values.len() {
        let mut end = start + 1;
        while end < values.len() && cmp(&values[start], &values[end]) == Ordering::Equal {
            end += 1;
        }
        let count = end - start;
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((start, count));
        }
        start = end;
    }

    best.map(|(idx, _)| values.swap_remove(idx))
}
