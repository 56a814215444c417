//! Типы данных пайплайна

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Значения ячеек, которые считаются пропусками (набор `na_values` pandas по умолчанию)
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Таблица: строки x именованные колонки с сырыми текстовыми значениями
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            if let Some(prev) = seen.insert(name.as_str(), idx) {
                return Err(PipelineError::data(format!(
                    "duplicate column '{}' at positions {} and {}",
                    name, prev, idx
                )));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(PipelineError::data(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    headers.len()
                )));
            }
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::data(format!("column '{}' not found", name)))
    }

    /// Числовая колонка; пропуски и любое написание NaN -> None, бесконечность - ошибка
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cell = row[idx].trim();
                if is_missing(cell) {
                    return Ok(None);
                }
                match cell.parse::<f64>() {
                    Ok(value) if value.is_nan() => Ok(None),
                    Ok(value) if value.is_finite() => Ok(Some(value)),
                    Ok(_) => Err(PipelineError::data(format!(
                        "column '{}' row {}: '{}' is not a finite number",
                        name, i, cell
                    ))),
                    Err(_) => Err(PipelineError::data(format!(
                        "column '{}' row {}: '{}' is not a number",
                        name, i, cell
                    ))),
                }
            })
            .collect()
    }

    /// Текстовая (категориальная) колонка; пропуски -> None
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let idx = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                let cell = row[idx].trim();
                if is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect())
    }

    /// Новая таблица из строк с указанными индексами (в заданном порядке)
    pub fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        let rows = indices
            .iter()
            .map(|&i| {
                self.rows.get(i).cloned().ok_or_else(|| {
                    PipelineError::data(format!("row index {} out of bounds ({})", i, self.nrows()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            headers: self.headers.clone(),
            rows,
        })
    }

    /// Новая таблица без указанной колонки
    pub fn drop_column(&self, name: &str) -> Result<Self> {
        let idx = self.column_index(name)?;
        let mut headers = self.headers.clone();
        headers.remove(idx);

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.remove(idx);
                row
            })
            .collect();

        Ok(Self { headers, rows })
    }
}
