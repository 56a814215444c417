//! Стандартизация признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Порог, ниже которого стандартное отклонение считается нулевым
const MIN_SCALE: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct StandardScaler {
    with_mean: bool,
}

/// Обученный скейлер: среднее и стандартное отклонение по каждому признаку
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedStandardScaler {
    with_mean: bool,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(with_mean: bool) -> Self {
        Self { with_mean }
    }

    pub fn fit(&self, X: &Array2<f64>) -> Result<FittedStandardScaler> {
        if X.nrows() == 0 {
            return Err(PipelineError::data("cannot fit scaler on an empty matrix"));
        }

        let mean = X
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::data("failed to compute column means"))?;
        // Популяционное отклонение (ddof = 0)
        let mut scale = X.std_axis(Axis(0), 0.0);

        // Избегаем деления на ноль
        for val in scale.iter_mut() {
            if *val < MIN_SCALE {
                *val = 1.0;
            }
        }

        Ok(FittedStandardScaler {
            with_mean: self.with_mean,
            mean,
            scale,
        })
    }
}

impl FittedStandardScaler {
    pub fn with_mean(&self) -> bool {
        self.with_mean
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    pub fn n_features(&self) -> usize {
        self.scale.len()
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        if X.ncols() != self.n_features() {
            return Err(PipelineError::data(format!(
                "scaler fitted on {} features, got {}",
                self.n_features(),
                X.ncols()
            )));
        }

        let center = if self.with_mean {
            self.mean.clone()
        } else {
            Array1::zeros(self.n_features())
        };

        let mut scaled = X.clone();
        for mut row in scaled.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - center[i]) / self.scale[i];
            }
        }

        Ok(scaled)
    }
}
