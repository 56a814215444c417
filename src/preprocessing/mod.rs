/// Модуль предобработки данных

pub mod encoder;
pub mod imputer;
pub mod pipeline;
pub mod scaler;

use ndarray::Array2;

use crate::error::Result;
use crate::types::Table;

pub use encoder::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder};
pub use imputer::{FittedImputer, ImputeStrategy, SimpleImputer};
pub use pipeline::{build_pipeline, FittedPreprocessor, Preprocessor};
pub use scaler::{FittedStandardScaler, StandardScaler};

/// Обучение: из конфигурации получается отдельное обученное значение.
/// Повторный вызов создает новый артефакт и не трогает предыдущий.
pub trait Fit {
    type Fitted: Transform;

    fn fit(&self, table: &Table) -> Result<Self::Fitted>;
}

/// Применение обученного состояния; выученные статистики не меняются
pub trait Transform {
    fn transform(&self, table: &Table) -> Result<Array2<f64>>;

    fn n_features_out(&self) -> usize;

    fn feature_names_out(&self) -> Vec<String>;
}
