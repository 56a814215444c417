//! Конфигурация пайплайна: пути, параметры разбиения и схема признаков

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result, ResultExt};

/// Переменная окружения с путем к JSON-конфигурации
pub const CONFIG_ENV_VAR: &str = "MLPROJECT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub transformation: TransformationConfig,
    #[serde(default)]
    pub schema: FeatureSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationConfig {
    #[serde(default = "default_preprocessor_path")]
    pub preprocessor_path: PathBuf,
}

/// Разбиение входных колонок на числовые, категориальные и целевую
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    #[serde(default = "default_numerical")]
    pub numerical: Vec<String>,
    #[serde(default = "default_categorical")]
    pub categorical: Vec<String>,
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_source_path() -> PathBuf { PathBuf::from("notebook/data/stud.csv") }
fn default_artifacts_dir() -> PathBuf { PathBuf::from("artifacts") }
fn default_test_size() -> f64 { 0.2 }
fn default_seed() -> u64 { 42 }
fn default_preprocessor_path() -> PathBuf { PathBuf::from("artifacts/preprocessor.json") }

fn default_numerical() -> Vec<String> {
    vec!["writing_score".to_string(), "reading_score".to_string()]
}

fn default_categorical() -> Vec<String> {
    [
        "gender",
        "race_ethnicity",
        "parental_level_of_education",
        "lunch",
        "test_preparation_course",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_target() -> String { "math_score".to_string() }

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            artifacts_dir: default_artifacts_dir(),
            test_size: default_test_size(),
            seed: default_seed(),
        }
    }
}

impl IngestionConfig {
    pub fn raw_path(&self) -> PathBuf {
        self.artifacts_dir.join("raw.csv")
    }

    pub fn train_path(&self) -> PathBuf {
        self.artifacts_dir.join("train.csv")
    }

    pub fn test_path(&self) -> PathBuf {
        self.artifacts_dir.join("test.csv")
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PipelineError::config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            preprocessor_path: default_preprocessor_path(),
        }
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            numerical: default_numerical(),
            categorical: default_categorical(),
            target: default_target(),
        }
    }
}

impl FeatureSchema {
    /// Все признаковые колонки: сначала числовые, затем категориальные
    pub fn feature_columns(&self) -> impl Iterator<Item = &str> {
        self.numerical
            .iter()
            .chain(self.categorical.iter())
            .map(String::as_str)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(PipelineError::config("target column name is empty"));
        }
        if self.numerical.is_empty() && self.categorical.is_empty() {
            return Err(PipelineError::config("schema declares no feature columns"));
        }

        let mut seen = HashSet::new();
        for name in self.feature_columns() {
            if name.trim().is_empty() {
                return Err(PipelineError::config("feature column name is empty"));
            }
            if name == self.target {
                return Err(PipelineError::config(format!(
                    "target column '{}' is also declared as a feature",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(PipelineError::config(format!(
                    "column '{}' is declared more than once",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl PipelineConfig {
    /// Загрузка из файла, указанного в `MLPROJECT_CONFIG`, иначе значения по умолчанию
    pub fn load() -> Result<Self> {
        let config = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .io_context(format!("cannot read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .config_context(format!("invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.ingestion.validate()?;
        self.schema.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_schema_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schema.feature_columns().count(), 7);
        assert_eq!(config.ingestion.train_path(), PathBuf::from("artifacts/train.csv"));
    }

    #[test]
    fn test_empty_column_name_rejected() {
        let mut schema = FeatureSchema::default();
        schema.categorical.push("  ".to_string());
        let err = schema.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_duplicate_and_target_overlap_rejected() {
        let mut schema = FeatureSchema::default();
        schema.categorical.push("writing_score".to_string());
        assert!(schema.validate().is_err());

        let mut schema = FeatureSchema::default();
        schema.numerical.push("math_score".to_string());
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_test_size_bounds() {
        let mut config = IngestionConfig::default();
        config.test_size = 1.0;
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
        config.test_size = 0.25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"ingestion": {"seed": 7}}"#).unwrap();
        assert_eq!(config.ingestion.seed, 7);
        assert!((config.ingestion.test_size - 0.2).abs() < 1e-12);
        assert_eq!(config.schema, FeatureSchema::default());
    }

    #[test]
    fn test_from_file_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = PipelineConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let missing = PipelineConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::Io);
    }
}
