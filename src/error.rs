//! Ошибки пайплайна подготовки данных

use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Категория ошибки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Некорректные, пустые или отсутствующие входные данные
    Data,
    /// Некорректная статическая конфигурация (схема, параметры)
    Config,
    /// Ошибки файловой системы
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Data => "Data",
            ErrorKind::Config => "Config",
            ErrorKind::Io => "IO",
        };
        f.write_str(name)
    }
}

/// Единая ошибка: категория, сообщение, место возникновения и исходная причина
#[derive(Debug, Error)]
#[error("{kind} error at {location}: {message}")]
pub struct PipelineError {
    kind: ErrorKind,
    message: String,
    location: &'static Location<'static>,
    #[source]
    source: Option<BoxedCause>,
}

impl PipelineError {
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::caller(),
            source: None,
        }
    }

    #[track_caller]
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Data, message)
    }

    #[track_caller]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    #[track_caller]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn with_source<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Оборачивание сторонних ошибок с контекстом места вызова
pub trait ResultExt<T> {
    fn data_context(self, message: impl Into<String>) -> Result<T>;
    fn config_context(self, message: impl Into<String>) -> Result<T>;
    fn io_context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[track_caller]
    fn data_context(self, message: impl Into<String>) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(cause) => Err(PipelineError::data(message).with_source(cause)),
        }
    }

    #[track_caller]
    fn config_context(self, message: impl Into<String>) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(cause) => Err(PipelineError::config(message).with_source(cause)),
        }
    }

    #[track_caller]
    fn io_context(self, message: impl Into<String>) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(cause) => Err(PipelineError::io(message).with_source(cause)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_kind_location_and_message() {
        let err = PipelineError::data("empty dataset");
        let text = err.to_string();
        assert!(text.starts_with("Data error at "));
        assert!(text.contains("error.rs"));
        assert!(text.ends_with(": empty dataset"));
    }

    #[test]
    fn test_context_wraps_cause() {
        let io_err: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = io_err.io_context("cannot write artifacts/raw.csv").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.message(), "cannot write artifacts/raw.csv");
        assert_eq!(err.source().map(|s| s.to_string()), Some("denied".to_string()));
        assert!(err.location().file().ends_with("error.rs"));
    }

    #[test]
    fn test_ok_passes_through() {
        let ok: std::result::Result<u8, std::io::Error> = Ok(7);
        assert_eq!(ok.data_context("unused").unwrap(), 7);
    }
}
