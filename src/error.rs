#[cfg(feature = "python")]
use pyo3::exceptions::PyRuntimeError;
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),
}

impl SynthError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SynthError::Config(msg.into())
    }
}

#[cfg(feature = "python")]
impl From<SynthError> for PyErr {
    fn from(err: SynthError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
