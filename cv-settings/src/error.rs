use crate::catalog::ParameterType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown parameter \"{0}\"")]
    UnknownKey(String),
    #[error("parameter \"{key}\" is declared as {expected} but was given a {found} value")]
    TypeMismatch {
        key: String,
        expected: ParameterType,
        found: ParameterType,
    },
    #[error("\"{text}\" is not a valid {expected} value for parameter \"{key}\"")]
    InvalidValue {
        key: String,
        expected: ParameterType,
        text: String,
    },
    #[error("no {stage} is selected by the strategy code \"{code}\"")]
    NoStrategySelected { stage: &'static str, code: String },
    #[error("unable to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
