//! Error types for loading artifacts and running predictions.

use std::path::PathBuf;

use thiserror::Error;
use warta_types::{ClassifierKind, FeatureError};

/// Failure to load a trained artifact or the stemmer dictionary.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("{} holds a `{found}` model, expected `{expected}`", path.display())]
    KindMismatch {
        path: PathBuf,
        expected: ClassifierKind,
        found: ClassifierKind,
    },

    #[error("{kind} model expects {found} features but the vectorizer produces {expected}")]
    IncompatibleFeatureSpace {
        kind: ClassifierKind,
        expected: usize,
        found: usize,
    },

    #[error("cannot read root dictionary {}: {source}", path.display())]
    Dictionary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural problem inside a deserialized artifact.
///
/// Raised by the per-model `validate` functions and turned into
/// [`LoadError::Invalid`] once the file path is known.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvalidArtifact(pub String);

impl InvalidArtifact {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<FeatureError> for InvalidArtifact {
    fn from(err: FeatureError) -> Self {
        Self(err.to_string())
    }
}

impl From<TransformError> for InvalidArtifact {
    fn from(err: TransformError) -> Self {
        Self(err.to_string())
    }
}

/// Failure to set up the vectorizer's tokenization.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),

    #[error("token pattern has {0} capture groups, at most one is allowed")]
    CaptureGroups(usize),
}

/// Failure while predicting a label for a feature row.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("feature row has {found} columns, model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
