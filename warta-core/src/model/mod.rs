//! Pretrained models.
//!
//! Every model is read from a JSON export of a fitted estimator. The export
//! is deserialized into a plain `*Artifact` struct first, then checked and
//! converted into the runtime model with `TryFrom`, so a structurally broken
//! file is rejected before any prediction runs.

pub mod forest;
pub mod knn;
pub mod svm;
pub mod vectorizer;

use serde::Deserialize;
use warta_types::{ClassifierKind, FeatureError, FeatureVector, Label};

use crate::error::{InvalidArtifact, PredictError};

pub use forest::{RandomForestArtifact, RandomForestClassifier};
pub use knn::{KnnArtifact, KnnClassifier, Weights};
pub use svm::{Kernel, SvcArtifact, SvcClassifier};
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerArtifact};

/// A fitted classifier mapping one feature row to one label.
pub trait Classifier: std::fmt::Debug {
    fn kind(&self) -> ClassifierKind;

    /// Width of the feature rows the model was fitted on.
    fn n_features(&self) -> usize;

    /// Class labels, indexed by class id.
    fn classes(&self) -> &[Label];

    /// Predicts the label of `x`.
    ///
    /// # Errors
    /// [`PredictError::DimensionMismatch`] when `x.dim()` differs from
    /// [`Classifier::n_features`].
    fn predict(&self, x: &FeatureVector) -> Result<Label, PredictError>;
}

/// Any classifier export, discriminated by its `kind` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Knn(KnnArtifact),
    Svc(SvcArtifact),
    RandomForest(RandomForestArtifact),
}

impl ClassifierArtifact {
    pub fn kind(&self) -> ClassifierKind {
        match self {
            ClassifierArtifact::Knn(_) => ClassifierKind::Knn,
            ClassifierArtifact::Svc(_) => ClassifierKind::Svm,
            ClassifierArtifact::RandomForest(_) => ClassifierKind::RandomForest,
        }
    }

    /// Validates the export and builds the runtime model.
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, InvalidArtifact> {
        Ok(match self {
            ClassifierArtifact::Knn(a) => Box::new(KnnClassifier::try_from(a)?),
            ClassifierArtifact::Svc(a) => Box::new(SvcClassifier::try_from(a)?),
            ClassifierArtifact::RandomForest(a) => Box::new(RandomForestClassifier::try_from(a)?),
        })
    }
}

/// One stored feature row, either sparse or dense.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Row {
    Sparse { indices: Vec<u32>, values: Vec<f64> },
    Dense(Vec<f64>),
}

impl Row {
    pub(crate) fn into_vector(self, dim: usize) -> Result<FeatureVector, FeatureError> {
        match self {
            Row::Sparse { indices, values } => FeatureVector::from_parts(dim, indices, values),
            Row::Dense(values) if values.len() == dim => Ok(FeatureVector::from_dense(&values)),
            Row::Dense(values) => Err(FeatureError::LengthMismatch {
                indices: dim,
                values: values.len(),
            }),
        }
    }
}

pub(crate) fn check_classes(classes: &[Label]) -> Result<(), InvalidArtifact> {
    if classes.is_empty() {
        return Err(InvalidArtifact::new("no classes"));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_dim(expected: usize, x: &FeatureVector) -> Result<(), PredictError> {
    if x.dim() != expected {
        return Err(PredictError::DimensionMismatch {
            expected,
            found: x.dim(),
        });
    }
    Ok(())
}

/// Index of the largest score. The first maximum wins.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}
