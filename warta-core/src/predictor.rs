//! Text in, one prediction per classifier out.

use warta_types::{ClassifierKind, Prediction};

use crate::analyzer::{Preprocessor, Stemmer, TextNormalizer};
use crate::artifact::ArtifactSet;
use crate::config::AppConfig;
use crate::error::{PredictError, Result};

/// Owns the preprocessing pipeline and the loaded artifacts for a run.
///
/// Classification takes `&mut self` because the stemmer keeps a word cache.
#[derive(Debug)]
pub struct Predictor {
    preprocessor: Preprocessor,
    artifacts: ArtifactSet,
    text_buf: String,
}

impl Predictor {
    pub fn new(preprocessor: Preprocessor, artifacts: ArtifactSet) -> Self {
        Self {
            preprocessor,
            artifacts,
            text_buf: String::new(),
        }
    }

    /// Builds the stemmer and loads every artifact named by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let stemmer = Stemmer::from_config(&config.stemmer)?;
        let normalizer = TextNormalizer::new(config.normalizer);
        let artifacts = ArtifactSet::load(&config.artifacts.paths(), config.validate_feature_space)?;
        Ok(Self::new(Preprocessor::new(normalizer, stemmer), artifacts))
    }

    /// Normalized and stemmed form of `text`, as the vectorizer sees it.
    pub fn preprocess(&mut self, text: &str) -> String {
        self.preprocessor.preprocess(text)
    }

    /// Preprocesses and vectorizes `text` once, then asks every classifier.
    ///
    /// Predictions come back in load order: KNN, SVM, random forest.
    #[tracing::instrument(skip_all, fields(chars = text.len()))]
    pub fn classify(&mut self, text: &str) -> Result<Vec<Prediction>, PredictError> {
        self.preprocessor.preprocess_into(text, &mut self.text_buf);
        tracing::debug!(preprocessed = %self.text_buf, "preprocessed input");

        let row = self.artifacts.vectorizer.transform(&self.text_buf);
        tracing::debug!(nnz = row.nnz(), dim = row.dim(), "vectorized input");

        self.artifacts
            .classifiers
            .iter()
            .map(|model| -> Result<Prediction, PredictError> {
                let label = model.predict(&row)?;
                tracing::debug!(kind = %model.kind(), %label, "predicted");
                Ok(Prediction::new(model.kind(), label))
            })
            .collect()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ClassifierKind> + '_ {
        self.artifacts.classifiers.iter().map(|m| m.kind())
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{fixtures, ArtifactPaths};
    use crate::error::{Error, LoadError};
    use std::fs;

    fn predictor(paths: &ArtifactPaths, validate: bool) -> Predictor {
        let artifacts = ArtifactSet::load(paths, validate).unwrap();
        Predictor::new(Preprocessor::default(), artifacts)
    }

    fn labels(predictions: &[Prediction]) -> Vec<&str> {
        predictions.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn three_predictions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = predictor(&fixtures::write_all(dir.path()), true);

        let out = p.classify("Merek Mobil Nasional Malaysia Luncurkan Mobil Listrik Pertama").unwrap();
        let kinds: Vec<_> = out.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, ClassifierKind::ALL);
        assert_eq!(labels(&out), ["otomotif"; 3]);

        let out = p.classify("Gol indah di laga bola semalam").unwrap();
        assert_eq!(labels(&out), ["olahraga"; 3]);
    }

    #[test]
    fn same_input_same_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = predictor(&fixtures::write_all(dir.path()), true);
        let text = "Mobil listrik dan bola";
        assert_eq!(p.classify(text).unwrap(), p.classify(text).unwrap());
    }

    #[test]
    fn preprocess_exposes_stemmed_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = predictor(&fixtures::write_all(dir.path()), true);
        assert_eq!(p.preprocess("Mobil123!!  Listrik"), "mobil listrik");
    }

    #[test]
    fn empty_text_still_predicts() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = predictor(&fixtures::write_all(dir.path()), true);
        assert_eq!(p.classify("").unwrap().len(), 3);
    }

    #[test]
    fn unchecked_feature_space_fails_at_predict() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixtures::write_all(dir.path());
        fs::write(&paths.vectorizer, r#"{"vocabulary": {"mobil": 0, "listrik": 1}}"#).unwrap();

        let mut p = predictor(&paths, false);
        let err = p.classify("mobil").unwrap_err();
        assert!(matches!(
            err,
            PredictError::DimensionMismatch {
                expected: 4,
                found: 2
            }
        ));
    }

    #[test]
    fn from_config_reports_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.artifacts.dir = dir.path().to_path_buf();

        let err = Predictor::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::Io { .. })));
    }

    #[test]
    fn from_config_loads_fixture_set() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_all(dir.path());
        let mut config = AppConfig::default();
        config.artifacts.dir = dir.path().to_path_buf();

        let p = Predictor::from_config(&config).unwrap();
        assert_eq!(p.kinds().collect::<Vec<_>>(), ClassifierKind::ALL);
    }
}
