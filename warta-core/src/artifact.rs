//! Loading the four trained artifacts from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use warta_types::ClassifierKind;

use crate::error::{InvalidArtifact, LoadError};
use crate::model::{Classifier, ClassifierArtifact, TfidfVectorizer, VectorizerArtifact};

pub const DEFAULT_KNN_FILE: &str = "knn_model.json";
pub const DEFAULT_SVM_FILE: &str = "svm_model.json";
pub const DEFAULT_RANDOM_FOREST_FILE: &str = "rf_model.json";
pub const DEFAULT_VECTORIZER_FILE: &str = "tfidf_vectorizer.json";

/// Where each artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub knn: PathBuf,
    pub svm: PathBuf,
    pub random_forest: PathBuf,
    pub vectorizer: PathBuf,
}

impl Default for ArtifactPaths {
    /// Default file names, relative to the working directory.
    fn default() -> Self {
        Self {
            knn: PathBuf::from(DEFAULT_KNN_FILE),
            svm: PathBuf::from(DEFAULT_SVM_FILE),
            random_forest: PathBuf::from(DEFAULT_RANDOM_FOREST_FILE),
            vectorizer: PathBuf::from(DEFAULT_VECTORIZER_FILE),
        }
    }
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let names = Self::default();
        Self {
            knn: dir.join(names.knn),
            svm: dir.join(names.svm),
            random_forest: dir.join(names.random_forest),
            vectorizer: dir.join(names.vectorizer),
        }
    }

    pub fn classifier(&self, kind: ClassifierKind) -> &Path {
        match kind {
            ClassifierKind::Knn => &self.knn,
            ClassifierKind::Svm => &self.svm,
            ClassifierKind::RandomForest => &self.random_forest,
        }
    }
}

/// Reads and deserializes one JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path, err: InvalidArtifact) -> LoadError {
    LoadError::Invalid {
        path: path.to_path_buf(),
        reason: err.0,
    }
}

pub fn load_vectorizer(path: &Path) -> Result<TfidfVectorizer, LoadError> {
    let artifact: VectorizerArtifact = load_json(path)?;
    TfidfVectorizer::try_from(artifact).map_err(|e| invalid(path, e))
}

/// Loads a classifier, requiring the file to hold the `expected` kind.
pub fn load_classifier(path: &Path, expected: ClassifierKind) -> Result<Box<dyn Classifier>, LoadError> {
    let artifact: ClassifierArtifact = load_json(path)?;
    let found = artifact.kind();
    if found != expected {
        return Err(LoadError::KindMismatch {
            path: path.to_path_buf(),
            expected,
            found,
        });
    }
    artifact.into_classifier().map_err(|e| invalid(path, e))
}

/// The vectorizer plus the three classifiers in report order.
#[derive(Debug)]
pub struct ArtifactSet {
    pub vectorizer: TfidfVectorizer,
    pub classifiers: Vec<Box<dyn Classifier>>,
}

impl ArtifactSet {
    /// Loads KNN, SVM and random forest, then the vectorizer.
    ///
    /// With `validate_feature_space`, every classifier must accept rows of
    /// the vectorizer's width.
    #[tracing::instrument(skip_all)]
    pub fn load(paths: &ArtifactPaths, validate_feature_space: bool) -> Result<Self, LoadError> {
        let mut classifiers = Vec::with_capacity(ClassifierKind::ALL.len());
        for kind in ClassifierKind::ALL {
            let path = paths.classifier(kind);
            let model = load_classifier(path, kind)?;
            tracing::info!(
                %kind,
                path = %path.display(),
                classes = model.classes().len(),
                n_features = model.n_features(),
                "loaded classifier"
            );
            classifiers.push(model);
        }

        let vectorizer = load_vectorizer(&paths.vectorizer)?;
        tracing::info!(
            path = %paths.vectorizer.display(),
            vocabulary = vectorizer.vocabulary_len(),
            n_features = vectorizer.n_features(),
            "loaded vectorizer"
        );

        let set = Self {
            vectorizer,
            classifiers,
        };
        if validate_feature_space {
            set.check_feature_space()?;
        }
        Ok(set)
    }

    /// Fails on the first classifier whose width differs from the vectorizer's.
    pub fn check_feature_space(&self) -> Result<(), LoadError> {
        let expected = self.vectorizer.n_features();
        for model in &self.classifiers {
            if model.n_features() != expected {
                return Err(LoadError::IncompatibleFeatureSpace {
                    kind: model.kind(),
                    expected,
                    found: model.n_features(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small artifact files on disk for loader and predictor tests.

    use std::fs;
    use std::path::Path;

    use super::ArtifactPaths;

    /// Vocabulary: mobil, listrik, bola, gol. Plain term frequencies.
    pub(crate) const VECTORIZER: &str = r#"{
        "vocabulary": {"mobil": 0, "listrik": 1, "bola": 2, "gol": 3},
        "idf": [1.0, 1.0, 1.0, 1.0]
    }"#;

    pub(crate) const KNN: &str = r#"{
        "kind": "knn", "classes": ["otomotif", "olahraga"], "n_features": 4, "n_neighbors": 1,
        "rows": [{"indices": [0, 1], "values": [0.7, 0.7]}, {"indices": [2, 3], "values": [0.7, 0.7]}],
        "labels": [0, 1]
    }"#;

    /// Exported decision = (x2 + x3) - (x0 + x1); negative picks "otomotif".
    pub(crate) const SVC: &str = r#"{
        "kind": "svc", "classes": ["otomotif", "olahraga"], "n_features": 4,
        "support_vectors": [[1.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 1.0]],
        "n_support": [1, 1], "dual_coef": [[-1.0, 1.0]], "intercept": [0.0],
        "kernel": {"type": "linear"}
    }"#;

    /// Splits on "mobil".
    pub(crate) const FOREST: &str = r#"{
        "kind": "random_forest", "classes": ["otomotif", "olahraga"], "n_features": 4,
        "trees": [{"children_left": [1, -1, -1], "children_right": [2, -1, -1],
                   "feature": [0, -2, -2], "threshold": [0.0, -2.0, -2.0],
                   "value": [[2.0, 2.0], [0.0, 3.0], [3.0, 0.0]]}]
    }"#;

    pub(crate) fn write_all(dir: &Path) -> ArtifactPaths {
        let paths = ArtifactPaths::in_dir(dir);
        fs::write(&paths.vectorizer, VECTORIZER).unwrap();
        fs::write(&paths.knn, KNN).unwrap();
        fs::write(&paths.svm, SVC).unwrap();
        fs::write(&paths.random_forest, FOREST).unwrap();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_four_in_report_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixtures::write_all(dir.path());

        let set = ArtifactSet::load(&paths, true).unwrap();
        let kinds: Vec<_> = set.classifiers.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, ClassifierKind::ALL);
        assert_eq!(set.vectorizer.n_features(), 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let err = ArtifactSet::load(&paths, true).unwrap_err();
        assert!(matches!(err, LoadError::Io { ref path, .. } if path == &paths.knn));
    }

    #[test]
    fn vectorizer_loaded_last() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixtures::write_all(dir.path());
        fs::remove_file(&paths.vectorizer).unwrap();
        fs::remove_file(&paths.random_forest).unwrap();

        let err = ArtifactSet::load(&paths, true).unwrap_err();
        assert!(matches!(err, LoadError::Io { ref path, .. } if path == &paths.random_forest));

        fs::write(&paths.random_forest, fixtures::FOREST).unwrap();
        let err = ArtifactSet::load(&paths, true).unwrap_err();
        assert!(matches!(err, LoadError::Io { ref path, .. } if path == &paths.vectorizer));
    }

    #[test]
    fn corrupt_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixtures::write_all(dir.path());
        fs::write(&paths.svm, "{not json").unwrap();

        let err = ArtifactSet::load(&paths, true).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref path, .. } if path == &paths.svm));
    }

    #[test]
    fn wrong_kind_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixtures::write_all(dir.path());
        fs::write(&paths.knn, fixtures::SVC).unwrap();

        let err = ArtifactSet::load(&paths, true).unwrap_err();
        assert!(matches!(
            err,
            LoadError::KindMismatch {
                expected: ClassifierKind::Knn,
                found: ClassifierKind::Svm,
                ..
            }
        ));
    }

    #[test]
    fn structurally_invalid_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixtures::write_all(dir.path());
        fs::write(
            &paths.random_forest,
            r#"{"kind": "random_forest", "classes": ["a"], "n_features": 4, "trees": []}"#,
        )
        .unwrap();

        let err = ArtifactSet::load(&paths, true).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { .. }));
        assert!(err.to_string().contains("no trees"));
    }

    #[test]
    fn feature_space_mismatch_rejected_unless_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fixtures::write_all(dir.path());
        fs::write(
            &paths.vectorizer,
            r#"{"vocabulary": {"mobil": 0, "listrik": 1, "bola": 2}}"#,
        )
        .unwrap();

        let err = ArtifactSet::load(&paths, true).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IncompatibleFeatureSpace {
                kind: ClassifierKind::Knn,
                expected: 3,
                found: 4
            }
        ));

        let set = ArtifactSet::load(&paths, false).unwrap();
        assert_eq!(set.classifiers.len(), 3);
    }
}
