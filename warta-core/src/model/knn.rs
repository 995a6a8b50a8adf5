//! k-nearest-neighbor classifier.

use serde::Deserialize;
use warta_types::{ClassifierKind, FeatureVector, Label};

use super::{argmax, check_classes, check_dim, Classifier, Row};
use crate::error::{InvalidArtifact, PredictError};

/// How neighbor votes are weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weights {
    /// One vote per neighbor.
    #[default]
    Uniform,
    /// Votes weighted by inverse distance.
    Distance,
}

/// JSON export of a fitted KNN classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct KnnArtifact {
    pub classes: Vec<Label>,
    pub n_features: usize,
    /// Training rows.
    pub rows: Vec<Row>,
    /// Class index of each training row.
    pub labels: Vec<usize>,
    #[serde(default = "default_neighbors")]
    pub n_neighbors: usize,
    #[serde(default)]
    pub weights: Weights,
    /// Minkowski exponent.
    #[serde(default = "default_p")]
    pub p: f64,
}

fn default_neighbors() -> usize {
    5
}

fn default_p() -> f64 {
    2.0
}

#[derive(Debug, Clone)]
pub struct KnnClassifier {
    classes: Vec<Label>,
    n_features: usize,
    rows: Vec<FeatureVector>,
    labels: Vec<usize>,
    n_neighbors: usize,
    weights: Weights,
    p: f64,
}

impl TryFrom<KnnArtifact> for KnnClassifier {
    type Error = InvalidArtifact;

    fn try_from(a: KnnArtifact) -> Result<Self, Self::Error> {
        check_classes(&a.classes)?;
        if a.n_neighbors == 0 {
            return Err(InvalidArtifact::new("n_neighbors must be at least 1"));
        }
        if a.rows.len() != a.labels.len() {
            return Err(InvalidArtifact::new(format!(
                "{} training rows but {} labels",
                a.rows.len(),
                a.labels.len()
            )));
        }
        if a.n_neighbors > a.rows.len() {
            return Err(InvalidArtifact::new(format!(
                "n_neighbors is {} but only {} training rows are stored",
                a.n_neighbors,
                a.rows.len()
            )));
        }
        if let Some(&bad) = a.labels.iter().find(|&&l| l >= a.classes.len()) {
            return Err(InvalidArtifact::new(format!(
                "label index {bad} out of range ({} classes)",
                a.classes.len()
            )));
        }
        if a.p.is_nan() || a.p < 1.0 {
            return Err(InvalidArtifact::new(format!("minkowski p must be >= 1, got {}", a.p)));
        }

        let rows = a
            .rows
            .into_iter()
            .map(|r| r.into_vector(a.n_features))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            classes: a.classes,
            n_features: a.n_features,
            rows,
            labels: a.labels,
            n_neighbors: a.n_neighbors,
            weights: a.weights,
            p: a.p,
        })
    }
}

impl KnnClassifier {
    /// The `k` nearest training rows as `(distance, row index)`.
    ///
    /// Equal distances are ordered by row index.
    fn neighbors(&self, x: &FeatureVector) -> Vec<(f64, usize)> {
        let mut dists: Vec<(f64, usize)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.minkowski_distance(x, self.p), i))
            .collect();

        let by_distance = |a: &(f64, usize), b: &(f64, usize)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));
        let k = self.n_neighbors;
        if k < dists.len() {
            dists.select_nth_unstable_by(k - 1, by_distance);
            dists.truncate(k);
        }
        dists.sort_unstable_by(by_distance);
        dists
    }

    /// Per-class vote weights for `x`.
    pub fn votes(&self, x: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        check_dim(self.n_features, x)?;

        let neighbors = self.neighbors(x);
        let mut votes = vec![0.0; self.classes.len()];

        match self.weights {
            Weights::Uniform => {
                for &(_, i) in &neighbors {
                    votes[self.labels[i]] += 1.0;
                }
            }
            Weights::Distance => {
                // Exact matches take all the weight.
                if neighbors.iter().any(|&(d, _)| d == 0.0) {
                    for &(_, i) in neighbors.iter().filter(|&&(d, _)| d == 0.0) {
                        votes[self.labels[i]] += 1.0;
                    }
                } else {
                    for &(d, i) in &neighbors {
                        votes[self.labels[i]] += 1.0 / d;
                    }
                }
            }
        }
        Ok(votes)
    }
}

impl Classifier for KnnClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Knn
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict(&self, x: &FeatureVector) -> Result<Label, PredictError> {
        let votes = self.votes(x)?;
        Ok(self.classes[argmax(&votes)].clone())
    }
}
