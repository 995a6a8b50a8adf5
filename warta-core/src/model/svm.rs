//! Support-vector classifier (one-vs-one, libsvm layout).

use serde::Deserialize;
use warta_types::{ClassifierKind, FeatureVector, Label};

use super::{argmax, check_dim, Classifier, Row};
use crate::error::{InvalidArtifact, PredictError};

/// Kernel function `K(s, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf {
        gamma: f64,
    },
    Poly {
        gamma: f64,
        #[serde(default)]
        coef0: f64,
        #[serde(default = "default_degree")]
        degree: u32,
    },
    Sigmoid {
        gamma: f64,
        #[serde(default)]
        coef0: f64,
    },
}

fn default_degree() -> u32 {
    3
}

impl Kernel {
    #[inline]
    pub fn eval(&self, s: &FeatureVector, x: &FeatureVector) -> f64 {
        match *self {
            Kernel::Linear => s.dot(x),
            Kernel::Rbf { gamma } => (-gamma * s.squared_distance(x)).exp(),
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => (gamma * s.dot(x) + coef0).powi(degree as i32),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * s.dot(x) + coef0).tanh(),
        }
    }
}

/// JSON export of a fitted SVC.
///
/// Support vectors are grouped by class; `n_support[c]` of them belong to
/// class `c`. `dual_coef` has one row per other class and `intercept` one
/// entry per class pair, pairs ordered `(0,1), (0,2), ..., (1,2), ...`.
///
/// `dual_coef` and `intercept` are the fitted model's public `dual_coef_`
/// and `intercept_`. With two classes those carry the opposite sign of the
/// libsvm values, so they are negated when the classifier is built.
#[derive(Debug, Clone, Deserialize)]
pub struct SvcArtifact {
    pub classes: Vec<Label>,
    pub n_features: usize,
    pub support_vectors: Vec<Row>,
    pub n_support: Vec<usize>,
    pub dual_coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    pub kernel: Kernel,
}

#[derive(Debug, Clone)]
pub struct SvcClassifier {
    classes: Vec<Label>,
    n_features: usize,
    support_vectors: Vec<FeatureVector>,
    /// Offset of each class's first support vector; one extra trailing entry.
    starts: Vec<usize>,
    dual_coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    kernel: Kernel,
}

impl TryFrom<SvcArtifact> for SvcClassifier {
    type Error = InvalidArtifact;

    fn try_from(a: SvcArtifact) -> Result<Self, Self::Error> {
        let k = a.classes.len();
        if k < 2 {
            return Err(InvalidArtifact::new(format!("svc needs at least 2 classes, got {k}")));
        }
        if a.n_support.len() != k {
            return Err(InvalidArtifact::new(format!(
                "n_support has {} entries for {k} classes",
                a.n_support.len()
            )));
        }
        let n_sv: usize = a.n_support.iter().sum();
        if n_sv != a.support_vectors.len() {
            return Err(InvalidArtifact::new(format!(
                "n_support sums to {n_sv} but {} support vectors are stored",
                a.support_vectors.len()
            )));
        }
        if a.dual_coef.len() != k - 1 {
            return Err(InvalidArtifact::new(format!(
                "dual_coef has {} rows, expected {}",
                a.dual_coef.len(),
                k - 1
            )));
        }
        if let Some(row) = a.dual_coef.iter().find(|r| r.len() != n_sv) {
            return Err(InvalidArtifact::new(format!(
                "dual_coef row has {} entries, expected {n_sv}",
                row.len()
            )));
        }
        let pairs = k * (k - 1) / 2;
        if a.intercept.len() != pairs {
            return Err(InvalidArtifact::new(format!(
                "intercept has {} entries, expected {pairs}",
                a.intercept.len()
            )));
        }

        let mut starts = Vec::with_capacity(k + 1);
        let mut offset = 0;
        starts.push(0);
        for &n in &a.n_support {
            offset += n;
            starts.push(offset);
        }

        let support_vectors = a
            .support_vectors
            .into_iter()
            .map(|r| r.into_vector(a.n_features))
            .collect::<Result<Vec<_>, _>>()?;

        let (mut dual_coef, mut intercept) = (a.dual_coef, a.intercept);
        if k == 2 {
            dual_coef.iter_mut().flatten().for_each(|c| *c = -*c);
            intercept.iter_mut().for_each(|b| *b = -*b);
        }

        Ok(Self {
            classes: a.classes,
            n_features: a.n_features,
            support_vectors,
            starts,
            dual_coef,
            intercept,
            kernel: a.kernel,
        })
    }
}

impl SvcClassifier {
    /// Pairwise decision values, one per class pair in `(i, j)`, `i < j`
    /// order, with the libsvm sign: positive favors `i`.
    pub fn decision_values(&self, x: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        check_dim(self.n_features, x)?;

        let kvalue: Vec<f64> = self
            .support_vectors
            .iter()
            .map(|sv| self.kernel.eval(sv, x))
            .collect();

        let k = self.classes.len();
        let mut out = Vec::with_capacity(self.intercept.len());
        let mut p = 0;
        for i in 0..k {
            for j in (i + 1)..k {
                let (si, ei) = (self.starts[i], self.starts[i + 1]);
                let (sj, ej) = (self.starts[j], self.starts[j + 1]);

                let coef_i = &self.dual_coef[j - 1];
                let coef_j = &self.dual_coef[i];

                let mut sum = self.intercept[p];
                for s in si..ei {
                    sum += coef_i[s] * kvalue[s];
                }
                for s in sj..ej {
                    sum += coef_j[s] * kvalue[s];
                }
                out.push(sum);
                p += 1;
            }
        }
        Ok(out)
    }
}

impl Classifier for SvcClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Svm
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict(&self, x: &FeatureVector) -> Result<Label, PredictError> {
        let decisions = self.decision_values(x)?;

        let k = self.classes.len();
        let mut votes = vec![0.0; k];
        let mut p = 0;
        for i in 0..k {
            for j in (i + 1)..k {
                if decisions[p] > 0.0 {
                    votes[i] += 1.0;
                } else {
                    votes[j] += 1.0;
                }
                p += 1;
            }
        }
        Ok(self.classes[argmax(&votes)].clone())
    }
}
