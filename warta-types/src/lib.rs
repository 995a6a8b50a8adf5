//! Core types shared across the warta workspace.
//!
//! This crate holds the values that flow between the text pipeline, the
//! pretrained models and the reporter:
//!
//! - **Labels**: class values as exported by the training process
//! - **Feature vectors**: sparse rows produced by the vectorizer
//! - **Predictions**: one label per classifier kind

#![warn(missing_docs)]

use core::fmt;

use serde::{Deserialize, Serialize};

/// A class label produced by a classifier.
///
/// Training exports may encode labels as strings, integers, floats or
/// booleans. All of them are carried as their display string so that the
/// reporter prints them the way the training side would.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "LabelRepr", into = "String")]
pub struct Label(String);

impl Label {
    /// Creates a label from its display text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the label text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelRepr {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<LabelRepr> for Label {
    fn from(repr: LabelRepr) -> Self {
        match repr {
            LabelRepr::Text(s) => Label(s),
            LabelRepr::Integer(i) => Label(i.to_string()),
            LabelRepr::Float(x) => Label(float_text(x)),
            LabelRepr::Bool(b) => Label(if b { "True" } else { "False" }.to_owned()),
        }
    }
}

/// Shortest round-trip text of `x` in the training side's float notation:
/// positional with a trailing `.0` for decimal exponents in `-4..16`
/// (`1.0`, `0.0001`), scientific with a signed two-digit exponent otherwise
/// (`1e+20`, `1.5e-05`).
fn float_text(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let sign = if x.is_sign_negative() { "-" } else { "" };

    if (-4..16).contains(&exp) {
        let point = exp + 1;
        if point <= 0 {
            return format!("{sign}0.{}{digits}", "0".repeat(point.unsigned_abs() as usize));
        }
        let point = point as usize;
        let (int, frac) = digits.split_at(point.min(digits.len()));
        let frac = if frac.is_empty() { "0" } else { frac };
        return format!("{sign}{int:0<point$}.{frac}");
    }

    let (lead, rest) = digits.split_at(1);
    let exp_sign = if exp < 0 { '-' } else { '+' };
    if rest.is_empty() {
        format!("{sign}{lead}e{exp_sign}{:02}", exp.unsigned_abs())
    } else {
        format!("{sign}{lead}.{rest}e{exp_sign}{:02}", exp.unsigned_abs())
    }
}

/// The three classifier families the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClassifierKind {
    /// k-nearest-neighbor classifier
    Knn = 0,
    /// Support-vector classifier
    Svm = 1,
    /// Random-forest classifier
    RandomForest = 2,
}

impl ClassifierKind {
    /// All kinds in reporting order.
    pub const ALL: [ClassifierKind; 3] = [
        ClassifierKind::Knn,
        ClassifierKind::Svm,
        ClassifierKind::RandomForest,
    ];

    /// Prefix printed in front of this classifier's label.
    #[must_use]
    pub const fn report_prefix(self) -> &'static str {
        match self {
            ClassifierKind::Knn => "KNN Prediction",
            ClassifierKind::Svm => "SVM Prediction",
            ClassifierKind::RandomForest => "Random Forest Prediction",
        }
    }

    /// Tag used for this kind inside artifact files.
    #[must_use]
    pub const fn artifact_tag(self) -> &'static str {
        match self {
            ClassifierKind::Knn => "knn",
            ClassifierKind::Svm => "svc",
            ClassifierKind::RandomForest => "random_forest",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_tag())
    }
}

/// One classifier's answer for one input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// Which classifier produced the label
    pub kind: ClassifierKind,
    /// Predicted label
    pub label: Label,
}

impl Prediction {
    /// Creates a new prediction.
    pub fn new(kind: ClassifierKind, label: Label) -> Self {
        Self { kind, label }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.report_prefix(), self.label)
    }
}

/// Errors raised when building a [`FeatureVector`] from raw parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureError {
    /// `indices` and `values` have different lengths.
    LengthMismatch {
        /// Number of indices.
        indices: usize,
        /// Number of values.
        values: usize,
    },
    /// An index is not below the vector dimension.
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Vector dimension.
        dim: usize,
    },
    /// Indices are not strictly increasing.
    NotSorted,
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::LengthMismatch { indices, values } => write!(
                f,
                "sparse row has {} indices but {} values",
                indices, values
            ),
            FeatureError::IndexOutOfRange { index, dim } => {
                write!(f, "feature index {} out of range (dim: {})", index, dim)
            }
            FeatureError::NotSorted => write!(f, "feature indices not strictly increasing"),
        }
    }
}

impl core::error::Error for FeatureError {}

/// Sparse numeric feature row.
///
/// Stores only non-zero entries, indices strictly increasing. TF-IDF rows
/// over a large vocabulary are almost entirely zeros, so every distance and
/// product below runs as a merge over the two index lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Creates an all-zero vector of dimension `dim`.
    pub const fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a vector from pre-sorted sparse parts.
    ///
    /// Explicit zeros are dropped.
    ///
    /// # Errors
    /// Returns a [`FeatureError`] when the parts are inconsistent with `dim`.
    pub fn from_parts(dim: usize, indices: Vec<u32>, values: Vec<f64>) -> Result<Self, FeatureError> {
        if indices.len() != values.len() {
            return Err(FeatureError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FeatureError::NotSorted);
        }
        if let Some(&index) = indices.last() {
            if index as usize >= dim {
                return Err(FeatureError::IndexOutOfRange { index, dim });
            }
        }

        let mut v = Self::zeros(dim);
        v.indices.reserve(indices.len());
        v.values.reserve(values.len());
        for (i, x) in indices.into_iter().zip(values) {
            if x != 0.0 {
                v.indices.push(i);
                v.values.push(x);
            }
        }
        Ok(v)
    }

    /// Builds a vector from `(index, value)` pairs in any order.
    ///
    /// Values sharing an index are summed; indices at or past `dim` and
    /// zero results are dropped.
    pub fn from_unsorted(dim: usize, mut pairs: Vec<(u32, f64)>) -> Self {
        pairs.sort_unstable_by_key(|&(i, _)| i);

        let mut v = Self::zeros(dim);
        for (i, x) in pairs {
            if i as usize >= dim {
                break;
            }
            match v.indices.last() {
                Some(&last) if last == i => {
                    if let Some(acc) = v.values.last_mut() {
                        *acc += x;
                    }
                }
                _ => {
                    v.indices.push(i);
                    v.values.push(x);
                }
            }
        }
        v.drop_zeros();
        v
    }

    fn drop_zeros(&mut self) {
        if self.values.iter().all(|&x| x != 0.0) {
            return;
        }
        let mut keep = 0;
        for k in 0..self.values.len() {
            if self.values[k] != 0.0 {
                self.indices[keep] = self.indices[k];
                self.values[keep] = self.values[k];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }

    /// Builds a vector from a dense slice.
    pub fn from_dense(dense: &[f64]) -> Self {
        let mut v = Self::zeros(dense.len());
        for (i, &x) in dense.iter().enumerate() {
            if x != 0.0 {
                v.indices.push(i as u32);
                v.values.push(x);
            }
        }
        v
    }

    /// Returns the dimension (number of features).
    #[inline(always)]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the number of stored non-zero entries.
    #[inline(always)]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if every entry is zero.
    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(&i, &x)| (i as usize, x))
    }

    /// Returns the value at `index` (zero when not stored).
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&(index as u32)) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for x in &mut self.values {
            *x *= factor;
        }
    }

    /// Applies `f(index, value)` to every stored entry.
    pub fn map_in_place(&mut self, mut f: impl FnMut(usize, f64) -> f64) {
        for (i, x) in self.indices.iter().zip(self.values.iter_mut()) {
            *x = f(*i as usize, *x);
        }
    }

    /// Sum of absolute values.
    pub fn norm_l1(&self) -> f64 {
        self.values.iter().map(|x| x.abs()).sum()
    }

    /// Euclidean norm.
    pub fn norm_l2(&self) -> f64 {
        self.values.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Dot product with another vector of the same dimension.
    pub fn dot(&self, other: &FeatureVector) -> f64 {
        let mut sum = 0.0;
        let (mut a, mut b) = (0usize, 0usize);
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                core::cmp::Ordering::Less => a += 1,
                core::cmp::Ordering::Greater => b += 1,
                core::cmp::Ordering::Equal => {
                    sum += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }

    /// Squared Euclidean distance.
    pub fn squared_distance(&self, other: &FeatureVector) -> f64 {
        self.fold_differences(other, 0.0, |acc, d| acc + d * d)
    }

    /// Minkowski distance with exponent `p` (`p = 2` is Euclidean,
    /// `p = 1` Manhattan).
    pub fn minkowski_distance(&self, other: &FeatureVector, p: f64) -> f64 {
        if p == 2.0 {
            return self.squared_distance(other).sqrt();
        }
        if p == 1.0 {
            return self.fold_differences(other, 0.0, |acc, d| acc + d.abs());
        }
        self.fold_differences(other, 0.0, |acc, d| acc + d.abs().powf(p))
            .powf(1.0 / p)
    }

    /// Folds over `self[i] - other[i]` for every index stored in either side.
    fn fold_differences(&self, other: &FeatureVector, init: f64, mut f: impl FnMut(f64, f64) -> f64) -> f64 {
        let mut acc = init;
        let (mut a, mut b) = (0usize, 0usize);
        while a < self.indices.len() || b < other.indices.len() {
            let ia = self.indices.get(a).copied().unwrap_or(u32::MAX);
            let ib = other.indices.get(b).copied().unwrap_or(u32::MAX);
            let diff = match ia.cmp(&ib) {
                core::cmp::Ordering::Less => {
                    a += 1;
                    self.values[a - 1]
                }
                core::cmp::Ordering::Greater => {
                    b += 1;
                    -other.values[b - 1]
                }
                core::cmp::Ordering::Equal => {
                    a += 1;
                    b += 1;
                    self.values[a - 1] - other.values[b - 1]
                }
            };
            acc = f(acc, diff);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn label_from_json_string_and_numbers() {
        let labels: Vec<Label> = serde_json::from_str(r#"["otomotif", 3, 1.0, 0.5, true]"#).unwrap();
        let texts: Vec<&str> = labels.iter().map(Label::as_str).collect();
        assert_eq!(texts, ["otomotif", "3", "1.0", "0.5", "True"]);
    }

    #[test]
    fn float_labels_use_short_notation() {
        let cases = [
            (1.0, "1.0"),
            (-2.0, "-2.0"),
            (0.0, "0.0"),
            (0.5, "0.5"),
            (0.0001, "0.0001"),
            (1234567.0, "1234567.0"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (1e20, "1e+20"),
            (2.5e-7, "2.5e-07"),
            (-1.5e100, "-1.5e+100"),
        ];
        for (value, text) in cases {
            assert_eq!(float_text(value), text, "{value:e}");
        }
    }

    #[test]
    fn label_serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::new("ekonomi")).unwrap();
        assert_eq!(json, r#""ekonomi""#);
    }

    #[test]
    fn prediction_display_uses_report_prefix() {
        let p = Prediction::new(ClassifierKind::RandomForest, Label::new("otomotif"));
        assert_eq!(p.to_string(), "Random Forest Prediction: otomotif");
        let p = Prediction::new(ClassifierKind::Knn, Label::new("bola"));
        assert_eq!(p.to_string(), "KNN Prediction: bola");
    }

    #[test]
    fn classifier_kind_size_is_1_byte() {
        assert_eq!(core::mem::size_of::<ClassifierKind>(), 1);
    }

    #[test]
    fn from_parts_drops_zeros() {
        let v = FeatureVector::from_parts(5, vec![0, 2, 4], vec![1.0, 0.0, 3.0]).unwrap();
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(2), 0.0);
        assert_eq!(v.get(4), 3.0);
    }

    #[test]
    fn from_parts_rejects_bad_rows() {
        assert_eq!(
            FeatureVector::from_parts(3, vec![0, 1], vec![1.0]),
            Err(FeatureError::LengthMismatch { indices: 2, values: 1 })
        );
        assert_eq!(
            FeatureVector::from_parts(3, vec![2, 1], vec![1.0, 1.0]),
            Err(FeatureError::NotSorted)
        );
        assert_eq!(
            FeatureVector::from_parts(3, vec![0, 3], vec![1.0, 1.0]),
            Err(FeatureError::IndexOutOfRange { index: 3, dim: 3 })
        );
    }

    #[test]
    fn from_unsorted_sums_and_sorts() {
        let v = FeatureVector::from_unsorted(4, vec![(3, 1.0), (1, 2.0), (3, 0.5), (9, 7.0), (2, 0.0)]);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.5)]);
        assert_eq!(v.dim(), 4);
    }

    #[test]
    fn dot_and_distances_match_dense_math() {
        let a = FeatureVector::from_dense(&[1.0, 0.0, 2.0, 0.0]);
        let b = FeatureVector::from_dense(&[0.0, 3.0, 1.0, 0.0]);

        assert!(approx(a.dot(&b), 2.0));
        // diffs: 1, -3, 1, 0
        assert!(approx(a.squared_distance(&b), 11.0));
        assert!(approx(a.minkowski_distance(&b, 2.0), 11.0f64.sqrt()));
        assert!(approx(a.minkowski_distance(&b, 1.0), 5.0));
        assert!(approx(a.minkowski_distance(&b, 3.0), 29.0f64.powf(1.0 / 3.0)));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = FeatureVector::from_dense(&[0.5, 0.0, 0.25]);
        assert_eq!(a.squared_distance(&a), 0.0);
        assert!(approx(a.norm_l2() * a.norm_l2(), a.dot(&a)));
    }

    #[test]
    fn zero_vector_behaviour() {
        let z = FeatureVector::zeros(4);
        let a = FeatureVector::from_dense(&[3.0, 4.0, 0.0, 0.0]);
        assert!(z.is_zero());
        assert_eq!(z.dot(&a), 0.0);
        assert!(approx(z.minkowski_distance(&a, 2.0), 5.0));
        assert_eq!(z.norm_l1(), 0.0);
    }

    #[test]
    fn map_and_scale() {
        let mut v = FeatureVector::from_dense(&[1.0, 0.0, 2.0]);
        v.map_in_place(|i, x| x + i as f64);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(0, 1.0), (2, 4.0)]);
        v.scale(0.5);
        assert_eq!(v.get(2), 2.0);
        assert!(approx(v.norm_l1(), 2.5));
    }
}
