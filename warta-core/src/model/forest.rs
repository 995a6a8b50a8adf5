//! Random-forest classifier over flattened decision trees.

use serde::Deserialize;
use warta_types::{ClassifierKind, FeatureVector, Label};

use super::{argmax, check_classes, check_dim, Classifier};
use crate::error::{InvalidArtifact, PredictError};

/// Child index marking a leaf.
const LEAF: i64 = -1;

/// One fitted tree as parallel node arrays. Node 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights; only leaf rows are read.
    pub value: Vec<Vec<f64>>,
}

/// JSON export of a fitted random forest.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForestArtifact {
    pub classes: Vec<Label>,
    pub n_features: usize,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class probabilities at this leaf.
    Leaf(Box<[f64]>),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_artifact(t: TreeArtifact, n_features: usize, n_classes: usize) -> Result<Self, InvalidArtifact> {
        let n = t.children_left.len();
        if n == 0 {
            return Err(InvalidArtifact::new("tree has no nodes"));
        }
        if [t.children_right.len(), t.feature.len(), t.threshold.len(), t.value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(InvalidArtifact::new("tree node arrays differ in length"));
        }

        let mut nodes = Vec::with_capacity(n);
        for id in 0..n {
            let (left, right) = (t.children_left[id], t.children_right[id]);
            if left == LEAF && right == LEAF {
                let row = &t.value[id];
                if row.len() != n_classes {
                    return Err(InvalidArtifact::new(format!(
                        "leaf {id} has {} class weights, expected {n_classes}",
                        row.len()
                    )));
                }
                nodes.push(Node::Leaf(normalize(row)));
                continue;
            }

            // Children always follow their parent, which also rules out cycles.
            let child = |c: i64| -> Result<usize, InvalidArtifact> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > id && c < n)
                    .ok_or_else(|| InvalidArtifact::new(format!("node {id} has invalid child {c}")))
            };
            let feature = usize::try_from(t.feature[id])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| {
                    InvalidArtifact::new(format!(
                        "node {id} splits on feature {} (n_features: {n_features})",
                        t.feature[id]
                    ))
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: t.threshold[id],
                left: child(left)?,
                right: child(right)?,
            });
        }
        Ok(Self { nodes })
    }

    fn leaf(&self, x: &FeatureVector) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf(proba) => return proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Trees are fitted on f32 features.
                    let v = x.get(*feature) as f32 as f64;
                    id = if v <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

fn normalize(row: &[f64]) -> Box<[f64]> {
    let total: f64 = row.iter().sum();
    if total > 0.0 {
        row.iter().map(|w| w / total).collect()
    } else {
        row.into()
    }
}

#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    classes: Vec<Label>,
    n_features: usize,
    trees: Vec<Tree>,
}

impl TryFrom<RandomForestArtifact> for RandomForestClassifier {
    type Error = InvalidArtifact;

    fn try_from(a: RandomForestArtifact) -> Result<Self, Self::Error> {
        check_classes(&a.classes)?;
        if a.trees.is_empty() {
            return Err(InvalidArtifact::new("forest has no trees"));
        }
        let n_classes = a.classes.len();
        let trees = a
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                Tree::from_artifact(t, a.n_features, n_classes)
                    .map_err(|e| InvalidArtifact::new(format!("tree {i}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            classes: a.classes,
            n_features: a.n_features,
            trees,
        })
    }
}

impl RandomForestClassifier {
    /// Mean class probabilities over all trees.
    pub fn predict_proba(&self, x: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        check_dim(self.n_features, x)?;

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf(x)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n;
        }
        Ok(proba)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForestClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::RandomForest
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn predict(&self, x: &FeatureVector) -> Result<Label, PredictError> {
        let proba = self.predict_proba(x)?;
        Ok(self.classes[argmax(&proba)].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Stump on feature 0 at 0.5: left leans "ekonomi", right "otomotif".
    const STUMP: &str = r#"{"children_left": [1, -1, -1], "children_right": [2, -1, -1],
        "feature": [0, -2, -2], "threshold": [0.5, -2.0, -2.0],
        "value": [[5.0, 5.0], [4.0, 1.0], [1.0, 4.0]]}"#;

    // Stump on feature 1 at 0.5 with absolute counts of a different scale.
    const STUMP_F1: &str = r#"{"children_left": [1, -1, -1], "children_right": [2, -1, -1],
        "feature": [1, -2, -2], "threshold": [0.5, -2.0, -2.0],
        "value": [[20.0, 20.0], [18.0, 2.0], [2.0, 18.0]]}"#;

    fn forest(trees: &[&str]) -> RandomForestClassifier {
        let json = format!(
            r#"{{"classes": ["ekonomi", "otomotif"], "n_features": 2, "trees": [{}]}}"#,
            trees.join(",")
        );
        let artifact: RandomForestArtifact = serde_json::from_str(&json).unwrap();
        RandomForestClassifier::try_from(artifact).unwrap()
    }

    #[test]
    fn single_tree_routes_on_threshold() {
        let rf = forest(&[STUMP]);
        assert_eq!(rf.predict(&FeatureVector::from_dense(&[0.2, 0.0])).unwrap().as_str(), "ekonomi");
        assert_eq!(rf.predict(&FeatureVector::from_dense(&[0.9, 0.0])).unwrap().as_str(), "otomotif");
        // equal to threshold goes left
        assert_eq!(rf.predict(&FeatureVector::from_dense(&[0.5, 0.0])).unwrap().as_str(), "ekonomi");
    }

    #[test]
    fn averages_normalized_leaves() {
        let rf = forest(&[STUMP, STUMP_F1]);
        // tree 0 -> [0.8, 0.2], tree 1 -> [0.1, 0.9]
        let x = FeatureVector::from_dense(&[0.1, 0.9]);
        let proba = rf.predict_proba(&x).unwrap();
        assert!((proba[0] - 0.45).abs() < 1e-12);
        assert!((proba[1] - 0.55).abs() < 1e-12);
        assert_eq!(rf.predict(&x).unwrap().as_str(), "otomotif");
    }

    #[test]
    fn probability_tie_goes_to_first_class() {
        let even = r#"{"children_left": [-1], "children_right": [-1], "feature": [-2],
            "threshold": [-2.0], "value": [[3.0, 3.0]]}"#;
        let rf = forest(&[even]);
        assert_eq!(rf.predict(&FeatureVector::zeros(2)).unwrap().as_str(), "ekonomi");
    }

    #[test]
    fn wrong_width_is_dimension_mismatch() {
        let rf = forest(&[STUMP]);
        assert!(matches!(
            rf.predict(&FeatureVector::zeros(1)),
            Err(PredictError::DimensionMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn broken_trees_rejected() {
        let bad = [
            // child points back at the root
            r#"{"children_left": [0, -1], "children_right": [1, -1], "feature": [0, -2],
                "threshold": [0.5, -2.0], "value": [[1.0, 1.0], [1.0, 0.0]]}"#,
            // split feature out of range
            r#"{"children_left": [1, -1, -1], "children_right": [2, -1, -1], "feature": [7, -2, -2],
                "threshold": [0.5, -2.0, -2.0], "value": [[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]}"#,
            // arrays of different length
            r#"{"children_left": [-1], "children_right": [-1, -1], "feature": [-2],
                "threshold": [-2.0], "value": [[1.0, 0.0]]}"#,
            // leaf with the wrong number of classes
            r#"{"children_left": [-1], "children_right": [-1], "feature": [-2],
                "threshold": [-2.0], "value": [[1.0]]}"#,
        ];
        for tree in bad {
            let json = format!(r#"{{"classes": ["a", "b"], "n_features": 2, "trees": [{tree}]}}"#);
            let artifact: RandomForestArtifact = serde_json::from_str(&json).unwrap();
            assert!(RandomForestClassifier::try_from(artifact).is_err(), "accepted: {tree}");
        }

        let empty: RandomForestArtifact =
            serde_json::from_str(r#"{"classes": ["a"], "n_features": 1, "trees": []}"#).unwrap();
        assert!(RandomForestClassifier::try_from(empty).is_err());
    }
}
