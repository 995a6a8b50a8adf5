//! Indonesian news text classification with pretrained models.
//!
//! The pipeline for one input text:
//!
//! 1. [`analyzer`]: lowercase, strip digits and punctuation, collapse
//!    whitespace, stem every word to its Indonesian root
//! 2. [`model::TfidfVectorizer`]: turn the stemmed text into a sparse row
//! 3. [`model::Classifier`]: KNN, SVM and random forest each predict a label
//! 4. [`report`]: one `"<model> Prediction: <label>"` line per classifier
//!
//! Models and the vectorizer are read from JSON exports by [`artifact`].

pub mod analyzer;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod predictor;
pub mod report;

pub use error::{Error, LoadError, PredictError, Result, TransformError};
pub use predictor::Predictor;
pub use warta_types::{ClassifierKind, FeatureVector, Label, Prediction};
