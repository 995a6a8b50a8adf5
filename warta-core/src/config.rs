//! Layered application configuration.
//!
//! Sources, lowest priority first: built-in defaults, `warta.toml` in the
//! working directory (or an explicit file), then `WARTA__*` environment
//! variables such as `WARTA__ARTIFACTS__DIR=/models`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::analyzer::{NormalizerConfig, StemmerConfig};
use crate::artifact::ArtifactPaths;

/// Config file looked up when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "warta";

const ENV_PREFIX: &str = "WARTA";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    /// Reject classifiers whose width differs from the vectorizer's.
    pub validate_feature_space: bool,
    pub normalizer: NormalizerConfig,
    pub stemmer: StemmerConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig::default(),
            validate_feature_space: true,
            normalizer: NormalizerConfig::default(),
            stemmer: StemmerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Artifact locations. File names are resolved against `dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dir: PathBuf,
    pub knn: PathBuf,
    pub svm: PathBuf,
    pub random_forest: PathBuf,
    pub vectorizer: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        let names = ArtifactPaths::default();
        Self {
            dir: PathBuf::from("."),
            knn: names.knn,
            svm: names.svm,
            random_forest: names.random_forest,
            vectorizer: names.vectorizer,
        }
    }
}

impl ArtifactsConfig {
    /// Full paths of the four artifact files.
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            knn: self.dir.join(&self.knn),
            svm: self.dir.join(&self.svm),
            random_forest: self.dir.join(&self.random_forest),
            vectorizer: self.dir.join(&self.vectorizer),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `warta_core=debug`.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `file` (required when given) or the
    /// optional default file, then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, environment())
    }

    fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder();
        let builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder.add_source(env).build()?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let file = toml_file("");
        let config = AppConfig::load_with_env(Some(file.path()), env(&[])).unwrap();

        assert!(config.validate_feature_space);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.stemmer.cache);
        assert!(!config.normalizer.strip_diacritics);

        let paths = config.artifacts.paths();
        assert_eq!(paths.knn, Path::new("./knn_model.json"));
        assert_eq!(paths.vectorizer, Path::new("./tfidf_vectorizer.json"));
    }

    #[test]
    fn file_values_merge_with_defaults() {
        let file = toml_file(
            r#"
            [artifacts]
            dir = "/srv/models"
            svm = "svc.json"

            [stemmer]
            cache = false

            [logging]
            format = "json"
            "#,
        );
        let config = AppConfig::load_with_env(Some(file.path()), env(&[])).unwrap();

        let paths = config.artifacts.paths();
        assert_eq!(paths.svm, Path::new("/srv/models/svc.json"));
        assert_eq!(paths.random_forest, Path::new("/srv/models/rf_model.json"));
        assert!(!config.stemmer.cache);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file("[artifacts]\ndir = \"/srv/models\"\n");
        let config = AppConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("WARTA__ARTIFACTS__DIR", "/opt/warta"),
                ("WARTA__VALIDATE_FEATURE_SPACE", "false"),
                ("OTHER__ARTIFACTS__DIR", "/ignored"),
            ]),
        )
        .unwrap();

        assert_eq!(config.artifacts.dir, Path::new("/opt/warta"));
        assert!(!config.validate_feature_space);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let result = AppConfig::load_with_env(Some(Path::new("/nonexistent/warta.toml")), env(&[]));
        assert!(result.is_err());
    }
}
