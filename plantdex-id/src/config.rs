//! Decision layer configuration
//!
//! Read from the `[decision]` table of the shared PlantDex TOML file. Every
//! key is optional; missing keys fall back to built-in defaults.
//!
//! ```toml
//! [decision.scoring]
//! vision_bonus = 5
//! llm_penalty = 20
//!
//! [decision.hallucination]
//! extra_phrases = ["miracle plant", "superfood"]
//!
//! [decision.cache]
//! backend = "sqlite"
//! ```

use crate::scoring::{ConfidenceScorer, ScoringPolicy};
use crate::services::ThumbnailCache;
use crate::validators::{ContentValidator, HallucinationDetector, PhraseList};
use anyhow::Context;
use plantdex_common::config::{
    database_path, default_config_path, load_toml_config, load_toml_file, resolve_root_folder,
};
use plantdex_common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Decision layer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionConfig {
    #[serde(default)]
    pub scoring: ScoringPolicy,
    #[serde(default)]
    pub hallucination: HallucinationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Filler phrase configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HallucinationConfig {
    /// Phrases added to the list
    #[serde(default)]
    pub extra_phrases: Vec<String>,
    /// Drop the built-in list and use only `extra_phrases`
    #[serde(default)]
    pub replace_defaults: bool,
}

/// Thumbnail cache backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    #[default]
    Sqlite,
}

/// Thumbnail cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Database file; defaults to `<root_folder>/plantdex.db`
    #[serde(default)]
    pub database_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    decision: DecisionConfig,
}

impl DecisionConfig {
    /// Load from the `[decision]` table of `path`
    ///
    /// A missing file yields defaults; an invalid scoring policy is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let file: ConfigFile = load_toml_file(path)?;
        file.decision.scoring.validate()?;
        Ok(file.decision)
    }

    /// Phrase list after applying the configured extras
    pub fn phrase_list(&self) -> PhraseList {
        let mut phrases = if self.hallucination.replace_defaults {
            PhraseList::new(Vec::<String>::new())
        } else {
            PhraseList::default()
        };
        phrases.extend(&self.hallucination.extra_phrases);
        phrases
    }
}

/// Scorer, validator and cache built from one configuration
///
/// Scorer and validator share a single detector.
pub struct DecisionComponents {
    pub scorer: ConfidenceScorer,
    pub validator: ContentValidator,
    pub cache: ThumbnailCache,
}

impl DecisionComponents {
    /// Build every component; opens the database for the SQLite backend
    pub async fn build(config: &DecisionConfig, root_folder: &Path) -> Result<Self> {
        let phrases = config.phrase_list();
        let phrase_count = phrases.len();
        let detector = Arc::new(HallucinationDetector::with_phrases(phrases));
        let scorer = ConfidenceScorer::with_policy(config.scoring, Arc::clone(&detector))?;
        let validator = ContentValidator::new(detector);

        let cache = match config.cache.backend {
            CacheBackend::Memory => ThumbnailCache::in_memory(),
            CacheBackend::Sqlite => {
                let db_path = config
                    .cache
                    .database_file
                    .clone()
                    .unwrap_or_else(|| database_path(root_folder));
                let pool = plantdex_common::db::init_database(&db_path).await?;
                ThumbnailCache::sqlite(pool)
            }
        };

        info!(
            cache_backend = cache.backend(),
            phrase_count,
            "Decision components ready"
        );

        Ok(Self {
            scorer,
            validator,
            cache,
        })
    }

    /// Load one PlantDex TOML file and build the components from it
    ///
    /// `config_path` defaults to `<config_dir>/plantdex/config.toml`. The
    /// root folder is resolved from `root_folder_arg`, then the environment,
    /// then the file's `root_folder` key.
    pub async fn from_config_file(
        config_path: Option<&Path>,
        root_folder_arg: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path().context("No config path given")?,
        };

        let toml_config = load_toml_config(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let root_folder = resolve_root_folder(root_folder_arg, &toml_config);
        info!("Root folder: {}", root_folder.display());

        let config = DecisionConfig::load(&config_path).context("Invalid decision configuration")?;

        Self::build(&config, &root_folder)
            .await
            .context("Failed to initialize decision components")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecisionConfig::default();

        assert_eq!(config.scoring, ScoringPolicy::default());
        assert_eq!(config.cache.backend, CacheBackend::Sqlite);
        assert_eq!(config.phrase_list(), PhraseList::default());
    }

    #[test]
    fn test_partial_toml() {
        let file: ConfigFile = toml::from_str(
            r#"
[decision.scoring]
llm_penalty = 30

[decision.hallucination]
extra_phrases = ["Miracle plant"]

[decision.cache]
backend = "memory"
"#,
        )
        .unwrap();

        let config = file.decision;
        assert_eq!(config.scoring.llm_penalty, 30);
        assert_eq!(config.scoring.vision_bonus, 5);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(config
            .phrase_list()
            .phrases()
            .contains(&"miracle plant".to_string()));
    }

    #[test]
    fn test_replace_defaults() {
        let config = DecisionConfig {
            hallucination: HallucinationConfig {
                extra_phrases: vec!["superfood".to_string()],
                replace_defaults: true,
            },
            ..Default::default()
        };

        assert_eq!(config.phrase_list().phrases(), &["superfood".to_string()]);
    }

    #[tokio::test]
    async fn test_build_memory_components() {
        let config = DecisionConfig {
            cache: CacheConfig {
                backend: CacheBackend::Memory,
                database_file: None,
            },
            ..Default::default()
        };

        let components = DecisionComponents::build(&config, Path::new("/nonexistent"))
            .await
            .unwrap();

        assert_eq!(components.cache.backend(), "memory");
        assert_eq!(components.scorer.calculate_score(0.9, 1.0, crate::types::Modality::Vision), 95);
    }

    #[tokio::test]
    async fn test_from_config_file_opens_sqlite_cache() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("plantdex.toml");
        std::fs::write(
            &config_path,
            "[decision.hallucination]\nextra_phrases = [\"superfood\"]\n",
        )
        .unwrap();

        let components = DecisionComponents::from_config_file(Some(config_path.as_path()), Some(temp_dir.path()))
            .await
            .unwrap();

        assert_eq!(components.cache.backend(), "sqlite");
        assert!(temp_dir.path().join("plantdex.db").exists());
        assert!(components.scorer.detect_hallucination("A real superfood"));
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_from_config_file_root_folder_from_env() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        std::env::set_var(plantdex_common::config::ROOT_FOLDER_ENV, &data_dir);

        let result = DecisionComponents::from_config_file(Some(temp_dir.path().join("missing.toml").as_path()), None).await;
        std::env::remove_var(plantdex_common::config::ROOT_FOLDER_ENV);

        assert_eq!(result.unwrap().cache.backend(), "sqlite");
        assert!(data_dir.join("plantdex.db").exists());
    }

    #[tokio::test]
    async fn test_from_config_file_rejects_bad_policy() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("plantdex.toml");
        std::fs::write(
            &config_path,
            "[decision.scoring]\nhigh_band_min = 40\nmedium_band_min = 60\n",
        )
        .unwrap();

        let result = DecisionComponents::from_config_file(Some(config_path.as_path()), Some(temp_dir.path())).await;

        assert!(result.is_err());
    }
}
