//! Engine configuration management.
//!
//! Segmentation, ranking and answer settings live in
//! `.clauseiq/engine.yaml`; every key is optional and falls back to its
//! default.

use crate::answer::AnswerConfig;
use crate::rank::RankingParams;
use crate::segment::SegmentConfig;
use clauseiq_core::config::STATE_DIR;
use clauseiq_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// All engine tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub segment: SegmentConfig,

    #[serde(default)]
    pub ranking: RankingParams,

    #[serde(default)]
    pub answer: AnswerConfig,
}

impl EngineConfig {
    /// Reject settings the ranker or segmenter cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if self.ranking.k1.is_nan() || self.ranking.k1 < 0.0 {
            return Err(AppError::Config(format!(
                "ranking.k1 must be non-negative, got {}",
                self.ranking.k1
            )));
        }
        if !(0.0..=1.0).contains(&self.ranking.b) {
            return Err(AppError::Config(format!(
                "ranking.b must be between 0 and 1, got {}",
                self.ranking.b
            )));
        }
        if self.ranking.top_k == 0 {
            return Err(AppError::Config("ranking.top_k must be at least 1".to_string()));
        }
        if self.segment.max_passage_chars == 0 {
            return Err(AppError::Config(
                "segment.max_passage_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the engine configuration for a workspace.
///
/// A missing file yields the defaults.
pub fn load_config(workspace: &Path) -> AppResult<EngineConfig> {
    let config_path = get_config_path(workspace);

    if !config_path.exists() {
        tracing::debug!("Using default engine config (no config file found)");
        return Ok(EngineConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        AppError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
    })?;

    let config: EngineConfig = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
    })?;
    config.validate()?;

    tracing::debug!("Loaded engine config from {:?}", config_path);
    Ok(config)
}

/// Save the engine configuration for a workspace.
pub fn save_config(workspace: &Path, config: &EngineConfig) -> AppResult<()> {
    config.validate()?;
    let config_path = get_config_path(workspace);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let yaml = serde_yaml::to_string(config)?;
    fs::write(&config_path, yaml).map_err(|e| {
        AppError::Config(format!("Failed to write config to {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Saved engine config to {:?}", config_path);
    Ok(())
}

/// Path of the engine config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR).join("engine.yaml")
}
