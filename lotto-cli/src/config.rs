use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How candidate grids are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPolicy {
    /// Uniform over 1-45, only historical grids are rejected.
    #[default]
    Uniform,
    /// Uniform over 1-45, each grid must hold at least one top-frequency number.
    Favored,
    /// Numbers unseen in the window plus the top-frequency numbers; each grid
    /// must hold at least one top-frequency number.
    Unpicked,
}

/// How a ticket is compared against past draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Same six numbers, any order.
    #[default]
    Set,
    /// Same six numbers at the same positions.
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_numbers: usize,
    pub top_pairs: usize,
    pub window_years: u32,
    pub recommendations: usize,
    pub policy: GenerationPolicy,
    pub max_attempts: usize,
    pub match_mode: MatchMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_numbers: 5,
            top_pairs: 5,
            window_years: 1,
            recommendations: 5,
            policy: GenerationPolicy::Uniform,
            max_attempts: 100_000,
            match_mode: MatchMode::Set,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read {:?}", path))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON in {:?}", path))?;
        log::info!("configuration loaded from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.top_numbers, 5);
        assert_eq!(config.window_years, 1);
        assert_eq!(config.policy, GenerationPolicy::Uniform);
        assert_eq!(config.match_mode, MatchMode::Set);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"policy": "unpicked", "top_pairs": 3}"#).unwrap();
        assert_eq!(config.policy, GenerationPolicy::Unpicked);
        assert_eq!(config.top_pairs, 3);
        assert_eq!(config.max_attempts, 100_000);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = AnalysisConfig {
            match_mode: MatchMode::Positional,
            ..AnalysisConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"positional\""));
        let restored: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(AnalysisConfig::load(Path::new("/nonexistent/lotto.json")).is_err());
    }
}
