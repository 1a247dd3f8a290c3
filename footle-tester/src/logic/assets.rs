use footle_game::{Catalog, ConfigError, FootleConfig};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../../../footle-web/static/data/footballers.json");

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("config rejected: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog needs at least {needed} footballers, found {found}")]
    TooSmall { needed: usize, found: usize },
}

/// Catalog and gameplay configuration shared by every scenario run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub catalog: Catalog,
    pub config: FootleConfig,
}

impl TesterAssets {
    /// The sample catalog bundled with the web build and default config.
    pub fn load_default() -> Result<Self, AssetError> {
        Self::from_parts(Catalog::from_json(EMBEDDED_CATALOG)?, FootleConfig::default_config())
    }

    /// Load from optional file overrides, falling back to the bundled data.
    pub fn load(catalog: Option<&Path>, config: Option<&Path>) -> Result<Self, AssetError> {
        if catalog.is_none() && config.is_none() {
            return Self::load_default();
        }
        let catalog = match catalog {
            Some(path) => Catalog::from_json(&read(path)?)?,
            None => Catalog::from_json(EMBEDDED_CATALOG)?,
        };
        let config = match config {
            Some(path) => FootleConfig::from_json(&read(path)?)?,
            None => FootleConfig::default_config(),
        };
        Self::from_parts(catalog, config)
    }

    fn from_parts(catalog: Catalog, config: FootleConfig) -> Result<Self, AssetError> {
        // one target per playable mode plus at least one wrong guess
        let needed = footle_game::GameMode::PLAYABLE.len() + 1;
        if catalog.len() < needed {
            return Err(AssetError::TooSmall {
                needed,
                found: catalog.len(),
            });
        }
        Ok(Self { catalog, config })
    }
}

fn read(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}
