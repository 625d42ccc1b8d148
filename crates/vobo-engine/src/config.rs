use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use vobo_extract::{ExtractConfig, HeaderTaxonomy, SectionMarkers, Vocabulary};
use vobo_oracle::OracleConfig;
use vobo_validate::VerdictPolicy;

pub const CONFIG_FILE: &str = "vobo.toml";

/// Contents of `vobo.toml`. Every section is optional; omitted keys take
/// their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub policy: VerdictPolicy,
    pub headers: HeaderTaxonomy,
    pub sections: SectionMarkers,
    pub vocabulary: Vocabulary,
    pub oracle: OracleConfig,
}

impl Config {
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// `path` when given, else `./vobo.toml` when present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if default.exists() {
                    Self::load_from(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize vobo.toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            headers: self.headers.clone(),
            sections: self.sections.clone(),
            vocabulary: self.vocabulary.clone(),
        }
    }
}
