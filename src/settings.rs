use crate::config::TreeParams;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

/// Starting parameter values; anything missing keeps the built-in default
#[derive(Debug, Default, Deserialize)]
pub struct TreeSettings {
    pub thickness: Option<f64>,
    pub height_factor: Option<f64>,
    pub max_depth: Option<u32>,
    pub branches: Option<u32>,
    pub angle: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewSettings {
    pub rotate: Option<bool>,
    pub fixed_ratio: Option<bool>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                log::warn!("ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fractree")
            .join("config.toml")
    }
}

impl TreeSettings {
    /// Overlay these settings on `base`, clamped into control ranges
    pub fn apply(&self, base: TreeParams) -> TreeParams {
        let requested = TreeParams {
            thickness: self.thickness.unwrap_or(base.thickness),
            height_factor: self.height_factor.unwrap_or(base.height_factor),
            max_depth: self.max_depth.unwrap_or(base.max_depth),
            branch_propagation: self.branches.unwrap_or(base.branch_propagation),
            angle: self.angle.unwrap_or(base.angle),
            ..base
        };
        let params = requested.clamped();
        if params != requested {
            log::warn!("settings values clamped to control ranges: {:?}", params);
        }
        params
    }
}
