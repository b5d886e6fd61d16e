use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const CONFIG_FILE: &str = "generation.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub trait LoadConfiguration: Sized + Default + Serialize + DeserializeOwned {
    fn file_name() -> &'static str;

    fn validate(&self) -> Result<(), ConfigError>;

    /// Reads the config from `config_dir`, writing the defaults first if the file is missing.
    fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(Self::file_name());

        let config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            let config = Self::default();
            let content = toml::to_string(&config)?;
            let written =
                fs::create_dir_all(config_dir).and_then(|()| fs::write(&path, content));
            if let Err(err) = written {
                warn!(
                    "Couldn't write default config to {}: {err}",
                    path.display()
                );
            } else {
                debug!("Wrote default config to {}", path.display());
            }
            config
        };

        config.validate()?;
        Ok(config)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Skips structure placement entirely when disabled.
    pub structures_enabled: bool,
    /// Seed structure starts with the 48 bit LCG, as vanilla does. Disable to use xoroshiro.
    pub legacy_random_source: bool,
    /// Root of the datapack holding `data/<namespace>/worldgen/...`.
    pub datapack_path: PathBuf,
    /// Worker threads for structure scanning, 0 lets rayon decide.
    pub locator_threads: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            structures_enabled: true,
            legacy_random_source: true,
            datapack_path: PathBuf::from("datapack"),
            locator_threads: 0,
        }
    }
}

impl LoadConfiguration for GenerationConfig {
    fn file_name() -> &'static str {
        CONFIG_FILE
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.datapack_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "datapack_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "test_helper")]
impl GenerationConfig {
    pub fn for_datapack(datapack_path: impl Into<PathBuf>) -> Self {
        Self {
            datapack_path: datapack_path.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use temp_dir::TempDir;

    use super::*;

    #[test]
    fn writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = GenerationConfig::load(dir.path()).unwrap();
        assert_eq!(config, GenerationConfig::default());
        assert!(config.legacy_random_source);
        assert!(dir.path().join(CONFIG_FILE).exists());

        let again = GenerationConfig::load(dir.path()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "legacy_random_source = false\nlocator_threads = 4\n",
        )
        .unwrap();
        let config = GenerationConfig::load(dir.path()).unwrap();
        assert!(!config.legacy_random_source);
        assert!(config.structures_enabled);
        assert_eq!(config.locator_threads, 4);
        assert_eq!(config.datapack_path, PathBuf::from("datapack"));
    }

    #[test]
    fn rejects_garbage_and_empty_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "structures_enabled = \"yes\"").unwrap();
        assert!(matches!(
            GenerationConfig::load(dir.path()),
            Err(ConfigError::Parse { .. })
        ));

        fs::write(dir.path().join(CONFIG_FILE), "datapack_path = \"\"").unwrap();
        assert!(matches!(
            GenerationConfig::load(dir.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
