use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use gamevault_core::catalog::DEFAULT_CATALOG_CAPACITY;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "gamevault.toml";

/// Top-level configuration, loaded from `gamevault.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Player records read at startup.
    pub players_file: PathBuf,
    /// Game records read at startup.
    pub games_file: PathBuf,
    /// Default destination of `save`.
    pub output_file: PathBuf,
    pub catalog_capacity: usize,
    /// Layers shown by the `players` command.
    pub display_layers: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            players_file: PathBuf::from("Players.txt"),
            games_file: PathBuf::from("Games.txt"),
            output_file: PathBuf::from("players_output.csv"),
            catalog_capacity: DEFAULT_CATALOG_CAPACITY,
            display_layers: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCapacity,
    ZeroLayers,
    EmptyPath(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "catalog_capacity must be > 0"),
            Self::ZeroLayers => write!(f, "display_layers must be > 0"),
            Self::EmptyPath(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl VaultConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.display_layers == 0 {
            return Err(ConfigError::ZeroLayers);
        }
        for (field, path) in [
            ("players_file", &self.players_file),
            ("games_file", &self.games_file),
            ("output_file", &self.output_file),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath(field));
            }
        }
        Ok(())
    }

    /// Load config from `path` if it exists, then apply env var overrides.
    pub fn load(path: &Path) -> Self {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// [`VaultConfig::load`] with `lookup` standing in for the environment.
    pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<VaultConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to parse config: {e}, using defaults");
                    VaultConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                VaultConfig::default()
            },
        };
        config.apply_env_overrides(lookup);
        config
    }

    /// Apply `GAMEVAULT_*` overrides. `lookup` is the environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("GAMEVAULT_PLAYERS_FILE")
            && !path.is_empty()
        {
            self.players_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("GAMEVAULT_GAMES_FILE")
            && !path.is_empty()
        {
            self.games_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("GAMEVAULT_OUTPUT_FILE")
            && !path.is_empty()
        {
            self.output_file = PathBuf::from(path);
        }
        if let Some(val) = lookup("GAMEVAULT_CATALOG_CAPACITY")
            && let Ok(n) = val.parse::<usize>()
        {
            self.catalog_capacity = n;
        }
        if let Some(val) = lookup("GAMEVAULT_DISPLAY_LAYERS")
            && let Ok(n) = val.parse::<usize>()
        {
            self.display_layers = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_values() {
        let cfg = VaultConfig::default();
        assert_eq!(cfg.players_file, PathBuf::from("Players.txt"));
        assert_eq!(cfg.games_file, PathBuf::from("Games.txt"));
        assert_eq!(cfg.output_file, PathBuf::from("players_output.csv"));
        assert_eq!(cfg.catalog_capacity, 100);
        assert_eq!(cfg.display_layers, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
players_file = "data/players.csv"
catalog_capacity = 5
"#;
        let cfg: VaultConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.players_file, PathBuf::from("data/players.csv"));
        assert_eq!(cfg.catalog_capacity, 5);
        assert_eq!(cfg.games_file, PathBuf::from("Games.txt"));
        assert_eq!(cfg.display_layers, 10);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = VaultConfig {
            catalog_capacity: 0,
            ..VaultConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCapacity));

        let cfg = VaultConfig {
            display_layers: 0,
            ..VaultConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroLayers));

        let cfg = VaultConfig {
            output_file: PathBuf::new(),
            ..VaultConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPath("output_file")));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GAMEVAULT_PLAYERS_FILE", "/tmp/p.txt"),
            ("GAMEVAULT_GAMES_FILE", ""),
            ("GAMEVAULT_CATALOG_CAPACITY", "7"),
            ("GAMEVAULT_DISPLAY_LAYERS", "not-a-number"),
        ]);
        let mut cfg = VaultConfig::default();
        cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.players_file, PathBuf::from("/tmp/p.txt"));
        assert_eq!(cfg.games_file, PathBuf::from("Games.txt"));
        assert_eq!(cfg.catalog_capacity, 7);
        assert_eq!(cfg.display_layers, 10);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = VaultConfig::load_with(Path::new("/nonexistent/gamevault.toml"), |_| None);
        assert_eq!(cfg, VaultConfig::default());
    }

    #[test]
    fn env_overrides_apply_over_missing_file() {
        let cfg = VaultConfig::load_with(Path::new("/nonexistent/gamevault.toml"), |k| {
            (k == "GAMEVAULT_DISPLAY_LAYERS").then(|| "3".to_string())
        });
        assert_eq!(cfg.display_layers, 3);
        assert_eq!(cfg.catalog_capacity, DEFAULT_CATALOG_CAPACITY);
    }
}
