use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Key directory settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Key directory override (defaults to ~/.ssh)
    #[serde(default)]
    pub directory: Option<String>,
    /// Show keys that are not loaded in the agent
    #[serde(default = "default_true")]
    pub show_inactive: bool,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            directory: None,
            show_inactive: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// OpenSSH binary overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to ssh-keygen
    #[serde(default)]
    pub ssh_keygen: Option<String>,
    /// Path to ssh-add
    #[serde(default)]
    pub ssh_add: Option<String>,
}

/// Window appearance and behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Enable dark theme
    #[serde(default = "default_true")]
    pub dark_theme: bool,
    /// How long the "Copied!" feedback stays visible, in milliseconds.
    /// A pending removal confirmation stays up until confirmed or cancelled.
    #[serde(default = "default_trigger_reset_ms")]
    pub trigger_reset_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_theme: true,
            trigger_reset_ms: default_trigger_reset_ms(),
        }
    }
}

fn default_trigger_reset_ms() -> u64 {
    1500
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "keydeck", "Keydeck")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config = Self::from_toml(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        std::fs::write(&path, self.to_toml()?)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Key directory override, if set
    pub fn key_dir_override(&self) -> Option<&str> {
        self.keys.directory.as_deref()
    }

    /// Read a value by dotted key (e.g. "keys.directory")
    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["keys", "directory"] => Ok(self
                .keys
                .directory
                .clone()
                .unwrap_or_else(|| "<not set>".to_string())),
            ["keys", "show_inactive"] => Ok(self.keys.show_inactive.to_string()),
            ["tools", "ssh_keygen"] => Ok(self
                .tools
                .ssh_keygen
                .clone()
                .unwrap_or_else(|| "<not set>".to_string())),
            ["tools", "ssh_add"] => Ok(self
                .tools
                .ssh_add
                .clone()
                .unwrap_or_else(|| "<not set>".to_string())),
            ["ui", "dark_theme"] => Ok(self.ui.dark_theme.to_string()),
            ["ui", "trigger_reset_ms"] => Ok(self.ui.trigger_reset_ms.to_string()),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
    }

    /// Set a value by dotted key. An empty value clears optional paths.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        let optional = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };

        match parts.as_slice() {
            ["keys", "directory"] => self.keys.directory = optional(value),
            ["keys", "show_inactive"] => self.keys.show_inactive = value.parse()?,
            ["tools", "ssh_keygen"] => self.tools.ssh_keygen = optional(value),
            ["tools", "ssh_add"] => self.tools.ssh_add = optional(value),
            ["ui", "dark_theme"] => self.ui.dark_theme = value.parse()?,
            ["ui", "trigger_reset_ms"] => self.ui.trigger_reset_ms = value.parse()?,
            _ => anyhow::bail!("Unknown or read-only config key: {}", key),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.keys.directory, None);
        assert!(config.keys.show_inactive);
        assert!(config.ui.dark_theme);
        assert_eq!(config.ui.trigger_reset_ms, 1500);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("[keys]\ndirectory = \"/home/me/keys\"\n").unwrap();
        assert_eq!(config.key_dir_override(), Some("/home/me/keys"));
        assert!(config.keys.show_inactive);
        assert_eq!(config.tools, ToolsConfig::default());
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.tools.ssh_add = Some("/opt/bin/ssh-add".to_string());
        config.ui.dark_theme = false;

        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_get_set_values() {
        let mut config = Config::default();
        assert_eq!(config.get_value("keys.directory").unwrap(), "<not set>");

        config.set_value("keys.directory", "/srv/keys").unwrap();
        assert_eq!(config.get_value("keys.directory").unwrap(), "/srv/keys");

        config.set_value("keys.directory", "").unwrap();
        assert_eq!(config.keys.directory, None);

        config.set_value("ui.trigger_reset_ms", "250").unwrap();
        assert_eq!(config.ui.trigger_reset_ms, 250);

        assert!(config.set_value("ui.dark_theme", "maybe").is_err());
        assert!(config.set_value("ui.colour", "red").is_err());
        assert!(config.get_value("nope").is_err());
    }
}
