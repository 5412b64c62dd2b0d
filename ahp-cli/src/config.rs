/// Config file loading and creation for the ahp CLI.
///
/// Config lives at ~/.config/ahp/config.toml.
/// All fields are optional. CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default)]
pub struct AhpConfig {
    /// "eigenvector" or "geometric-mean".
    pub method: Option<String>,
    /// "absolute" or "plain" (eigenvector method only).
    pub normalization: Option<String>,
    /// Default scale family for graded judgments.
    pub scale: Option<String>,
    /// Refuse to rank when any pair is missing a judgment.
    pub strict: Option<bool>,
    /// Group aggregation method. Only "AIJ" is supported.
    pub aggregation: Option<String>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# ahp configuration
# All values here can be overridden by CLI flags.

# Weight derivation: \"eigenvector\" (Saaty) or \"geometric-mean\"
# method = \"eigenvector\"

# Eigenvector normalization: \"absolute\" (abs values, then sum) or \"plain\" (signed sum)
# normalization = \"absolute\"

# Scale family for graded judgments: integer, balanced, power, ma-zheng, donegan
# scale = \"integer\"

# Require a judgment for every pair instead of treating missing pairs as indifference
# strict = false

# Group aggregation method (only AIJ is implemented)
# aggregation = \"AIJ\"
";

/// Returns the default config path: ~/.config/ahp/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("ahp").join("config.toml")
}

pub fn parse_config_str(content: &str) -> Result<AhpConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> AhpConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config_str(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            AhpConfig::default()
        }
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let cfg = parse_config_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(cfg.method.is_none());
        assert!(cfg.strict.is_none());
    }

    #[test]
    fn test_parse_config_values() {
        let cfg = parse_config_str("method = \"geometric-mean\"\nscale = \"donegan\"\nstrict = true\n").unwrap();
        assert_eq!(cfg.method.as_deref(), Some("geometric-mean"));
        assert_eq!(cfg.scale.as_deref(), Some("donegan"));
        assert_eq!(cfg.strict, Some(true));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let cfg = parse_config_str("endpoint = \"http://localhost\"\n").unwrap();
        assert!(cfg.method.is_none());
    }
}
