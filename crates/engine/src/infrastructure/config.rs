//! Engine configuration from environment variables.

use std::path::PathBuf;

/// Default cap on the number of override dice.
pub const DEFAULT_MAX_OVERRIDE_DICE: usize = 2;
/// Default portrait upload limit (5 MiB).
pub const DEFAULT_MAX_PORTRAIT_BYTES: usize = 5 * 1024 * 1024;
/// Default buffer size for each observer's message channel.
pub const DEFAULT_OBSERVER_CHANNEL_BUFFER: usize = 256;

/// Runtime configuration for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Comma separated origins, or `*`. CORS is off when unset.
    pub cors_allowed_origins: Option<String>,
    /// Directory portraits are written to
    pub portrait_dir: PathBuf,
    /// URL prefix the portrait directory is served under
    pub portrait_url_prefix: String,
    pub max_override_dice: usize,
    pub max_portrait_bytes: usize,
    pub observer_channel_buffer: usize,
    pub seed_default_character: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            cors_allowed_origins: None,
            portrait_dir: PathBuf::from("uploads/portraits"),
            portrait_url_prefix: "/uploads/portraits".to_string(),
            max_override_dice: DEFAULT_MAX_OVERRIDE_DICE,
            max_portrait_bytes: DEFAULT_MAX_PORTRAIT_BYTES,
            observer_channel_buffer: DEFAULT_OBSERVER_CHANNEL_BUFFER,
            seed_default_character: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unparseable values
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let parse_or = |key: &str, default: usize| {
            get(key)
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: get("SERVER_PORT")
                .or_else(|| get("PORT"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            portrait_dir: get("PORTRAIT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.portrait_dir),
            portrait_url_prefix: defaults.portrait_url_prefix,
            max_override_dice: parse_or("MAX_OVERRIDE_DICE", defaults.max_override_dice),
            max_portrait_bytes: parse_or("MAX_PORTRAIT_BYTES", defaults.max_portrait_bytes),
            observer_channel_buffer: parse_or(
                "OBSERVER_CHANNEL_BUFFER",
                defaults.observer_channel_buffer,
            ),
            seed_default_character: get("SEED_DEFAULT_CHARACTER")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.seed_default_character),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), EngineConfig::default());
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        assert_eq!(config_from(&[("PORT", "8080")]).server_port, 8080);
        assert_eq!(
            config_from(&[("PORT", "8080"), ("SERVER_PORT", "9000")]).server_port,
            9000
        );
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config_from(&[("MAX_OVERRIDE_DICE", "lots"), ("MAX_PORTRAIT_BYTES", "0")]);
        assert_eq!(config.max_override_dice, DEFAULT_MAX_OVERRIDE_DICE);
        assert_eq!(config.max_portrait_bytes, DEFAULT_MAX_PORTRAIT_BYTES);
    }

    #[test]
    fn seeding_can_be_disabled() {
        assert!(!config_from(&[("SEED_DEFAULT_CHARACTER", "false")]).seed_default_character);
        assert!(config_from(&[("SEED_DEFAULT_CHARACTER", "yes")]).seed_default_character);
    }

    #[test]
    fn overrides_apply() {
        let config = config_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("PORTRAIT_DIR", "/tmp/portraits"),
            ("MAX_OVERRIDE_DICE", "4"),
            ("CORS_ALLOWED_ORIGINS", " http://localhost:5173 "),
        ]);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.portrait_dir, PathBuf::from("/tmp/portraits"));
        assert_eq!(config.max_override_dice, 4);
        assert_eq!(
            config.cors_allowed_origins.as_deref(),
            Some("http://localhost:5173")
        );
    }
}
