mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./reelhouse.toml",
        "~/.config/reelhouse/config.toml",
        "/etc/reelhouse/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if !config.library.root.exists() {
        tracing::warn!("Library root does not exist: {:?}", config.library.root);
    }

    if config.library.extensions.is_empty() {
        anyhow::bail!("Library extension allow-list cannot be empty");
    }

    if let Some(key) = &config.tmdb.api_key {
        if key.trim().is_empty() {
            anyhow::bail!("TMDB API key is set but empty");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.library.extensions.contains(&"mp4".to_string()));
        assert!(config.tmdb.api_key.is_none());
    }

    #[test]
    fn load_config_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[library]
root = "/srv/media"
extensions = ["mp4", "mkv"]

[tmdb]
api_key = "abc123"
language = "fr-FR"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.library.root, std::path::PathBuf::from("/srv/media"));
        assert_eq!(config.library.extensions, vec!["mp4", "mkv"]);
        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.tmdb.language, "fr-FR");
    }

    #[test]
    fn rejects_port_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server]\nport = 0\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn rejects_empty_extension_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[library]\nextensions = []\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
