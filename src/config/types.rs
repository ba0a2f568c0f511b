use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static assets to serve as a fallback (web UI build).
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Root directory containing the media files. Every identifier served
    /// over HTTP must resolve to a path inside this directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File extensions (lowercase, no dot) included in the library.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from("./media")
}

fn default_extensions() -> Vec<String> {
    [
        "mp4", "m4v", "mkv", "webm", "avi", "mov", "ts", "m2ts", "mp3", "m4a", "flac", "wav",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key. Catalog endpoints return 503 when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// ISO-639-1 language tag for catalog results.
    #[serde(default = "default_language")]
    pub language: String,

    /// Override for the API base URL (used by tests).
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: default_language(),
            base_url: None,
        }
    }
}
