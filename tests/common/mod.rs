//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a tempdir-backed media root, a
//! default config, and a full [`AppContext`]. The [`with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use reelhouse::config::Config;
use reelhouse::server::{build_context, create_router, AppContext};
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary media root.
pub struct TestHarness {
    pub ctx: AppContext,
    root: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration and a tempdir root.
    pub fn new() -> Self {
        Self::with_config_mut(|_| {})
    }

    /// Create a harness whose config has been adjusted by `f` (the library
    /// root is always the harness tempdir).
    pub fn with_config_mut(f: impl FnOnce(&mut Config)) -> Self {
        let root = TempDir::new().expect("failed to create media root");
        let mut config = Config::default();
        config.library.root = root.path().to_path_buf();
        f(&mut config);

        let ctx = build_context(config);
        Self { ctx, root }
    }

    /// Create a harness with the TMDB catalog pointed at `base_url`.
    pub fn with_tmdb(base_url: &str) -> Self {
        let base_url = base_url.to_string();
        Self::with_config_mut(move |config| {
            config.tmdb.api_key = Some("test-key".to_string());
            config.tmdb.base_url = Some(base_url);
        })
    }

    /// Path of the media root.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Write a media file at `relative` (parent directories created).
    pub fn write_media(&self, relative: &str, data: &[u8]) -> PathBuf {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create media subdirectory");
        }
        std::fs::write(&path, data).expect("failed to write media fixture");
        path
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::serve(Self::new()).await
    }

    /// Start a server for a harness built with [`TestHarness::with_tmdb`].
    pub async fn with_server_tmdb(base_url: &str) -> (Self, SocketAddr) {
        Self::serve(Self::with_tmdb(base_url)).await
    }

    /// Start a server with an adjusted config on a random port.
    pub async fn with_server_config(f: impl FnOnce(&mut Config)) -> (Self, SocketAddr) {
        Self::serve(Self::with_config_mut(f)).await
    }

    async fn serve(harness: Self) -> (Self, SocketAddr) {
        let app = create_router(harness.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}
