//! Reelhouse - self-hosted media library server
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod server;
pub mod streaming;
