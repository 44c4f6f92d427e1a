//! Native (filesystem-backed) implementations of [`platform_host`] service contracts.
//!
//! - `storage::file_prefs`: named JSON preference stores under the application's data dir
//! - `config`: TOML host configuration that resolves the [`platform_host::ApplicationContext`]

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod storage;

pub use config::{HostConfig, HostConfigError, DEFAULT_APP_ID};
pub use storage::file_prefs::{FilePrefsOpener, FilePrefsStore};
