//! Shared handle to the application's private `"prefs"` preference store.
//!
//! [`PreferencesManager`] resolves the application context through an injected
//! [`platform_host::ApplicationContextProvider`], opens the store through a
//! [`platform_host::PrefsStoreOpener`], and caches the resulting handle. The [`global`] module
//! exposes one manager per process for callers without access to the composition root.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod global;
pub mod manager;

pub use global::{install_preferences_manager, preferences_manager, shared_preferences};
pub use manager::{PreferencesError, PreferencesManager, PREFS_STORE_NAME};
