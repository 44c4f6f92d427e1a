//! Filesystem-backed storage adapters.

pub mod file_prefs;
