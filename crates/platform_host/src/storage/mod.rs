//! Storage-domain contracts and lightweight test adapters.

pub mod prefs;
