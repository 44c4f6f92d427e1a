//! Typed host-domain contracts shared by preference-store consumers and native adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the application
//! context contract, the process-wide application registry, and preference-store service traits
//! while concrete file-backed adapters live in `platform_host_native`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod context;
pub mod storage;

pub use application::{application_registry, ApplicationListener, ApplicationRegistry};
pub use context::{
    ApplicationContext, ApplicationContextProvider, ContextError, StaticContextProvider,
    UnavailableContextProvider, SHARED_PREFS_DIR,
};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsOpener, MemoryPrefsStore, PrefsAccessMode,
    PrefsStore, PrefsStoreFuture, PrefsStoreOpener, SharedPrefsStore,
};
