//! Injectable accessor that opens the shared preference store once and caches the handle.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use platform_host::{
    application_registry, ApplicationContextProvider, ContextError, PrefsAccessMode,
    PrefsStoreOpener, SharedPrefsStore,
};
use platform_host_native::FilePrefsOpener;
use thiserror::Error;

/// Name of the application-wide preference store.
pub const PREFS_STORE_NAME: &str = "prefs";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure to obtain the shared preference store.
pub enum PreferencesError {
    /// The context provider could not supply an application context.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// The platform refused to open the named store.
    #[error("failed to open preference store `{name}`: {message}")]
    Open {
        /// Store name passed to the opener.
        name: String,
        /// Opener error text.
        message: String,
    },
}

/// Owner of the application's shared preference store handle.
///
/// The handle is opened on the first successful call to
/// [`PreferencesManager::shared_preferences`] and reused for the lifetime of the manager.
/// Concurrent first callers block until one of them finishes opening the store, so exactly one
/// handle is ever created. A failed attempt leaves the manager uninitialized and the next call
/// tries again.
pub struct PreferencesManager {
    context_provider: Arc<dyn ApplicationContextProvider>,
    opener: Arc<dyn PrefsStoreOpener>,
    shared_prefs: OnceCell<SharedPrefsStore>,
}

impl std::fmt::Debug for PreferencesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesManager")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl PreferencesManager {
    /// Creates a manager that resolves the application through `context_provider` and opens
    /// stores with `opener`.
    pub fn new(
        context_provider: impl ApplicationContextProvider + 'static,
        opener: impl PrefsStoreOpener + 'static,
    ) -> Self {
        Self {
            context_provider: Arc::new(context_provider),
            opener: Arc::new(opener),
            shared_prefs: OnceCell::new(),
        }
    }

    /// Manager wired to the process-wide application registry and file-backed stores.
    pub fn with_defaults() -> Self {
        Self::new(application_registry(), FilePrefsOpener)
    }

    /// Returns the shared preference store, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Context`] when no application context is available yet and
    /// [`PreferencesError::Open`] when the store cannot be opened. Neither is cached.
    pub fn shared_preferences(&self) -> Result<&SharedPrefsStore, PreferencesError> {
        self.shared_prefs
            .get_or_try_init(|| self.open_shared_preferences())
    }

    /// Returns the cached handle without attempting to open it.
    pub fn cached(&self) -> Option<&SharedPrefsStore> {
        self.shared_prefs.get()
    }

    /// Returns `true` once the shared store has been opened.
    pub fn is_initialized(&self) -> bool {
        self.shared_prefs.get().is_some()
    }

    fn open_shared_preferences(&self) -> Result<SharedPrefsStore, PreferencesError> {
        let context = self.context_provider.application_context().map_err(|err| {
            tracing::debug!(error = %err, "application context unavailable for shared preferences");
            err
        })?;
        let store = self
            .opener
            .open_prefs(&context, PREFS_STORE_NAME, PrefsAccessMode::Private)
            .map_err(|message| PreferencesError::Open {
                name: PREFS_STORE_NAME.to_string(),
                message,
            })?;
        tracing::debug!(
            app_id = context.app_id(),
            store = PREFS_STORE_NAME,
            "shared preference store initialized"
        );
        Ok(store)
    }
}
