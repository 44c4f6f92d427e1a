//! Application context contracts consumed by platform-scoped services.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory under [`ApplicationContext::data_dir`] that holds named preference stores.
pub const SHARED_PREFS_DIR: &str = "shared_prefs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Handle describing the running application instance.
///
/// Platform-scoped resources such as preference stores are resolved relative to this context.
pub struct ApplicationContext {
    app_id: String,
    data_dir: PathBuf,
}

impl ApplicationContext {
    /// Creates a context for `app_id` whose private data lives under `data_dir`.
    pub fn new(app_id: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_id: app_id.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Stable application identifier.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Root of the application's private data area.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding the application's named preference stores.
    pub fn prefs_dir(&self) -> PathBuf {
        self.data_dir.join(SHARED_PREFS_DIR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure to supply an [`ApplicationContext`].
pub enum ContextError {
    /// The application has not published its context yet.
    #[error("application context is not available: application has not been registered")]
    NotInitialized,
    /// The provider could not build a context.
    #[error("application context is not available: {0}")]
    Unavailable(String),
}

/// Source of the ambient [`ApplicationContext`].
pub trait ApplicationContextProvider: Send + Sync {
    /// Returns the current application context.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when no valid context exists yet.
    fn application_context(&self) -> Result<ApplicationContext, ContextError>;
}

impl<P: ApplicationContextProvider + ?Sized> ApplicationContextProvider for Arc<P> {
    fn application_context(&self) -> Result<ApplicationContext, ContextError> {
        (**self).application_context()
    }
}

impl<P: ApplicationContextProvider + ?Sized> ApplicationContextProvider for &P {
    fn application_context(&self) -> Result<ApplicationContext, ContextError> {
        (**self).application_context()
    }
}

#[derive(Debug, Clone)]
/// Provider that always yields the same context.
pub struct StaticContextProvider {
    context: ApplicationContext,
}

impl StaticContextProvider {
    /// Wraps a fixed context.
    pub fn new(context: ApplicationContext) -> Self {
        Self { context }
    }
}

impl ApplicationContextProvider for StaticContextProvider {
    fn application_context(&self) -> Result<ApplicationContext, ContextError> {
        Ok(self.context.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Provider for hosts that never expose an application context.
pub struct UnavailableContextProvider;

impl ApplicationContextProvider for UnavailableContextProvider {
    fn application_context(&self) -> Result<ApplicationContext, ContextError> {
        Err(ContextError::NotInitialized)
    }
}
