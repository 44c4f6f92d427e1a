//! Process-wide access to a single [`PreferencesManager`].
//!
//! Composition roots should prefer owning a [`PreferencesManager`] and passing it down. This
//! module serves callers that cannot be handed one: the first of [`install_preferences_manager`]
//! or [`preferences_manager`] to run fixes the process instance.

use once_cell::sync::OnceCell;
use platform_host::SharedPrefsStore;

use crate::manager::{PreferencesError, PreferencesManager};

static PREFERENCES_MANAGER: OnceCell<PreferencesManager> = OnceCell::new();

/// Installs `manager` as the process instance.
///
/// # Errors
///
/// Hands `manager` back when a process instance already exists.
pub fn install_preferences_manager(
    manager: PreferencesManager,
) -> Result<&'static PreferencesManager, PreferencesManager> {
    PREFERENCES_MANAGER
        .try_insert(manager)
        .map_err(|(_, rejected)| rejected)
}

/// Returns the process instance, creating [`PreferencesManager::with_defaults`] if none was
/// installed.
pub fn preferences_manager() -> &'static PreferencesManager {
    PREFERENCES_MANAGER.get_or_init(PreferencesManager::with_defaults)
}

/// Returns the process-wide shared preference store.
///
/// # Errors
///
/// Propagates [`PreferencesError`] from the first open attempt. Later calls retry.
pub fn shared_preferences() -> Result<&'static SharedPrefsStore, PreferencesError> {
    preferences_manager().shared_preferences()
}
