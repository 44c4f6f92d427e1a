use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::executor::block_on;
use platform_host::{
    application_registry, ApplicationContext, ContextError, MemoryPrefsOpener, PrefsAccessMode,
    PrefsStoreOpener, UnavailableContextProvider,
};
use platform_host_native::FilePrefsOpener;
use prefs_manager::{
    install_preferences_manager, preferences_manager, shared_preferences, PreferencesError,
    PreferencesManager, PREFS_STORE_NAME,
};

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("{prefix}_{}_{}", process::id(), nanos));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

// Single test: the process-wide registry and manager cannot be reset between cases.
#[test]
fn process_accessor_waits_for_application_registration() {
    let err = shared_preferences()
        .err()
        .expect("access before registration should fail");
    assert_eq!(err, PreferencesError::Context(ContextError::NotInitialized));
    assert!(!preferences_manager().is_initialized());

    let root = temp_dir("prefs_manager_process");
    let context = ApplicationContext::new("com.example.process", &root);
    assert!(application_registry().register(context.clone()));

    let first = shared_preferences().expect("access after registration");
    let second = shared_preferences().expect("repeat access");
    assert!(Arc::ptr_eq(first, second));
    assert!(std::ptr::eq(preferences_manager(), preferences_manager()));

    block_on(first.save_pref("launch_count", "1")).expect("save through shared handle");
    let fresh = FilePrefsOpener
        .open_prefs(&context, PREFS_STORE_NAME, PrefsAccessMode::Private)
        .expect("fresh lookup");
    assert_eq!(
        block_on(fresh.load_pref("launch_count")).expect("load through fresh lookup"),
        Some("1".to_string())
    );
    assert!(root.join("shared_prefs").join("prefs.json").is_file());

    let rejected = install_preferences_manager(PreferencesManager::new(
        UnavailableContextProvider,
        MemoryPrefsOpener::default(),
    ));
    assert!(rejected.is_err());
    assert!(Arc::ptr_eq(
        shared_preferences().expect("installed instance unchanged"),
        first
    ));

    let _ = fs::remove_dir_all(root);
}
