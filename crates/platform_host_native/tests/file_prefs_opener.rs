use futures::executor::block_on;
use platform_host::{
    load_pref_with, save_pref_with, ApplicationContext, PrefsAccessMode, PrefsStoreOpener,
};
use platform_host_native::{FilePrefsOpener, FilePrefsStore, HostConfig};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("{prefix}_{}_{}", process::id(), nanos));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

#[test]
fn opener_places_store_under_context_prefs_dir() {
    let root = temp_dir("file_prefs_opener_layout");
    let context = ApplicationContext::new("com.example.layout", &root);

    let store = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("open prefs");
    block_on(store.save_pref("launch_count", "1")).expect("save");

    assert!(root.join("shared_prefs").join("prefs.json").is_file());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn fresh_lookup_sees_values_written_through_earlier_handle() {
    let root = temp_dir("file_prefs_opener_reopen");
    let context = ApplicationContext::new("com.example.reopen", &root);

    let first = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("open prefs");
    block_on(save_pref_with(&*first, "user.name", &"ada")).expect("save typed");

    let second = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("reopen prefs");
    let name: Option<String> =
        block_on(load_pref_with(&*second, "user.name")).expect("load typed");
    assert_eq!(name.as_deref(), Some("ada"));

    block_on(second.delete_pref("user.name")).expect("delete");
    assert_eq!(
        block_on(first.load_pref("user.name")).expect("load after delete"),
        None
    );

    let _ = fs::remove_dir_all(root);
}

#[test]
fn stores_with_different_names_are_isolated() {
    let root = temp_dir("file_prefs_opener_names");
    let context = ApplicationContext::new("com.example.names", &root);

    let prefs = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("open prefs");
    let other = FilePrefsOpener
        .open_prefs(&context, "other", PrefsAccessMode::Private)
        .expect("open other");
    block_on(prefs.save_pref("theme", "\"dark\"")).expect("save");
    assert_eq!(block_on(other.load_pref("theme")).expect("load"), None);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn opener_rejects_path_like_store_names() {
    let root = temp_dir("file_prefs_opener_invalid");
    let context = ApplicationContext::new("com.example.invalid", &root);

    let err = FilePrefsOpener
        .open_prefs(&context, "../escape", PrefsAccessMode::Private)
        .err()
        .expect("path-like name should fail");
    assert_eq!(err, "invalid preference store name `../escape`");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn host_config_context_feeds_opener() {
    let root = temp_dir("file_prefs_opener_config");
    let config = HostConfig {
        app_id: "com.example.config".to_string(),
        data_dir: Some(root.clone()),
    };
    let context = config.application_context().expect("resolve context");

    let store = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("open prefs");
    block_on(store.save_pref("k", "true")).expect("save");
    assert!(root.join("shared_prefs/prefs.json").is_file());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn reopening_a_store_returns_the_same_handle() {
    let root = temp_dir("file_prefs_opener_same_handle");
    let context = ApplicationContext::new("com.example.same", &root);

    let first = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("open prefs");
    let second = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("reopen prefs");
    let other = FilePrefsOpener
        .open_prefs(&context, "other", PrefsAccessMode::Private)
        .expect("open other");
    assert!(Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first, &other));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn concurrent_writers_on_one_store_keep_every_key() {
    const KEYS_PER_WRITER: usize = 100;

    let root = temp_dir("file_prefs_opener_concurrent");
    let context = ApplicationContext::new("com.example.concurrent", &root);

    let via_opener = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("open prefs");
    let reopened = FilePrefsOpener
        .open_prefs(&context, "prefs", PrefsAccessMode::Private)
        .expect("reopen prefs");
    let direct = FilePrefsStore::open(context.prefs_dir(), "prefs", PrefsAccessMode::Private)
        .expect("open store directly");

    thread::scope(|scope| {
        let writers = [
            scope.spawn(|| {
                for i in 0..KEYS_PER_WRITER {
                    block_on(via_opener.save_pref(&format!("a.{i}"), "1")).expect("save a");
                }
            }),
            scope.spawn(|| {
                for i in 0..KEYS_PER_WRITER {
                    block_on(reopened.save_pref(&format!("b.{i}"), "2")).expect("save b");
                }
            }),
            scope.spawn(|| {
                for i in 0..KEYS_PER_WRITER {
                    direct.save(&format!("c.{i}"), "3").expect("save c");
                }
            }),
        ];
        for writer in writers {
            writer.join().expect("writer panicked");
        }
    });

    for prefix in ["a", "b", "c"] {
        for i in 0..KEYS_PER_WRITER {
            let key = format!("{prefix}.{i}");
            assert!(
                direct.load(&key).expect("load").is_some(),
                "lost key {key}"
            );
        }
    }
    let entries: Vec<_> = fs::read_dir(context.prefs_dir())
        .expect("list prefs dir")
        .map(|entry| entry.expect("dir entry").file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("prefs.json")]);

    let _ = fs::remove_dir_all(root);
}
