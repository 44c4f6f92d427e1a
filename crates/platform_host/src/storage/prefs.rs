//! Lightweight preference storage contracts and adapters.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::context::ApplicationContext;

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shared handle to an opened preference store.
pub type SharedPrefsStore = Arc<dyn PrefsStore>;

/// Host service for lightweight preference values (JSON stored as text per key).
pub trait PrefsStore: Send + Sync {
    /// Loads a raw JSON string for a preference key.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Saves a raw JSON string for a preference key.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Deletes a preference key.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Visibility of a named preference store.
pub enum PrefsAccessMode {
    /// Readable and writable by the owning application only.
    #[default]
    Private,
}

/// Platform API that opens (or creates) named preference stores for an application.
pub trait PrefsStoreOpener: Send + Sync {
    /// Opens the store `name` scoped to `context` with the requested access mode.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be created or opened.
    fn open_prefs(
        &self,
        context: &ApplicationContext,
        name: &str,
        mode: PrefsAccessMode,
    ) -> Result<SharedPrefsStore, String>;
}

impl<O: PrefsStoreOpener + ?Sized> PrefsStoreOpener for Arc<O> {
    fn open_prefs(
        &self,
        context: &ApplicationContext,
        name: &str,
        mode: PrefsAccessMode,
    ) -> Result<SharedPrefsStore, String> {
        (**self).open_prefs(context, name, mode)
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
pub struct MemoryPrefsStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move {
            Ok(self
                .inner
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned())
        })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory opener that hands out one [`MemoryPrefsStore`] per `(app_id, name)` pair.
///
/// Reopening a store yields a new handle over the same data, mirroring how a platform store
/// keeps its contents between lookups.
pub struct MemoryPrefsOpener {
    stores: Arc<Mutex<HashMap<(String, String), MemoryPrefsStore>>>,
}

impl PrefsStoreOpener for MemoryPrefsOpener {
    fn open_prefs(
        &self,
        context: &ApplicationContext,
        name: &str,
        _mode: PrefsAccessMode,
    ) -> Result<SharedPrefsStore, String> {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        let store = stores
            .entry((context.app_id().to_string(), name.to_string()))
            .or_default()
            .clone();
        Ok(Arc::new(store))
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or store save fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw).await
}
