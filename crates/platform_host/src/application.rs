//! Process-wide registry where the running application publishes its context.
//!
//! Hosts call [`ApplicationRegistry::register`] once during startup. Services that need the
//! application before that point subscribe with [`ApplicationRegistry::listen`] and are invoked
//! as soon as the context is published.

use std::sync::{Mutex, OnceLock, PoisonError};

use crate::context::{ApplicationContext, ApplicationContextProvider, ContextError};

/// Callback invoked once with the registered application context.
pub type ApplicationListener = Box<dyn FnOnce(&ApplicationContext) + Send>;

/// Registry holding the application context and listeners waiting for it.
pub struct ApplicationRegistry {
    application: OnceLock<ApplicationContext>,
    pending: Mutex<Vec<ApplicationListener>>,
}

impl std::fmt::Debug for ApplicationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationRegistry")
            .field("application", &self.application.get())
            .finish_non_exhaustive()
    }
}

impl Default for ApplicationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            application: OnceLock::new(),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Publishes the application context and runs queued listeners in subscription order.
    ///
    /// Returns `false` without touching the registry when a context was already registered.
    pub fn register(&self, context: ApplicationContext) -> bool {
        if self.application.set(context).is_err() {
            tracing::warn!("application already registered; ignoring second registration");
            return false;
        }
        let Some(context) = self.application.get() else {
            return false;
        };
        tracing::debug!(app_id = context.app_id(), "application registered");

        let listeners = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for listener in listeners {
            listener(context);
        }
        true
    }

    /// Runs `listener` with the application context, now if registered or on registration.
    pub fn listen(&self, listener: impl FnOnce(&ApplicationContext) + Send + 'static) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match self.application.get() {
            Some(context) => {
                drop(pending);
                listener(context);
            }
            None => pending.push(Box::new(listener)),
        }
    }

    /// Returns the registered application context, if any.
    pub fn application(&self) -> Option<ApplicationContext> {
        self.application.get().cloned()
    }

    /// Returns `true` once a context has been registered.
    pub fn is_registered(&self) -> bool {
        self.application.get().is_some()
    }
}

impl ApplicationContextProvider for ApplicationRegistry {
    fn application_context(&self) -> Result<ApplicationContext, ContextError> {
        self.application().ok_or(ContextError::NotInitialized)
    }
}

static APPLICATION_REGISTRY: ApplicationRegistry = ApplicationRegistry::new();

/// Returns the process-wide application registry.
pub fn application_registry() -> &'static ApplicationRegistry {
    &APPLICATION_REGISTRY
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn context() -> ApplicationContext {
        ApplicationContext::new("com.example.registry", "/tmp/registry")
    }

    #[test]
    fn unregistered_registry_reports_not_initialized() {
        let registry = ApplicationRegistry::new();
        assert!(!registry.is_registered());
        assert_eq!(
            registry.application_context(),
            Err(ContextError::NotInitialized)
        );
    }

    #[test]
    fn queued_listeners_fire_once_in_order_on_registration() {
        let registry = ApplicationRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            registry.listen(move |ctx| {
                seen.lock()
                    .expect("seen lock")
                    .push(format!("{tag}:{}", ctx.app_id()));
            });
        }
        assert!(seen.lock().expect("seen lock").is_empty());

        assert!(registry.register(context()));
        assert_eq!(
            *seen.lock().expect("seen lock"),
            vec![
                "first:com.example.registry".to_string(),
                "second:com.example.registry".to_string()
            ]
        );
    }

    #[test]
    fn late_listener_runs_immediately() {
        let registry = ApplicationRegistry::new();
        registry.register(context());

        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        registry.listen(move |ctx| {
            *sink.lock().expect("sink lock") = Some(ctx.clone());
        });
        assert_eq!(*seen.lock().expect("seen lock"), Some(context()));
    }

    #[test]
    fn second_registration_is_ignored() {
        let registry = ApplicationRegistry::new();
        assert!(registry.register(context()));
        assert!(!registry.register(ApplicationContext::new("other", "/tmp/other")));
        assert_eq!(registry.application_context(), Ok(context()));
    }
}
