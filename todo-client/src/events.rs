use std::sync::Mutex;

use uuid::Uuid;

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The collection was replaced wholesale (fetch or cache fallback).
    Refreshed { count: usize },
    Created(Uuid),
    Updated(Uuid),
    Deleted(Uuid),
    /// A gateway call failed; `action` names the operation category for a
    /// user-visible banner. The local mutation was still applied.
    SyncFailed { action: String },
}

type Callback = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// Callback registry for store events.
pub struct EventDispatcher {
    callbacks: Mutex<Vec<Callback>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn on<F>(&self, callback: F)
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        match self.callbacks.lock() {
            Ok(mut callbacks) => callbacks.push(Box::new(callback)),
            Err(_) => tracing::error!("Failed to acquire callback lock for registration"),
        }
    }

    pub fn emit(&self, event: StoreEvent) {
        let callbacks = match self.callbacks.lock() {
            Ok(callbacks) => callbacks,
            Err(_) => {
                tracing::error!("Failed to acquire callback lock for event emission");
                return;
            }
        };

        for callback in callbacks.iter() {
            callback(&event);
        }
    }

    pub fn emit_refreshed(&self, count: usize) {
        self.emit(StoreEvent::Refreshed { count });
    }

    pub fn emit_created(&self, id: Uuid) {
        self.emit(StoreEvent::Created(id));
    }

    pub fn emit_updated(&self, id: Uuid) {
        self.emit(StoreEvent::Updated(id));
    }

    pub fn emit_deleted(&self, id: Uuid) {
        self.emit(StoreEvent::Deleted(id));
    }

    pub fn emit_sync_failed(&self, action: &str) {
        self.emit(StoreEvent::SyncFailed {
            action: action.to_string(),
        });
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
