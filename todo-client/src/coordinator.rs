use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use todo_core::models::{NewTodo, SyncStatus, Todo, TodoPatch};

use crate::cache::CacheMirror;
use crate::errors::ClientResult;
use crate::events::EventDispatcher;
use crate::gateway::TableGateway;
use crate::store::ItemStore;

/// Orchestrates fetch, change subscription, and mutating operations between
/// the in-memory store and the remote table gateway.
///
/// Every local mutation writes through to the cache mirror. Gateway failures
/// never propagate past an operation: writes are applied locally anyway and
/// the affected item is marked `Pending`, loads fall back to the cached
/// snapshot. The divergence this produces is deliberate; there is no retry
/// and no reconciliation when connectivity returns.
pub struct SyncCoordinator<G: TableGateway> {
    gateway: Arc<G>,
    store: Arc<Mutex<ItemStore>>,
    cache: Arc<CacheMirror>,
    events: Arc<EventDispatcher>,
    loading: Arc<AtomicBool>,
    saving: Arc<AtomicBool>,
}

impl<G: TableGateway> Clone for SyncCoordinator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            store: self.store.clone(),
            cache: self.cache.clone(),
            events: self.events.clone(),
            loading: self.loading.clone(),
            saving: self.saving.clone(),
        }
    }
}

/// Handle for an active change subscription. `unsubscribe` must be called
/// exactly once on teardown; it stops the refetch task and drops the
/// gateway-side stream.
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn unsubscribe(self) {
        self.task.abort();
    }
}

impl<G: TableGateway + 'static> SyncCoordinator<G> {
    pub fn new(gateway: Arc<G>, cache: Arc<CacheMirror>) -> Self {
        Self {
            gateway,
            store: Arc::new(Mutex::new(ItemStore::new())),
            cache,
            events: Arc::new(EventDispatcher::new()),
            loading: Arc::new(AtomicBool::new(false)),
            saving: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn events(&self) -> Arc<EventDispatcher> {
        self.events.clone()
    }

    /// True while a fetch is in flight. A gateway call that never resolves
    /// leaves this stuck true.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Relaxed)
    }

    pub async fn items(&self) -> Vec<Todo> {
        self.store.lock().await.snapshot()
    }

    /// Fetch the full collection (newest first) and replace the store
    /// wholesale. On gateway failure, fall back to the cached snapshot
    /// verbatim. Concurrent calls are not sequenced; the last one to resolve
    /// wins.
    pub async fn load_all(&self) {
        self.loading.store(true, Ordering::Relaxed);

        match self.gateway.list().await {
            Ok(items) => {
                let count = items.len();
                let mut store = self.store.lock().await;
                store.replace_all(items);
                self.mirror(store.items()).await;
                drop(store);

                tracing::info!("Fetched {} items from gateway", count);
                self.events.emit_refreshed(count);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch collection: {}. Falling back to cache", e);
                self.events.emit_sync_failed("load");

                match self.cache.load().await {
                    Ok(Some(items)) => {
                        let count = items.len();
                        self.store.lock().await.replace_all(items);
                        tracing::info!("Restored {} items from cache snapshot", count);
                        self.events.emit_refreshed(count);
                    }
                    Ok(None) => {
                        tracing::warn!("No cache snapshot available");
                    }
                    Err(cache_err) => {
                        tracing::error!("Failed to read cache snapshot: {}", cache_err);
                    }
                }
            }
        }

        self.loading.store(false, Ordering::Relaxed);
    }

    /// Subscribe to the gateway's change stream and refetch the whole
    /// collection on every notification. Notifications are not queued or
    /// coalesced.
    pub async fn watch(&self) -> ClientResult<WatchHandle> {
        let mut changes = self.gateway.subscribe().await?;
        let coordinator = self.clone();

        let task = tokio::spawn(async move {
            while let Some(event) = changes.recv().await {
                tracing::debug!("Change notification: {:?}", event);
                coordinator.load_all().await;
            }
            tracing::debug!("Change stream closed");
        });

        Ok(WatchHandle { task })
    }

    /// Insert a new item and prepend the gateway-assigned record. Input whose
    /// text trims to empty is rejected before any call is made. On gateway
    /// failure a local record is synthesized instead (client id, `Pending`);
    /// it is never retried.
    pub async fn create(&self, new: NewTodo) -> Option<Todo> {
        if new.text.trim().is_empty() {
            tracing::debug!("Rejected create with empty text");
            return None;
        }

        self.saving.store(true, Ordering::Relaxed);

        let todo = match self.gateway.insert(new.clone()).await {
            Ok(todo) => todo,
            Err(e) => {
                tracing::warn!("Failed to insert via gateway: {}. Keeping record locally", e);
                self.events.emit_sync_failed("create");
                Todo {
                    id: Uuid::new_v4(),
                    text: new.text,
                    completed: false,
                    created_at: Utc::now(),
                    updated_at: None,
                    priority: new.priority,
                    category: new.category,
                    starred: false,
                    sync_status: SyncStatus::Pending,
                }
            }
        };

        let mut store = self.store.lock().await;
        store.prepend(todo.clone());
        self.mirror(store.items()).await;
        drop(store);

        self.events.emit_created(todo.id);
        self.saving.store(false, Ordering::Relaxed);
        Some(todo)
    }

    /// Flip the completed flag. The flip is applied locally regardless of the
    /// gateway outcome. False when the id is unknown.
    pub async fn toggle_complete(&self, id: Uuid) -> bool {
        let Some(current) = self.store.lock().await.get(&id).map(|t| t.completed) else {
            return false;
        };

        let flipped = !current;
        let status = self
            .push_update(id, TodoPatch::completed(flipped), "toggle")
            .await;

        let mut store = self.store.lock().await;
        store.apply(&id, |t| {
            t.completed = flipped;
            t.updated_at = Some(Utc::now());
            t.sync_status = status;
        });
        self.mirror(store.items()).await;
        drop(store);

        self.events.emit_updated(id);
        true
    }

    /// Flip the starred flag, with the same unconditional local apply as
    /// `toggle_complete`.
    pub async fn toggle_star(&self, id: Uuid) -> bool {
        let Some(current) = self.store.lock().await.get(&id).map(|t| t.starred) else {
            return false;
        };

        let flipped = !current;
        let status = self.push_update(id, TodoPatch::starred(flipped), "star").await;

        let mut store = self.store.lock().await;
        store.apply(&id, |t| {
            t.starred = flipped;
            t.updated_at = Some(Utc::now());
            t.sync_status = status;
        });
        self.mirror(store.items()).await;
        drop(store);

        self.events.emit_updated(id);
        true
    }

    /// Apply a partial update (text, priority, category, ...) to one item,
    /// locally and on the gateway. False when the id is unknown.
    pub async fn update(&self, id: Uuid, patch: TodoPatch) -> bool {
        if self.store.lock().await.get(&id).is_none() {
            return false;
        }

        let status = self.push_update(id, patch.clone(), "update").await;

        let mut store = self.store.lock().await;
        store.apply(&id, |t| {
            patch.apply_to(t);
            t.sync_status = status;
        });
        self.mirror(store.items()).await;
        drop(store);

        self.events.emit_updated(id);
        true
    }

    /// Delete one item. The local copy is removed even when the gateway call
    /// fails.
    pub async fn delete(&self, id: Uuid) -> bool {
        if let Err(e) = self.gateway.delete(id).await {
            tracing::warn!("Failed to delete {} via gateway: {}. Removing locally", id, e);
            self.events.emit_sync_failed("delete");
        }

        let mut store = self.store.lock().await;
        let removed = store.remove(&id);
        self.mirror(store.items()).await;
        drop(store);

        if removed {
            self.events.emit_deleted(id);
        }
        removed
    }

    /// Delete every completed item, one gateway call each. Individual
    /// failures are logged; the local collection is filtered as if all
    /// succeeded. Returns how many items were dropped locally.
    pub async fn clear_completed(&self) -> usize {
        let completed: Vec<Uuid> = {
            let store = self.store.lock().await;
            store.items().iter().filter(|t| t.completed).map(|t| t.id).collect()
        };

        for id in &completed {
            if let Err(e) = self.gateway.delete(*id).await {
                tracing::warn!("Failed to delete completed item {} via gateway: {}", id, e);
                self.events.emit_sync_failed("clear_completed");
            }
        }

        let mut store = self.store.lock().await;
        store.retain(|t| !t.completed);
        self.mirror(store.items()).await;
        drop(store);

        for id in &completed {
            self.events.emit_deleted(*id);
        }
        completed.len()
    }

    async fn push_update(&self, id: Uuid, patch: TodoPatch, action: &str) -> SyncStatus {
        match self.gateway.update(id, patch).await {
            Ok(_) => SyncStatus::Synced,
            Err(e) => {
                tracing::warn!(
                    "Failed to push {} for {} to gateway: {}. Applying locally anyway",
                    action,
                    id,
                    e
                );
                self.events.emit_sync_failed(action);
                SyncStatus::Pending
            }
        }
    }

    /// Write-through snapshot; cache failures are logged, never surfaced.
    async fn mirror(&self, items: &[Todo]) {
        if let Err(e) = self.cache.save(items).await {
            tracing::warn!("Failed to write cache snapshot: {}", e);
        }
    }
}
