use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use todo_client::cache::CacheMirror;
use todo_client::coordinator::SyncCoordinator;
use todo_client::gateway::{GatewayError, TableGateway};
use todo_core::models::{NewTodo, Priority, SyncStatus, Todo, TodoPatch, DEFAULT_CATEGORY};
use todo_core::protocol::ChangeEvent;

/// In-memory stand-in for the remote table. Tests flip `offline` to simulate
/// an unreachable gateway and call `notify` to simulate realtime change
/// events from other clients.
pub struct FakeGateway {
    rows: Mutex<Vec<Todo>>,
    offline: AtomicBool,
    senders: Mutex<Vec<mpsc::Sender<ChangeEvent>>>,
}

#[allow(dead_code)]
impl FakeGateway {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            senders: Mutex::new(Vec::new()),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn push_row(&self, todo: Todo) {
        self.rows.lock().unwrap().push(todo);
    }

    pub fn rows(&self) -> Vec<Todo> {
        self.rows.lock().unwrap().clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Broadcast a change event to every live subscription.
    pub fn notify(&self, event: ChangeEvent) {
        for sender in self.senders.lock().unwrap().iter() {
            let _ = sender.try_send(event);
        }
    }

    fn check_reachable(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable("gateway offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TableGateway for FakeGateway {
    async fn list(&self) -> Result<Vec<Todo>, GatewayError> {
        self.check_reachable()?;
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, new: NewTodo) -> Result<Todo, GatewayError> {
        self.check_reachable()?;
        let todo = Todo {
            id: Uuid::new_v4(),
            text: new.text,
            completed: false,
            created_at: Utc::now(),
            updated_at: None,
            priority: new.priority,
            category: new.category,
            starred: false,
            sync_status: SyncStatus::Synced,
        };
        self.rows.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Todo, GatewayError> {
        self.check_reachable()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                patch.apply_to(todo);
                Ok(todo.clone())
            }
            None => Err(GatewayError::NotFound(id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), GatewayError> {
        self.check_reachable()?;
        self.rows.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<ChangeEvent>, GatewayError> {
        self.check_reachable()?;
        let (tx, rx) = mpsc::channel(16);
        self.senders.lock().unwrap().push(tx);
        Ok(rx)
    }
}

/// A coordinator wired to a fresh fake gateway and an in-memory cache.
#[allow(dead_code)]
pub async fn setup() -> (SyncCoordinator<FakeGateway>, Arc<FakeGateway>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let gateway = Arc::new(FakeGateway::new());
    let cache = Arc::new(CacheMirror::new("sqlite::memory:").await.unwrap());
    (SyncCoordinator::new(gateway.clone(), cache), gateway)
}

/// A sample gateway-side row, as another client would have created it.
#[allow(dead_code)]
pub fn make_row(text: &str, completed: bool) -> Todo {
    Todo {
        id: Uuid::new_v4(),
        text: text.to_string(),
        completed,
        created_at: Utc::now(),
        updated_at: None,
        priority: Priority::Medium,
        category: DEFAULT_CATEGORY.to_string(),
        starred: false,
        sync_status: SyncStatus::Synced,
    }
}

/// Polls a condition until it holds, failing the test after ~2 seconds.
#[allow(dead_code)]
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not met within timeout");
}
