use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use todo_core::models::{NewTodo, Todo, TodoPatch};
use todo_core::protocol::ChangeEvent;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway unreachable: {0}")]
    Unavailable(String),

    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// CRUD plus change notifications against one remote collection.
///
/// The gateway owns the durable copy of the collection and assigns `id` and
/// `created_at` on insert. Implementations are injected into the coordinator
/// rather than reached through a shared singleton, so tests can substitute an
/// in-memory fake.
#[async_trait]
pub trait TableGateway: Send + Sync {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<Todo>, GatewayError>;

    /// Insert one record, returning the gateway-assigned copy.
    async fn insert(&self, new: NewTodo) -> Result<Todo, GatewayError>;

    /// Update named fields of one record, returning the updated copy.
    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Todo, GatewayError>;

    async fn delete(&self, id: Uuid) -> Result<(), GatewayError>;

    /// Change-notification stream for the collection. Dropping the receiver
    /// releases the subscription on the gateway side.
    async fn subscribe(&self) -> Result<mpsc::Receiver<ChangeEvent>, GatewayError>;
}
