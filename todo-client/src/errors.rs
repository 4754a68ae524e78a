use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
