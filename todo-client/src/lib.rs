pub mod cache;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod queries;
pub mod store;

pub use cache::CacheMirror;
pub use coordinator::{SyncCoordinator, WatchHandle};
pub use errors::{ClientError, ClientResult};
pub use events::{EventDispatcher, StoreEvent};
pub use gateway::{GatewayError, TableGateway};
pub use store::ItemStore;
