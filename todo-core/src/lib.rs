pub mod models;
pub mod protocol;
pub mod view;

pub use models::*;
pub use protocol::*;
pub use view::*;
