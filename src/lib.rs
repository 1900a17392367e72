pub mod config;
pub mod db;
pub mod error;
pub mod follows;
pub mod memory;
pub mod messages;
pub mod state;
pub mod storage;
pub mod users;

pub use error::{ModelError, ModelResult};
pub use storage::Store;
