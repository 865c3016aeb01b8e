//! Database layer: initialization, models, and data access

pub mod init;
pub mod models;
pub mod store;

pub use init::{connect_memory, init_database};
pub use models::{Reflection, Topic, User};
