pub mod connection;
pub mod history;
pub mod matches;
pub mod models;
pub mod players;
pub mod setup;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
