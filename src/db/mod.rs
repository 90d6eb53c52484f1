pub mod connection;
pub mod schema;
pub mod storage;

pub use connection::Database;
