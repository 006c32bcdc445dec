pub mod connection;
pub mod memory_store;
pub mod mongo_store;
pub mod poll_store;
