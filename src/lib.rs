pub mod cli;
pub mod config;
pub mod models;
pub mod storage;
pub mod todo_store;
