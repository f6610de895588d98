use crate::models::TodoList;
use thiserror::Error;

pub mod json;
#[cfg(test)]
pub(crate) mod test_utils;

pub use json::JsonStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to replace data file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Whole-document persistence for the todo list.
pub trait Storage: Send + Sync {
    fn save(&self, data: &TodoList) -> Result<(), StorageError>;
    fn load(&self) -> Result<TodoList, StorageError>;
}
