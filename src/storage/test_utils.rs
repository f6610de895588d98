use crate::models::TodoList;
use crate::storage::json::JsonStorage;
use crate::storage::Storage;
use std::path::PathBuf;
use tempfile::TempDir;

/// A `JsonStorage` backed by a file in its own temporary directory.
pub struct TestStorage {
    temp_dir: TempDir,
    storage: JsonStorage,
}

impl TestStorage {
    pub fn new() -> Self {
        let temp_dir = tempfile::Builder::new()
            .prefix("localtodo_test")
            .tempdir()
            .expect("Failed to create temporary directory");

        let storage = JsonStorage::open(temp_dir.path().join("db.json"))
            .expect("Failed to create test storage");

        Self { temp_dir, storage }
    }

    /// Same as `new`, with the document already holding `data`.
    pub fn with_data(data: &TodoList) -> Self {
        let test_storage = Self::new();
        test_storage
            .storage
            .save(data)
            .expect("Failed to initialize test storage");
        test_storage
    }

    pub fn storage(&self) -> &dyn Storage {
        &self.storage
    }

    pub fn data_path(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }

    pub fn read_raw(&self) -> String {
        std::fs::read_to_string(self.data_path()).expect("Failed to read data file")
    }

    pub fn dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Todo;

    #[test]
    fn test_storage_initialization() {
        let test_storage = TestStorage::new();
        assert!(test_storage.data_path().starts_with(test_storage.dir()));
        let data = test_storage
            .storage()
            .load()
            .expect("Failed to load storage");
        assert!(data.todos.is_empty());
    }

    #[test]
    fn test_storage_with_data() {
        let data = TodoList {
            todos: vec![Todo::new(1, "Seeded".to_string())],
        };
        let test_storage = TestStorage::with_data(&data);
        assert_eq!(test_storage.storage().load().unwrap(), data);
    }
}
