use super::{Storage, StorageError};
use crate::models::TodoList;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Opens the data file, creating it and its parent directories if needed.
    /// Existing contents are left untouched.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        let size = file.metadata()?.len();
        debug!(path = %path.display(), size, "opened data file");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Storage for JsonStorage {
    fn save(&self, data: &TodoList) -> Result<(), StorageError> {
        // Write next to the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(metadata.permissions())?;
        }

        serde_json::to_writer(&mut tmp, data)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        debug!(path = %self.path.display(), todos = data.todos.len(), "rewrote data file");
        Ok(())
    }

    fn load(&self) -> Result<TodoList, StorageError> {
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            debug!(path = %self.path.display(), "data file is empty, initializing");
            let data = TodoList::new();
            self.save(&data)?;
            return Ok(data);
        }

        let data: TodoList = serde_json::from_str(&contents)?;
        debug!(todos = data.todos.len(), "loaded data file");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Todo;

    #[test]
    fn test_open_creates_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("nested").join("db.json");

        let storage = JsonStorage::open(&storage_path).expect("Failed to open storage");
        assert!(storage.path().exists());
        assert_eq!(fs::read_to_string(&storage_path).unwrap(), "");
    }

    #[test]
    fn test_open_keeps_existing_contents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        let existing = "{\"Todos\":[{\"id\":4,\"title\":\"keep\",\"completed\":true}]}\n";
        fs::write(&storage_path, existing).unwrap();

        let storage = JsonStorage::open(&storage_path).unwrap();
        assert_eq!(fs::read_to_string(&storage_path).unwrap(), existing);
        assert_eq!(storage.load().unwrap().todos[0].title, "keep");
    }

    #[test]
    fn test_load_empty_file_initializes_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        let storage = JsonStorage::open(&storage_path).unwrap();

        let data = storage.load().expect("Failed to load empty file");
        assert!(data.todos.is_empty());
        assert_eq!(fs::read_to_string(&storage_path).unwrap(), "{\"Todos\":[]}\n");
    }

    #[test]
    fn test_load_whitespace_file_initializes_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        fs::write(&storage_path, "  \n").unwrap();
        let storage = JsonStorage::open(&storage_path).unwrap();

        assert!(storage.load().unwrap().todos.is_empty());
        assert_eq!(fs::read_to_string(&storage_path).unwrap(), "{\"Todos\":[]}\n");
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        fs::write(&storage_path, "{\"Todos\": [").unwrap();
        let storage = JsonStorage::open(&storage_path).unwrap();

        assert!(matches!(
            storage.load(),
            Err(StorageError::Serialization(_))
        ));
        assert_eq!(fs::read_to_string(&storage_path).unwrap(), "{\"Todos\": [");
    }

    #[test]
    fn test_save_replaces_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        let storage = JsonStorage::open(&storage_path).unwrap();

        let data = TodoList {
            todos: vec![Todo::new(1, "Test Task".to_string())],
        };
        storage.save(&data).unwrap();
        storage.save(&TodoList::new()).unwrap();

        assert_eq!(fs::read_to_string(&storage_path).unwrap(), "{\"Todos\":[]}\n");
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        let storage = JsonStorage::open(&storage_path).unwrap();

        let data = TodoList {
            todos: vec![Todo::new(1, "Test Task".to_string())],
        };
        storage.save(&data).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("db.json")]);
        assert_eq!(storage.load().unwrap(), data);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_save_keeps_previous_state() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        let storage = JsonStorage::open(&storage_path).unwrap();

        // A non-empty directory at the data path cannot be renamed over.
        fs::remove_file(&storage_path).unwrap();
        fs::create_dir(&storage_path).unwrap();
        let kept = storage_path.join("kept.json");
        fs::write(&kept, "{\"Todos\":[]}\n").unwrap();

        let data = TodoList {
            todos: vec![Todo::new(1, "Lost".to_string())],
        };
        assert!(matches!(storage.save(&data), Err(StorageError::Persist(_))));

        assert!(storage_path.is_dir());
        assert_eq!(fs::read_to_string(&kept).unwrap(), "{\"Todos\":[]}\n");
        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("db.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let storage_path = temp_dir.path().join("db.json");
        let storage = JsonStorage::open(&storage_path).unwrap();
        fs::set_permissions(&storage_path, fs::Permissions::from_mode(0o644)).unwrap();

        storage.save(&TodoList::new()).unwrap();

        let mode = fs::metadata(&storage_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
