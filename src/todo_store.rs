use crate::models::{parse_completed, parse_id, Todo, TodoError, TodoList};
use crate::storage::Storage;
use tracing::info;

/// Todo operations over an injected storage backend. Every operation
/// reloads the whole document and, when it mutates, rewrites it whole.
pub struct TodoStore<'a> {
    storage: &'a dyn Storage,
}

impl<'a> TodoStore<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, title: &str) -> Result<Todo, TodoError> {
        let mut data = self.storage.load()?;

        let todo = Todo::new(data.next_id()?, title.to_string());
        data.todos.push(todo.clone());
        self.storage.save(&data)?;

        info!(id = todo.id, "created todo");
        Ok(todo)
    }

    pub fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.storage.load()?.todos)
    }

    /// Updates the todo with `id`. An empty `title` or `completed` leaves
    /// that field unchanged. Nothing is written unless both fields apply.
    /// The id is checked after loading, so a fresh file is still initialized.
    pub fn update(&self, id: &str, title: &str, completed: &str) -> Result<Todo, TodoError> {
        let mut data = self.storage.load()?;
        let id = parse_id(id)?;

        let todo = data.find_mut(id).ok_or(TodoError::NotFound(id))?;
        if !title.is_empty() {
            todo.title = title.to_string();
        }
        if !completed.is_empty() {
            todo.completed = parse_completed(completed)?;
        }
        let updated = todo.clone();

        self.storage.save(&data)?;

        info!(id, completed = updated.completed, "updated todo");
        Ok(updated)
    }

    pub fn clear(&self) -> Result<(), TodoError> {
        self.storage.save(&TodoList::new())?;
        info!("cleared todos");
        Ok(())
    }
}
