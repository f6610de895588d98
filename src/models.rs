use crate::storage::StorageError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: u32,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(id: u32, title: String) -> Self {
        Self {
            id,
            title,
            completed: false,
        }
    }
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ID: {}, Title: {}, Completed: {}}}",
            self.id, self.title, self.completed
        )
    }
}

/// The persisted document: every todo, in insertion order.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    #[serde(rename = "Todos", default, deserialize_with = "null_as_empty")]
    pub todos: Vec<Todo>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Todo>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Todo>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TodoList {
    pub fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// One past the highest id in the list, or 1 when the list is empty.
    pub fn next_id(&self) -> Result<u32, TodoError> {
        match self.todos.iter().map(|t| t.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(TodoError::IdSpaceExhausted),
        }
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == id)
    }
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("todo with ID {0} not found")]
    NotFound(u32),
    #[error("invalid ID: {0}")]
    InvalidId(String),
    #[error("invalid completed value: {0}")]
    InvalidCompleted(String),
    #[error("no todo ids left to assign")]
    IdSpaceExhausted,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub fn parse_id(value: &str) -> Result<u32, TodoError> {
    value
        .parse()
        .map_err(|_| TodoError::InvalidId(value.to_string()))
}

/// Parses the completed flag of an update. Accepts the usual spellings of
/// true and false, including `1`/`0` and `t`/`f`.
pub fn parse_completed(value: &str) -> Result<bool, TodoError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(TodoError::InvalidCompleted(value.to_string())),
    }
}
