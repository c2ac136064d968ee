//! In-memory snapshot of the last synchronized lists and todos.
//!
//! # Design
//! `LocalStore` is the single owner of both snapshots. Snapshots are only
//! ever replaced wholesale; the one in-place mutation is the completion
//! flag, applied after the server has confirmed it. The store never renders
//! or notifies.

use crate::types::{List, Todo};

/// Lookup seam used by the filter engine to resolve `listId` soft references.
pub trait ListIndex {
    /// The list with this id, or `None` when `list_id` is empty or unknown.
    fn find_list(&self, list_id: &str) -> Option<&List>;
}

impl ListIndex for [List] {
    fn find_list(&self, list_id: &str) -> Option<&List> {
        if list_id.is_empty() {
            return None;
        }
        self.iter().find(|list| list.id == list_id)
    }
}

impl ListIndex for Vec<List> {
    fn find_list(&self, list_id: &str) -> Option<&List> {
        self.as_slice().find_list(list_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalStore {
    lists: Vec<List>,
    todos: Vec<Todo>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    /// Todos, most recently modified first.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn todo(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn replace_lists(&mut self, lists: Vec<List>) {
        self.lists = lists;
    }

    /// Replace the todo snapshot and re-establish newest-first order.
    /// The sort is stable, so equal timestamps keep the server's order.
    pub fn replace_todos(&mut self, mut todos: Vec<Todo>) {
        todos.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        self.todos = todos;
    }

    /// Set the completion flag of the todo with `id`.
    ///
    /// Returns the updated record, or `None` (and changes nothing) when no
    /// todo has that id.
    pub fn set_completion(&mut self, id: &str, completed: bool) -> Option<&Todo> {
        let todo = self.todos.iter_mut().find(|todo| todo.id == id)?;
        todo.is_completed = completed;
        Some(&*todo)
    }
}

impl ListIndex for LocalStore {
    fn find_list(&self, list_id: &str) -> Option<&List> {
        self.lists.find_list(list_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp;

    fn todo(id: &str, modified: &str, completed: bool) -> Todo {
        Todo {
            id: id.to_string(),
            title: format!("title {id}"),
            description: String::new(),
            list_id: String::new(),
            is_completed: completed,
            last_modified: timestamp::parse(modified).unwrap(),
        }
    }

    fn list(id: &str, name: &str) -> List {
        List {
            id: id.to_string(),
            name: name.to_string(),
            color: [10, 20, 30],
        }
    }

    #[test]
    fn starts_empty() {
        let store = LocalStore::new();
        assert!(store.lists().is_empty());
        assert!(store.todos().is_empty());
    }

    #[test]
    fn replace_todos_sorts_newest_first() {
        let mut store = LocalStore::new();
        store.replace_todos(vec![
            todo("old", "2024-01-01", false),
            todo("new", "2024-03-01", false),
            todo("mid", "2024-02-01T12:00:00", false),
        ]);
        let ids: Vec<&str> = store.todos().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"]);
        assert!(store
            .todos()
            .windows(2)
            .all(|pair| pair[0].last_modified >= pair[1].last_modified));
    }

    #[test]
    fn replace_todos_is_wholesale() {
        let mut store = LocalStore::new();
        store.replace_todos(vec![todo("a", "2024-01-01", false)]);
        store.replace_todos(vec![todo("b", "2024-01-01", false)]);
        assert!(store.todo("a").is_none());
        assert!(store.todo("b").is_some());
    }

    #[test]
    fn replacing_with_same_data_is_a_no_op() {
        let data = vec![todo("a", "2024-01-01", false), todo("b", "2024-01-05", true)];
        let mut once = LocalStore::new();
        once.replace_todos(data.clone());
        let mut twice = once.clone();
        twice.replace_todos(data);
        assert_eq!(once, twice);
    }

    #[test]
    fn set_completion_updates_one_record() {
        let mut store = LocalStore::new();
        store.replace_todos(vec![todo("a", "2024-01-02", false), todo("b", "2024-01-01", false)]);
        let updated = store.set_completion("a", true).unwrap();
        assert!(updated.is_completed);
        assert!(!store.todo("b").unwrap().is_completed);
    }

    #[test]
    fn set_completion_is_idempotent() {
        let mut store = LocalStore::new();
        store.replace_todos(vec![todo("a", "2024-01-02", false)]);
        store.set_completion("a", true);
        let after_once = store.clone();
        store.set_completion("a", true);
        assert_eq!(store, after_once);
    }

    #[test]
    fn set_completion_unknown_id_changes_nothing() {
        let mut store = LocalStore::new();
        store.replace_todos(vec![todo("a", "2024-01-02", false)]);
        let before = store.clone();
        assert!(store.set_completion("zzz", true).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn find_list_handles_soft_references() {
        let mut store = LocalStore::new();
        store.replace_lists(vec![list("l1", "Home")]);
        assert_eq!(store.find_list("l1").map(|l| l.name.as_str()), Some("Home"));
        assert!(store.find_list("").is_none());
        assert!(store.find_list("deleted").is_none());
    }
}
