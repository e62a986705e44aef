//! The list-directory snapshot store.
//!
//! Todos live as one `.ics` file per item, named by UID, inside one
//! subdirectory per list under the configured root. Each invocation
//! loads a full snapshot up front, works against it in memory, and
//! writes back exactly the affected files.
//!
//! Ids are assigned while the snapshot is built, in list order and then
//! file order, and are recomputed on every load. They are ephemeral:
//! any mutating command invalidates them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use crate::dates::expand_prefix;
use crate::item::{ItemError, TodoItem};

/// Maximum Levenshtein distance to consider a list name as a
/// suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

const ICS_EXTENSION: &str = "ics";

/// Errors raised by the snapshot store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file or directory operation failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// The affected path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A todo file could not be parsed.
    #[error("unable to read todo file {path}: {source}")]
    BadTodoFile {
        /// The affected file.
        path: PathBuf,
        /// Underlying parse error.
        source: ItemError,
    },

    /// A list name matched no or several lists.
    #[error("unknown or ambiguous list \"{name}\"{}, known lists are {}", suggestion_suffix(.suggestion), .known.join(", "))]
    UnknownList {
        /// The requested list name or prefix.
        name: String,
        /// A close known name, if any.
        suggestion: Option<String>,
        /// All known list names.
        known: Vec<String>,
    },

    /// A list of that name already exists.
    #[error("a list named \"{name}\" already exists")]
    ListExists {
        /// The list name.
        name: String,
    },

    /// No item carries the given id in this snapshot.
    #[error("no todo with id {id}")]
    NoSuchItem {
        /// The requested id.
        id: usize,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean \"{name}\"?)"),
        None => String::new(),
    }
}

/// An in-memory snapshot of every todo across every list.
#[derive(Debug)]
pub struct TodoStore {
    root: PathBuf,
    lists: Vec<String>,
    items: Vec<TodoItem>,
}

impl TodoStore {
    /// Loads a full snapshot from the lists directory. The directory is
    /// created when it does not exist yet.
    pub fn load(root: &Path) -> Result<Self, StoreError> {
        if !root.exists() {
            fs::create_dir_all(root).map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }

        let mut lists = Vec::new();
        for entry in read_dir_sorted(root)? {
            if entry.is_dir() {
                if let Some(name) = entry.file_name().and_then(|n| n.to_str()) {
                    lists.push(name.to_string());
                }
            }
        }
        lists.sort();

        let mut items = Vec::new();
        let mut next_id = 1;
        for list in &lists {
            for path in read_dir_sorted(&root.join(list))? {
                if path.extension().and_then(|e| e.to_str()) != Some(ICS_EXTENSION) {
                    continue;
                }
                let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                    path: path.clone(),
                    source,
                })?;
                let mut item =
                    TodoItem::from_ics(&raw).map_err(|source| StoreError::BadTodoFile {
                        path: path.clone(),
                        source,
                    })?;
                item.list = list.clone();
                item.id = next_id;
                next_id += 1;
                items.push(item);
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            lists,
            items,
        })
    }

    /// The known list names, sorted.
    pub fn lists(&self) -> &[String] {
        &self.lists
    }

    /// All items in the snapshot, in id order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Looks up an item by its snapshot id.
    pub fn get(&self, id: usize) -> Result<&TodoItem, StoreError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or(StoreError::NoSuchItem { id })
    }

    /// Resolves a list name or unambiguous prefix to its full name.
    pub fn resolve_list(&self, name: &str) -> Result<String, StoreError> {
        expand_prefix(name, self.lists.iter().map(String::as_str))
            .map(str::to_string)
            .ok_or_else(|| self.unknown_list(name))
    }

    /// Creates a new, empty list directory.
    pub fn new_list(&mut self, name: &str) -> Result<(), StoreError> {
        if self.lists.iter().any(|l| l == name) {
            return Err(StoreError::ListExists {
                name: name.to_string(),
            });
        }
        let path = self.root.join(name);
        fs::create_dir(&path).map_err(|source| StoreError::Io { path, source })?;
        self.lists.push(name.to_string());
        self.lists.sort();
        Ok(())
    }

    /// Removes a list directory and every todo inside it.
    pub fn drop_list(&mut self, name: &str) -> Result<(), StoreError> {
        let list = self.resolve_list(name)?;
        let path = self.root.join(&list);
        fs::remove_dir_all(&path).map_err(|source| StoreError::Io { path, source })?;
        self.lists.retain(|l| *l != list);
        self.items.retain(|item| item.list != list);
        Ok(())
    }

    /// Adds a new item to a list and writes its file. The item's `list`
    /// field is set; its id stays unassigned until the next load.
    pub fn add(&mut self, list: &str, mut item: TodoItem) -> Result<(), StoreError> {
        let list = self.resolve_list(list)?;
        item.list = list;
        // UIDs double as file names, so a clash would overwrite a
        // stranger's todo.
        while self.items.iter().any(|existing| existing.uid == item.uid) {
            item.uid = Uuid::new_v4().to_string();
        }
        self.write_item(&item)?;
        self.items.push(item);
        Ok(())
    }

    /// Writes an already-loaded item back to its file.
    pub fn save(&mut self, item: &TodoItem) -> Result<(), StoreError> {
        self.write_item(item)?;
        if let Some(existing) = self.items.iter_mut().find(|i| i.uid == item.uid) {
            *existing = item.clone();
        }
        Ok(())
    }

    /// Deletes an item's file.
    pub fn delete(&mut self, item: &TodoItem) -> Result<(), StoreError> {
        let path = self.item_path(item);
        fs::remove_file(&path).map_err(|source| StoreError::Io { path, source })?;
        self.items.retain(|i| i.uid != item.uid);
        Ok(())
    }

    /// Moves an item to another list: writes the new file first, then
    /// removes the old one.
    pub fn move_item(&mut self, id: usize, target: &str) -> Result<(), StoreError> {
        let target = self.resolve_list(target)?;
        let mut item = self.get(id)?.clone();
        let old_path = self.item_path(&item);

        item.list = target;
        self.write_item(&item)?;
        fs::remove_file(&old_path).map_err(|source| StoreError::Io {
            path: old_path,
            source,
        })?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.uid == item.uid) {
            *existing = item;
        }
        Ok(())
    }

    /// Deletes every completed or cancelled item in a list. Returns the
    /// number of removed todos.
    pub fn cleanup(&mut self, list: &str) -> Result<usize, StoreError> {
        let list = self.resolve_list(list)?;
        let finished: Vec<TodoItem> = self
            .items
            .iter()
            .filter(|item| {
                item.list == list && matches!(item.status.as_str(), "completed" | "cancelled")
            })
            .cloned()
            .collect();
        for item in &finished {
            self.delete(item)?;
        }
        Ok(finished.len())
    }

    fn item_path(&self, item: &TodoItem) -> PathBuf {
        self.root
            .join(&item.list)
            .join(format!("{}.{ICS_EXTENSION}", item.uid))
    }

    fn write_item(&self, item: &TodoItem) -> Result<(), StoreError> {
        let path = self.item_path(item);
        fs::write(&path, item.to_ics()).map_err(|source| StoreError::Io { path, source })
    }

    fn unknown_list(&self, name: &str) -> StoreError {
        let suggestion = self
            .lists
            .iter()
            .map(|l| (l, levenshtein(name, l)))
            .min_by_key(|(_, d)| *d)
            .filter(|(_, d)| *d > 0 && *d <= MAX_SUGGESTION_DISTANCE)
            .map(|(l, _)| l.clone());
        StoreError::UnknownList {
            name: name.to_string(),
            suggestion,
            known: self.lists.clone(),
        }
    }
}

/// Reads a directory and returns its entry paths sorted by name, for
/// deterministic id assignment.
fn read_dir_sorted(path: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let entries = fs::read_dir(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_lists(lists: &[&str]) -> (TempDir, TodoStore) {
        let dir = TempDir::new().unwrap();
        let mut store = TodoStore::load(dir.path()).unwrap();
        for list in lists {
            store.new_list(list).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn creates_the_root_and_lists() {
        let (dir, store) = store_with_lists(&["home", "work"]);
        assert_eq!(store.lists(), ["home", "work"]);
        assert!(dir.path().join("home").is_dir());
    }

    #[test]
    fn duplicate_list_is_rejected() {
        let (_dir, mut store) = store_with_lists(&["home"]);
        assert!(matches!(
            store.new_list("home"),
            Err(StoreError::ListExists { .. })
        ));
    }

    #[test]
    fn list_names_resolve_by_prefix_with_suggestions() {
        let (_dir, store) = store_with_lists(&["home", "work"]);
        assert_eq!(store.resolve_list("h").unwrap(), "home");
        match store.resolve_list("wrok") {
            Err(StoreError::UnknownList { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("work"));
            }
            other => panic!("expected UnknownList, got {other:?}"),
        }
    }

    #[test]
    fn added_items_round_trip_through_a_reload() {
        let (dir, mut store) = store_with_lists(&["home"]);
        let mut item = TodoItem::new("Water the plants");
        item.priority = Some(3);
        let uid = item.uid.clone();
        store.add("home", item).unwrap();

        let reloaded = TodoStore::load(dir.path()).unwrap();
        assert_eq!(reloaded.items().len(), 1);
        let item = &reloaded.items()[0];
        assert_eq!(item.uid, uid);
        assert_eq!(item.id, 1);
        assert_eq!(item.list, "home");
        assert_eq!(item.summary, "Water the plants");
        assert_eq!(item.priority, Some(3));
    }

    #[test]
    fn colliding_uids_are_regenerated_on_add() {
        let (dir, mut store) = store_with_lists(&["home"]);
        let first = TodoItem::new("First");
        let uid = first.uid.clone();
        store.add("home", first).unwrap();

        let mut second = TodoItem::new("Second");
        second.uid = uid.clone();
        store.add("home", second).unwrap();

        let reloaded = TodoStore::load(dir.path()).unwrap();
        assert_eq!(reloaded.items().len(), 2);
        assert_ne!(reloaded.items()[0].uid, reloaded.items()[1].uid);
        assert!(reloaded.items().iter().any(|item| item.uid == uid));
    }

    #[test]
    fn ids_are_assigned_in_list_then_file_order() {
        let (dir, mut store) = store_with_lists(&["alpha", "beta"]);
        store.add("beta", TodoItem::new("In beta")).unwrap();
        store.add("alpha", TodoItem::new("In alpha")).unwrap();

        let reloaded = TodoStore::load(dir.path()).unwrap();
        assert_eq!(reloaded.get(1).unwrap().list, "alpha");
        assert_eq!(reloaded.get(2).unwrap().list, "beta");
        assert!(matches!(
            reloaded.get(3),
            Err(StoreError::NoSuchItem { id: 3 })
        ));
    }

    #[test]
    fn move_rewrites_the_file_under_the_target_list() {
        let (dir, mut store) = store_with_lists(&["home", "work"]);
        let item = TodoItem::new("Errand");
        let uid = item.uid.clone();
        store.add("home", item).unwrap();

        let mut store = TodoStore::load(dir.path()).unwrap();
        store.move_item(1, "work").unwrap();
        assert!(dir.path().join("work").join(format!("{uid}.ics")).exists());
        assert!(!dir.path().join("home").join(format!("{uid}.ics")).exists());
    }

    #[test]
    fn cleanup_removes_finished_todos() {
        let (dir, mut store) = store_with_lists(&["home"]);
        let mut done = TodoItem::new("Done");
        done.complete();
        store.add("home", done).unwrap();
        store.add("home", TodoItem::new("Open")).unwrap();

        let mut store = TodoStore::load(dir.path()).unwrap();
        assert_eq!(store.cleanup("home").unwrap(), 1);

        let reloaded = TodoStore::load(dir.path()).unwrap();
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].summary, "Open");
    }

    #[test]
    fn drop_list_removes_directory_and_items() {
        let (dir, mut store) = store_with_lists(&["home"]);
        store.add("home", TodoItem::new("Anything")).unwrap();
        store.drop_list("home").unwrap();
        assert!(!dir.path().join("home").exists());
        assert!(store.lists().is_empty());
        assert!(store.items().is_empty());
    }
}
