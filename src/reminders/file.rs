use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::list::{ListColor, ReminderList};
use super::reminder::{Due, Reminder};
use super::store::{Completion, Predicate, ReminderStore, StoreError};

const DEFAULT_LIST_NAME: &str = "Reminders";
const DEFAULT_LIST_COLOR: &str = "#1E90FF";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredList {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredReminder {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    list_id: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: u8,
    #[serde(default)]
    due: Option<Due>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Document {
    access_granted: bool,
    default_list: Option<String>,
    lists: Vec<StoredList>,
    reminders: Vec<StoredReminder>,
}

impl Default for Document {
    fn default() -> Self {
        let list = StoredList {
            id: Uuid::new_v4().to_string(),
            name: DEFAULT_LIST_NAME.to_string(),
            color: Some(DEFAULT_LIST_COLOR.to_string()),
        };
        Self {
            access_granted: true,
            default_list: Some(list.id.clone()),
            lists: vec![list],
            reminders: Vec::new(),
        }
    }
}

impl Document {
    fn list(&self, id: &str) -> Option<&StoredList> {
        self.lists.iter().find(|l| l.id == id)
    }

    fn to_reminder(&self, stored: &StoredReminder) -> Reminder {
        Reminder {
            id: stored.id.clone(),
            title: stored.title.clone(),
            notes: stored.notes.clone(),
            list_id: stored.list_id.clone(),
            list_name: self
                .list(&stored.list_id)
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            is_completed: stored.completed,
            priority: stored.priority,
            due: stored.due,
        }
    }
}

fn to_list(stored: &StoredList) -> ReminderList {
    ReminderList::new(
        stored.id.clone(),
        stored.name.clone(),
        stored.color.as_deref().and_then(ListColor::from_hex),
    )
}

/// Reminders kept in a local JSON document.
///
/// Answers fetches and permission requests from a worker thread, the same
/// way the host service calls back from its own queue.
pub struct FileStore {
    path: Option<PathBuf>,
    doc: Mutex<Document>,
}

impl FileStore {
    /// Load the store at `path`, starting from a single default list when
    /// the file does not exist yet.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let doc = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            info!(path = %path.display(), "no reminder store yet, starting empty");
            Document::default()
        };
        Ok(Self {
            path: Some(path),
            doc: Mutex::new(doc),
        })
    }

    /// Store that never touches the disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            doc: Mutex::new(Document::default()),
        }
    }

    /// Add a list; returns its id.
    #[cfg(test)]
    pub fn add_list(&self, name: &str, color: Option<&str>) -> String {
        let id = Uuid::new_v4().to_string();
        self.doc().lists.push(StoredList {
            id: id.clone(),
            name: name.to_string(),
            color: color.map(str::to_string),
        });
        id
    }

    #[cfg(test)]
    pub fn deny_access(self) -> Self {
        self.doc().access_granted = false;
        self
    }

    fn doc(&self) -> MutexGuard<'_, Document> {
        self.doc.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` to a copy of the document, persist it, then publish it.
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut Document) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut doc = self.doc();
        let mut next = doc.clone();
        let result = change(&mut next)?;
        if let Some(path) = &self.path {
            write_document(path, &next)?;
        }
        *doc = next;
        Ok(result)
    }
}

fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(doc)?)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "reminder store written");
    Ok(())
}

impl ReminderStore for FileStore {
    fn request_access(&self, completion: Completion<bool>) {
        let granted = self.doc().access_granted;
        thread::spawn(move || completion(granted));
    }

    fn lists(&self) -> Vec<ReminderList> {
        self.doc().lists.iter().map(to_list).collect()
    }

    fn default_list(&self) -> Option<ReminderList> {
        let doc = self.doc();
        doc.default_list
            .as_deref()
            .and_then(|id| doc.list(id))
            .or_else(|| doc.lists.first())
            .map(to_list)
    }

    fn fetch_reminders(&self, predicate: Predicate, completion: Completion<Vec<Reminder>>) {
        let reminders: Vec<Reminder> = {
            let doc = self.doc();
            doc.reminders
                .iter()
                .map(|stored| doc.to_reminder(stored))
                .filter(|r| predicate.admits(r))
                .collect()
        };
        thread::spawn(move || completion(reminders));
    }

    fn save(&self, reminder: &mut Reminder) -> Result<(), StoreError> {
        let (id, list_name) = self.commit(|doc| {
            let list_name = doc
                .list(&reminder.list_id)
                .map(|l| l.name.clone())
                .ok_or_else(|| StoreError::UnknownList(reminder.list_id.clone()))?;

            let id = if reminder.id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                reminder.id.clone()
            };
            let stored = StoredReminder {
                id: id.clone(),
                title: reminder.title.clone(),
                notes: reminder.notes.clone(),
                list_id: reminder.list_id.clone(),
                completed: reminder.is_completed,
                priority: reminder.priority,
                due: reminder.due,
            };

            if reminder.id.is_empty() {
                doc.reminders.push(stored);
            } else {
                let slot = doc
                    .reminders
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| StoreError::Missing(id.clone()))?;
                *slot = stored;
            }
            Ok((id, list_name))
        })?;

        reminder.id = id;
        reminder.list_name = list_name;
        Ok(())
    }

    fn remove(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.commit(|doc| {
            let index = doc
                .reminders
                .iter()
                .position(|r| r.id == reminder.id)
                .ok_or_else(|| StoreError::Missing(reminder.id.clone()))?;
            doc.reminders.remove(index);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn fetch(store: &FileStore, predicate: Predicate) -> Vec<Reminder> {
        let (tx, rx) = mpsc::channel();
        store.fetch_reminders(
            predicate,
            Box::new(move |found| {
                let _ = tx.send(found);
            }),
        );
        rx.recv().unwrap()
    }

    #[test]
    fn new_store_has_default_list() {
        let store = FileStore::in_memory();
        let lists = store.lists();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Reminders");
        assert_eq!(store.default_list().unwrap().id, lists[0].id);
    }

    #[test]
    fn save_assigns_id_and_list_name() {
        let store = FileStore::in_memory();
        let list = store.default_list().unwrap();
        let mut reminder = Reminder::new("Walk dog", &list);
        reminder.list_name.clear();

        store.save(&mut reminder).unwrap();
        assert!(!reminder.id.is_empty());
        assert_eq!(reminder.list_name, "Reminders");

        let found = fetch(&store, Predicate::any(None));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "Walk dog");
    }

    #[test]
    fn save_updates_existing_record() {
        let store = FileStore::in_memory();
        let list = store.default_list().unwrap();
        let mut reminder = Reminder::new("Walk dog", &list);
        store.save(&mut reminder).unwrap();

        reminder.is_completed = true;
        store.save(&mut reminder).unwrap();

        assert!(fetch(&store, Predicate::incomplete(None)).is_empty());
        assert_eq!(fetch(&store, Predicate::any(None)).len(), 1);
    }

    #[test]
    fn save_rejects_unknown_list() {
        let store = FileStore::in_memory();
        let mut reminder = Reminder {
            title: Some("Orphan".into()),
            list_id: "missing".into(),
            ..Reminder::default()
        };
        assert!(matches!(
            store.save(&mut reminder),
            Err(StoreError::UnknownList(_))
        ));
        assert!(reminder.id.is_empty());
    }

    #[test]
    fn remove_deletes_and_reports_missing() {
        let store = FileStore::in_memory();
        let list = store.default_list().unwrap();
        let mut reminder = Reminder::new("Walk dog", &list);
        store.save(&mut reminder).unwrap();

        store.remove(&reminder).unwrap();
        assert!(fetch(&store, Predicate::any(None)).is_empty());
        assert!(matches!(
            store.remove(&reminder),
            Err(StoreError::Missing(_))
        ));
    }

    #[test]
    fn persists_to_disk_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(path.clone()).unwrap();
        let list = store.default_list().unwrap();
        let mut reminder = Reminder::new("Pay rent", &list);
        reminder.priority = 1;
        reminder.due = Due::parse("2/1/25 9:00 AM");
        store.save(&mut reminder).unwrap();

        let reopened = FileStore::open(path).unwrap();
        let found = fetch(&reopened, Predicate::any(None));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, reminder.id);
        assert_eq!(found[0].priority, 1);
        assert_eq!(found[0].due, reminder.due);
        assert_eq!(found[0].list_name, "Reminders");
    }

    #[test]
    fn failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = FileStore::open(blocker.join("store.json")).unwrap();
        let list = store.default_list().unwrap();
        let mut reminder = Reminder::new("Never saved", &list);

        assert!(store.save(&mut reminder).is_err());
        assert!(reminder.id.is_empty());
        assert!(fetch(&store, Predicate::any(None)).is_empty());
    }

    #[test]
    fn access_answer_comes_from_document() {
        let store = FileStore::in_memory().deny_access();
        let (tx, rx) = mpsc::channel();
        store.request_access(Box::new(move |granted| {
            let _ = tx.send(granted);
        }));
        assert!(!rx.recv().unwrap());
    }
}
