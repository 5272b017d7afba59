use thiserror::Error;

use super::list::ReminderList;
use super::reminder::Reminder;

/// Callback invoked exactly once by the store when an async request finishes.
pub type Completion<T> = Box<dyn FnOnce(T) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFilter {
    Any,
    Incomplete,
}

/// Fetch filter the store itself understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// List ids in scope; `None` means every list.
    pub lists: Option<Vec<String>>,
    pub completion: CompletionFilter,
}

impl Predicate {
    pub fn any(lists: Option<Vec<String>>) -> Self {
        Self {
            lists,
            completion: CompletionFilter::Any,
        }
    }

    pub fn incomplete(lists: Option<Vec<String>>) -> Self {
        Self {
            lists,
            completion: CompletionFilter::Incomplete,
        }
    }

    pub fn admits(&self, reminder: &Reminder) -> bool {
        if self.completion == CompletionFilter::Incomplete && reminder.is_completed {
            return false;
        }
        self.lists
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|id| *id == reminder.list_id))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Host(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("reminder no longer exists: {0}")]
    Missing(String),

    #[error("list no longer exists: {0}")]
    UnknownList(String),

    #[error("store finished without answering")]
    Disconnected,
}

/// The host reminders service.
///
/// Fetching and permission requests are asynchronous: the store answers by
/// calling the completion from its own execution context. Saves and removals
/// commit synchronously and report the store's own verdict.
pub trait ReminderStore {
    fn request_access(&self, completion: Completion<bool>);

    fn lists(&self) -> Vec<ReminderList>;

    /// List that receives new reminders when none is named.
    fn default_list(&self) -> Option<ReminderList>;

    fn fetch_reminders(&self, predicate: Predicate, completion: Completion<Vec<Reminder>>);

    /// Create (empty id) or update a reminder. Fills in `id` and `list_name`.
    fn save(&self, reminder: &mut Reminder) -> Result<(), StoreError>;

    fn remove(&self, reminder: &Reminder) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(list_id: &str, completed: bool) -> Reminder {
        Reminder {
            list_id: list_id.into(),
            is_completed: completed,
            ..Reminder::default()
        }
    }

    #[test]
    fn incomplete_predicate_skips_completed() {
        let predicate = Predicate::incomplete(None);
        assert!(predicate.admits(&reminder("a", false)));
        assert!(!predicate.admits(&reminder("a", true)));
    }

    #[test]
    fn list_scope_is_respected() {
        let predicate = Predicate::any(Some(vec!["a".into()]));
        assert!(predicate.admits(&reminder("a", true)));
        assert!(!predicate.admits(&reminder("b", false)));
    }
}
