use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::error::{ReminderError, Result};
use crate::reminders::{
    Completion, CompletionFilter, Predicate, Reminder, ReminderList, ReminderStore, StoreError,
};

/// What `ls` asked for.
#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    pub list: Option<String>,
    pub include_completed: bool,
    pub search: Option<String>,
    pub flagged_only: bool,
}

/// Block until the store answers a callback-based request.
///
/// One channel per request; the store sends exactly one value.
fn wait_for<T: Send + 'static>(start: impl FnOnce(Completion<T>)) -> std::result::Result<T, StoreError> {
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |value| {
        let _ = tx.send(value);
    }));
    rx.blocking_recv().map_err(|_| StoreError::Disconnected)
}

/// Synchronous view over the host store.
///
/// Requests that wait on the store take `&mut self`, so at most one is
/// outstanding at a time.
pub struct Query {
    store: Box<dyn ReminderStore>,
}

impl Query {
    pub fn new(store: Box<dyn ReminderStore>) -> Self {
        Self { store }
    }

    pub fn request_access(&mut self) -> Result<bool> {
        let store = &self.store;
        let granted = wait_for(|done| store.request_access(done))
            .map_err(ReminderError::store("request reminders access"))?;
        info!(granted, "reminders access answered");
        Ok(granted)
    }

    /// Fetch matching reminders, ordered by title (case-insensitive) then id.
    pub fn fetch(&mut self, predicate: Predicate) -> Result<Vec<Reminder>> {
        debug!(?predicate, "fetching reminders");
        let store = &self.store;
        let mut reminders = wait_for(|done| store.fetch_reminders(predicate, done))
            .map_err(ReminderError::store("fetch reminders"))?;
        reminders.sort_by(|a, b| {
            a.title()
                .to_lowercase()
                .cmp(&b.title().to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!(count = reminders.len(), "fetched reminders");
        Ok(reminders)
    }

    pub fn default_list(&self) -> Option<ReminderList> {
        self.store.default_list()
    }

    /// Every list whose name equals `name`, ignoring case.
    pub fn matching_lists(&self, name: &str) -> Result<Vec<ReminderList>> {
        let lists: Vec<ReminderList> = self
            .store
            .lists()
            .into_iter()
            .filter(|l| l.is_named(name))
            .collect();
        if lists.is_empty() {
            return Err(ReminderError::ListNotFound(name.to_string()));
        }
        Ok(lists)
    }

    pub fn find_list(&self, name: &str) -> Result<ReminderList> {
        self.matching_lists(name)?
            .into_iter()
            .next()
            .ok_or_else(|| ReminderError::ListNotFound(name.to_string()))
    }

    /// All lists with pending and total counts filled in.
    pub fn lists_with_counts(&mut self) -> Result<Vec<ReminderList>> {
        let mut lists = self.store.lists();
        for list in &mut lists {
            let scope = Some(vec![list.id.clone()]);
            list.pending = self.fetch(Predicate::incomplete(scope.clone()))?.len();
            list.total = self.fetch(Predicate::any(scope))?.len();
        }
        Ok(lists)
    }

    pub fn search(&mut self, filter: &ReminderFilter) -> Result<Vec<Reminder>> {
        let scope = match filter.list.as_deref() {
            Some(name) => Some(
                self.matching_lists(name)?
                    .into_iter()
                    .map(|l| l.id)
                    .collect(),
            ),
            None => None,
        };
        let predicate = if filter.include_completed {
            Predicate::any(scope)
        } else {
            Predicate::incomplete(scope)
        };

        let mut reminders = self.fetch(predicate)?;
        if let Some(term) = filter.search.as_deref() {
            reminders.retain(|r| r.matches(term));
        }
        if filter.flagged_only {
            debug!("flagged filter requested; reminders carry no flag, ignoring");
        }
        Ok(reminders)
    }

    /// First reminder (in fetch order) whose title or notes contain `term`.
    pub fn find_first(&mut self, term: &str, completion: CompletionFilter) -> Result<Reminder> {
        let predicate = Predicate {
            lists: None,
            completion,
        };
        self.fetch(predicate)?
            .into_iter()
            .find(|r| r.matches(term))
            .ok_or_else(|| match completion {
                CompletionFilter::Incomplete => ReminderError::PendingNotFound(term.to_string()),
                CompletionFilter::Any => ReminderError::ReminderNotFound(term.to_string()),
            })
    }

    pub fn save(&self, reminder: &mut Reminder) -> std::result::Result<(), StoreError> {
        self.store.save(reminder)
    }

    pub fn remove(&self, reminder: &Reminder) -> std::result::Result<(), StoreError> {
        self.store.remove(reminder)
    }
}
