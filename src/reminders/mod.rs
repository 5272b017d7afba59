pub mod file;
pub mod list;
pub mod reminder;
pub mod store;

#[cfg(target_os = "macos")]
pub mod eventkit;

pub use file::FileStore;
pub use list::{ListColor, ReminderList};
pub use reminder::{Due, Priority, Reminder};
pub use store::{Completion, CompletionFilter, Predicate, ReminderStore, StoreError};

use crate::config::{Backend, Config};

/// Open the store selected by the configuration.
pub fn open(config: &Config) -> Result<Box<dyn ReminderStore>, StoreError> {
    match config.backend {
        Backend::EventKit => open_eventkit(),
        Backend::File => {
            let path = config
                .store_path()
                .ok_or_else(|| StoreError::Host("no data directory for the reminder store".into()))?;
            Ok(Box::new(FileStore::open(path)?))
        }
    }
}

#[cfg(target_os = "macos")]
fn open_eventkit() -> Result<Box<dyn ReminderStore>, StoreError> {
    Ok(Box::new(eventkit::EventKitStore::new()))
}

#[cfg(not(target_os = "macos"))]
fn open_eventkit() -> Result<Box<dyn ReminderStore>, StoreError> {
    Err(StoreError::Host(
        "the EventKit backend is only available on macOS; set backend = \"file\"".into(),
    ))
}
