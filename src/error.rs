use thiserror::Error;

use crate::reminders::StoreError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error(
        "Reminders access denied. Grant access in System Settings > Privacy & Security > Reminders."
    )]
    PermissionDenied,

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("No pending reminder found matching: {0}")]
    PendingNotFound(String),

    #[error("No reminder found matching: {0}")]
    ReminderNotFound(String),

    #[error("Error: {0}")]
    Validation(String),

    #[error("Failed to {action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ReminderError {
    /// Wrap a store failure with the action that was attempted.
    pub fn store(action: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ReminderError::Store { action, source }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            ReminderError::ListNotFound(_)
            | ReminderError::PendingNotFound(_)
            | ReminderError::ReminderNotFound(_) => EXIT_NOT_FOUND,
            ReminderError::PermissionDenied
            | ReminderError::Validation(_)
            | ReminderError::Store { .. } => EXIT_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReminderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_use_exit_two() {
        assert_eq!(ReminderError::ListNotFound("x".into()).exit_code(), 2);
        assert_eq!(ReminderError::PendingNotFound("x".into()).exit_code(), 2);
        assert_eq!(ReminderError::ReminderNotFound("x".into()).exit_code(), 2);
    }

    #[test]
    fn other_errors_use_exit_one() {
        assert_eq!(ReminderError::PermissionDenied.exit_code(), 1);
        assert_eq!(ReminderError::Validation("x".into()).exit_code(), 1);
        let err = ReminderError::store("add")(StoreError::Host("disk full".into()));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Failed to add: disk full");
    }
}
