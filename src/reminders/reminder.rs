use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::list::ReminderList;

/// Accepted spellings of the short US date + time format, e.g. `1/15/24 5:00 PM`.
const DUE_INPUT_FORMATS: [&str; 2] = ["%m/%d/%y %I:%M %p", "%m/%d/%y, %I:%M %p"];

/// Priority band derived from the 0-9 priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    None,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Priority::None,
            1..=4 => Priority::High,
            5 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Priority::None => None,
            Priority::High => Some("HIGH"),
            Priority::Medium => Some("MED"),
            Priority::Low => Some("LOW"),
        }
    }
}

/// Due date with an optional time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl Due {
    /// Parse user input; `None` when the input is not in the accepted format.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        DUE_INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .map(|dt| Self {
                date: dt.date(),
                time: Some(dt.time()),
            })
    }

    /// Medium date plus short time, e.g. `Jan 15, 2024 at 5:00 PM`.
    pub fn display(&self) -> String {
        let date = self.date.format("%b %-d, %Y");
        match self.time {
            Some(time) => format!("{} at {}", date, time.format("%-I:%M %p")),
            None => date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reminder {
    /// Empty until the store has saved the reminder.
    pub id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub list_id: String,
    pub list_name: String,
    pub is_completed: bool,
    pub priority: u8,
    pub due: Option<Due>,
}

impl Reminder {
    pub fn new(title: impl Into<String>, list: &ReminderList) -> Self {
        Self {
            title: Some(title.into()),
            list_id: list.id.clone(),
            list_name: list.name.clone(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or_default()
    }

    pub fn priority_band(&self) -> Priority {
        Priority::from_level(self.priority)
    }

    /// Case-insensitive substring match against title or notes.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [self.title.as_deref(), self.notes.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_bands() {
        assert_eq!(Priority::from_level(0).tag(), None);
        for level in 1..=4 {
            assert_eq!(Priority::from_level(level).tag(), Some("HIGH"));
        }
        assert_eq!(Priority::from_level(5).tag(), Some("MED"));
        for level in 6..=9 {
            assert_eq!(Priority::from_level(level).tag(), Some("LOW"));
        }
    }

    #[test]
    fn parses_short_date_time() {
        let due = Due::parse("1/15/24 5:00 PM").unwrap();
        assert_eq!(due.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(due.time, NaiveTime::from_hms_opt(17, 0, 0));

        let with_comma = Due::parse("12/01/25, 9:30 am").unwrap();
        assert_eq!(with_comma.date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(with_comma.time, NaiveTime::from_hms_opt(9, 30, 0));
    }

    #[test]
    fn unparseable_due_is_none() {
        assert_eq!(Due::parse("tomorrow"), None);
        assert_eq!(Due::parse("2024-01-15"), None);
        assert_eq!(Due::parse(""), None);
    }

    #[test]
    fn due_display() {
        let due = Due::parse("1/15/24 5:00 PM").unwrap();
        assert_eq!(due.display(), "Jan 15, 2024 at 5:00 PM");

        let date_only = Due {
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            time: None,
        };
        assert_eq!(date_only.display(), "Mar 2, 2024");
    }

    #[test]
    fn matches_title_or_notes_ignoring_case() {
        let list = ReminderList::new("l", "Inbox", None);
        let mut reminder = Reminder::new("Buy Milk", &list);
        reminder.notes = Some("From the Corner shop".into());

        assert!(reminder.matches("milk"));
        assert!(reminder.matches("CORNER"));
        assert!(!reminder.matches("bread"));
    }

    #[test]
    fn untitled_reminder_matches_on_notes_only() {
        let reminder = Reminder {
            notes: Some("call back".into()),
            ..Reminder::default()
        };
        assert!(reminder.matches("call"));
        assert_eq!(reminder.title(), "");
    }
}
