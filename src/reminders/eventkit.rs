use std::sync::Mutex;

use block2::RcBlock;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use objc2::rc::Retained;
use objc2::runtime::{Bool, NSObjectProtocol, Sel};
use objc2::sel;
use objc2_event_kit::{EKAuthorizationStatus, EKCalendar, EKEntityType, EKEventStore, EKReminder};
use objc2_foundation::{NSArray, NSDateComponents, NSError, NSString};
use tracing::debug;

use super::list::{ListColor, ReminderList};
use super::reminder::{Due, Reminder};
use super::store::{Completion, CompletionFilter, Predicate, ReminderStore, StoreError};

/// Value of an unset `NSDateComponents` field.
const COMPONENT_UNDEFINED: isize = isize::MAX;

/// How access is requested: full access on macOS 14 and later, the
/// entity-type request before that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessRequest {
    FullAccess,
    EntityType,
}

impl AccessRequest {
    fn selector(self) -> Sel {
        match self {
            Self::FullAccess => sel!(requestFullAccessToRemindersWithCompletion:),
            Self::EntityType => sel!(requestAccessToEntityType:completion:),
        }
    }
}

/// Reminders held by the macOS EventKit service.
pub struct EventKitStore {
    store: Retained<EKEventStore>,
}

impl EventKitStore {
    pub fn new() -> Self {
        let store = unsafe { EKEventStore::new() };
        Self { store }
    }

    fn authorization_status() -> EKAuthorizationStatus {
        unsafe { EKEventStore::authorizationStatusForEntityType(EKEntityType::Reminder) }
    }

    fn responds_to(&self, selector: Sel) -> bool {
        self.store.respondsToSelector(selector)
    }

    fn access_request(&self) -> AccessRequest {
        if self.responds_to(AccessRequest::FullAccess.selector()) {
            AccessRequest::FullAccess
        } else {
            AccessRequest::EntityType
        }
    }

    fn calendars(&self) -> Retained<NSArray<EKCalendar>> {
        unsafe { self.store.calendarsForEntityType(EKEntityType::Reminder) }
    }

    fn calendar(&self, id: &str) -> Option<Retained<EKCalendar>> {
        self.calendars()
            .iter()
            .find(|cal| unsafe { cal.calendarIdentifier() }.to_string() == id)
    }

    fn calendars_with_ids(&self, ids: &[String]) -> Retained<NSArray<EKCalendar>> {
        let picked: Vec<Retained<EKCalendar>> = self
            .calendars()
            .iter()
            .filter(|cal| ids.contains(&unsafe { cal.calendarIdentifier() }.to_string()))
            .collect();
        NSArray::from_retained_slice(&picked)
    }

    fn find(&self, id: &str) -> Result<Retained<EKReminder>, StoreError> {
        let ident = NSString::from_str(id);
        unsafe { self.store.calendarItemWithIdentifier(&ident) }
            .and_then(|item| item.downcast::<EKReminder>().ok())
            .ok_or_else(|| StoreError::Missing(id.to_string()))
    }
}

impl ReminderStore for EventKitStore {
    fn request_access(&self, completion: Completion<bool>) {
        match Self::authorization_status() {
            EKAuthorizationStatus::FullAccess => return completion(true),
            EKAuthorizationStatus::Denied | EKAuthorizationStatus::Restricted => {
                return completion(false);
            }
            _ => {}
        }

        let completion = Mutex::new(Some(completion));
        let block = RcBlock::new(move |granted: Bool, _error: *mut NSError| {
            if let Some(done) = completion.lock().ok().and_then(|mut slot| slot.take()) {
                done(granted.as_bool());
            }
        });

        let request = self.access_request();
        debug!(?request, "requesting reminders access");
        let handler = &*block as *const _ as *mut _;
        unsafe {
            match request {
                AccessRequest::FullAccess => {
                    self.store.requestFullAccessToRemindersWithCompletion(handler)
                }
                AccessRequest::EntityType => self
                    .store
                    .requestAccessToEntityType_completion(EKEntityType::Reminder, handler),
            }
        }
    }

    fn lists(&self) -> Vec<ReminderList> {
        self.calendars().iter().map(|cal| to_list(&cal)).collect()
    }

    fn default_list(&self) -> Option<ReminderList> {
        unsafe { self.store.defaultCalendarForNewReminders() }.map(|cal| to_list(&cal))
    }

    fn fetch_reminders(&self, predicate: Predicate, completion: Completion<Vec<Reminder>>) {
        let calendars = predicate
            .lists
            .as_deref()
            .map(|ids| self.calendars_with_ids(ids));

        let ek_predicate = unsafe {
            match predicate.completion {
                CompletionFilter::Incomplete => self
                    .store
                    .predicateForIncompleteRemindersWithDueDateStarting_ending_calendars(
                        None,
                        None,
                        calendars.as_deref(),
                    ),
                CompletionFilter::Any => self
                    .store
                    .predicateForRemindersInCalendars(calendars.as_deref()),
            }
        };

        let completion = Mutex::new(Some(completion));
        let block = RcBlock::new(move |found: *mut NSArray<EKReminder>| {
            let reminders: Vec<Reminder> = unsafe { found.as_ref() }
                .map(|items| items.iter().map(|r| to_reminder(&r)).collect())
                .unwrap_or_default();
            debug!(count = reminders.len(), "EventKit fetch answered");
            if let Some(done) = completion.lock().ok().and_then(|mut slot| slot.take()) {
                done(reminders);
            }
        });

        unsafe {
            self.store
                .fetchRemindersMatchingPredicate_completion(&ek_predicate, &block);
        }
    }

    fn save(&self, reminder: &mut Reminder) -> Result<(), StoreError> {
        let item = if reminder.id.is_empty() {
            unsafe { EKReminder::reminderWithEventStore(&self.store) }
        } else {
            self.find(&reminder.id)?
        };
        let calendar = self
            .calendar(&reminder.list_id)
            .ok_or_else(|| StoreError::UnknownList(reminder.list_id.clone()))?;

        let title = reminder.title.as_deref().map(NSString::from_str);
        let notes = reminder.notes.as_deref().map(NSString::from_str);
        let due = reminder.due.map(|due| to_components(&due));

        unsafe {
            item.setTitle(title.as_deref());
            item.setNotes(notes.as_deref());
            item.setCalendar(Some(&calendar));
            item.setPriority(reminder.priority as usize);
            item.setCompleted(reminder.is_completed);
            item.setDueDateComponents(due.as_deref());

            self.store
                .saveReminder_commit_error(&item, true)
                .map_err(|e| StoreError::Host(e.localizedDescription().to_string()))?;

            reminder.id = item.calendarItemIdentifier().to_string();
            reminder.list_name = calendar.title().to_string();
        }
        Ok(())
    }

    fn remove(&self, reminder: &Reminder) -> Result<(), StoreError> {
        let item = self.find(&reminder.id)?;
        unsafe {
            self.store
                .removeReminder_commit_error(&item, true)
                .map_err(|e| StoreError::Host(e.localizedDescription().to_string()))
        }
    }
}

fn to_list(cal: &EKCalendar) -> ReminderList {
    let id = unsafe { cal.calendarIdentifier().to_string() };
    let name = unsafe { cal.title().to_string() };
    ReminderList::new(id, name, calendar_color(cal))
}

fn to_reminder(r: &EKReminder) -> Reminder {
    unsafe {
        let (list_id, list_name) = r
            .calendar()
            .map(|cal| (cal.calendarIdentifier().to_string(), cal.title().to_string()))
            .unwrap_or_default();

        Reminder {
            id: r.calendarItemIdentifier().to_string(),
            title: Some(r.title().to_string()),
            notes: r.notes().map(|s| s.to_string()),
            list_id,
            list_name,
            is_completed: r.isCompleted(),
            priority: r.priority().min(9) as u8,
            due: r.dueDateComponents().and_then(|c| from_components(&c)),
        }
    }
}

fn calendar_color(cal: &EKCalendar) -> Option<ListColor> {
    unsafe {
        let cg_color = cal.CGColor()?;
        use objc2::msg_send;
        let num_components: usize = msg_send![&*cg_color, numberOfComponents];
        if num_components < 3 {
            return None;
        }
        let components: *const f64 = msg_send![&*cg_color, components];
        Some(ListColor::from_components(
            *components,
            *components.add(1),
            *components.add(2),
        ))
    }
}

fn from_components(c: &NSDateComponents) -> Option<Due> {
    let (year, month, day, hour, minute) = unsafe { (c.year(), c.month(), c.day(), c.hour(), c.minute()) };
    if [year, month, day].contains(&COMPONENT_UNDEFINED) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)?;
    let time = if hour == COMPONENT_UNDEFINED {
        None
    } else {
        let minute = if minute == COMPONENT_UNDEFINED { 0 } else { minute };
        NaiveTime::from_hms_opt(hour as u32, minute as u32, 0)
    };
    Some(Due { date, time })
}

fn to_components(due: &Due) -> Retained<NSDateComponents> {
    let c = unsafe { NSDateComponents::new() };
    unsafe {
        c.setYear(due.date.year() as isize);
        c.setMonth(due.date.month() as isize);
        c.setDay(due.date.day() as isize);
        if let Some(time) = due.time {
            c.setHour(time.hour() as isize);
            c.setMinute(time.minute() as isize);
        }
    }
    c
}
