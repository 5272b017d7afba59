use serde_json::{json, Value};
use tracing::{debug, info};

use crate::cli::{AddOptions, LsOptions};
use crate::config::Config;
use crate::error::{ReminderError, Result};
use crate::output::Outcome;
use crate::query::{Query, ReminderFilter};
use crate::reminders::{CompletionFilter, Due, Reminder, StoreError};
use crate::style::Theme;

fn required_search(search: Option<&str>) -> Result<&str> {
    search.ok_or_else(|| ReminderError::Validation("Search term required".into()))
}

fn reminder_row(r: &Reminder) -> Value {
    json!({
        "id": r.id,
        "title": r.title(),
        "list": r.list_name,
        "completed": r.is_completed,
        "priority": r.priority,
        "notes": r.notes(),
    })
}

fn reminder_line(r: &Reminder, theme: &Theme) -> String {
    let status = if r.is_completed {
        theme.paint(theme.done, "[x]")
    } else {
        "[ ]".to_string()
    };
    format!(
        "{}{} {} ({})",
        status,
        theme.priority_tag(r.priority_band()),
        r.title(),
        theme.paint(theme.list, &r.list_name)
    )
}

pub fn lists(query: &mut Query, theme: &Theme) -> Result<Outcome> {
    let lists = query.lists_with_counts()?;

    let data = lists
        .iter()
        .map(|l| {
            json!({
                "id": l.id,
                "name": l.name,
                "color": l.color.map(|c| c.hex()).unwrap_or_default(),
                "pending": l.pending,
                "total": l.total,
            })
        })
        .collect();
    let lines = if lists.is_empty() {
        vec!["No lists found".to_string()]
    } else {
        lists
            .iter()
            .map(|l| format!("{} ({} pending)", theme.list_name(&l.name, l.color), l.pending))
            .collect()
    };

    Ok(Outcome::ok(format!("Found {} lists", lists.len()))
        .with_data(Value::Array(data))
        .with_lines(lines))
}

pub fn ls(query: &mut Query, theme: &Theme, opts: &LsOptions) -> Result<Outcome> {
    let filter = ReminderFilter {
        list: opts.list.clone(),
        include_completed: opts.all,
        search: opts.search.clone(),
        flagged_only: opts.flagged,
    };
    let reminders = query.search(&filter)?;

    let data = reminders.iter().map(reminder_row).collect();
    let lines = if reminders.is_empty() {
        vec!["No reminders found".to_string()]
    } else {
        reminders.iter().map(|r| reminder_line(r, theme)).collect()
    };

    Ok(Outcome::ok(format!("Found {} reminders", reminders.len()))
        .with_data(Value::Array(data))
        .with_lines(lines))
}

pub fn add(query: &mut Query, config: &Config, opts: &AddOptions) -> Result<Outcome> {
    let title = opts
        .title
        .as_deref()
        .ok_or_else(|| ReminderError::Validation("Title is required".into()))?;

    let priority = match opts.priority {
        Some(p) => Some(u8::try_from(p).ok().filter(|p| *p <= 9).ok_or_else(|| {
            ReminderError::Validation(format!("Priority must be between 0 and 9, got {p}"))
        })?),
        None => None,
    };

    let list = match opts.list.as_deref().or(config.default_list.as_deref()) {
        Some(name) => query.find_list(name)?,
        None => query.default_list().ok_or_else(|| {
            ReminderError::store("add")(StoreError::Host("no default list for new reminders".into()))
        })?,
    };

    let mut reminder = Reminder::new(title, &list);
    reminder.notes = opts.notes.clone();
    if let Some(priority) = priority {
        reminder.priority = priority;
    }
    if let Some(raw) = opts.due.as_deref() {
        reminder.due = Due::parse(raw);
        if reminder.due.is_none() {
            debug!(due = raw, "ignoring unparseable due date");
        }
    }
    if opts.flagged {
        debug!("flagged requested; reminders carry no flag, ignoring");
    }

    query.save(&mut reminder).map_err(ReminderError::store("add"))?;
    info!(id = %reminder.id, list = %reminder.list_name, "reminder added");

    Ok(Outcome::ok("Added reminder")
        .with_data(json!({
            "id": reminder.id,
            "title": title,
            "list": reminder.list_name,
        }))
        .with_lines(vec![format!("Added: {} ({})", title, reminder.list_name)]))
}

pub fn done(query: &mut Query, search: Option<&str>) -> Result<Outcome> {
    let search = required_search(search)?;
    let mut reminder = query.find_first(search, CompletionFilter::Incomplete)?;

    reminder.is_completed = true;
    query
        .save(&mut reminder)
        .map_err(ReminderError::store("complete"))?;
    info!(id = %reminder.id, "reminder completed");

    Ok(Outcome::ok(format!("Completed: {}", display_title(&reminder, search))))
}

pub fn delete(query: &mut Query, search: Option<&str>) -> Result<Outcome> {
    let search = required_search(search)?;
    let reminder = query.find_first(search, CompletionFilter::Any)?;

    query
        .remove(&reminder)
        .map_err(ReminderError::store("delete"))?;
    info!(id = %reminder.id, "reminder deleted");

    Ok(Outcome::ok(format!("Deleted: {}", display_title(&reminder, search))))
}

pub fn show(query: &mut Query, search: Option<&str>) -> Result<Outcome> {
    let search = required_search(search)?;
    let r = query.find_first(search, CompletionFilter::Any)?;

    let due = r.due.map(|d| d.display()).unwrap_or_default();

    let mut lines = vec![
        format!("Title: {}", r.title()),
        format!("List: {}", r.list_name),
        format!(
            "Status: {}",
            if r.is_completed { "Completed" } else { "Pending" }
        ),
    ];
    if !r.notes().is_empty() {
        lines.push(format!("Notes: {}", r.notes()));
    }
    if !due.is_empty() {
        lines.push(format!("Due: {due}"));
    }
    if let Some(tag) = r.priority_band().tag() {
        lines.push(format!("Priority: {} ({})", r.priority, tag));
    }
    lines.push(format!("ID: {}", r.id));

    let mut data = reminder_row(&r);
    data["due"] = Value::String(due);

    Ok(Outcome::ok(format!("Found: {}", display_title(&r, search)))
        .with_data(data)
        .with_lines(lines))
}

/// The reminder's title, or the search term for untitled reminders.
fn display_title<'a>(r: &'a Reminder, search: &'a str) -> &'a str {
    r.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(search)
}
