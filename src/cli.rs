//! Lenient argument parsing.
//!
//! Scanning is a single left-to-right pass. Options that take a value consume
//! the next token whatever it is, a trailing option leaves its value unset,
//! and tokens a command does not recognise are skipped.

use crate::output::OutputMode;

const JSON_FLAG: &str = "--json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: OutputMode,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No command given.
    Usage,
    Help,
    Version,
    Run(Command),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lists,
    Ls(LsOptions),
    Add(AddOptions),
    Done { search: Option<String> },
    Delete { search: Option<String> },
    Show { search: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LsOptions {
    pub list: Option<String>,
    pub all: bool,
    pub search: Option<String>,
    /// Accepted for symmetry with `add`; reminders expose no flag to filter on.
    pub flagged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub list: Option<String>,
    pub due: Option<String>,
    /// `None` when absent or not an integer.
    pub priority: Option<i64>,
    /// Accepted but not stored.
    pub flagged: bool,
}

pub fn parse<I>(args: I) -> Invocation
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut args: Vec<String> = args.into_iter().map(Into::into).collect();

    let before = args.len();
    args.retain(|a| a != JSON_FLAG);
    let mode = if args.len() == before {
        OutputMode::Text
    } else {
        OutputMode::Json
    };

    let mut rest = args.into_iter();
    let action = match rest.next() {
        None => Action::Usage,
        Some(command) => {
            let rest: Vec<String> = rest.collect();
            parse_command(&command, rest)
        }
    };

    Invocation { mode, action }
}

fn parse_command(command: &str, args: Vec<String>) -> Action {
    match command {
        "lists" => Action::Run(Command::Lists),
        "ls" | "list" => Action::Run(Command::Ls(parse_ls(args))),
        "add" => Action::Run(Command::Add(parse_add(args))),
        "done" | "complete" => Action::Run(Command::Done {
            search: args.into_iter().next(),
        }),
        "delete" | "rm" => Action::Run(Command::Delete {
            search: args.into_iter().next(),
        }),
        "show" => Action::Run(Command::Show {
            search: args.into_iter().next(),
        }),
        "-h" | "--help" => Action::Help,
        "-v" | "--version" => Action::Version,
        other => Action::Unknown(other.to_string()),
    }
}

fn parse_ls(args: Vec<String>) -> LsOptions {
    let mut opts = LsOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-l" | "--list" => opts.list = args.next(),
            "-a" | "--all" => opts.all = true,
            "-s" | "--search" => opts.search = args.next(),
            "-f" | "--flagged" => opts.flagged = true,
            _ => {}
        }
    }
    opts
}

fn parse_add(args: Vec<String>) -> AddOptions {
    let mut opts = AddOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-n" | "--notes" => opts.notes = args.next(),
            "-l" | "--list" => opts.list = args.next(),
            "-d" | "--due" => opts.due = args.next(),
            "-p" | "--priority" => opts.priority = args.next().and_then(|p| p.parse().ok()),
            "-f" | "--flagged" => opts.flagged = true,
            _ if opts.title.is_none() && !arg.starts_with('-') => opts.title = Some(arg.clone()),
            _ => {}
        }
    }
    opts
}

pub fn usage() -> &'static str {
    "\
Usage: reminders [--json] <command> [options]

Global options:
    --json                Print a single-line JSON document per command

Commands:
    lists                                  Show reminder lists with pending counts
    ls [-l list] [-a] [-s term] [-f]       List reminders (alias: list)
    add <title> [options]                  Add a reminder
    done <search>                          Complete the first pending match (alias: complete)
    delete <search>                        Delete the first match (alias: rm)
    show <search>                          Show every field of the first match
    -h, --help                             Show this help
    -v, --version                          Show the version

Options:
    -l, --list <name>     List name (case-insensitive)
    -n, --notes <text>    Notes for the reminder
    -d, --due <date>      Due date and time, e.g. \"1/15/24 5:00 PM\"
    -p, --priority <0-9>  0 none, 1-4 high, 5 medium, 6-9 low
    -f, --flagged         Accepted for compatibility; has no effect
    -a, --all             Include completed reminders
    -s, --search <term>   Match title or notes (case-insensitive)

Exit codes:
    0    Success
    1    Error (bad input, access denied, store failure)
    2    Not found (no matching list or reminder)

Examples:
    reminders add \"Buy groceries\" -l Personal -p 1
    reminders --json ls -s groceries
    reminders done groceries"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> (OutputMode, Action) {
        let inv = parse(args.iter().copied());
        (inv.mode, inv.action)
    }

    #[test]
    fn no_arguments_is_usage() {
        assert_eq!(run(&[]), (OutputMode::Text, Action::Usage));
        assert_eq!(run(&["--json"]), (OutputMode::Json, Action::Usage));
    }

    #[test]
    fn json_flag_anywhere() {
        let (mode, action) = run(&["ls", "-a", "--json"]);
        assert_eq!(mode, OutputMode::Json);
        assert_eq!(
            action,
            Action::Run(Command::Ls(LsOptions {
                all: true,
                ..LsOptions::default()
            }))
        );

        let (mode, action) = run(&["--json", "lists"]);
        assert_eq!(mode, OutputMode::Json);
        assert_eq!(action, Action::Run(Command::Lists));
    }

    #[test]
    fn ls_options_short_and_long() {
        let (_, action) = run(&["list", "--list", "Work", "-s", "report", "--flagged", "stray"]);
        assert_eq!(
            action,
            Action::Run(Command::Ls(LsOptions {
                list: Some("Work".into()),
                all: false,
                search: Some("report".into()),
                flagged: true,
            }))
        );
    }

    #[test]
    fn value_options_take_next_token_unconditionally() {
        let (_, action) = run(&["ls", "-l", "-a"]);
        assert_eq!(
            action,
            Action::Run(Command::Ls(LsOptions {
                list: Some("-a".into()),
                ..LsOptions::default()
            }))
        );

        let (_, action) = run(&["ls", "-s"]);
        assert_eq!(action, Action::Run(Command::Ls(LsOptions::default())));
    }

    #[test]
    fn add_takes_first_bare_token_as_title() {
        let (_, action) = run(&[
            "add", "-n", "two litres", "Milk", "Bread", "-p", "3", "-l", "Shopping", "-d",
            "1/15/24 5:00 PM", "-f", "--bogus",
        ]);
        assert_eq!(
            action,
            Action::Run(Command::Add(AddOptions {
                title: Some("Milk".into()),
                notes: Some("two litres".into()),
                list: Some("Shopping".into()),
                due: Some("1/15/24 5:00 PM".into()),
                priority: Some(3),
                flagged: true,
            }))
        );
    }

    #[test]
    fn add_without_title() {
        let (_, action) = run(&["add", "-n", "notes only"]);
        assert_eq!(
            action,
            Action::Run(Command::Add(AddOptions {
                notes: Some("notes only".into()),
                ..AddOptions::default()
            }))
        );
    }

    #[test]
    fn non_numeric_priority_is_dropped() {
        let (_, action) = run(&["add", "X", "-p", "high"]);
        let Action::Run(Command::Add(opts)) = action else {
            panic!("expected add");
        };
        assert_eq!(opts.priority, None);
    }

    #[test]
    fn single_target_commands_and_aliases() {
        assert_eq!(
            run(&["complete", "milk", "extra"]).1,
            Action::Run(Command::Done {
                search: Some("milk".into())
            })
        );
        assert_eq!(
            run(&["rm", "milk"]).1,
            Action::Run(Command::Delete {
                search: Some("milk".into())
            })
        );
        assert_eq!(
            run(&["show"]).1,
            Action::Run(Command::Show { search: None })
        );
    }

    #[test]
    fn meta_commands() {
        assert_eq!(run(&["-h"]).1, Action::Help);
        assert_eq!(run(&["--help"]).1, Action::Help);
        assert_eq!(run(&["-v"]).1, Action::Version);
        assert_eq!(run(&["frobnicate"]).1, Action::Unknown("frobnicate".into()));
    }
}
