use tracing::debug;

use crate::cli::Command;
use crate::commands;
use crate::config::Config;
use crate::error::{ReminderError, Result, EXIT_SUCCESS};
use crate::output::{Outcome, Renderer};
use crate::query::Query;
use crate::reminders::{self, ReminderStore, StoreError};
use crate::style::Theme;

/// One command invocation against the reminders store.
pub struct App {
    query: Query,
    config: Config,
    theme: Theme,
    renderer: Renderer,
}

impl App {
    pub fn open(config: Config, renderer: Renderer) -> std::result::Result<Self, StoreError> {
        let store = reminders::open(&config)?;
        Ok(Self::with_store(store, config, renderer))
    }

    pub fn with_store(store: Box<dyn ReminderStore>, config: Config, renderer: Renderer) -> Self {
        let theme = Theme::resolve(&config.theme, config.color);
        Self {
            query: Query::new(store),
            config,
            theme,
            renderer,
        }
    }

    /// Ask the store for access; nothing else runs until it answers.
    pub fn authorize(&mut self) -> Result<()> {
        if self.query.request_access()? {
            Ok(())
        } else {
            Err(ReminderError::PermissionDenied)
        }
    }

    pub fn execute(&mut self, command: &Command) -> Result<Outcome> {
        debug!(?command, "executing");
        match command {
            Command::Lists => commands::lists(&mut self.query, &self.theme),
            Command::Ls(opts) => commands::ls(&mut self.query, &self.theme, opts),
            Command::Add(opts) => commands::add(&mut self.query, &self.config, opts),
            Command::Done { search } => commands::done(&mut self.query, search.as_deref()),
            Command::Delete { search } => commands::delete(&mut self.query, search.as_deref()),
            Command::Show { search } => commands::show(&mut self.query, search.as_deref()),
        }
    }

    /// Authorize, run `command`, print the outcome and return the exit code.
    pub fn run(&mut self, command: &Command) -> u8 {
        let result = self.authorize().and_then(|()| self.execute(command));
        let (outcome, code) = match result {
            Ok(outcome) => (outcome, EXIT_SUCCESS),
            Err(e) => {
                debug!(error = %e, "command failed");
                (Outcome::failure(e.to_string()), e.exit_code())
            }
        };
        self.renderer.emit(&outcome);
        code
    }
}
