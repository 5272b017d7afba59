mod app;
mod cli;
mod commands;
mod config;
mod error;
mod output;
mod query;
mod reminders;
mod style;

use std::process::ExitCode;

use app::App;
use cli::Action;
use color_eyre::Result;
use config::Config;
use error::EXIT_ERROR;
use output::{OutputMode, Outcome, Renderer};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "REMINDERS_LOG";

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let invocation = cli::parse(std::env::args().skip(1));
    let renderer = Renderer::new(invocation.mode);

    let command = match invocation.action {
        Action::Usage | Action::Help => {
            println!("{}", cli::usage());
            return Ok(ExitCode::SUCCESS);
        }
        Action::Version => {
            println!("reminders {}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        Action::Unknown(name) => {
            renderer.emit(&Outcome::failure(format!("Unknown command: {name}")));
            if renderer.mode() == OutputMode::Text {
                println!("{}", cli::usage());
            }
            return Ok(ExitCode::from(EXIT_ERROR));
        }
        Action::Run(command) => command,
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            renderer.emit(&Outcome::failure(format!("Failed to load configuration: {e:#}")));
            return Ok(ExitCode::from(EXIT_ERROR));
        }
    };
    let mut app = match App::open(config, renderer) {
        Ok(app) => app,
        Err(e) => {
            renderer.emit(&Outcome::failure(format!("Failed to open reminders store: {e}")));
            return Ok(ExitCode::from(EXIT_ERROR));
        }
    };

    Ok(ExitCode::from(app.run(&command)))
}

/// Log to stderr so stdout stays parseable; `REMINDERS_LOG` sets the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
