use serde::Serialize;
use serde_json::Value;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

/// Result of one command, ready to render in either output mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
    /// Text-mode layout; the message is printed when absent.
    pub lines: Option<Vec<String>>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            lines: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(message)
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = Some(lines);
        self
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    mode: OutputMode,
}

impl Renderer {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn render(&self, outcome: &Outcome) -> Result<String, serde_json::Error> {
        match self.mode {
            OutputMode::Json => serde_json::to_string(&Envelope {
                success: outcome.success,
                message: &outcome.message,
                data: outcome.data.as_ref(),
            }),
            OutputMode::Text => Ok(match &outcome.lines {
                Some(lines) => lines.join("\n"),
                None => outcome.message.clone(),
            }),
        }
    }

    /// Print the outcome on stdout.
    pub fn emit(&self, outcome: &Outcome) {
        match self.render(outcome) {
            Ok(text) if text.is_empty() => {}
            Ok(text) => println!("{text}"),
            Err(e) => error!("failed to render output: {e}"),
        }
    }
}
