//! Helpful error types for CLI commands
//!
//! Every error includes what went wrong, optional context, and suggestions
//! for how to fix it.

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    /// Explicitly requested config file does not exist
    pub fn config_not_found(path: &Path) -> Self {
        Self::new(format!("Config file not found: {}", path.display()))
            .with_context("The file passed with --config (or FARMASCAN_CONFIG) does not exist")
            .with_suggestions([
                format!("TRY: Check that the file exists: ls -la {}", path.display()),
                "TRY: Omit --config to use $FARMASCAN_HOME/config.toml or built-in defaults".to_string(),
            ])
    }

    /// Config file exists but could not be loaded or validated
    pub fn invalid_config(path: &Path, reason: impl fmt::Display) -> Self {
        Self::new(format!("Invalid config file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Run 'farmascan config' without the file to see the defaults".to_string(),
                "TRY: app_scheme must not be http/https; routes use letters, digits, '_' and '-'"
                    .to_string(),
            ])
    }

    /// Replay input line is not a valid event
    pub fn invalid_event(line: usize, reason: impl fmt::Display) -> Self {
        Self::new(format!("Invalid replay event on line {}", line))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Each line must be a JSON object with an \"event\" field".to_string(),
                "TRY: Valid events: focus, decode, retry, dismiss, confirm, blur".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(context) = &self.context {
            write!(f, "\n  {}", context)?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error as a JSON object on stdout, for `--json` callers.
pub fn print_json_error(err: &anyhow::Error) {
    let value = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": helpful.message,
            "context": helpful.context,
            "suggestions": helpful.suggestions,
        }),
        None => serde_json::json!({
            "error": format!("{:#}", err),
        }),
    };
    println!("{}", value);
}
