use std::env as stdenv;
use std::path::PathBuf;

/// Environment variable overriding [`EditorConfig::prompt`].
pub const PROMPT_VAR: &str = "NESTED_SHELL_PROMPT";
/// Environment variable overriding [`EditorConfig::history_file`].
pub const HISTORY_VAR: &str = "NESTED_SHELL_HISTORY";

/// Configuration of the line-editing surface.
///
/// A session keeps the configuration its editor was opened with; suspending
/// the session stores a clone of it, and resuming opens a new editor from that
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Text shown before each read.
    pub prompt: String,
    /// Append-only file with previously submitted lines.
    pub history_file: PathBuf,
    /// Echoed when a read is interrupted with Ctrl-C.
    pub interrupt_prompt: String,
    /// Echoed when the input stream ends.
    pub eof_prompt: String,
    /// Ignore Ctrl-Z instead of suspending the process.
    pub block_suspend: bool,
    /// List all candidates on ambiguous completion instead of cycling through them.
    pub list_completions: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: ">>> ".to_string(),
            history_file: stdenv::temp_dir().join("readline.tmp"),
            interrupt_prompt: "^C".to_string(),
            eof_prompt: "exit".to_string(),
            block_suspend: true,
            list_completions: true,
        }
    }
}

impl EditorConfig {
    /// Default configuration with the prompt and history file taken from the
    /// process environment when set.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| stdenv::var(key).ok())
    }

    /// Apply overrides from a variable lookup; empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(prompt) = lookup(PROMPT_VAR).filter(|v| !v.is_empty()) {
            self.prompt = prompt;
        }
        if let Some(path) = lookup(HISTORY_VAR).filter(|v| !v.is_empty()) {
            self.history_file = PathBuf::from(path);
        }
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = path.into();
        self
    }

    /// rustyline settings derived from this configuration.
    pub(crate) fn rustyline(&self) -> rustyline::Config {
        let completion_type = if self.list_completions {
            rustyline::CompletionType::List
        } else {
            rustyline::CompletionType::Circular
        };
        rustyline::Config::builder()
            .auto_add_history(false)
            .completion_type(completion_type)
            .build()
    }
}
