use crate::completion::{CompletionNode, TreeCompleter};
use crate::config::EditorConfig;
use crate::error::StartupError;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Cmd, Editor, KeyEvent};
use tracing::debug;

/// Line-editing surface consumed by a session.
///
/// Implementors read one line at a time, persist history and release their
/// terminal resources when closed.
pub trait LineEditor: Sized {
    /// Open a surface from `config`, offering completions from `completion`.
    fn open(config: &EditorConfig, completion: &CompletionNode) -> Result<Self, StartupError>;

    /// Block until one line has been read.
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError>;

    /// Record `line` in the history and persist it.
    fn save_history(&mut self, line: &str) -> Result<(), ReadlineError>;

    /// Release the input stream and the terminal.
    fn close(self);
}

/// [`LineEditor`] backed by rustyline.
pub struct TerminalEditor {
    editor: Editor<TreeCompleter, DefaultHistory>,
    config: EditorConfig,
}

impl LineEditor for TerminalEditor {
    fn open(config: &EditorConfig, completion: &CompletionNode) -> Result<Self, StartupError> {
        let mut editor = Editor::with_config(config.rustyline())?;
        editor.set_helper(Some(TreeCompleter::new(completion.clone())));
        if config.block_suspend {
            editor.bind_sequence(KeyEvent::ctrl('Z'), Cmd::Noop);
        }
        if let Err(err) = editor.load_history(&config.history_file) {
            // A missing history file is normal on first run.
            debug!(path = %config.history_file.display(), %err, "history not loaded");
        }
        Ok(Self {
            editor,
            config: config.clone(),
        })
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        self.editor.readline(prompt)
    }

    fn save_history(&mut self, line: &str) -> Result<(), ReadlineError> {
        if self.editor.add_history_entry(line)? {
            self.editor.append_history(&self.config.history_file)?;
        }
        Ok(())
    }

    fn close(self) {
        debug!("closing line editor");
        drop(self.editor);
    }
}
