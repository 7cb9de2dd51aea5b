use crate::config::EditorConfig;
use crate::editor::{LineEditor, TerminalEditor};
use crate::error::{SessionError, StartupError};
use crate::interpreter::{Flow, Interpreter};
use crate::registry::CommandRegistry;
use crate::signal::install_interrupt_listener;
use chrono::{DateTime, Local};
use colored::Colorize;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tracing::{debug, info, warn};

/// First process argument that switches to one-shot, non-interactive mode.
pub const UNATTENDED_MARKER: &str = "unattended";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, the read loop has not started yet.
    Idle,
    Active,
    Suspended,
}

/// Why the read loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopEnd {
    Exit,
    Eof,
}

/// Input line for unattended mode, if `args` (including the program name)
/// start with [`UNATTENDED_MARKER`].
pub fn unattended_line(args: &[String]) -> Option<String> {
    match args {
        [_, marker, rest @ ..] if marker == UNATTENDED_MARKER => Some(rest.join(" ")),
        _ => None,
    }
}

/// Interactive session: owns the line editor and drives the read loop.
///
/// A session can be suspended, which closes its line editor and keeps a copy
/// of its configuration, and later resumed, which opens a new editor from that
/// copy and restarts the loop. Transitions must not overlap with a running loop.
pub struct Session<E: LineEditor = TerminalEditor> {
    interpreter: Interpreter,
    config: EditorConfig,
    editor: Option<E>,
    snapshot: Option<EditorConfig>,
    last_interaction: Option<DateTime<Local>>,
    state: SessionState,
}

impl Session<TerminalEditor> {
    /// Open a rustyline-backed session over a fully registered command tree.
    pub fn new(registry: CommandRegistry, config: EditorConfig) -> Result<Self, StartupError> {
        Self::with_editor(registry, config)
    }
}

impl<E: LineEditor> Session<E> {
    /// Open a session using the line editor `E`.
    pub fn with_editor(
        registry: CommandRegistry,
        config: EditorConfig,
    ) -> Result<Self, StartupError> {
        let editor = E::open(&config, registry.completion())?;
        Ok(Self {
            interpreter: Interpreter::new(registry),
            config,
            editor: Some(editor),
            snapshot: None,
            last_interaction: None,
            state: SessionState::Idle,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn history_file(&self) -> &Path {
        &self.config.history_file
    }

    /// Time of the last line read; `None` when no interactive session is active.
    pub fn last_interaction(&self) -> Option<DateTime<Local>> {
        self.last_interaction
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Entry point: run once in unattended mode if the process arguments ask
    /// for it, otherwise start the interactive loop.
    pub fn run(&mut self) -> Result<(), SessionError> {
        let args: Vec<String> = std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        if let Some(line) = unattended_line(&args) {
            self.run_unattended(&line);
        }
        self.run_interactive()
    }

    /// Execute `line` once and terminate the process.
    ///
    /// Exits with status 1 if executing the line failed, 0 otherwise.
    pub fn run_unattended(&self, line: &str) -> ! {
        info!(%line, "unattended run");
        let mut stdout = io::stdout();
        let code = match self.interpreter.execute_line(line, &mut stdout) {
            Ok(_) => 0,
            Err(err) => {
                eprintln!("{}", err.to_string().red());
                1
            }
        };
        let _ = stdout.flush();
        process::exit(code)
    }

    /// Install the interrupt listener and read lines until `exit`, end of input
    /// or a read failure.
    ///
    /// A suspended session must be restarted with [`Session::resume`]. After
    /// end of input the session stays `Active` with its editor open: call this
    /// again to keep reading, or [`Session::suspend`] to release the terminal.
    pub fn run_interactive(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Suspended {
            return Err(SessionError::InvalidTransition {
                action: "run",
                state: self.state,
            });
        }
        install_interrupt_listener();
        let end = self.start();
        Self::finish(end)
    }

    fn start(&mut self) -> Result<LoopEnd, SessionError> {
        self.state = SessionState::Active;
        self.read_loop()
    }

    /// Close the line editor and keep its configuration for [`Session::resume`].
    pub fn suspend(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Suspended {
            return Err(SessionError::InvalidTransition {
                action: "suspend",
                state: self.state,
            });
        }
        self.snapshot = Some(self.config.clone());
        if let Some(editor) = self.editor.take() {
            editor.close();
        }
        self.last_interaction = None;
        self.state = SessionState::Suspended;
        debug!("session suspended");
        Ok(())
    }

    /// Reopen the line editor from the suspended configuration and restart the
    /// read loop. Does not return while the loop runs.
    ///
    /// If the editor cannot be opened the session stays suspended and `resume`
    /// can be retried.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        let snapshot = match (self.state, self.snapshot.as_ref()) {
            (SessionState::Suspended, Some(snapshot)) => snapshot,
            (state, _) => {
                return Err(SessionError::InvalidTransition {
                    action: "resume",
                    state,
                });
            }
        };

        let editor = E::open(snapshot, self.interpreter.registry().completion())?;
        self.editor = Some(editor);
        if let Some(snapshot) = self.snapshot.take() {
            self.config = snapshot;
        }
        self.last_interaction = Some(Local::now());
        self.state = SessionState::Active;
        debug!("session resumed");
        let end = self.read_loop();
        Self::finish(end)
    }

    fn finish(end: Result<LoopEnd, SessionError>) -> Result<(), SessionError> {
        match end? {
            LoopEnd::Exit => process::exit(0),
            LoopEnd::Eof => Ok(()),
        }
    }

    fn read_loop(&mut self) -> Result<LoopEnd, SessionError> {
        let Some(editor) = self.editor.as_mut() else {
            return Err(SessionError::InvalidTransition {
                action: "read from",
                state: self.state,
            });
        };

        loop {
            let line = match editor.read_line(&self.config.prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("{}", self.config.interrupt_prompt);
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", self.config.eof_prompt);
                    return Ok(LoopEnd::Eof);
                }
                Err(err) => return Err(SessionError::Read(err)),
            };
            self.last_interaction = Some(Local::now());

            if let Err(err) = editor.save_history(&line) {
                warn!(%err, path = %self.config.history_file.display(), "failed to save history");
            }

            let mut stdout = io::stdout();
            match self.interpreter.execute_line(&line, &mut stdout) {
                Ok(Flow::Exit) => return Ok(LoopEnd::Exit),
                Ok(Flow::Continue) => {}
                Err(err) => eprintln!("{}", err.to_string().red()),
            }
            let _ = stdout.flush();
        }
    }
}
