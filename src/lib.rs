//! An embeddable interactive command interpreter with nested subcommands.
//!
//! Applications register a tree of named [`Command`]s in a [`CommandRegistry`]
//! and hand it to a [`Session`], which reads lines with rustyline, runs the
//! built-in system commands (`exit`, `clear`, `help`, `man`) and otherwise
//! resolves each line to exactly one command handler. The same tree feeds tab
//! completion. A session can be suspended and resumed, and a single line can
//! be executed without a prompt by passing `unattended` as the first process
//! argument.
//!
//! Handlers receive the tokens that follow the command path and parse them on
//! their own; the interpreter does not interpret flags.
//!
//! Example
//! ```no_run
//! use nested_shell::{Command, CommandRegistry, EditorConfig, Session};
//!
//! let mut registry = CommandRegistry::new();
//! registry.add_command(
//!     Command::new("greet", "say hello", |args: &[String]| {
//!         println!("Hello, {}!", args.join(" "));
//!     })
//!     .with_man_page("greet <name...>"),
//! );
//! let mut session = Session::new(registry, EditorConfig::from_env()).unwrap();
//! session.run().unwrap();
//! ```

pub mod command;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod editor;
pub mod error;
mod interpreter;
pub mod registry;
pub mod session;
mod signal;
pub mod system;

pub use command::{Command, CommandHandler};
pub use completion::CompletionNode;
pub use config::EditorConfig;
pub use editor::{LineEditor, TerminalEditor};
pub use error::{SessionError, StartupError};
pub use interpreter::{Flow, Interpreter};
pub use registry::CommandRegistry;
pub use session::{Session, SessionState};
