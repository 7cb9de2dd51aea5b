use crate::dispatch::{self, Dispatch};
use crate::registry::CommandRegistry;
use crate::system::{self, Interception};
use std::io::Write;

/// What the caller should do after a line has been executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// `exit` was entered; the farewell has been written.
    Exit,
}

/// Runs one interception and dispatch cycle per input line.
///
/// The interpreter owns the [`CommandRegistry`], which is fully built before
/// the first line is executed and only read afterwards.
///
/// Example
/// ```
/// use nested_shell::{Command, CommandRegistry, Flow, Interpreter};
/// let mut registry = CommandRegistry::new();
/// registry.add_command(Command::new("hello", "say hello", |_: &[String]| {}));
/// let interp = Interpreter::new(registry);
/// let mut out = Vec::new();
/// assert_eq!(interp.execute_line("hello", &mut out).unwrap(), Flow::Continue);
/// ```
#[derive(Debug)]
pub struct Interpreter {
    registry: CommandRegistry,
}

impl Interpreter {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Split `line` on whitespace, run a system command if it names one, and
    /// otherwise dispatch it against the command tree.
    ///
    /// Lines that match nothing are ignored without error.
    pub fn execute_line(&self, line: &str, out: &mut dyn Write) -> anyhow::Result<Flow> {
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        if tokens.is_empty() {
            writeln!(out, "No input detected")?;
            return Ok(Flow::Continue);
        }

        let commands = self.registry.commands();
        match system::intercept(commands, &tokens, out)? {
            Interception::Exit => return Ok(Flow::Exit),
            Interception::Handled => return Ok(Flow::Continue),
            Interception::Passed => {}
        }

        match dispatch::dispatch(commands, &tokens, out)? {
            Dispatch::Invoked | Dispatch::NoMatch => Ok(Flow::Continue),
        }
    }
}
