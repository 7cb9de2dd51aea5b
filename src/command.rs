use std::fmt;
use std::rc::Rc;

/// Callable invoked when a command is resolved.
///
/// The handler receives the tokens that followed the command path, in order.
/// Its outcome is not inspected by the shell: handlers report their own errors.
/// A blanket implementation exists for any `Fn(&[String])` closure.
pub trait CommandHandler {
    /// Run the handler with the remaining argument tokens.
    fn call(&self, args: &[String]);
}

impl<F: Fn(&[String])> CommandHandler for F {
    fn call(&self, args: &[String]) {
        self(args)
    }
}

/// A named node of the command tree.
///
/// A command without subcommands is a leaf. Sibling names are expected to be
/// unique, but this is not enforced: resolution always picks the first match,
/// so a later duplicate is unreachable.
///
/// Example
/// ```
/// use nested_shell::Command;
/// let cmd = Command::new("config", "manage settings", |_: &[String]| {})
///     .with_man_page("config get|set|list")
///     .with_subcommand(Command::new("list", "list all settings", |_: &[String]| {}));
/// assert!(!cmd.is_leaf());
/// assert!(cmd.subcommand("list").is_some());
/// ```
#[derive(Clone)]
pub struct Command {
    /// Word typed by the user to select this command.
    pub name: String,
    /// One-line description shown by `help`.
    pub help: String,
    /// Long-form text shown by `man`. Empty means no manpage.
    pub man_page: String,
    /// Handler invoked with the remaining tokens.
    pub handler: Rc<dyn CommandHandler>,
    /// Ordered children of this command.
    pub subcommands: Vec<Command>,
}

impl Command {
    /// Create a leaf command without a manpage.
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            man_page: String::new(),
            handler: Rc::new(handler),
            subcommands: Vec::new(),
        }
    }

    pub fn with_man_page(mut self, man_page: impl Into<String>) -> Self {
        self.man_page = man_page.into();
        self
    }

    /// Append a child after any existing ones.
    pub fn with_subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.subcommands.is_empty()
    }

    pub fn has_man_page(&self) -> bool {
        !self.man_page.is_empty()
    }

    /// First immediate child named `name`.
    pub fn subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|c| c.name == name)
    }

    pub(crate) fn invoke(&self, args: &[String]) {
        self.handler.call(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("man_page", &self.man_page)
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_handler_receives_args() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let cmd = Command::new("echo", "print args", move |args: &[String]| {
            sink.borrow_mut().extend_from_slice(args);
        });

        cmd.invoke(&["a".to_string(), "b".to_string()]);

        assert_eq!(*seen.borrow(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_subcommand_lookup_prefers_first() {
        let cmd = Command::new("root", "", |_: &[String]| {})
            .with_subcommand(Command::new("dup", "first", |_: &[String]| {}))
            .with_subcommand(Command::new("dup", "second", |_: &[String]| {}));

        assert_eq!(cmd.subcommand("dup").map(|c| c.help.as_str()), Some("first"));
        assert!(cmd.subcommand("missing").is_none());
    }

    #[test]
    fn test_man_page_presence() {
        let plain = Command::new("a", "", |_: &[String]| {});
        assert!(!plain.has_man_page());
        assert!(plain.is_leaf());
        assert!(plain.with_man_page("text").has_man_page());
    }
}
