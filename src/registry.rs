use crate::command::{Command, CommandHandler};
use crate::completion::CompletionNode;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Owner of the command tree and of its completion shadow tree.
///
/// Commands are registered during startup and never removed. Each registration
/// extends both trees together, so they always have the same shape.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    completion: CompletionNode,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `command` to the root commands and mirror its subtree for completion.
    ///
    /// A root name that is already registered is accepted; the earlier command
    /// keeps winning resolution.
    pub fn add_command(&mut self, command: Command) {
        if self.commands.iter().any(|c| c.name == command.name) {
            debug!(name = %command.name, "duplicate root command registered, it will be unreachable");
        }
        self.completion
            .children
            .push(CompletionNode::from_command(&command));
        debug!(name = %command.name, "registered command");
        self.commands.push(command);
    }

    /// Root commands in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn root_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    /// Completion tree; its root has an empty name.
    pub fn completion(&self) -> &CompletionNode {
        &self.completion
    }

    /// Flatten the tree into a map from `+`-joined paths (e.g. `config+get`) to handlers.
    ///
    /// When two nodes share a path, the first registered one is kept.
    pub fn command_map(&self) -> HashMap<String, Rc<dyn CommandHandler>> {
        let mut map = HashMap::new();
        collect_handlers(&self.commands, "", &mut map);
        map
    }
}

fn collect_handlers(
    commands: &[Command],
    prefix: &str,
    map: &mut HashMap<String, Rc<dyn CommandHandler>>,
) {
    for command in commands {
        let key = format!("{}{}", prefix, command.name);
        map.entry(key.clone())
            .or_insert_with(|| command.handler.clone());
        if !command.is_leaf() {
            collect_handlers(&command.subcommands, &format!("{}+", key), map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn noop(_: &[String]) {}

    #[test]
    fn test_add_command_extends_both_trees() {
        let mut registry = CommandRegistry::new();
        registry.add_command(
            Command::new("a", "", noop).with_subcommand(
                Command::new("b", "", noop).with_subcommand(Command::new("c", "", noop)),
            ),
        );
        registry.add_command(Command::new("d", "", noop));

        assert_eq!(registry.root_names(), vec!["a", "d"]);
        let tree = registry.completion();
        assert_eq!(tree.name, "");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children[0].children[0].name, "c");
        assert_eq!(tree.children[1].name, "d");
    }

    #[test]
    fn test_duplicate_roots_are_kept() {
        let mut registry = CommandRegistry::new();
        registry.add_command(Command::new("dup", "first", noop));
        registry.add_command(Command::new("dup", "second", noop));

        assert_eq!(registry.commands().len(), 2);
        assert_eq!(registry.completion().children.len(), 2);
    }

    #[test]
    fn test_registries_are_independent() {
        let mut one = CommandRegistry::new();
        let two = CommandRegistry::new();
        one.add_command(Command::new("only", "", noop));

        assert_eq!(one.completion().children.len(), 1);
        assert!(two.completion().children.is_empty());
    }

    #[test]
    fn test_command_map_paths_and_first_wins() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorder = |tag: &'static str| {
            let calls = calls.clone();
            move |_: &[String]| calls.borrow_mut().push(tag)
        };

        let mut registry = CommandRegistry::new();
        registry.add_command(
            Command::new("config", "", recorder("config"))
                .with_subcommand(Command::new("get", "", recorder("get"))),
        );
        registry.add_command(Command::new("config", "", recorder("shadowed")));

        let map = registry.command_map();
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["config", "config+get"]);

        map["config+get"].call(&[]);
        map["config"].call(&[]);
        assert_eq!(*calls.borrow(), vec!["get", "config"]);
    }
}
