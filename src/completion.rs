use crate::command::Command;
use rustyline::Context;
use rustyline::Helper;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;

/// Node of the completion tree, mirroring the shape of the command tree.
///
/// The root node has an empty name and one child per registered root command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionNode {
    pub name: String,
    pub children: Vec<CompletionNode>,
}

impl CompletionNode {
    /// Build the subtree for `command`, one node per command at the same depth and order.
    pub fn from_command(command: &Command) -> Self {
        Self {
            name: command.name.clone(),
            children: command.subcommands.iter().map(Self::from_command).collect(),
        }
    }

    /// First immediate child named `name`.
    pub fn child(&self, name: &str) -> Option<&CompletionNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Suggest names that complete the last word of `line`.
    ///
    /// Returns the byte offset where the partial word starts and the matching
    /// child names of the node reached by the fully typed words.
    pub fn suggest(&self, line: &str) -> (usize, Vec<&str>) {
        let mut words: Vec<&str> = line.split_whitespace().collect();
        let partial = if line.is_empty() || line.ends_with(char::is_whitespace) {
            ""
        } else {
            words.pop().unwrap_or_default()
        };

        let mut node = self;
        for word in words {
            match node.child(word) {
                Some(child) => node = child,
                None => return (line.len(), Vec::new()),
            }
        }

        let candidates = node
            .children
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| name.starts_with(partial))
            .collect();
        (line.len() - partial.len(), candidates)
    }
}

/// rustyline helper offering prefix completion over a [`CompletionNode`] tree.
pub struct TreeCompleter {
    tree: CompletionNode,
}

impl TreeCompleter {
    pub fn new(tree: CompletionNode) -> Self {
        Self { tree }
    }
}

impl Completer for TreeCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.tree.suggest(&line[..pos]);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{} ", name),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for TreeCompleter {
    type Hint = String;
}

impl Highlighter for TreeCompleter {}

impl Validator for TreeCompleter {}

impl Helper for TreeCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &[String]) {}

    fn sample_tree() -> CompletionNode {
        let config = Command::new("config", "", noop)
            .with_subcommand(Command::new("get", "", noop))
            .with_subcommand(Command::new("set", "", noop))
            .with_subcommand(Command::new("list", "", noop));
        CompletionNode {
            name: String::new(),
            children: vec![
                CompletionNode::from_command(&config),
                CompletionNode::from_command(&Command::new("clearance", "", noop)),
            ],
        }
    }

    #[test]
    fn test_from_command_mirrors_shape() {
        let cmd = Command::new("a", "", noop).with_subcommand(
            Command::new("b", "", noop).with_subcommand(Command::new("c", "", noop)),
        );
        let node = CompletionNode::from_command(&cmd);

        assert_eq!(node.name, "a");
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].name, "b");
        assert_eq!(node.children[0].children[0].name, "c");
        assert!(node.children[0].children[0].children.is_empty());
    }

    #[test]
    fn test_suggest_root_prefix() {
        let tree = sample_tree();
        assert_eq!(tree.suggest("c"), (0, vec!["config", "clearance"]));
        assert_eq!(tree.suggest("con"), (0, vec!["config"]));
        assert_eq!(tree.suggest(""), (0, vec!["config", "clearance"]));
    }

    #[test]
    fn test_suggest_nested_after_space() {
        let tree = sample_tree();
        assert_eq!(tree.suggest("config "), (7, vec!["get", "set", "list"]));
        assert_eq!(tree.suggest("config  s"), (8, vec!["set"]));
    }

    #[test]
    fn test_suggest_unknown_path_is_empty() {
        let tree = sample_tree();
        let (start, names) = tree.suggest("nope g");
        assert_eq!(start, 6);
        assert!(names.is_empty());
    }
}
