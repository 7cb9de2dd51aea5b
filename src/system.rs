use crate::command::Command;
use std::io::{self, Write};
use tracing::debug;

/// Line printed before the process terminates.
pub const FAREWELL: &str = "Bye";

/// Terminal escape sequence that homes the cursor and clears the screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Name of a command that is dispatched normally but never listed by `help`.
pub const HIDDEN_NAME: &str = ".";

/// Built-in directives checked before the command tree is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    Exit,
    Clear,
    Help,
    Man,
}

impl SystemCommand {
    pub const ALL: [SystemCommand; 4] = [Self::Exit, Self::Clear, Self::Help, Self::Man];

    pub fn name(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Clear => "clear",
            Self::Help => "help",
            Self::Man => "man",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == word)
    }
}

/// What the interceptor did with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Not a system command; the dispatcher should run.
    Passed,
    /// A system command ran; the dispatcher must not run.
    Handled,
    /// `exit` was requested and the farewell has been written.
    Exit,
}

/// Check `tokens[0]` against the system commands and run the one it names.
pub fn intercept(
    commands: &[Command],
    tokens: &[String],
    out: &mut dyn Write,
) -> io::Result<Interception> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(Interception::Passed);
    };
    let Some(system) = SystemCommand::parse(first) else {
        return Ok(Interception::Passed);
    };
    debug!(command = system.name(), ?args, "system command");

    match system {
        SystemCommand::Exit => {
            writeln!(out, "{}", FAREWELL)?;
            return Ok(Interception::Exit);
        }
        SystemCommand::Clear => write!(out, "{}", CLEAR_SCREEN)?,
        SystemCommand::Help => help(commands, args, out)?,
        SystemCommand::Man => man(commands, args, out)?,
    }
    out.flush()?;
    Ok(Interception::Handled)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    Help,
    Man,
}

fn help(commands: &[Command], names: &[String], out: &mut dyn Write) -> io::Result<()> {
    let selected: Vec<&Command> = if names.is_empty() {
        commands.iter().collect()
    } else {
        names
            .iter()
            .flat_map(|name| commands.iter().filter(move |c| c.name == *name))
            .collect()
    };

    if selected.is_empty() && !names.is_empty() {
        return writeln!(out, "command(s) not found");
    }
    let roots: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
    write_tree(selected, &roots, Listing::Help, 0, out)
}

fn man(commands: &[Command], names: &[String], out: &mut dyn Write) -> io::Result<()> {
    let mut selected: Vec<&Command> = Vec::new();
    if names.is_empty() {
        selected.extend(commands.iter().filter(|c| c.has_man_page()));
    } else {
        let mut unfound: Vec<&str> = Vec::new();
        for name in names {
            match commands
                .iter()
                .find(|c| c.name == *name && c.has_man_page())
            {
                Some(command) => selected.push(command),
                None => unfound.push(name),
            }
        }
        if !unfound.is_empty() {
            writeln!(
                out,
                "manpage not found for command(s) [{}]",
                unfound.join(", ")
            )?;
        }
    }

    if selected.is_empty() {
        return writeln!(out, "no manpages found");
    }
    let roots: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
    write_tree(selected, &roots, Listing::Man, 0, out)
}

/// Print one `[name]: text` line per node, one tab per level of nesting.
///
/// Meeting a node whose name is one of `roots` resets the indentation to zero
/// for that node, its descendants, and the siblings that follow it.
fn write_tree<'a>(
    commands: impl IntoIterator<Item = &'a Command>,
    roots: &[&str],
    listing: Listing,
    mut offset: usize,
    out: &mut dyn Write,
) -> io::Result<()> {
    for command in commands {
        if listing == Listing::Help && command.name == HIDDEN_NAME {
            continue;
        }
        if roots.contains(&command.name.as_str()) {
            offset = 0;
        }
        let text = match listing {
            Listing::Help => &command.help,
            Listing::Man => &command.man_page,
        };
        writeln!(out, "{}[{}]: {}", "\t".repeat(offset), command.name, text)?;
        if !command.is_leaf() {
            write_tree(&command.subcommands, roots, listing, offset + 1, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &[String]) {}

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn run(commands: &[Command], line: &str) -> (Interception, String) {
        let mut out = Vec::new();
        let result = intercept(commands, &tokens(line), &mut out).unwrap();
        (result, String::from_utf8(out).unwrap())
    }

    fn three_levels() -> Vec<Command> {
        vec![
            Command::new("a", "alpha", noop).with_subcommand(
                Command::new("b", "beta", noop).with_subcommand(Command::new("c", "gamma", noop)),
            ),
            Command::new("d", "delta", noop).with_subcommand(Command::new("e", "epsilon", noop)),
        ]
    }

    #[test]
    fn test_parse_only_known_directives() {
        assert_eq!(SystemCommand::parse("help"), Some(SystemCommand::Help));
        assert_eq!(SystemCommand::parse("exit"), Some(SystemCommand::Exit));
        assert_eq!(SystemCommand::parse("Help"), None);
        assert_eq!(SystemCommand::parse("a"), None);
    }

    #[test]
    fn test_non_system_line_passes() {
        let (result, out) = run(&three_levels(), "a b");
        assert_eq!(result, Interception::Passed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_exit_prints_farewell() {
        let (result, out) = run(&three_levels(), "exit now please");
        assert_eq!(result, Interception::Exit);
        assert_eq!(out, "Bye\n");
    }

    #[test]
    fn test_clear_emits_escape_sequence() {
        let (result, out) = run(&[], "clear");
        assert_eq!(result, Interception::Handled);
        assert_eq!(out, "\x1b[H\x1b[2J");
    }

    #[test]
    fn test_help_lists_whole_tree_with_indentation() {
        let (result, out) = run(&three_levels(), "help");
        assert_eq!(result, Interception::Handled);
        assert_eq!(
            out,
            "[a]: alpha\n\
             \t[b]: beta\n\
             \t\t[c]: gamma\n\
             [d]: delta\n\
             \t[e]: epsilon\n"
        );
    }

    #[test]
    fn test_help_resets_indentation_at_root_names() {
        let commands = vec![
            Command::new("a", "alpha", noop).with_subcommand(
                Command::new("b", "beta", noop)
                    .with_subcommand(Command::new("d", "nested d", noop))
                    .with_subcommand(Command::new("x", "after d", noop)),
            ),
            Command::new("d", "delta", noop),
        ];

        let (_, out) = run(&commands, "help");

        assert_eq!(
            out,
            "[a]: alpha\n\
             \t[b]: beta\n\
             [d]: nested d\n\
             [x]: after d\n\
             [d]: delta\n"
        );
    }

    #[test]
    fn test_help_for_named_roots_only() {
        let (_, out) = run(&three_levels(), "help d");
        assert_eq!(out, "[d]: delta\n\t[e]: epsilon\n");
    }

    #[test]
    fn test_help_unknown_names() {
        let (result, out) = run(&three_levels(), "help nope b");
        assert_eq!(result, Interception::Handled);
        assert_eq!(out, "command(s) not found\n");
    }

    #[test]
    fn test_help_skips_hidden_command() {
        let commands = vec![
            Command::new(".", "secret", noop),
            Command::new("a", "alpha", noop),
        ];
        let (_, out) = run(&commands, "help");
        assert_eq!(out, "[a]: alpha\n");
    }

    #[test]
    fn test_man_lists_only_roots_with_manpages() {
        let commands = vec![
            Command::new("foo", "f", noop).with_man_page("foo does things"),
            Command::new("plain", "p", noop),
        ];
        let (_, out) = run(&commands, "man");
        assert_eq!(out, "[foo]: foo does things\n");
    }

    #[test]
    fn test_man_without_any_manpages() {
        let (_, out) = run(&three_levels(), "man");
        assert_eq!(out, "no manpages found\n");
    }

    #[test]
    fn test_man_reports_unfound_alongside_found() {
        let commands = vec![
            Command::new("foo", "f", noop).with_man_page("foo does things"),
            Command::new("plain", "p", noop),
        ];
        let (result, out) = run(&commands, "man foo bar plain");
        assert_eq!(result, Interception::Handled);
        assert_eq!(
            out,
            "manpage not found for command(s) [bar, plain]\n\
             [foo]: foo does things\n"
        );
    }

    #[test]
    fn test_man_all_unfound() {
        let (_, out) = run(&three_levels(), "man a");
        assert_eq!(
            out,
            "manpage not found for command(s) [a]\nno manpages found\n"
        );
    }
}
