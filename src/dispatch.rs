//! Resolution of a tokenized line against the command tree.
//!
//! Resolution walks the tree one token at a time with a single token of
//! lookahead: it descends into a child only when the *next* token names one of
//! the matched command's immediate subcommands. Otherwise the matched command's
//! handler receives every remaining token, even if some deeper branch could have
//! matched them. There is no backtracking, and the first matching sibling wins.

use crate::command::Command;
use std::io::Write;
use tracing::{debug, trace};

/// Outcome of a resolution: which command fires and with which arguments.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub command: &'a Command,
    pub args: &'a [String],
    /// Depth of `command` in the tree, 0 for a root command.
    pub depth: usize,
}

/// Whether a dispatch invoked a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Invoked,
    /// Nothing matched; this is not an error.
    NoMatch,
}

/// Resolve `tokens` against the `commands` sibling list.
pub fn resolve<'a>(commands: &'a [Command], tokens: &'a [String]) -> Option<Resolution<'a>> {
    resolve_at(commands, tokens, 0)
}

fn resolve_at<'a>(
    commands: &'a [Command],
    tokens: &'a [String],
    depth: usize,
) -> Option<Resolution<'a>> {
    let (token, rest) = tokens.split_first()?;
    let command = commands.iter().find(|c| c.name == *token)?;
    trace!(name = %command.name, depth, "matched command");

    match rest.first() {
        Some(next) if command.subcommand(next).is_some() => {
            resolve_at(&command.subcommands, rest, depth + 1)
        }
        _ => Some(Resolution {
            command,
            args: rest,
            depth,
        }),
    }
}

/// Resolve `tokens` and invoke exactly one handler, then write a blank line to `out`.
///
/// A line that matches nothing is silently ignored.
pub fn dispatch(
    commands: &[Command],
    tokens: &[String],
    out: &mut dyn Write,
) -> anyhow::Result<Dispatch> {
    let Some(resolution) = resolve(commands, tokens) else {
        debug!(input = ?tokens, "no command matched");
        return Ok(Dispatch::NoMatch);
    };

    debug!(
        name = %resolution.command.name,
        depth = resolution.depth,
        args = ?resolution.args,
        "invoking handler"
    );
    resolution.command.invoke(resolution.args);
    writeln!(out)?;
    Ok(Dispatch::Invoked)
}
