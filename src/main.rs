use argh::{EarlyExit, FromArgs};
use colored::Colorize;
use nested_shell::{Command, CommandRegistry, EditorConfig, Session};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Repeat words back, optionally joined by a custom separator.
#[derive(FromArgs)]
struct Echo {
    /// string placed between words (a single space unless given).
    #[argh(option, short = 's', default = "String::from(\" \")")]
    separator: String,

    /// shout the words in upper case.
    #[argh(switch, short = 'u')]
    upper: bool,

    /// words to repeat.
    #[argh(positional, greedy)]
    words: Vec<String>,
}

/// Parse handler arguments with argh, printing usage or errors on failure.
fn parse_args<T: FromArgs>(name: &str, args: &[String]) -> Option<T> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match T::from_args(&[name], &args) {
        Ok(parsed) => Some(parsed),
        Err(EarlyExit { output, status }) => {
            if status.is_err() {
                eprint!("{}", output.red());
            } else {
                print!("{}", output);
            }
            None
        }
    }
}

fn echo(args: &[String]) {
    let Some(echo) = parse_args::<Echo>("echo", args) else {
        return;
    };
    let line = echo.words.join(&echo.separator);
    if echo.upper {
        println!("{}", line.to_uppercase());
    } else {
        println!("{}", line);
    }
}

fn greet(args: &[String]) {
    if args.is_empty() {
        println!("Hello, world!");
    } else {
        println!("Hello, {}!", args.join(" "));
    }
}

type Settings = Rc<RefCell<BTreeMap<String, String>>>;

fn config_command(settings: &Settings) -> Command {
    let get = {
        let settings = settings.clone();
        move |args: &[String]| match args {
            [key] => match settings.borrow().get(key) {
                Some(value) => println!("{}", value),
                None => eprintln!("{}", format!("no such key: {}", key).red()),
            },
            _ => eprintln!("{}", "usage: config get <key>".red()),
        }
    };
    let set = {
        let settings = settings.clone();
        move |args: &[String]| match args {
            [key, value @ ..] if !value.is_empty() => {
                settings.borrow_mut().insert(key.clone(), value.join(" "));
            }
            _ => eprintln!("{}", "usage: config set <key> <value>".red()),
        }
    };
    let list = {
        let settings = settings.clone();
        move |_: &[String]| {
            for (key, value) in settings.borrow().iter() {
                println!("{} = {}", key, value);
            }
        }
    };

    Command::new("config", "in-memory settings", |args: &[String]| {
        eprintln!("{}", format!("unknown config action: {}", args.join(" ")).red());
    })
    .with_man_page("config get <key> | config set <key> <value> | config list")
    .with_subcommand(Command::new("get", "print the value of a key", get))
    .with_subcommand(Command::new("set", "assign a value to a key", set))
    .with_subcommand(Command::new("list", "print every key and value", list))
}

fn registry() -> CommandRegistry {
    let settings = Settings::default();
    let mut registry = CommandRegistry::new();
    registry.add_command(
        Command::new("greet", "say hello", greet).with_man_page("greet [name...]: greets the given name"),
    );
    registry.add_command(Command::new("echo", "repeat words, see `echo --help`", echo));
    registry.add_command(config_command(&settings));
    registry.add_command(Command::new(".", "print the version", |_: &[String]| {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }));
    registry
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut session = match Session::new(registry(), EditorConfig::from_env()) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    match session.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            ExitCode::FAILURE
        }
    }
}
