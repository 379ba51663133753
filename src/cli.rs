// File: ./src/cli.rs
//! Command-line parsing, help text and logger setup for the `goteam` binary.
use anyhow::{Result, anyhow, bail};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Add(String),
    Edit { id: String, text: String },
    List(Option<String>),
    Remove(String),
    /// Show what smart input would extract, without saving anything.
    Parse(String),
    LocationAdd {
        latitude: f64,
        longitude: f64,
        title: String,
        subtitle: Option<String>,
    },
    LocationList(Option<String>),
    LocationRemove { latitude: f64, longitude: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

/// Parses everything after the binary name. With no command, tasks are listed.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut verbose = false;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Ok(CliArgs {
                    root,
                    verbose,
                    command: Command::Help,
                });
            }
            "-v" | "--verbose" => verbose = true,
            "-r" | "--root" => {
                let path = iter.next().ok_or_else(|| anyhow!("--root needs a path"))?;
                root = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            // Anything else, including negative coordinates, is positional.
            other => positional.push(other),
        }
    }

    let command = parse_command(&positional)?;
    Ok(CliArgs {
        root,
        verbose,
        command,
    })
}

fn parse_command(words: &[&str]) -> Result<Command> {
    let Some((&name, rest)) = words.split_first() else {
        return Ok(Command::List(None));
    };
    let command = match name {
        "help" => Command::Help,
        "add" => Command::Add(text_arg(rest, "add <text>")?),
        "edit" => {
            let (&id, text) = rest
                .split_first()
                .ok_or_else(|| anyhow!("Usage: edit <id> <text>"))?;
            Command::Edit {
                id: id.to_string(),
                text: text_arg(text, "edit <id> <text>")?,
            }
        }
        "list" | "ls" => Command::List(optional_text(rest)),
        "rm" => match rest {
            [id] => Command::Remove(id.to_string()),
            _ => bail!("Usage: rm <id>"),
        },
        "parse" => Command::Parse(text_arg(rest, "parse <text>")?),
        "loc" => parse_location_command(rest)?,
        other => bail!("Unknown command: {}", other),
    };
    Ok(command)
}

fn parse_location_command(words: &[&str]) -> Result<Command> {
    match words {
        ["add", lat, lon, title, subtitle @ ..] => Ok(Command::LocationAdd {
            latitude: coordinate(lat)?,
            longitude: coordinate(lon)?,
            title: title.to_string(),
            subtitle: optional_text(subtitle),
        }),
        ["list" | "ls", query @ ..] => Ok(Command::LocationList(optional_text(query))),
        ["rm", lat, lon] => Ok(Command::LocationRemove {
            latitude: coordinate(lat)?,
            longitude: coordinate(lon)?,
        }),
        _ => bail!("Usage: loc add <lat> <lon> <title> [subtitle] | loc list [query] | loc rm <lat> <lon>"),
    }
}

fn text_arg(words: &[&str], usage: &str) -> Result<String> {
    optional_text(words).ok_or_else(|| anyhow!("Usage: {}", usage))
}

fn optional_text(words: &[&str]) -> Option<String> {
    let text = words.join(" ");
    (!text.trim().is_empty()).then_some(text)
}

fn coordinate(word: &str) -> Result<f64> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| anyhow!("Not a coordinate: {}", word))
}

/// Logs go to stderr so command output stays pipeable.
pub fn init_logging(level: LevelFilter) {
    if let Err(e) = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Logging unavailable: {}", e);
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "GoTeam v{} - Tasks with smart annotations",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <COMMAND>", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    add <text>                            Create a task from smart input");
    println!("    edit <id> <text>                      Replace a task's text (id prefix is enough)");
    println!("    list [query]                          List tasks, optionally filtered");
    println!("    rm <id>                               Delete a task");
    println!("    parse <text>                          Show what smart input extracts");
    println!("    loc add <lat> <lon> <title> [sub]     Save a location (same coordinates: retitle)");
    println!("    loc list [query]                      List saved locations");
    println!("    loc rm <lat> <lon>                    Delete a saved location");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Debug logging on stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("SMART INPUT SYNTAX:");
    println!("    @date             Due date (@today, @tomorrow, @friday, @next week, @3d, @2025-01-16)");
    println!("    ^date             Start date, same forms as @");
    println!("    !priority         Priority word from config (!high) or digit (!1 = most urgent)");
    println!("    #label            Label from config");
    println!("    *recurrence       *daily, *weekdays, *weekly, *monthly, *yearly");
    println!("    ~location         Title of a saved location");
    println!("    +contact          Contact name from config");
    println!();
    println!("    A trigger only counts at the start of a word. Unknown values stay in the text.");
    println!("    Queries starting with # match labels, anything else matches names.");
    println!();
    println!("EXAMPLES:");
    println!("    {} add Buy milk #groceries !high", binary_name);
    println!("    {} add Call mom +Ann @tomorrow *weekly", binary_name);
    println!("    {} list '#groceries'", binary_name);
    println!("    {} loc add 48.8584 2.2945 'Eiffel Tower' Paris", binary_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn no_command_lists_tasks() {
        let cli = parse_args(&[]).unwrap();
        assert_eq!(cli.command, Command::List(None));
        assert!(!cli.verbose);
    }

    #[test]
    fn add_joins_the_remaining_words() {
        let cli = parse_args(&args(&["-v", "add", "Buy", "milk", "#groceries"])).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command, Command::Add("Buy milk #groceries".to_string()));
    }

    #[test]
    fn root_takes_a_value() {
        let cli = parse_args(&args(&["--root", "/tmp/gt", "list", "milk"])).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/gt")));
        assert_eq!(cli.command, Command::List(Some("milk".to_string())));
        assert!(parse_args(&args(&["--root"])).is_err());
    }

    #[test]
    fn negative_coordinates_are_not_flags() {
        let cli = parse_args(&args(&["loc", "add", "-33.86", "151.21", "Opera", "House"])).unwrap();
        assert_eq!(
            cli.command,
            Command::LocationAdd {
                latitude: -33.86,
                longitude: 151.21,
                title: "Opera".to_string(),
                subtitle: Some("House".to_string()),
            }
        );
        assert!(parse_args(&args(&["loc", "rm", "north", "1"])).is_err());
    }

    #[test]
    fn usage_errors() {
        assert!(parse_args(&args(&["add"])).is_err());
        assert!(parse_args(&args(&["edit", "abc"])).is_err());
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
    }
}
