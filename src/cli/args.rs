//! Command-line argument parsing for the `ansari` CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use thiserror::Error;

use crate::models::{FeedbackClass, ParseFeedbackClassError};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// List threads
    Threads,
    /// Show one thread with its messages
    Show { thread_id: String },
    /// Create an empty thread
    New,
    /// Send a message and stream the reply
    Send { thread_id: String, text: String },
    /// Rename a thread
    Rename { thread_id: String, name: String },
    /// Delete a thread
    Delete { thread_id: String },
    /// Leave feedback on a message
    Feedback {
        thread_id: String,
        message_id: String,
        class: FeedbackClass,
        comment: String,
    },
}

/// Why the command line could not be understood.
#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error(transparent)]
    InvalidFeedbackClass(#[from] ParseFeedbackClassError),
}

pub const USAGE: &str = "\
Usage: ansari <command> [args]

Commands:
  threads                                   List threads
  show <thread>                             Show a thread and its messages
  new                                       Create an empty thread
  send <thread> <text...>                   Send a message and stream the reply
  rename <thread> <name...>                 Rename a thread
  delete <thread>                           Delete a thread
  feedback <thread> <message> <class> [comment...]
                                            class: thumbsup, thumbsdown, redo, copy

Options:
  -h, --help       Show this help
  -V, --version    Show version

Environment:
  ANSARI_API_URL         API base URL (default http://localhost:8000)
  ANSARI_TOKEN           Access token
  ANSARI_REFRESH_TOKEN   Refresh token, enables automatic token refresh
  ANSARI_AUTH_URL        Auth server base URL (default: ANSARI_API_URL)
  RUST_LOG               Log filter, logs go to stderr (default warn)";

/// Parse command-line arguments and return the command to execute.
///
/// # Examples
///
/// ```
/// use ansari_client::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ansari".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);

    let command = match args.next() {
        Some(command) => command,
        None => return Ok(CliCommand::Help),
    };

    match command.as_str() {
        "--version" | "-V" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "threads" | "list" => Ok(CliCommand::Threads),
        "new" => Ok(CliCommand::New),
        "show" => Ok(CliCommand::Show {
            thread_id: required(&mut args, "show", "a thread id")?,
        }),
        "delete" => Ok(CliCommand::Delete {
            thread_id: required(&mut args, "delete", "a thread id")?,
        }),
        "send" => {
            let thread_id = required(&mut args, "send", "a thread id")?;
            let text = rest(args, "send", "message text")?;
            Ok(CliCommand::Send { thread_id, text })
        }
        "rename" => {
            let thread_id = required(&mut args, "rename", "a thread id")?;
            let name = rest(args, "rename", "a name")?;
            Ok(CliCommand::Rename { thread_id, name })
        }
        "feedback" => {
            let thread_id = required(&mut args, "feedback", "a thread id")?;
            let message_id = required(&mut args, "feedback", "a message id")?;
            let class = required(&mut args, "feedback", "a feedback class")?.parse()?;
            let comment = args.collect::<Vec<_>>().join(" ");
            Ok(CliCommand::Feedback {
                thread_id,
                message_id,
                class,
                comment,
            })
        }
        _ => Err(ArgsError::UnknownCommand(command)),
    }
}

fn required<I>(args: &mut I, command: &'static str, what: &'static str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or(ArgsError::MissingArgument { command, what })
}

/// Remaining words joined with spaces; at least one is required.
fn rest<I>(args: I, command: &'static str, what: &'static str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    let words: Vec<String> = args.collect();
    if words.is_empty() {
        return Err(ArgsError::MissingArgument { command, what });
    }
    Ok(words.join(" "))
}
