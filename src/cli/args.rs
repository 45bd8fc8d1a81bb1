//! Command-line argument parsing for the chateqt CLI.

use thiserror::Error;

/// Options of the `chat` subcommand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatArgs {
    pub query: String,
    /// Continue this conversation; its messages are sent as history.
    pub conversation_id: Option<String>,
    /// Print each event as one JSON line.
    pub json: bool,
    /// Read the body as cumulative snapshots instead of chunks.
    pub cumulative: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Ask a question and stream the answer
    Chat(ChatArgs),
    /// List conversations
    History,
    /// Print one conversation
    Show { id: String },
    /// Create an empty conversation
    New { title: Option<String> },
    /// Delete a conversation
    Delete { id: String },
    Login { email: String },
    Signup { email: String, name: Option<String> },
    Logout,
    /// Show remaining queries
    Usage,
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unknown option '{option}' for '{command}'")]
    UnknownOption { command: String, option: String },
    #[error("'{command}' requires {name}")]
    MissingArgument { command: String, name: String },
    #[error("option '{0}' requires a value")]
    MissingValue(String),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

pub const USAGE: &str = "\
Usage: chateqt <command> [args]

Commands:
  chat [--conversation ID] [--json] [--cumulative] QUERY...
                        Ask a question and stream the answer
  history               List your conversations
  show ID               Print a conversation
  new [TITLE]           Create a conversation
  delete ID             Delete a conversation
  login EMAIL           Sign in (password is prompted)
  signup EMAIL [NAME]   Create an account
  logout                Forget the stored session
  usage                 Show remaining queries
  help                  Show this message

Options:
  -V, --version         Print version

Environment:
  CHATEQT_API_URL, CHATEQT_SITE_URL, CHATEQT_API_KEY,
  CHATEQT_TIMEOUT_SECS, CHATEQT_BODY_MODE=chunked|cumulative, RUST_LOG";

/// Parse command-line arguments, skipping the program name.
///
/// No arguments at all selects [`CliCommand::Help`].
///
/// # Examples
///
/// ```
/// use chateqt::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chateqt".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);
    let command = match args.next() {
        Some(command) => command,
        None => return Ok(CliCommand::Help),
    };
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "--version" | "-V" | "version" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "chat" => parse_chat(rest).map(CliCommand::Chat),
        "history" => no_args(&command, rest).map(|_| CliCommand::History),
        "logout" => no_args(&command, rest).map(|_| CliCommand::Logout),
        "usage" => no_args(&command, rest).map(|_| CliCommand::Usage),
        "show" => one_arg(&command, "a conversation id", rest).map(|id| CliCommand::Show { id }),
        "delete" => {
            one_arg(&command, "a conversation id", rest).map(|id| CliCommand::Delete { id })
        }
        "new" => {
            let title = rest.join(" ");
            Ok(CliCommand::New {
                title: (!title.is_empty()).then_some(title),
            })
        }
        "login" => one_arg(&command, "an email", rest).map(|email| CliCommand::Login { email }),
        "signup" => {
            let mut rest = rest.into_iter();
            let email = rest.next().ok_or_else(|| missing(&command, "an email"))?;
            let name = rest.collect::<Vec<_>>().join(" ");
            Ok(CliCommand::Signup {
                email,
                name: (!name.is_empty()).then_some(name),
            })
        }
        _ => Err(ArgsError::UnknownCommand(command)),
    }
}

fn parse_chat(rest: Vec<String>) -> Result<ChatArgs, ArgsError> {
    let mut chat = ChatArgs::default();
    let mut words = Vec::new();
    let mut rest = rest.into_iter();

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--conversation" | "-c" => {
                chat.conversation_id = Some(rest.next().ok_or(ArgsError::MissingValue(arg))?);
            }
            "--json" => chat.json = true,
            "--cumulative" => chat.cumulative = true,
            // Everything after `--` is query text.
            "--" => words.extend(rest.by_ref()),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(ArgsError::UnknownOption {
                    command: "chat".to_string(),
                    option: arg,
                });
            }
            // Options end at the first query word.
            _ => {
                words.push(arg);
                words.extend(rest.by_ref());
            }
        }
    }

    chat.query = words.join(" ");
    if chat.query.trim().is_empty() {
        return Err(missing("chat", "a query"));
    }
    Ok(chat)
}

fn missing(command: &str, name: &str) -> ArgsError {
    ArgsError::MissingArgument {
        command: command.to_string(),
        name: name.to_string(),
    }
}

fn no_args(_command: &str, rest: Vec<String>) -> Result<(), ArgsError> {
    match rest.into_iter().next() {
        Some(extra) => Err(ArgsError::UnexpectedArgument(extra)),
        None => Ok(()),
    }
}

fn one_arg(command: &str, name: &str, rest: Vec<String>) -> Result<String, ArgsError> {
    let mut rest = rest.into_iter();
    let value = rest.next().ok_or_else(|| missing(command, name))?;
    match rest.next() {
        Some(extra) => Err(ArgsError::UnexpectedArgument(extra)),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, ArgsError> {
        let args = std::iter::once("chateqt")
            .chain(args.iter().copied())
            .map(String::from);
        parse_args(args)
    }

    #[test]
    fn test_parse_version_flags() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_no_args_is_help() {
        assert_eq!(parse(&[]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_chat_joins_query_words() {
        let cmd = parse(&["chat", "what", "moved", "rates?"]).unwrap();
        assert_eq!(
            cmd,
            CliCommand::Chat(ChatArgs {
                query: "what moved rates?".to_string(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_parse_chat_options() {
        let cmd = parse(&["chat", "-c", "c42", "--json", "--cumulative", "hi"]).unwrap();
        assert_eq!(
            cmd,
            CliCommand::Chat(ChatArgs {
                query: "hi".to_string(),
                conversation_id: Some("c42".to_string()),
                json: true,
                cumulative: true,
            })
        );
    }

    #[test]
    fn test_parse_chat_dash_in_query() {
        let cmd = parse(&["chat", "--", "--json", "is", "a", "flag"]).unwrap();
        match cmd {
            CliCommand::Chat(chat) => {
                assert_eq!(chat.query, "--json is a flag");
                assert!(!chat.json);
            }
            other => panic!("expected chat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chat_options_end_at_query() {
        let cmd = parse(&["chat", "--json", "explain", "-c", "x", "--cumulative"]).unwrap();
        assert_eq!(
            cmd,
            CliCommand::Chat(ChatArgs {
                query: "explain -c x --cumulative".to_string(),
                json: true,
                ..Default::default()
            })
        );

        let cmd = parse(&["chat", "explain", "--json", "output"]).unwrap();
        match cmd {
            CliCommand::Chat(chat) => {
                assert_eq!(chat.query, "explain --json output");
                assert!(!chat.json);
                assert!(chat.conversation_id.is_none());
            }
            other => panic!("expected chat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chat_errors() {
        assert_eq!(
            parse(&["chat"]),
            Err(ArgsError::MissingArgument {
                command: "chat".to_string(),
                name: "a query".to_string()
            })
        );
        assert_eq!(
            parse(&["chat", "--conversation"]),
            Err(ArgsError::MissingValue("--conversation".to_string()))
        );
        assert!(matches!(
            parse(&["chat", "--bogus", "q"]),
            Err(ArgsError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_parse_conversation_commands() {
        assert_eq!(parse(&["history"]), Ok(CliCommand::History));
        assert_eq!(
            parse(&["show", "c1"]),
            Ok(CliCommand::Show { id: "c1".to_string() })
        );
        assert_eq!(
            parse(&["delete", "c1"]),
            Ok(CliCommand::Delete { id: "c1".to_string() })
        );
        assert_eq!(parse(&["new"]), Ok(CliCommand::New { title: None }));
        assert_eq!(
            parse(&["new", "Rate", "outlook"]),
            Ok(CliCommand::New {
                title: Some("Rate outlook".to_string())
            })
        );
        assert_eq!(
            parse(&["history", "extra"]),
            Err(ArgsError::UnexpectedArgument("extra".to_string()))
        );
    }

    #[test]
    fn test_parse_account_commands() {
        assert_eq!(
            parse(&["login", "a@b.c"]),
            Ok(CliCommand::Login {
                email: "a@b.c".to_string()
            })
        );
        assert_eq!(
            parse(&["signup", "a@b.c", "Ada", "L"]),
            Ok(CliCommand::Signup {
                email: "a@b.c".to_string(),
                name: Some("Ada L".to_string())
            })
        );
        assert!(parse(&["login"]).is_err());
        assert_eq!(parse(&["logout"]), Ok(CliCommand::Logout));
        assert_eq!(parse(&["usage"]), Ok(CliCommand::Usage));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse(&["sync"]),
            Err(ArgsError::UnknownCommand("sync".to_string()))
        );
    }
}
