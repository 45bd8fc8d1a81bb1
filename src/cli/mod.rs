//! CLI front end for chateqt.
//!
//! - Argument parsing
//! - Chat streaming with terminal or JSON-lines output
//! - Conversation management and account commands
//! - Error reports with a recovery hint
//!
//! # Usage
//!
//! ```ignore
//! use chateqt::cli::{parse_args, run_command};
//! use chateqt::config::ClientConfig;
//!
//! let command = parse_args(std::env::args())?;
//! run_command(command, ClientConfig::from_env()).await?;
//! ```

pub mod account;
pub mod args;
pub mod chat;
pub mod conversations;
pub mod output;
pub mod report;
pub mod version;

pub use args::{parse_args, ArgsError, ChatArgs, CliCommand, USAGE};
pub use output::{status_label, JsonLinesPrinter, TranscriptPrinter};
pub use report::describe_error;
pub use version::{version_line, VERSION};

use std::io;

use color_eyre::Result;

use crate::adapters::FileCredentialsProvider;
use crate::auth::Credentials;
use crate::client::ChatClient;
use crate::config::{BodyMode, ClientConfig};
use crate::error::{AuthError, ChatResult};
use crate::traits::{CredentialsProvider, HttpClient};

/// What every command runs against: the API client and the session store.
pub struct CliContext<C: HttpClient, P: CredentialsProvider> {
    pub client: ChatClient<C>,
    pub store: P,
}

impl<C: HttpClient, P: CredentialsProvider> CliContext<C, P> {
    pub fn new(client: ChatClient<C>, store: P) -> Self {
        Self { client, store }
    }

    /// Stored credentials together with the account email.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] when nobody is logged in.
    pub async fn require_session(&self) -> ChatResult<(Credentials, String)> {
        let creds = self
            .store
            .load()
            .await?
            .ok_or(AuthError::NotAuthenticated)?;
        let email = creds
            .email()
            .map(str::to_string)
            .ok_or(AuthError::NotAuthenticated)?;
        Ok((creds, email))
    }
}

/// Run a parsed command against the real backend and `~/.chateqt`.
pub async fn run_command(command: CliCommand, mut config: ClientConfig) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Chat(ChatArgs {
            cumulative: true, ..
        }) => config = config.with_body_mode(BodyMode::Cumulative),
        _ => {}
    }

    let client = ChatClient::new(config)?;
    let ctx = CliContext::new(client, FileCredentialsProvider::new()?);
    let mut stdout = io::stdout();

    match command {
        CliCommand::Chat(args) => chat::run_chat(&ctx, &args).await,
        CliCommand::History => conversations::list(&ctx, &mut stdout).await,
        CliCommand::Show { id } => conversations::show(&ctx, &id, &mut stdout).await,
        CliCommand::New { title } => {
            conversations::create(&ctx, title.as_deref(), &mut stdout).await
        }
        CliCommand::Delete { id } => conversations::delete(&ctx, &id, &mut stdout).await,
        CliCommand::Login { email } => {
            let password = account::prompt_password()?;
            account::login(&ctx, &email, &password, &mut stdout).await
        }
        CliCommand::Signup { email, name } => {
            let password = account::prompt_password()?;
            account::signup(&ctx, &email, &password, name.as_deref(), &mut stdout).await
        }
        CliCommand::Logout => account::logout(&ctx, &mut stdout).await,
        CliCommand::Usage => account::usage(&ctx, &mut stdout).await,
        CliCommand::Version | CliCommand::Help => Ok(()),
    }
}
