use chateqt::cli::{describe_error, parse_args, run_command, USAGE};
use chateqt::config::ClientConfig;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so streamed answers on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(report) = run_command(command, ClientConfig::from_env()).await {
        tracing::debug!("{:?}", report);
        eprintln!("Error: {}", describe_error(&report));
        std::process::exit(1);
    }
    Ok(())
}
