use ansari_client::cli::{
    parse_args, run_cli_command, service_from_env, version_line, CliCommand, USAGE,
};

use ansari_client::ChatError;
use color_eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    let service = service_from_env().await?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling");
            on_ctrl_c.cancel();
        }
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_cli_command(&service, command, cancel, &mut out).await {
        Err(e) if e.downcast_ref::<ChatError>().is_some_and(ChatError::is_cancelled) => {
            eprintln!("Interrupted");
            std::process::exit(130);
        }
        result => result,
    }
}
