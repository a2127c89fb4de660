use clap::Parser;
use tally_server::logging::{self, LogDestination};
use tally_server::{Cli, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real env vars and flags still apply.
    let _ = dotenvy::dotenv();

    let settings = Settings::from_cli(Cli::parse())?;
    logging::initialize(
        settings.log_level,
        LogDestination::from_log_file(settings.log_file.as_deref()),
    );

    tally_server::serve(settings).await
}
