use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::rolling;

use hrm_client::cli::{self, Cli};
use hrm_client::{Config, Portal};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(api_base) = cli.api_base.clone() {
        config.api_base = api_base;
    }

    // Rolling daily log; stdout is reserved for command output
    let file_appender = rolling::daily(&config.log_dir, "hrm.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    config.report_rejected();
    info!(api_base = %config.api_base, "hrm starting");

    let mut portal = Portal::from_config(&config)?;
    cli::run(cli.command, &mut portal).await
}
