//! Synapse Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use synapse_downloader::{
    api::{Credentials, SynapseClient},
    cli::Args,
    config::{validate_config, Config},
    download::TreeDownloader,
    error::{exit_codes, Error, Result},
    output::{print_banner, print_config_summary, print_error, print_info, print_run_summary, print_warning},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    validate_config(&config)?;

    let entity_id = config
        .options
        .entity_id
        .clone()
        .ok_or_else(|| Error::MissingConfig("entity_id".into()))?;
    let download_directory = config.download_directory().display().to_string();

    print_config_summary(
        &entity_id,
        &download_directory,
        &config.options.if_collision.to_string(),
    );

    let client = SynapseClient::new(&config.service)?.with_progress(config.options.show_downloads);
    let credentials = Credentials::new(
        config.account.username.clone(),
        config.account.password.clone(),
    );

    let mut downloader = TreeDownloader::new(client, entity_id, &download_directory, credentials)?
        .with_collision_policy(config.options.if_collision);

    let report = downloader.run().await?;
    print_run_summary(&report);

    Ok(())
}
