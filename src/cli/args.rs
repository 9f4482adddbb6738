//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{CollisionPolicy, Config};

/// Synapse tree downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "synapse-downloader",
    version,
    about = "Mirror a Synapse project or folder to local disk",
    long_about = "Recursively downloads every folder and file under a Synapse project or folder.\n\n\
                  Credentials come from --username/--password, the config file, the\n\
                  SYNAPSE_USERNAME/SYNAPSE_PASSWORD environment variables, or a prompt."
)]
pub struct Args {
    /// Synapse ID of the project or folder to download (e.g. syn123456).
    pub entity_id: Option<String>,

    /// Local directory to download into. `~` and `$VARS` are expanded.
    pub download_path: Option<String>,

    /// Synapse username.
    #[arg(short, long)]
    pub username: Option<String>,

    /// Synapse password.
    #[arg(short, long)]
    pub password: Option<String>,

    /// What to do when a file already exists locally.
    #[arg(long = "if-collision", value_enum)]
    pub if_collision: Option<CollisionArg>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "synapse.toml")]
    pub config: PathBuf,

    /// Hide download progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI collision policy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollisionArg {
    /// Replace local files.
    #[value(name = "overwrite.local")]
    OverwriteLocal,
    /// Keep local files and skip the download.
    #[value(name = "keep.local")]
    KeepLocal,
    /// Keep local files and save downloads under a numbered name.
    #[value(name = "keep.both")]
    KeepBoth,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::OverwriteLocal => CollisionPolicy::OverwriteLocal,
            CollisionArg::KeepLocal => CollisionPolicy::KeepLocal,
            CollisionArg::KeepBoth => CollisionPolicy::KeepBoth,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(entity_id) = self.entity_id {
            config.options.entity_id = Some(entity_id);
        }

        if let Some(path) = self.download_path {
            config.options.download_directory = Some(path);
        }

        if let Some(username) = self.username {
            config.account.username = Some(username);
        }

        if let Some(password) = self.password {
            config.account.password = Some(password);
        }

        if let Some(policy) = self.if_collision {
            config.options.if_collision = policy.into();
        }

        if let Some(timeout) = self.timeout {
            config.service.timeout_seconds = Some(timeout);
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}
