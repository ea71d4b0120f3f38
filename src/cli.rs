use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "svcup",
    about = "Check pinned service images against upstream releases and update the compose manifest",
    version,
    author
)]
pub struct Cli {
    /// Path to the deployment manifest (defaults to docker-compose.yml)
    #[arg(short, long, global = true, env = "SVCUP_MANIFEST", value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Service table and settings file (defaults to ./svcup.toml when present)
    #[arg(short, long, global = true, env = "SVCUP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the release index API
    #[arg(long, global = true, env = "SVCUP_RELEASE_INDEX", value_name = "URL")]
    pub release_index: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a command, check all services and print a summary
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check for available updates without applying them
    Check,

    /// Check, then pin the latest versions in the manifest
    Update {
        /// Update this service only
        #[arg(short, long, value_name = "SERVICE")]
        service: Option<String>,

        /// Confirm each update before it is written
        #[arg(short, long)]
        interactive: bool,
    },

    /// List the configured services
    List,
}
