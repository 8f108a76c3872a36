//! CLI argument parsing for snag.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser)]
#[command(
    name = "snag",
    about = "A minimal bug tracker with an in-memory REST backend",
    version,
    after_help = "Logs are written to: ~/.local/share/snag/logs/snag.log"
)]
pub struct Cli {
    /// Base URL of the bug tracker server
    #[arg(long, global = true, default_value = "http://127.0.0.1:4000")]
    pub server: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// File a new bug
    Create {
        /// Bug title
        title: String,

        /// What is going wrong
        #[arg(short, long)]
        description: String,

        /// Severity (low, medium, high; defaults to medium)
        #[arg(long)]
        severity: Option<String>,

        /// Initial status (open, in-progress, resolved; defaults to open)
        #[arg(long)]
        status: Option<String>,

        /// Who the bug is assigned to
        #[arg(short, long)]
        assignee: Option<String>,
    },

    /// List bugs
    List {
        /// Filter by severity (low, medium, high)
        #[arg(long)]
        severity: Option<String>,

        /// Filter by status (open, in-progress, resolved)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show a single bug
    Get {
        /// Bug ID
        id: String,
    },

    /// Update fields on an existing bug
    Update {
        /// Bug ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New severity (low, medium, high)
        #[arg(long)]
        severity: Option<String>,

        /// New status (open, in-progress, resolved)
        #[arg(long)]
        status: Option<String>,

        /// New assignee (pass an empty string to unassign)
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Change a bug's status
    Status {
        /// Bug ID
        id: String,

        /// Target status (open, in-progress, resolved)
        status: String,
    },

    /// Run the API server in foreground
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:4000")]
        bind: SocketAddr,

        /// Start with an empty store instead of the sample dataset
        #[arg(long)]
        empty: bool,
    },

    /// Check whether the server is reachable
    Health,
}
