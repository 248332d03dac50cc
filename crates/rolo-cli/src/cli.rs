use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "rolo")]
#[command(about = "Keep a local contact book in sync with iCloud contacts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the rolo config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding contacts.json and groups.json
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Path of the remote data cache
    #[arg(long, global = true, value_name = "PATH")]
    pub cache: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pull remote contacts and review changes into the local store
    Pull {
        /// Read remote data from the cache instead of the network
        #[arg(long)]
        cached: bool,
    },
    /// Update remote group membership from local tags
    SyncGroups,
    /// Write a Markdown note per contact into the vault
    ExportVault {
        /// Vault root (overrides the configured one)
        #[arg(long, value_name = "PATH")]
        vault: Option<PathBuf>,
    },
    /// List every tag used in the local store
    Tags {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
