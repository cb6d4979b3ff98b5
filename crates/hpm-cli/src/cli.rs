//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hpm_tags::fetcher::DEFAULT_API_BASE;

/// Houdini Package Manager - inspect and manage Houdini package configs
#[derive(Parser, Debug)]
#[command(name = "hpm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Packages directory (defaults to $HOUDINI_USER_PREF_DIR/packages)
    #[arg(long, global = true, env = "HPM_PACKAGES_DIR")]
    pub packages_dir: Option<PathBuf>,

    /// Captured `hconfig` output to use instead of the process environment
    #[arg(long, global = true, env = "HPM_HOST_ENV")]
    pub host_env: Option<PathBuf>,

    /// Tag cache file
    #[arg(long, global = true, env = "HPM_CACHE")]
    pub cache: Option<PathBuf>,

    /// Base URL of the hosting API
    #[arg(long, global = true, env = "HPM_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_url: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every package with its versions and plugin count
    Scan,

    /// Show the resolved config, plugin paths and warnings of a package
    Show {
        /// Package name (config file stem)
        package: String,
    },

    /// Let Houdini load a package
    Enable {
        /// Package name (config file stem)
        package: String,
    },

    /// Stop Houdini from loading a package
    Disable {
        /// Package name (config file stem)
        package: String,
    },

    /// Fetch the remote tags of one package
    Tags {
        /// Package name (config file stem)
        package: String,

        /// Only request the first page of tags
        #[arg(long)]
        single_page: bool,
    },

    /// Fetch remote tags for every package with a remote repository
    Sync,

    /// Write standard package configs for plugin directories
    ///
    /// Examples:
    ///   hpm create ~/plugins/MOPS            # One plugin
    ///   hpm create ./qLib ./SideFXLabs --force # Replace existing configs
    Create {
        /// Plugin directories
        #[arg(required = true)]
        plugin_dirs: Vec<PathBuf>,

        /// Replace configs that already exist
        #[arg(long)]
        force: bool,
    },
}
