//! Houdini Package Manager CLI
//!
//! Inspects the package configs of a Houdini installation and tracks the
//! installed and latest versions of the plugins they register.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    let Some(command) = cli.command.clone() else {
        println!("{} Houdini Package Manager", "hpm".green().bold());
        println!();
        println!("Run {} for available commands.", "hpm --help".cyan());
        return Ok(());
    };

    let ctx = Context::from_cli(&cli)?;
    execute_command(&ctx, command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Scan => commands::run_scan(ctx),
        Commands::Show { package } => commands::run_show(ctx, &package),
        Commands::Enable { package } => commands::run_set_enable(ctx, &package, true),
        Commands::Disable { package } => commands::run_set_enable(ctx, &package, false),
        Commands::Tags {
            package,
            single_page,
        } => commands::run_tags(ctx, &package, !single_page),
        Commands::Sync => commands::run_sync(ctx),
        Commands::Create { plugin_dirs, force } => commands::run_create(ctx, &plugin_dirs, force),
    }
}
