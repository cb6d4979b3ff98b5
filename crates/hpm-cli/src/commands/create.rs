//! Create command

use std::path::PathBuf;

use colored::Colorize;
use hpm_fs::NormalizedPath;
use hpm_package::template::{count_overwrites, create_package_configs};

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the create command: one standard config per plugin directory
pub fn run_create(ctx: &Context, plugin_dirs: &[PathBuf], force: bool) -> Result<()> {
    let plugin_dirs: Vec<NormalizedPath> = plugin_dirs.iter().map(NormalizedPath::new).collect();
    let packages_dirs = [ctx.packages_dir.clone()];

    let overwrites = count_overwrites(&packages_dirs, &plugin_dirs);
    if overwrites > 0 {
        if !force {
            return Err(CliError::user(format!(
                "{overwrites} package config(s) already exist. Use --force to overwrite them"
            )));
        }
        println!(
            "{} Overwriting {} existing package config(s)",
            "!".yellow(),
            overwrites
        );
    }

    let written = create_package_configs(&packages_dirs, &plugin_dirs, force)?;
    for path in &written {
        println!("  {} {}", "+".green(), path);
    }
    println!();
    println!(
        "{} {} package config(s) in {}",
        "Created".green().bold(),
        written.len(),
        ctx.packages_dir
    );
    Ok(())
}
