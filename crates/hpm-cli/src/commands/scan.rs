//! Scan and show commands

use colored::Colorize;
use hpm_package::PackageRecord;

use crate::context::{Context, find_package};
use crate::error::Result;

const MISSING: &str = "-";

/// Run the scan command: one row per package
pub fn run_scan(ctx: &Context) -> Result<()> {
    let collection = ctx.packages()?;
    let cached = ctx.cache.entries()?;

    println!("{} {}", "Packages in".bold(), collection.packages_dir().to_string().cyan());
    println!();

    if collection.is_empty() {
        println!("  {} (use {} to add one)", "None".dimmed(), "hpm create".cyan());
        return Ok(());
    }

    println!(
        "  {:<3} {:<24} {:<16} {:<12} {:<12} {:>7}  {}",
        "on".dimmed(),
        "name".dimmed(),
        "author".dimmed(),
        "installed".dimmed(),
        "latest".dimmed(),
        "plugins".dimmed(),
        "warnings".dimmed()
    );

    for record in collection.iter() {
        let enabled = if record.enable() {
            "+".green()
        } else {
            "-".red()
        };
        let latest = cached
            .get(record.name())
            .and_then(|entry| entry.tags.latest())
            .unwrap_or(MISSING);
        let installed = record.installed_version().unwrap_or(MISSING);
        let outdated = installed != MISSING && latest != MISSING && installed != latest;

        println!(
            "  {:<3} {:<24} {:<16} {:<12} {:<12} {:>7}  {}",
            enabled,
            record.name(),
            record.author().unwrap_or(MISSING),
            installed,
            if outdated {
                latest.yellow()
            } else {
                latest.normal()
            },
            record.plugin_paths().len(),
            warning_summary(record)
        );
    }

    println!();
    println!("{} {} packages", "Total:".dimmed(), collection.len());
    Ok(())
}

fn warning_summary(record: &PackageRecord) -> String {
    match record.warnings() {
        [] => String::new(),
        [only] => only.yellow().to_string(),
        many => format!("{} warnings", many.len()).yellow().to_string(),
    }
}

/// Run the show command: everything known about one package
pub fn run_show(ctx: &Context, name: &str) -> Result<()> {
    let collection = ctx.packages()?;
    let record = find_package(&collection, name)?;
    let cached = ctx.cache.get(name)?;

    println!("{}", record.name().bold());
    println!();
    println!("{}:    {}", "Config".dimmed(), record.config_path());
    println!(
        "{}:   {}",
        "Enabled".dimmed(),
        if record.enable() { "yes".green() } else { "no".red() }
    );
    println!("{}:     {:?}", "State".dimmed(), record.state());
    println!("{}:    {}", "Author".dimmed(), record.author().unwrap_or(MISSING));
    println!("{}:    {}", "Remote".dimmed(), record.remote_url().unwrap_or(MISSING));
    println!(
        "{}: {}",
        "Installed".dimmed(),
        record.installed_version().unwrap_or(MISSING)
    );
    match &cached {
        Some(entry) => {
            let synced = entry
                .last_synced
                .map(|time| time.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| MISSING.to_string());
            println!(
                "{}:    {} (synced {})",
                "Latest".dimmed(),
                entry.tags.latest().unwrap_or(MISSING),
                synced
            );
        }
        None => println!("{}:    {}", "Latest".dimmed(), MISSING),
    }
    println!();

    println!("{}:", "Plugin paths".bold());
    if record.plugin_paths().is_empty() {
        println!("  {}", "None found on the host".dimmed());
    }
    for path in record.plugin_paths() {
        println!("  {} {}", "+".green(), path);
    }
    println!();

    if !record.warnings().is_empty() {
        println!("{}:", "Warnings".bold());
        for warning in record.warnings() {
            println!("  {} {}", "!".yellow(), warning);
        }
        println!();
    }

    println!("{}:", "Resolved config".bold());
    for entry in record.config().iter() {
        println!("  {entry}");
    }
    Ok(())
}
