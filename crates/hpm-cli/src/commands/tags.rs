//! Remote tag commands

use colored::Colorize;
use hpm_tags::{
    BatchEvent, BatchOptions, BatchRequest, Error as TagsError, Reconciled, RemoteTagFetcher,
    ReqwestTransport, spawn_batch,
};

use crate::context::{Context, find_package};
use crate::error::{CliError, Result};

/// Run the tags command for one package
pub fn run_tags(ctx: &Context, name: &str, paginate: bool) -> Result<()> {
    let collection = ctx.packages()?;
    let record = find_package(&collection, name)?;

    let Some(identity) = record.git_project().identity.clone() else {
        println!(
            "{} {} has no remote repository, nothing to fetch",
            "=".dimmed(),
            name.cyan()
        );
        return Ok(());
    };

    println!("{} tags of {} ({})", "Fetching".bold(), name.cyan(), identity);

    ctx.cache.set_local_config_path(name, record.config_path())?;
    let transport = ReqwestTransport::new()?;
    let fetcher = RemoteTagFetcher::new(&transport, identity).with_api_base(ctx.api_url.as_str());
    let reconciled = fetcher
        .fetch_and_merge(name, &ctx.cache, paginate)
        .map_err(fetch_error)?;

    println!("  {}", outcome(&reconciled));
    println!();

    let tags = reconciled.tags();
    if tags.is_empty() {
        println!("  {}", "No tags known".dimmed());
        return Ok(());
    }
    for tag in tags.iter() {
        let marker = if Some(tag) == record.installed_version() {
            "*".green()
        } else {
            " ".normal()
        };
        println!("  {marker} {tag}");
    }
    println!();
    println!(
        "{} {}",
        "Latest:".dimmed(),
        reconciled.latest().unwrap_or("-").green()
    );
    Ok(())
}

/// Run the sync command: fetch tags for every package with a remote
pub fn run_sync(ctx: &Context) -> Result<()> {
    let collection = ctx.packages()?;

    let mut requests = Vec::new();
    for record in collection.iter() {
        let identity = record.git_project().identity.clone();
        if identity.is_some() {
            ctx.cache
                .set_local_config_path(record.name(), record.config_path())?;
        }
        requests.push(BatchRequest::new(record.name(), identity));
    }

    if requests.is_empty() {
        println!("{} No packages to sync", "=".dimmed());
        return Ok(());
    }

    println!("{} {} packages", "Syncing".bold(), requests.len());

    let transport = ReqwestTransport::new()?;
    let options = BatchOptions {
        api_base: ctx.api_url.clone(),
        paginate: true,
    };
    let batch = spawn_batch(requests, ctx.cache.clone(), transport, options);

    let mut fetched = 0usize;
    for event in batch.events.iter() {
        match &event {
            BatchEvent::Fetched { name, reconciled } => {
                fetched += 1;
                println!(
                    "  {} {:<24} {:<12} {}",
                    "+".green(),
                    name,
                    reconciled.latest().unwrap_or("-"),
                    outcome(reconciled).dimmed()
                );
            }
            BatchEvent::Skipped { name } => {
                println!("  {} {:<24} {}", "=".dimmed(), name, "no remote".dimmed());
            }
        }
    }

    if let Err(e) = batch.join() {
        if e.aborts_batch() {
            println!(
                "{} Sync stopped after {} packages, later packages were not fetched",
                "!".yellow(),
                fetched
            );
        }
        return Err(fetch_error(e));
    }

    println!();
    println!("{} {} packages fetched", "Done:".green().bold(), fetched);
    Ok(())
}

fn outcome(reconciled: &Reconciled) -> String {
    let count = reconciled.tags().len();
    match reconciled {
        Reconciled::Unchanged(_) => format!("unchanged ({count} tags)"),
        Reconciled::Adopted(_) => format!("cached {count} tags"),
        Reconciled::Merged(_) => format!("merged with cache ({count} tags)"),
        Reconciled::Replaced(_) => format!("replaced cached history ({count} tags)"),
    }
}

fn fetch_error(e: TagsError) -> CliError {
    match e {
        TagsError::RateLimited { .. } => CliError::user(
            "API rate limit reached. Cached tags were kept; wait a while before fetching again",
        ),
        TagsError::Connection { url, .. } => CliError::user(format!(
            "Unable to reach {url}. Check your internet connection and try again",
        )),
        other => other.into(),
    }
}
