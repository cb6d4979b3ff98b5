//! Enable and disable commands

use colored::Colorize;

use crate::context::{Context, unknown_package};
use crate::error::Result;

/// Run the enable/disable command
pub fn run_set_enable(ctx: &Context, name: &str, enable: bool) -> Result<()> {
    let mut collection = ctx.packages()?;
    let Some(record) = collection.get_mut(name) else {
        return Err(unknown_package(&collection, name));
    };

    if record.enable() == enable && record.config().top_level("enable").is_some() {
        println!(
            "{} {} is already {}",
            "=".dimmed(),
            name.cyan(),
            state_label(enable)
        );
        return Ok(());
    }

    record.set_enable(enable)?;
    println!(
        "{} {} {}",
        "+".green(),
        name.cyan(),
        state_label(enable)
    );
    Ok(())
}

fn state_label(enable: bool) -> colored::ColoredString {
    if enable {
        "enabled".green()
    } else {
        "disabled".red()
    }
}
