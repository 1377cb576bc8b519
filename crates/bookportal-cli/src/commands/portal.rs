use std::path::Path;

use anyhow::Result;
use bookportal_auth::GuardDecision;
use colored::Colorize;

use super::App;
use crate::cli::OutputFormat;
use crate::output::print_json;

pub async fn dashboard(app: &App) -> Result<()> {
    app.ensure_allowed(&app.portal.config().routes.admin_home)?;
    let stats = app.portal.stats().dashboard().await?.data;
    match app.format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Table => {
            println!("{}: {}", "Books".cyan(), stats.total_books);
            println!("{}: {}", "Users".cyan(), stats.total_users);
            println!("{}: {}", "Reviews".cyan(), stats.total_feedback);
            Ok(())
        }
    }
}

/// Print where `path` leads for the current session.
pub fn open(app: &App, path: &str) -> Result<()> {
    match app.portal.navigate(path) {
        GuardDecision::Allow => println!("{} {}", "allow".green(), path),
        GuardDecision::Redirect(target) => {
            println!("{} {} -> {}", "redirect".yellow(), path, target.cyan())
        }
    }
    Ok(())
}

pub fn show_config(app: &App, session_file: &Path) -> Result<()> {
    let config = app.portal.config();
    if app.format == OutputFormat::Json {
        return print_json(config);
    }
    println!("{}: {}", "Profile".cyan(), app.profile);
    println!("{}: {}", "Server".cyan(), config.api.base_url);
    println!("{}: {:?}", "Timeout".cyan(), config.api.timeout);
    println!("{}: {}", "Session file".cyan(), session_file.display());
    println!(
        "{}: lists {:?}, stats {:?}",
        "Stale after".cyan(),
        config.cache.list_stale_time,
        config.cache.stats_stale_time
    );
    println!("{}: {}", "Log level".cyan(), config.logging.level);
    Ok(())
}
