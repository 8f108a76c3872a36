//! snag CLI - a minimal bug tracker with an in-memory REST backend.

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use snag::{
    ApiClient, Bug, BugInput, BugService, BugStore, DetailView, ListParams, ServerConfig, Severity,
    Status, server,
};
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snag")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("snag.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn format_status(status: Status) -> ColoredString {
    match status {
        Status::Open => "open".green(),
        Status::InProgress => "in-progress".yellow(),
        Status::Resolved => "resolved".blue(),
    }
}

fn format_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Low => "low".green(),
        Severity::Medium => "medium".yellow(),
        Severity::High => "high".red(),
    }
}

fn print_bug(bug: &Bug) {
    println!("{}: {}", "ID".bold(), format!("#{}", bug.id).cyan());
    println!("{}: {}", "Title".bold(), bug.title);
    println!("{}: {}", "Severity".bold(), format_severity(bug.severity));
    println!("{}: {}", "Status".bold(), format_status(bug.status));
    if !bug.assignee.is_empty() {
        println!("{}: {}", "Assignee".bold(), bug.assignee);
    }
    println!("{}: {}", "Description".bold(), bug.description);
    println!("{}: {}", "Created".bold(), bug.created_at);
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Create {
            title,
            description,
            severity,
            status,
            assignee,
        } => {
            let client = ApiClient::new(&cli.server)?;
            let input = BugInput {
                title: Some(title),
                description: Some(description),
                severity,
                status,
                assignee,
            };

            let bug = client.create(&input).context("Failed to create bug")?;

            println!(
                "{} Created {}: {}",
                "✓".green(),
                format!("#{}", bug.id).cyan(),
                bug.title
            );
        }

        Command::List { severity, status } => {
            let client = ApiClient::new(&cli.server)?;
            let listing = client
                .list(&ListParams { severity, status })
                .context("Failed to list bugs")?;

            if listing.bugs.is_empty() {
                println!("{}", "No bugs found".dimmed());
            } else {
                for bug in &listing.bugs {
                    let assignee = if bug.assignee.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", bug.assignee)
                    };
                    println!(
                        "{} {} [{}] {}{}",
                        format!("#{}", bug.id).cyan(),
                        format_status(bug.status),
                        format_severity(bug.severity),
                        bug.title,
                        assignee.dimmed()
                    );
                }
                println!("{}", format!("{} bug(s)", listing.count).dimmed());
            }
        }

        Command::Get { id } => {
            let client = ApiClient::new(&cli.server)?;
            match client.get(&id).context("Failed to get bug")? {
                Some(bug) => print_bug(&bug),
                None => {
                    eprintln!("{} No bug found with ID {}", "✗".red(), id);
                    std::process::exit(1);
                }
            }
        }

        Command::Update {
            id,
            title,
            description,
            severity,
            status,
            assignee,
        } => {
            let patch = BugInput {
                title,
                description,
                severity,
                status,
                assignee,
            };
            if patch.is_empty() {
                bail!(
                    "Nothing to update. Pass at least one of --title, --description, --severity, --status, --assignee"
                );
            }

            let client = ApiClient::new(&cli.server)?;
            let bug = client.update(&id, &patch).context("Failed to update bug")?;

            println!(
                "{} Updated {}: {}",
                "✓".green(),
                format!("#{}", bug.id).cyan(),
                bug.title
            );
        }

        Command::Status { id, status } => {
            let Some(status) = Status::parse(&status) else {
                bail!("invalid status '{}': must be one of: {}", status, Status::ALLOWED);
            };

            let client = ApiClient::new(&cli.server)?;
            let bug = match client.get(&id).context("Failed to get bug")? {
                Some(bug) => bug,
                None => {
                    eprintln!("{} No bug found with ID {}", "✗".red(), id);
                    std::process::exit(1);
                }
            };

            // Show the change immediately, then confirm against the server.
            let mut view = DetailView::new(bug);
            if !view.begin_status_edit(status) {
                println!(
                    "{} {} is already {}",
                    "→".blue(),
                    format!("#{}", id).cyan(),
                    format_status(status)
                );
                return Ok(());
            }

            match client.set_status(&id, status) {
                Ok(record) => {
                    view.commit(record);
                    println!(
                        "{} {} is now {}",
                        "✓".green(),
                        format!("#{}", id).cyan(),
                        format_status(view.bug().status)
                    );
                }
                Err(e) => {
                    view.rollback();
                    eprintln!(
                        "{} Update failed, {} stays {}: {}",
                        "✗".red(),
                        format!("#{}", id).cyan(),
                        format_status(view.bug().status),
                        e
                    );
                    std::process::exit(1);
                }
            }
        }

        Command::Serve { bind, empty } => {
            let store = if empty {
                BugStore::new()
            } else {
                BugStore::seeded()
            };
            println!("{} Serving bug tracker API on http://{}", "→".blue(), bind);
            if !store.is_empty() {
                println!("  {} store seeded with {} sample bugs", "→".blue(), store.len());
            }

            let service = BugService::new(store);
            let config = ServerConfig { bind };

            // Run the server in an async runtime
            let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
            rt.block_on(server::run(config, service)).context("Server error")?;
        }

        Command::Health => {
            let client = ApiClient::new(&cli.server)?;
            client.health()?;
            println!("{} Server at {} is healthy", "✓".green(), client.base());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
