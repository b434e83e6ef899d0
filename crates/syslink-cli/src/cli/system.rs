//! System CLI commands: register a system, list systems.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use syslink_types::error::RepositoryError;
use syslink_types::outcome::Tone;

use crate::cli::{Output, session};
use crate::state::AppState;

/// Register a new system owned by the calling account.
pub async fn create_system(state: &AppState, caller: Option<&str>, out: Output) -> Result<bool> {
    let owner = session::caller_account(caller)?;

    let spinner = if out.shows(Tone::Success) {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Registering system...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let result = state.systems.create_system(owner).await;
    spinner.finish_and_clear();

    match result {
        Ok(_) if !out.shows(Tone::Success) => Ok(true),
        Ok(system) => {
            if out.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "system": system.to_string(),
                        "account": owner,
                        "data_dir": state.data_dir.display().to_string(),
                    })
                );
            } else {
                println!(
                    "  {} System {} registered for {}.",
                    style("✓").green().bold(),
                    style(system).cyan(),
                    owner.mention()
                );
            }
            Ok(true)
        }
        Err(RepositoryError::Conflict(_)) => {
            eprintln!(
                "  {} That account already belongs to a system.",
                style("✗").red().bold()
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// List all systems with their account counts.
pub async fn list_systems(state: &AppState, out: Output) -> Result<bool> {
    let systems = state.systems.list_systems().await?;

    if !out.shows(Tone::Success) {
        return Ok(true);
    }

    if out.json {
        let items: Vec<_> = systems
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id.to_string(),
                    "created_at": s.created_at.to_rfc3339(),
                    "accounts": s.account_count,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(true);
    }

    if systems.is_empty() {
        println!(
            "  No systems yet. Create one with {}.",
            style("syslink --as <ACCOUNT> system new").cyan()
        );
        return Ok(true);
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("System").fg(Color::White),
        Cell::new("Accounts").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for system in &systems {
        table.add_row(vec![
            Cell::new(system.id),
            Cell::new(system.account_count),
            Cell::new(system.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(true)
}
