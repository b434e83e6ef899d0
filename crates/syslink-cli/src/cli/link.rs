//! Account link CLI commands: link, unlink, accounts.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use syslink_types::outcome::{Notification, Tone};

use crate::cli::{Output, session};
use crate::state::AppState;

/// Link another account to the caller's system.
///
/// Returns whether the command succeeded (cancellations count as not succeeded).
///
/// # Examples
///
/// ```bash
/// syslink --as 466378653216014359 link '<@1027582195390201856>'
/// ```
pub async fn link(
    state: &AppState,
    caller: Option<&str>,
    account: Option<String>,
    out: Output,
) -> Result<bool> {
    let ctx = session::resolve(state, caller, account).await?;
    let result = state.link_service.link_account(&ctx).await;
    Ok(report(&Notification::from_result(&result), out))
}

/// Unlink an account (or the caller's own) from the caller's system.
pub async fn unlink(
    state: &AppState,
    caller: Option<&str>,
    account: Option<String>,
    out: Output,
) -> Result<bool> {
    let ctx = session::resolve(state, caller, account).await?;
    let result = state.link_service.unlink_account(&ctx).await;
    Ok(report(&Notification::from_result(&result), out))
}

/// List the accounts linked to the caller's system.
pub async fn accounts(state: &AppState, caller: Option<&str>, out: Output) -> Result<bool> {
    let ctx = session::resolve(state, caller, None).await?;

    let accounts = match state.link_service.list_accounts(&ctx).await {
        Ok(accounts) => accounts,
        Err(err) => return Ok(report(&Notification::from_result(&Err(err)), out)),
    };

    if !out.shows(Tone::Success) {
        return Ok(true);
    }

    if out.json {
        println!(
            "{}",
            serde_json::json!({
                "system": ctx.caller_system.map(|s| s.to_string()),
                "accounts": accounts,
            })
        );
        return Ok(true);
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Account").fg(Color::White),
        Cell::new("Mention").fg(Color::White),
    ]);

    for account in &accounts {
        let marker = if *account == ctx.caller_account {
            format!("{account} (you)")
        } else {
            account.to_string()
        };
        table.add_row(vec![Cell::new(marker), Cell::new(account.mention())]);
    }

    println!();
    println!("{table}");
    println!(
        "  {} linked account{}",
        style(accounts.len()).bold(),
        if accounts.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(true)
}

/// Print a notification; returns true only for successes.
fn report(notification: &Notification, out: Output) -> bool {
    let succeeded = notification.tone == Tone::Success;
    if !out.shows(notification.tone) {
        return succeeded;
    }

    if out.json {
        println!(
            "{}",
            serde_json::to_string(notification).unwrap_or_else(|_| notification.message.clone())
        );
    } else {
        match notification.tone {
            Tone::Success => {
                println!("  {} {}", style("✓").green().bold(), notification.message)
            }
            Tone::Neutral => println!("  {}", style(&notification.message).dim()),
            Tone::Error => {
                eprintln!("  {} {}", style("✗").red().bold(), notification.message)
            }
        }
    }

    succeeded
}
