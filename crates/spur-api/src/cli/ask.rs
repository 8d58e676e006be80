//! `spur ask`: one exchange from the terminal.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Send `message` through the conversation manager and print the reply.
pub async fn ask(
    state: &AppState,
    message: &str,
    session: Option<&str>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let reply = state
        .conversations
        .process_message(message, session)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    if quiet {
        println!("{}", reply.reply);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Support Agent:").cyan().bold(), reply.reply);
    println!();
    println!(
        "  {} {}",
        style("session").dim(),
        style(&reply.session_id).yellow()
    );
    println!(
        "  {}",
        style(format!("Continue with: spur ask \"...\" --session {}", reply.session_id)).dim()
    );
    println!();
    Ok(())
}
