//! `spur history`: print a stored conversation.

use anyhow::Result;
use console::style;

use spur_core::history::repository::HistoryStore;
use spur_infra::sqlite::{DatabasePool, SqliteHistoryStore};
use spur_types::chat::{Message, Sender};

/// Print every message of `session_id`, oldest first.
///
/// Reads the store directly so no provider credentials are needed.
pub async fn show_history(pool: &DatabasePool, session_id: &str, json: bool) -> Result<()> {
    let store = SqliteHistoryStore::new(pool.clone());
    let session_id = session_id.trim();
    let messages = if session_id.is_empty() {
        Vec::new()
    } else {
        store.get_messages(session_id).await?
    };

    if json {
        let body = serde_json::json!({ "messages": messages });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  No messages for {}", style(session_id).yellow());
        println!();
        return Ok(());
    }

    println!();
    for message in &messages {
        println!("{}", render_message(message));
    }
    println!();
    println!(
        "  {}",
        style(format!("{} message(s)", messages.len())).dim()
    );
    Ok(())
}

fn render_message(message: &Message) -> String {
    let label = match message.sender {
        Sender::User => style(message.sender.prompt_label()).green().bold(),
        Sender::Ai => style(message.sender.prompt_label()).cyan().bold(),
    };
    format!(
        "  {} {}\n  {}\n",
        style(message.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
        label,
        message.text
    )
}
