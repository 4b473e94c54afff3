//! `parley session`: Drive one conversation from a script or stdin.
//!
//! Each non-blank line is one tool call: the tool name, then optionally a
//! JSON object of arguments. Lines starting with `#` are comments.
//!
//! ```text
//! capture_mood {"mood": "a bit anxious"}
//! capture_energy_level {"energy": "low"}
//! check_check_in_status
//! ```

use chrono::Utc;
use parley_agent::{Conversation, ConversationEvent};
use parley_config::AppConfig;
use parley_core::domain::Domain;
use parley_core::tool::ToolCall;
use parley_log::JsonFileLog;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub async fn run(
    domain: Domain,
    script: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let log = Arc::new(JsonFileLog::new(config.log_path(domain)));
    let mut conversation = Conversation::with_history_days(domain, log, config.history.window_days)
        .map_err(|e| format!("Failed to start {domain} conversation: {e}"))?;

    if let Some(opening) = conversation.opening_event(&config.continuity, Utc::now()) {
        emit(&opening, json)?;
    }

    let reader: Box<dyn AsyncBufRead + Unpin> = match &script {
        Some(path) => Box::new(BufReader::new(
            tokio::fs::File::open(path)
                .await
                .map_err(|e| format!("Failed to open {}: {e}", path.display()))?,
        )),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut lines = reader.lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let call = match parse_line(&line, line_no) {
            Ok(Some(call)) => call,
            Ok(None) => continue,
            Err(reason) => {
                eprintln!("  [line {line_no}] {reason}");
                continue;
            }
        };
        let event = conversation.respond(&call).await;
        emit(&event, json)?;
    }

    let done = conversation.finish();
    emit(&done, json)?;

    Ok(())
}

/// Parse one script line into a call. `Ok(None)` for blank and comment lines.
fn parse_line(line: &str, line_no: usize) -> Result<Option<ToolCall>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let arguments = if rest.is_empty() {
        serde_json::json!({})
    } else {
        let value: serde_json::Value =
            serde_json::from_str(rest).map_err(|e| format!("Invalid arguments for {name}: {e}"))?;
        if !value.is_object() {
            return Err(format!("Arguments for {name} must be a JSON object"));
        }
        value
    };

    Ok(Some(ToolCall {
        id: format!("call_{line_no}"),
        name: name.to_string(),
        arguments,
    }))
}

fn emit(event: &ConversationEvent, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    match event {
        ConversationEvent::Opening { context } => println!("🗣️  {context}\n"),
        ConversationEvent::Reply { name, output, .. } => println!("  [{name}] {output}"),
        ConversationEvent::Retry { name, message, .. } => println!("  [{name}] ⚠️  {message}"),
        ConversationEvent::Failed { name, message, .. } => println!("  [{name}] ❌ {message}"),
        ConversationEvent::Done {
            tool_calls_made,
            saved,
            ..
        } => {
            println!();
            if *saved {
                println!("  ✅ Saved ({tool_calls_made} tool calls)");
            } else {
                println!("  ⚠️  Ended without saving ({tool_calls_made} tool calls)");
            }
        }
    }

    Ok(())
}
