use crate::resolver::SelectorResolver;
use crate::session::{RecordingSession, SessionError};
use rbcodegen_common::protocol::RecorderEvent;
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub handled: usize,
    pub skipped: usize,
}

/// Feeds newline-delimited recorder events into `session` until end of input
/// or until `shutdown` completes.
///
/// Blank lines are ignored and unparseable ones are logged and skipped. An
/// event already being translated when `shutdown` fires is finished first.
pub async fn run_events<S, R, F>(
    session: &RecordingSession<S>,
    reader: R,
    shutdown: F,
) -> Result<StreamStats, SessionError>
where
    S: SelectorResolver,
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = reader.lines();
    let mut stats = StreamStats::default();
    let mut line_no = 0usize;
    tokio::pin!(shutdown);

    loop {
        let next = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Interrupted, finishing recording");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = next else {
            break;
        };
        line_no += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_event(trimmed) {
            Ok(event) => {
                session.handle(event).await;
                stats.handled += 1;
            }
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                stats.skipped += 1;
            }
        }
    }

    info!(
        "Event stream closed ({} handled, {} skipped)",
        stats.handled, stats.skipped
    );
    Ok(stats)
}

/// Parses one event line. A bare action object counts as `actionAdded`.
pub fn parse_event(line: &str) -> Result<RecorderEvent, SessionError> {
    let value: Value = serde_json::from_str(line)?;
    let is_bare_action =
        value.get("event").is_none() && (value.get("name").is_some() || value.get("kind").is_some());
    if is_bare_action {
        return Ok(RecorderEvent::ActionAdded {
            action: serde_json::from_value(value)?,
        });
    }
    Ok(serde_json::from_value(value)?)
}

/// Completes on Ctrl+C. Never completes if the handler cannot be installed.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Writes the script to `path`, or to stdout when no path is given.
pub async fn write_script(path: Option<&Path>, script: &str) -> Result<(), SessionError> {
    match path {
        Some(path) => {
            tokio::fs::write(path, script).await?;
            info!("Wrote script to {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(script.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enveloped_event() {
        let event = parse_event(r#"{"event":"actionUpdated","action":{"name":"fill"}}"#).unwrap();
        let RecorderEvent::ActionUpdated { action } = event else {
            panic!("Expected ActionUpdated");
        };
        assert_eq!(action.kind_name(), "fill");
    }

    #[test]
    fn test_parse_bare_action() {
        let event = parse_event(r##"{"kind":"click","selector":"#go"}"##).unwrap();
        assert!(matches!(event, RecorderEvent::ActionAdded { .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_event("not json").is_err());
        assert!(parse_event(r#"{"event":"actionRemoved","action":{}}"#).is_err());
        assert!(parse_event(r#"{"foo":1}"#).is_err());
    }
}
