use crate::action_log::{ActionLog, TranslatedLine};
use crate::assembler::{ScriptConfig, render_text};
use crate::resolver::{NoResolver, SelectorResolver};
use rbcodegen_common::protocol::{RawAction, RecorderEvent, SelectorStyle};
use rbcodegen_translator::selector::is_internal_reference;
use rbcodegen_translator::translate;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read event stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed recorder event: {0}")]
    Event(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub style: SelectorStyle,
    /// Ask the resolver for portable accessors of reference tokens.
    pub resolve: bool,
    pub resolve_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            style: SelectorStyle::default(),
            resolve: true,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    Append,
    ReplaceLast,
}

/// One recording: translates recorder events in arrival order and renders the script.
///
/// The log lock is held from resolution through storage, so an event that
/// arrives while another is being resolved waits its turn. Tokio's mutex is
/// fair, which keeps the log in arrival order. Readers go through the log's
/// watch channel instead of the lock.
pub struct RecordingSession<R = NoResolver> {
    script: ScriptConfig,
    options: SessionOptions,
    resolver: R,
    log: Mutex<ActionLog>,
    updates: watch::Receiver<Vec<TranslatedLine>>,
}

impl RecordingSession<NoResolver> {
    pub fn new(script: ScriptConfig, options: SessionOptions) -> Self {
        Self::with_resolver(script, options, NoResolver)
    }
}

impl<R: SelectorResolver> RecordingSession<R> {
    pub fn with_resolver(script: ScriptConfig, options: SessionOptions, resolver: R) -> Self {
        let log = ActionLog::new();
        let updates = log.subscribe();
        info!(
            "Recording session started (browser: {}, selector style: {})",
            script.browser, options.style
        );
        Self {
            script,
            options,
            resolver,
            log: Mutex::new(log),
            updates,
        }
    }

    /// Records a new action and returns its generated line.
    pub async fn action_added(&self, action: RawAction) -> String {
        self.record(action, Placement::Append).await
    }

    /// Re-translates a correction of the newest action in place.
    pub async fn action_updated(&self, action: RawAction) -> String {
        self.record(action, Placement::ReplaceLast).await
    }

    pub async fn handle(&self, event: RecorderEvent) -> String {
        match event {
            RecorderEvent::ActionAdded { action } => self.action_added(action).await,
            RecorderEvent::ActionUpdated { action } => self.action_updated(action).await,
        }
    }

    /// Lines committed so far. Never waits on a translation in flight.
    pub fn snapshot(&self) -> Vec<TranslatedLine> {
        self.updates.borrow().clone()
    }

    /// Receives a copy of the log after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<TranslatedLine>> {
        self.updates.clone()
    }

    /// Script for the committed lines; a pending resolution is not waited for.
    pub fn render(&self) -> String {
        render_text(&self.script, &self.updates.borrow())
    }

    /// Renders the final script and ends the session; subscribers see the channel close.
    pub async fn finish(self) -> String {
        let log = self.log.into_inner();
        info!("Recording session finished with {} actions", log.len());
        render_text(&self.script, &log.snapshot())
    }

    async fn record(&self, action: RawAction, placement: Placement) -> String {
        let mut log = self.log.lock().await;
        let action = self.enrich(action).await;
        let code = translate(&action, self.options.style);
        debug!("{} -> {}", action.kind_name(), code);

        let line = TranslatedLine::new(code.clone(), action);
        match placement {
            Placement::Append => log.append(line),
            Placement::ReplaceLast => log.replace_last(line),
        }
        code
    }

    /// Best-effort lookup of a portable accessor; any failure keeps the raw selector.
    async fn enrich(&self, mut action: RawAction) -> RawAction {
        if !self.options.resolve || action.resolved_selector_str().is_some() {
            return action;
        }
        let Some(selector) = action
            .selector_str()
            .filter(|s| is_internal_reference(s))
            .map(str::to_string)
        else {
            return action;
        };

        let lookup = self.resolver.resolve(&selector);
        match tokio::time::timeout(self.options.resolve_timeout, lookup).await {
            Ok(Ok(Some(resolved))) if !resolved.trim().is_empty() => {
                debug!("Resolved {} to {}", selector, resolved);
                action.set_resolved_selector(resolved);
            }
            Ok(Ok(_)) => debug!("No resolution for {}", selector),
            Ok(Err(e)) => debug!("Resolution failed for {}: {}", selector, e),
            Err(_) => debug!(
                "Resolution for {} timed out after {:?}",
                selector, self.options.resolve_timeout
            ),
        }
        action
    }
}
