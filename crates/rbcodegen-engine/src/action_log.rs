use rbcodegen_common::protocol::RawAction;
use rbcodegen_translator::translator::is_comment;
use tokio::sync::watch;

/// One generated line together with the payload it was produced from.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedLine {
    pub code: String,
    pub action: RawAction,
}

impl TranslatedLine {
    pub fn new(code: impl Into<String>, action: RawAction) -> Self {
        Self {
            code: code.into(),
            action,
        }
    }

    pub fn is_comment(&self) -> bool {
        is_comment(&self.code)
    }
}

/// Append/replace-last record of the session's translated lines.
///
/// Every mutation publishes a fresh copy of the whole sequence to subscribers.
#[derive(Debug)]
pub struct ActionLog {
    lines: Vec<TranslatedLine>,
    notifier: watch::Sender<Vec<TranslatedLine>>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        let (notifier, _) = watch::channel(Vec::new());
        Self {
            lines: Vec::new(),
            notifier,
        }
    }

    pub fn append(&mut self, line: TranslatedLine) {
        self.lines.push(line);
        self.publish();
    }

    /// Overwrites the newest line; on an empty log this appends.
    pub fn replace_last(&mut self, line: TranslatedLine) {
        match self.lines.last_mut() {
            Some(last) => *last = line,
            None => self.lines.push(line),
        }
        self.publish();
    }

    pub fn snapshot(&self) -> Vec<TranslatedLine> {
        self.lines.clone()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<TranslatedLine>> {
        self.notifier.subscribe()
    }

    fn publish(&self) {
        // send_replace succeeds with no receivers attached.
        self.notifier.send_replace(self.lines.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(code: &str) -> TranslatedLine {
        TranslatedLine::new(code, RawAction::default())
    }

    fn codes(log: &ActionLog) -> Vec<String> {
        log.snapshot().into_iter().map(|line| line.code).collect()
    }

    #[test]
    fn test_append_grows_by_one() {
        let mut log = ActionLog::new();
        log.append(line("page.close"));
        log.append(line("page.close"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_replace_last_keeps_size() {
        let mut log = ActionLog::new();
        log.append(line("a"));
        log.append(line("b"));
        log.replace_last(line("c"));
        assert_eq!(codes(&log), vec!["a", "c"]);
    }

    #[test]
    fn test_replace_last_on_empty_appends() {
        let mut log = ActionLog::new();
        log.replace_last(line("a"));
        assert_eq!(codes(&log), vec!["a"]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut log = ActionLog::new();
        log.append(line("a"));
        let mut snapshot = log.snapshot();
        snapshot.push(line("b"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_subscribers_see_every_mutation() {
        let mut log = ActionLog::new();
        let rx = log.subscribe();
        log.append(line("a"));
        assert_eq!(rx.borrow().len(), 1);
        log.replace_last(line("b"));
        assert_eq!(rx.borrow()[0].code, "b");
        assert_eq!(rx.borrow().len(), 1);
    }

    #[test]
    fn test_comment_detection() {
        assert!(line("# Handle download").is_comment());
        assert!(!line("page.close").is_comment());
    }
}
