use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Browser session unavailable: {0}")]
    Unavailable(String),
    #[error("Lookup failed for {selector}: {message}")]
    Lookup { selector: String, message: String },
}

/// Out-of-band lookup that turns a session-scoped reference token into a
/// portable structured accessor, e.g. `aria-ref=e7` into
/// `getByRole('textbox', { name: 'Email' })`.
#[async_trait]
pub trait SelectorResolver: Send + Sync {
    /// `Ok(None)` when the live session has nothing better to offer.
    async fn resolve(&self, selector: &str) -> Result<Option<String>, ResolveError>;
}

/// Used when no browser session is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

#[async_trait]
impl SelectorResolver for NoResolver {
    async fn resolve(&self, _selector: &str) -> Result<Option<String>, ResolveError> {
        Ok(None)
    }
}

/// Serves resolutions from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: impl Into<String>, resolved: impl Into<String>) -> Self {
        self.entries.insert(selector.into(), resolved.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticResolver {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl SelectorResolver for StaticResolver {
    async fn resolve(&self, selector: &str) -> Result<Option<String>, ResolveError> {
        Ok(self.entries.get(selector).cloned())
    }
}
