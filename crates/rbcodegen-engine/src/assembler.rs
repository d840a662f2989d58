//! Renders the complete Ruby script from a log snapshot.

use crate::action_log::TranslatedLine;
use rbcodegen_common::protocol::BrowserKind;
use rbcodegen_translator::literal::{quote, quote_single};
use rbcodegen_translator::translator::{is_comment, navigate_statement};

pub const DEFAULT_EXECUTABLE_PATH: &str = "./node_modules/.bin/playwright";

const BODY_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptConfig {
    pub browser: BrowserKind,
    pub channel: Option<String>,
    /// Start URL opened by the preamble.
    pub url: Option<String>,
    pub executable_path: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::default(),
            channel: None,
            url: None,
            executable_path: DEFAULT_EXECUTABLE_PATH.to_string(),
        }
    }
}

impl ScriptConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    fn channel(&self) -> Option<&str> {
        self.channel.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Script lines for the given log state. Pure, so repeated calls agree.
pub fn render(config: &ScriptConfig, log: &[TranslatedLine]) -> Vec<String> {
    let launch_options = match config.channel() {
        Some(channel) => format!("headless: false, channel: {}", quote(channel)),
        None => "headless: false".to_string(),
    };

    let mut out = vec![
        "require \"playwright\"".to_string(),
        String::new(),
        format!(
            "Playwright.create(playwright_cli_executable_path: {}) do |playwright|",
            quote_single(&config.executable_path)
        ),
        format!(
            "  playwright.{}.launch({}) do |browser|",
            config.browser.as_str(),
            launch_options
        ),
        "    context = browser.new_context".to_string(),
        "    page = context.new_page".to_string(),
    ];

    let start = config.url().map(|url| navigate_statement(Some(url)));
    if let Some(statement) = &start {
        out.push(String::new());
        out.push(format!("{}{}", BODY_INDENT, statement));
    }

    let body = body_lines(log, start.as_deref());
    if !body.is_empty() {
        out.push(String::new());
        out.push(format!("{}# Recorded actions:", BODY_INDENT));
        out.extend(body.into_iter().map(|code| format!("{}{}", BODY_INDENT, code)));
    }

    out.push("  end".to_string());
    out.push("end".to_string());
    out
}

/// [`render`] joined into the final file contents.
pub fn render_text(config: &ScriptConfig, log: &[TranslatedLine]) -> String {
    let mut text = render(config, log).join("\n");
    text.push('\n');
    text
}

/// Drops comments and navigations that repeat the preamble's start URL.
fn body_lines<'a>(log: &'a [TranslatedLine], start: Option<&str>) -> Vec<&'a str> {
    log.iter()
        .map(|line| line.code.trim())
        .filter(|code| !code.is_empty() && !is_comment(code))
        .filter(|code| Some(*code) != start)
        .collect()
}
