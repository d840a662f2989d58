use rbcodegen_common::protocol::{BrowserKind, RawAction, SelectorStyle};
use rbcodegen_engine::action_log::{ActionLog, TranslatedLine};
use rbcodegen_engine::assembler::{ScriptConfig, render, render_text};
use rbcodegen_translator::translate;
use serde_json::{Value, json};

fn translated(value: Value) -> TranslatedLine {
    let action: RawAction = serde_json::from_value(value).unwrap();
    TranslatedLine::new(translate(&action, SelectorStyle::Locator), action)
}

const SKELETON: &str = r#"require "playwright"

Playwright.create(playwright_cli_executable_path: './node_modules/.bin/playwright') do |playwright|
  playwright.chromium.launch(headless: false) do |browser|
    context = browser.new_context
    page = context.new_page
  end
end
"#;

#[test]
fn test_empty_log_without_url_is_the_skeleton() {
    assert_eq!(render_text(&ScriptConfig::default(), &[]), SKELETON);
}

#[test]
fn test_start_url_without_actions() {
    let config = ScriptConfig::default().with_url("about:blank");
    let expected = r#"require "playwright"

Playwright.create(playwright_cli_executable_path: './node_modules/.bin/playwright') do |playwright|
  playwright.chromium.launch(headless: false) do |browser|
    context = browser.new_context
    page = context.new_page

    page.goto("about:blank")
  end
end
"#;
    let text = render_text(&config, &[]);
    assert_eq!(text, expected);
    assert!(!text.contains("Recorded actions"));
}

#[test]
fn test_full_script() {
    let config = ScriptConfig {
        browser: BrowserKind::Firefox,
        channel: Some("nightly".into()),
        url: Some("https://example.com/login".into()),
        ..ScriptConfig::default()
    };
    let log = vec![
        translated(json!({"name": "openPage"})),
        translated(json!({"name": "navigate", "url": "https://example.com/login"})),
        translated(json!({"name": "fill", "selector": "label=Email", "text": "admin@example.com"})),
        translated(json!({"name": "press", "selector": "label=Email", "key": "Enter"})),
        translated(json!({"name": "download"})),
        translated(json!({"name": "assertVisible", "selector": "text=Dashboard"})),
    ];
    let expected = r#"require "playwright"

Playwright.create(playwright_cli_executable_path: './node_modules/.bin/playwright') do |playwright|
  playwright.firefox.launch(headless: false, channel: "nightly") do |browser|
    context = browser.new_context
    page = context.new_page

    page.goto("https://example.com/login")

    # Recorded actions:
    page.get_by_label("Email").fill("admin@example.com")
    page.get_by_label("Email").press("Enter")
    expect(page.get_by_text("Dashboard")).to be_visible
  end
end
"#;
    assert_eq!(render_text(&config, &log), expected);
}

#[test]
fn test_duplicate_start_navigation_is_elided() {
    let config = ScriptConfig::default().with_url("https://a.test/");
    let log = vec![
        translated(json!({"name": "navigate", "url": "https://a.test/"})),
        translated(json!({"name": "click", "selector": "#next"})),
        translated(json!({"name": "navigate", "url": "https://a.test/"})),
        translated(json!({"name": "navigate", "url": "https://b.test/"})),
    ];
    let lines = render(&config, &log);
    let to_start = lines
        .iter()
        .filter(|l| l.trim() == r#"page.goto("https://a.test/")"#)
        .count();
    assert_eq!(to_start, 1);
    assert!(lines.contains(&r#"    page.goto("https://b.test/")"#.to_string()));
}

#[test]
fn test_navigation_kept_without_start_url() {
    let log = vec![translated(json!({"name": "navigate", "url": "https://a.test/"}))];
    let lines = render(&ScriptConfig::default(), &log);
    assert!(lines.contains(&"    # Recorded actions:".to_string()));
    assert!(lines.contains(&r#"    page.goto("https://a.test/")"#.to_string()));
}

#[test]
fn test_comment_only_log_has_no_body() {
    let log = vec![
        translated(json!({"name": "openPage"})),
        translated(json!({"name": "click"})),
        translated(json!({"name": "teleport"})),
    ];
    assert_eq!(render_text(&ScriptConfig::default(), &log), SKELETON);
}

#[test]
fn test_rendering_is_idempotent() {
    let mut log = ActionLog::new();
    log.append(translated(json!({"name": "click", "selector": "#a"})));
    log.append(translated(json!({"name": "fill", "selector": "#b", "text": "x"})));
    let config = ScriptConfig::default().with_url("https://a.test/");

    let first = render_text(&config, &log.snapshot());
    let second = render_text(&config, &log.snapshot());
    assert_eq!(first, second);
}

#[test]
fn test_custom_executable_path_is_single_quoted() {
    let config = ScriptConfig {
        executable_path: "/opt/it's/playwright".into(),
        ..ScriptConfig::default()
    };
    let lines = render(&config, &[]);
    assert_eq!(
        lines[2],
        r#"Playwright.create(playwright_cli_executable_path: '/opt/it\'s/playwright') do |playwright|"#
    );
}
