use rbcodegen_engine::assembler::ScriptConfig;
use rbcodegen_engine::cli::{StreamStats, run_events, write_script};
use rbcodegen_engine::resolver::StaticResolver;
use rbcodegen_engine::session::{RecordingSession, SessionOptions};
use std::future::pending;

const EVENTS: &str = r#"
{"event":"actionAdded","action":{"name":"openPage","url":"about:blank"}}
{"event":"actionAdded","action":{"name":"navigate","url":"https://shop.test/"}}
{"event":"actionAdded","action":{"name":"fill","selector":"aria-ref=e7","text":"a"}}
this is not json
{"event":"actionUpdated","action":{"name":"fill","selector":"aria-ref=e7","text":"admin@example.com"}}

{"name":"click","selector":"getByRole('button', { name: 'Log in' })"}
{"event":"actionAdded","action":{"name":"assertText","selector":"h1","text":"Welcome \"admin\""}}
"#;

#[tokio::test]
async fn test_event_stream_to_script() {
    let resolver = StaticResolver::new().with("aria-ref=e7", "getByLabel('Email')");
    let session = RecordingSession::with_resolver(
        ScriptConfig::default().with_url("https://shop.test/"),
        SessionOptions::default(),
        resolver,
    );

    let stats = run_events(&session, EVENTS.as_bytes(), pending()).await.unwrap();
    assert_eq!(
        stats,
        StreamStats {
            handled: 6,
            skipped: 1
        }
    );

    let expected = r#"require "playwright"

Playwright.create(playwright_cli_executable_path: './node_modules/.bin/playwright') do |playwright|
  playwright.chromium.launch(headless: false) do |browser|
    context = browser.new_context
    page = context.new_page

    page.goto("https://shop.test/")

    # Recorded actions:
    page.get_by_label("Email").fill("admin@example.com")
    page.get_by_role("button", name: "Log in").click
    expect(page.locator("h1")).to have_text("Welcome \"admin\"")
  end
end
"#;
    assert_eq!(session.finish().await, expected);
}

#[tokio::test]
async fn test_shutdown_stops_reading() {
    let session = RecordingSession::new(ScriptConfig::default(), SessionOptions::default());
    let stats = run_events(&session, EVENTS.as_bytes(), async {}).await.unwrap();
    assert_eq!(stats, StreamStats::default());
    assert!(session.snapshot().is_empty());
}

#[tokio::test]
async fn test_write_script_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recorded.rb");
    write_script(Some(&path), "require \"playwright\"\n").await.unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "require \"playwright\"\n"
    );
}
