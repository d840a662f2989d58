use crate::literal::{quote, quote_list};
use crate::selector::{Locator, normalize};
use rbcodegen_common::protocol::{
    Action, ActionKind, ClickAction, DecodeError, MouseButton, RawAction, SelectorStyle, Target,
};
use thiserror::Error;

/// Leading marker of a comment line in the generated script.
pub const COMMENT_MARKER: char = '#';

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Malformed payload: {0}")]
    Decode(#[from] DecodeError),
}

/// Translates one recorder payload into a single line of Ruby.
///
/// Total: malformed payloads become an error comment, never a failure.
pub fn translate(raw: &RawAction, style: SelectorStyle) -> String {
    match try_translate(raw, style) {
        Ok(line) => line,
        Err(e) => {
            tracing::warn!("Failed to translate {} action: {}", raw.kind_name(), e);
            format!(
                "{} Error generating code for action: {}",
                COMMENT_MARKER,
                raw.kind_name()
            )
        }
    }
}

pub fn try_translate(raw: &RawAction, style: SelectorStyle) -> Result<String, TranslationError> {
    let action = Action::try_from(raw)?;
    Ok(translate_action(&action, style))
}

/// Translates an already decoded action.
pub fn translate_action(action: &Action, style: SelectorStyle) -> String {
    let r = Renderer { style };
    match action {
        Action::OpenPage => comment("Browser and page are already created"),
        Action::Navigate(nav) => navigate_statement(nav.url.as_deref()),
        Action::Click(click) => r.click(click),
        Action::Fill(fill) => r.element(ActionKind::Fill, &fill.target, |loc| {
            r.call(loc, "fill", vec![quote(fill.text.as_deref().unwrap_or(""))])
        }),
        Action::Press(press) => r.element(ActionKind::Press, &press.target, |loc| {
            let key = chord(press.key.as_deref().unwrap_or(""), press.modifiers);
            r.call(loc, "press", vec![quote(&key)])
        }),
        Action::Check(target) => {
            r.element(ActionKind::Check, target, |loc| r.call(loc, "check", vec![]))
        }
        Action::Uncheck(target) => {
            r.element(ActionKind::Uncheck, target, |loc| r.call(loc, "uncheck", vec![]))
        }
        Action::Select(select) => r.element(ActionKind::Select, &select.target, |loc| {
            let values = format!("value: {}", quote_list(select.options.as_slice()));
            r.call(loc, "select_option", vec![values])
        }),
        Action::SetInputFiles(set) => r.element(ActionKind::SetInputFiles, &set.target, |loc| {
            r.call(loc, "set_input_files", vec![quote_list(set.files.as_slice())])
        }),
        Action::Hover(target) => {
            r.element(ActionKind::Hover, target, |loc| r.call(loc, "hover", vec![]))
        }
        Action::WaitForNavigation => comment("Wait for navigation"),
        Action::WaitForLoadState(wait) => format!(
            "page.wait_for_load_state({})",
            quote(wait.state.as_deref().unwrap_or("load"))
        ),
        Action::AssertText(assert) => r.element(ActionKind::AssertText, &assert.target, |loc| {
            let text = quote(assert.text.as_deref().unwrap_or(""));
            r.expectation(loc, &format!("have_text({})", text))
        }),
        Action::AssertValue(assert) => r.element(ActionKind::AssertValue, &assert.target, |loc| {
            let value = quote(assert.value.as_deref().unwrap_or(""));
            r.expectation(loc, &format!("have_value({})", value))
        }),
        Action::AssertChecked(target) => r.element(ActionKind::AssertChecked, target, |loc| {
            r.expectation(loc, "be_checked")
        }),
        Action::AssertVisible(target) => r.element(ActionKind::AssertVisible, target, |loc| {
            r.expectation(loc, "be_visible")
        }),
        Action::ClosePage => "page.close".to_string(),
        Action::Dialog(dialog) if dialog.accept => comment("Accept dialog"),
        Action::Dialog(_) => comment("Dismiss dialog"),
        Action::Download => comment("Handle download"),
        Action::Popup => comment("Handle popup window"),
        Action::FrameNavigated => comment("Frame navigated"),
        Action::Unknown { name } => comment(&format!("Unknown action: {}", name)),
        Action::Invalid => comment("Invalid action"),
    }
}

/// `page.goto(...)`; shared with the script preamble so duplicates compare equal.
pub fn navigate_statement(url: Option<&str>) -> String {
    format!("page.goto({})", quote(url.unwrap_or("about:blank")))
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_MARKER)
}

fn comment(text: &str) -> String {
    format!("{} {}", COMMENT_MARKER, text)
}

struct Renderer {
    style: SelectorStyle,
}

impl Renderer {
    /// Runs `render` with the normalized target, or explains the missing selector.
    fn element(
        &self,
        kind: ActionKind,
        target: &Target,
        render: impl FnOnce(&Locator) -> String,
    ) -> String {
        if target.is_missing() {
            return comment(&format!("{} action without selector", kind.label()));
        }
        let locator = normalize(target.selector.as_deref(), target.resolved.as_deref());
        if locator.is_reference() {
            tracing::debug!("Emitting unresolved reference {}", locator.selector());
        }
        render(&locator)
    }

    fn call(&self, locator: &Locator, method: &str, args: Vec<String>) -> String {
        match self.style {
            SelectorStyle::Locator if args.is_empty() => {
                format!("{}.{}", locator.expression(), method)
            }
            SelectorStyle::Locator => {
                format!("{}.{}({})", locator.expression(), method, args.join(", "))
            }
            SelectorStyle::Positional => {
                let mut all = vec![quote(&locator.selector())];
                all.extend(args);
                format!("page.{}({})", method, all.join(", "))
            }
        }
    }

    fn expectation(&self, locator: &Locator, matcher: &str) -> String {
        let subject = match self.style {
            SelectorStyle::Locator => locator.expression(),
            SelectorStyle::Positional => format!("page.locator({})", quote(&locator.selector())),
        };
        format!("expect({}).to {}", subject, matcher)
    }

    fn click(&self, click: &ClickAction) -> String {
        self.element(ActionKind::Click, &click.target, |loc| {
            let method = if click.click_count == 2 { "dblclick" } else { "click" };
            let mut args = Vec::new();
            if click.button != MouseButton::Left {
                args.push(format!("button: {}", quote(click.button.as_str())));
            }
            if click.click_count > 2 {
                args.push(format!("clickCount: {}", click.click_count));
            }
            let modifiers = modifier_names(click.modifiers);
            if !modifiers.is_empty() {
                args.push(format!("modifiers: {}", quote_list(modifiers.as_slice())));
            }
            self.call(loc, method, args)
        })
    }
}

/// Decodes the recorder's modifier bitmask.
fn modifier_names(mask: u32) -> Vec<&'static str> {
    [(1, "Alt"), (2, "Control"), (4, "Meta"), (8, "Shift")]
        .into_iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| name)
        .collect()
}

fn chord(key: &str, modifiers: u32) -> String {
    let mut parts: Vec<&str> = modifier_names(modifiers);
    if parts.is_empty() {
        return key.to_string();
    }
    parts.push(key);
    parts.join("+")
}
