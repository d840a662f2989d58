use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Action payload exactly as the recorder reports it.
///
/// Every field is optional. Payload fields stay as raw JSON values so that a
/// field with the wrong type is reported by [`Action::try_from`] instead of
/// rejecting the whole event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAction {
    #[serde(default, alias = "kind", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Value>,
    #[serde(
        default,
        rename = "resolvedSelector",
        alias = "generatedSelector",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_selector: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_action: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_count: Option<Value>,
}

impl RawAction {
    /// Kind name as received, used in diagnostics.
    pub fn kind_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("unknown")
    }

    pub fn selector_str(&self) -> Option<&str> {
        self.selector.as_ref().and_then(Value::as_str)
    }

    pub fn resolved_selector_str(&self) -> Option<&str> {
        self.resolved_selector
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn set_resolved_selector(&mut self, resolved: impl Into<String>) {
        self.resolved_selector = Some(Value::String(resolved.into()));
    }

    fn target(&self) -> Result<Target, DecodeError> {
        Ok(Target {
            selector: non_empty(string_field(&self.selector, "selector")?),
            resolved: non_empty(string_field(&self.resolved_selector, "resolvedSelector")?),
        })
    }
}

/// Envelope for the two recorder callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RecorderEvent {
    /// A new action was recorded.
    ActionAdded { action: RawAction },
    /// The most recent action was refined (e.g. a fill still being typed).
    ActionUpdated { action: RawAction },
}

/// The fixed set of action kinds the recorder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    OpenPage,
    Navigate,
    Click,
    Fill,
    Press,
    Check,
    Uncheck,
    Select,
    SetInputFiles,
    Hover,
    WaitForNavigation,
    WaitForLoadState,
    AssertText,
    AssertValue,
    AssertChecked,
    AssertVisible,
    ClosePage,
    Dialog,
    Download,
    Popup,
    FrameNavigated,
}

impl ActionKind {
    pub const ALL: [ActionKind; 21] = [
        ActionKind::OpenPage,
        ActionKind::Navigate,
        ActionKind::Click,
        ActionKind::Fill,
        ActionKind::Press,
        ActionKind::Check,
        ActionKind::Uncheck,
        ActionKind::Select,
        ActionKind::SetInputFiles,
        ActionKind::Hover,
        ActionKind::WaitForNavigation,
        ActionKind::WaitForLoadState,
        ActionKind::AssertText,
        ActionKind::AssertValue,
        ActionKind::AssertChecked,
        ActionKind::AssertVisible,
        ActionKind::ClosePage,
        ActionKind::Dialog,
        ActionKind::Download,
        ActionKind::Popup,
        ActionKind::FrameNavigated,
    ];

    /// Accepts both the recorder's camelCase names and kebab-case names.
    pub fn from_wire(name: &str) -> Option<Self> {
        let kind = match name {
            "openPage" | "open-page" => ActionKind::OpenPage,
            "navigate" => ActionKind::Navigate,
            "click" => ActionKind::Click,
            "fill" => ActionKind::Fill,
            "press" => ActionKind::Press,
            "check" => ActionKind::Check,
            "uncheck" => ActionKind::Uncheck,
            "select" => ActionKind::Select,
            "setInputFiles" | "set-input-files" => ActionKind::SetInputFiles,
            "hover" => ActionKind::Hover,
            "waitForNavigation" | "wait-for-navigation" => ActionKind::WaitForNavigation,
            "waitForLoadState" | "wait-for-load-state" => ActionKind::WaitForLoadState,
            "assertText" | "assert-text" => ActionKind::AssertText,
            "assertValue" | "assert-value" => ActionKind::AssertValue,
            "assertChecked" | "assert-checked" => ActionKind::AssertChecked,
            "assertVisible" | "assert-visible" => ActionKind::AssertVisible,
            "closePage" | "close-page" => ActionKind::ClosePage,
            "dialog" => ActionKind::Dialog,
            "download" => ActionKind::Download,
            "popup" => ActionKind::Popup,
            "framenavigated" | "frameNavigated" | "frame-navigated" => ActionKind::FrameNavigated,
            _ => return None,
        };
        Some(kind)
    }

    /// Recorder wire name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ActionKind::OpenPage => "openPage",
            ActionKind::Navigate => "navigate",
            ActionKind::Click => "click",
            ActionKind::Fill => "fill",
            ActionKind::Press => "press",
            ActionKind::Check => "check",
            ActionKind::Uncheck => "uncheck",
            ActionKind::Select => "select",
            ActionKind::SetInputFiles => "setInputFiles",
            ActionKind::Hover => "hover",
            ActionKind::WaitForNavigation => "waitForNavigation",
            ActionKind::WaitForLoadState => "waitForLoadState",
            ActionKind::AssertText => "assertText",
            ActionKind::AssertValue => "assertValue",
            ActionKind::AssertChecked => "assertChecked",
            ActionKind::AssertVisible => "assertVisible",
            ActionKind::ClosePage => "closePage",
            ActionKind::Dialog => "dialog",
            ActionKind::Download => "download",
            ActionKind::Popup => "popup",
            ActionKind::FrameNavigated => "framenavigated",
        }
    }

    /// Capitalized label used in explanatory comments ("Click action without selector").
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::OpenPage => "OpenPage",
            ActionKind::Navigate => "Navigate",
            ActionKind::Click => "Click",
            ActionKind::Fill => "Fill",
            ActionKind::Press => "Press",
            ActionKind::Check => "Check",
            ActionKind::Uncheck => "Uncheck",
            ActionKind::Select => "Select",
            ActionKind::SetInputFiles => "SetInputFiles",
            ActionKind::Hover => "Hover",
            ActionKind::WaitForNavigation => "WaitForNavigation",
            ActionKind::WaitForLoadState => "WaitForLoadState",
            ActionKind::AssertText => "AssertText",
            ActionKind::AssertValue => "AssertValue",
            ActionKind::AssertChecked => "AssertChecked",
            ActionKind::AssertVisible => "AssertVisible",
            ActionKind::ClosePage => "ClosePage",
            ActionKind::Dialog => "Dialog",
            ActionKind::Download => "Download",
            ActionKind::Popup => "Popup",
            ActionKind::FrameNavigated => "FrameNavigated",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Element address carried by every element-targeting action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Raw selector from the recorder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Richer structured-accessor string, when one was obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
}

impl Target {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            resolved: None,
        }
    }

    pub fn with_resolved(mut self, resolved: impl Into<String>) -> Self {
        self.resolved = Some(resolved.into());
        self
    }

    /// True when neither a raw nor a resolved selector is present.
    pub fn is_missing(&self) -> bool {
        self.selector.is_none() && self.resolved.is_none()
    }
}

/// Decoded recorder action, one variant per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    OpenPage,
    Navigate(NavigateAction),
    Click(ClickAction),
    Fill(FillAction),
    Press(PressAction),
    Check(Target),
    Uncheck(Target),
    Select(SelectAction),
    SetInputFiles(SetInputFilesAction),
    Hover(Target),
    WaitForNavigation,
    WaitForLoadState(LoadStateAction),
    AssertText(AssertTextAction),
    AssertValue(AssertValueAction),
    AssertChecked(Target),
    AssertVisible(Target),
    ClosePage,
    Dialog(DialogAction),
    Download,
    Popup,
    FrameNavigated,
    /// A kind outside the known set, kept for future recorder versions.
    Unknown { name: String },
    /// A payload without any kind.
    Invalid,
}

impl Action {
    pub fn kind(&self) -> Option<ActionKind> {
        let kind = match self {
            Action::OpenPage => ActionKind::OpenPage,
            Action::Navigate(_) => ActionKind::Navigate,
            Action::Click(_) => ActionKind::Click,
            Action::Fill(_) => ActionKind::Fill,
            Action::Press(_) => ActionKind::Press,
            Action::Check(_) => ActionKind::Check,
            Action::Uncheck(_) => ActionKind::Uncheck,
            Action::Select(_) => ActionKind::Select,
            Action::SetInputFiles(_) => ActionKind::SetInputFiles,
            Action::Hover(_) => ActionKind::Hover,
            Action::WaitForNavigation => ActionKind::WaitForNavigation,
            Action::WaitForLoadState(_) => ActionKind::WaitForLoadState,
            Action::AssertText(_) => ActionKind::AssertText,
            Action::AssertValue(_) => ActionKind::AssertValue,
            Action::AssertChecked(_) => ActionKind::AssertChecked,
            Action::AssertVisible(_) => ActionKind::AssertVisible,
            Action::ClosePage => ActionKind::ClosePage,
            Action::Dialog(_) => ActionKind::Dialog,
            Action::Download => ActionKind::Download,
            Action::Popup => ActionKind::Popup,
            Action::FrameNavigated => ActionKind::FrameNavigated,
            Action::Unknown { .. } | Action::Invalid => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickAction {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default)]
    pub button: MouseButton,
    /// Keyboard modifier bitmask: Alt=1, Control=2, Meta=4, Shift=8.
    #[serde(default)]
    pub modifiers: u32,
    #[serde(default = "default_click_count")]
    pub click_count: u32,
}

fn default_click_count() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillAction {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressAction {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub modifiers: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectAction {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInputFilesAction {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStateAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertTextAction {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertValueAction {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogAction {
    pub accept: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Field `{field}` must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Field `{field}` has unsupported value: {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl TryFrom<&RawAction> for Action {
    type Error = DecodeError;

    fn try_from(raw: &RawAction) -> Result<Self, Self::Error> {
        let Some(name) = raw.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(Action::Invalid);
        };
        let Some(kind) = ActionKind::from_wire(name) else {
            return Ok(Action::Unknown {
                name: name.to_string(),
            });
        };

        let action = match kind {
            ActionKind::OpenPage => Action::OpenPage,
            ActionKind::Navigate => Action::Navigate(NavigateAction {
                url: non_empty(string_field(&raw.url, "url")?),
            }),
            ActionKind::Click => Action::Click(ClickAction {
                target: raw.target()?,
                button: button_field(&raw.button)?,
                modifiers: count_field(&raw.modifiers, "modifiers")?.unwrap_or(0),
                click_count: count_field(&raw.click_count, "clickCount")?.unwrap_or(1),
            }),
            ActionKind::Fill => Action::Fill(FillAction {
                target: raw.target()?,
                text: string_field(&raw.text, "text")?,
            }),
            ActionKind::Press => Action::Press(PressAction {
                target: raw.target()?,
                key: string_field(&raw.key, "key")?,
                modifiers: count_field(&raw.modifiers, "modifiers")?.unwrap_or(0),
            }),
            ActionKind::Check => Action::Check(raw.target()?),
            ActionKind::Uncheck => Action::Uncheck(raw.target()?),
            ActionKind::Select => Action::Select(SelectAction {
                target: raw.target()?,
                options: string_list(&raw.options, "options")?,
            }),
            ActionKind::SetInputFiles => Action::SetInputFiles(SetInputFilesAction {
                target: raw.target()?,
                files: string_list(&raw.files, "files")?,
            }),
            ActionKind::Hover => Action::Hover(raw.target()?),
            ActionKind::WaitForNavigation => Action::WaitForNavigation,
            ActionKind::WaitForLoadState => Action::WaitForLoadState(LoadStateAction {
                state: non_empty(string_field(&raw.state, "state")?),
            }),
            ActionKind::AssertText => Action::AssertText(AssertTextAction {
                target: raw.target()?,
                text: string_field(&raw.text, "text")?,
            }),
            ActionKind::AssertValue => Action::AssertValue(AssertValueAction {
                target: raw.target()?,
                value: string_field(&raw.value, "value")?,
            }),
            ActionKind::AssertChecked => Action::AssertChecked(raw.target()?),
            ActionKind::AssertVisible => Action::AssertVisible(raw.target()?),
            ActionKind::ClosePage => Action::ClosePage,
            ActionKind::Dialog => Action::Dialog(DialogAction {
                accept: string_field(&raw.dialog_action, "dialogAction")?.as_deref()
                    == Some("accept"),
            }),
            ActionKind::Download => Action::Download,
            ActionKind::Popup => Action::Popup,
            ActionKind::FrameNavigated => Action::FrameNavigated,
        };
        Ok(action)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Strings pass through; numbers and booleans are rendered as text.
fn string_field(value: &Option<Value>, field: &'static str) -> Result<Option<String>, DecodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(DecodeError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn string_list(value: &Option<Value>, field: &'static str) -> Result<Vec<String>, DecodeError> {
    let invalid = || DecodeError::InvalidType {
        field,
        expected: "a list of strings",
    };
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(invalid()),
            })
            .collect(),
        Some(_) => Err(invalid()),
    }
}

fn count_field(value: &Option<Value>, field: &'static str) -> Result<Option<u32>, DecodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| DecodeError::InvalidValue {
                field,
                value: n.to_string(),
            }),
        Some(_) => Err(DecodeError::InvalidType {
            field,
            expected: "a non-negative integer",
        }),
    }
}

fn button_field(value: &Option<Value>) -> Result<MouseButton, DecodeError> {
    match string_field(value, "button")?.as_deref() {
        None | Some("left") => Ok(MouseButton::Left),
        Some("middle") => Ok(MouseButton::Middle),
        Some("right") => Ok(MouseButton::Right),
        Some(other) => Err(DecodeError::InvalidValue {
            field: "button",
            value: other.to_string(),
        }),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {what}: {value}")]
pub struct UnknownVariant {
    pub what: &'static str,
    pub value: String,
}

/// How element addresses are rendered in generated statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorStyle {
    /// `page.get_by_role("button").click`
    #[default]
    Locator,
    /// `page.click("role=button")`
    Positional,
}

impl FromStr for SelectorStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "locator" | "chained" => Ok(SelectorStyle::Locator),
            "positional" | "legacy" => Ok(SelectorStyle::Positional),
            _ => Err(UnknownVariant {
                what: "selector style",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SelectorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorStyle::Locator => f.write_str("locator"),
            SelectorStyle::Positional => f.write_str("positional"),
        }
    }
}

/// Browser engine launched by the generated script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            _ => Err(UnknownVariant {
                what: "browser",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
