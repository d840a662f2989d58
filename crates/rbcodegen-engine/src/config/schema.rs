use crate::assembler::{DEFAULT_EXECUTABLE_PATH, ScriptConfig};
use crate::session::SessionOptions;
use rbcodegen_common::protocol::{BrowserKind, SelectorStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodegenConfig {
    #[serde(default)]
    pub script: ScriptSettings,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl CodegenConfig {
    /// Assembler settings, with the start URL supplied at launch.
    pub fn script_config(&self, url: Option<String>) -> ScriptConfig {
        ScriptConfig {
            browser: self.script.browser,
            channel: self.script.channel.clone(),
            url,
            executable_path: self.script.executable_path.clone(),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            style: self.translation.selector_style,
            resolve: self.resolution.enabled,
            resolve_timeout: Duration::from_millis(self.resolution.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSettings {
    #[serde(default)]
    pub browser: BrowserKind,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default = "default_executable_path")]
    pub executable_path: String,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            browser: BrowserKind::default(),
            channel: None,
            executable_path: default_executable_path(),
        }
    }
}

fn default_executable_path() -> String {
    DEFAULT_EXECUTABLE_PATH.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub selector_style: SelectorStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    500
}
