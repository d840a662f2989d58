pub mod action_log;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod resolver;
pub mod session;

pub use rbcodegen_common::protocol;
pub use rbcodegen_translator::translator;

pub use action_log::{ActionLog, TranslatedLine};
pub use assembler::ScriptConfig;
pub use resolver::{NoResolver, ResolveError, SelectorResolver, StaticResolver};
pub use session::{RecordingSession, SessionError, SessionOptions};
