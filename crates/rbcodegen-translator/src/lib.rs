pub mod literal;
pub mod selector;
pub mod translator;

pub use selector::{Locator, normalize};
pub use translator::{TranslationError, translate, translate_action};
