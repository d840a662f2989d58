pub mod protocol;

pub use protocol::{
    Action, ActionKind, AssertTextAction, AssertValueAction, BrowserKind, ClickAction,
    DecodeError, DialogAction, FillAction, LoadStateAction, MouseButton, NavigateAction,
    PressAction, RawAction, RecorderEvent, SelectAction, SelectorStyle, SetInputFilesAction,
    Target, UnknownVariant,
};
