//! User and system actions.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Char(char),
    Backspace,
    ClearInput,
    Submit,
    FocusInput,
    UnfocusInput,
    ToggleLogs,

    ChatScrollUp,
    ChatScrollDown,
    ChatScrollPageUp,
    ChatScrollPageDown,
    ChatScrollTop,
    ChatScrollBottom,

    HistoryUp,
    HistoryDown,

    PaletteShow,
    PaletteHide,
    PaletteUp,
    PaletteDown,
    PaletteSelect,
}
