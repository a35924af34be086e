/// Every state change in the browser flows through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,

    // Focus
    FocusNext,
    FocusPrev,
    FocusCommand,

    // Reference list
    SelectUp,
    SelectDown,
    SelectFirst,
    SelectLast,
    SelectReference(usize),
    Retry,

    // Patch view
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToTop,
    ScrollToBottom,

    // Command bar
    RunCommand,
    CommandChar(char),
    CommandBackspace,
    CommandDeleteWord,
    CommandLeft,
    CommandRight,
    CommandHome,
    CommandEnd,
    HistoryPrev,
    HistoryNext,

    // Misc
    YankReference,
    CycleTheme,
}
