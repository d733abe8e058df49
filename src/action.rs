#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    NextPage,
    PrevPage,
    EnterSearchMode,
    ExitSearchMode,
    ClearSearch,
    UpdateSearch(String),
    Terminate(u32),
    ForceKill(u32),
    ShowDetails(u32),
    /// A process action was requested with nothing selected. Carries the verb.
    NeedsSelection(&'static str),
    CloseOverlay,
    Deselect,
    CycleSortMode,
    ToggleHelp,
    Refresh,
    SelectAt(u16, u16),
    None,
}
