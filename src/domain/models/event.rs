use tui_textarea::Input;

/// Everything the terminal UI reacts to.
pub enum Event {
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLR(),
    KeyboardEnter(),
    OrchestratorStopped(),
    SnapshotUpdated(),
    UIResize(),
    UITick(),
}
