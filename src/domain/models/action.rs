use super::MenuImage;

/// Intents the presentation layer can send to the orchestrator. Nothing else
/// mutates a session.
pub enum Action {
    SelectImage(MenuImage),
    ConfirmAnalyze(),
    Reset(),
    Finish(),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectImage(_) => return "select an image",
            Action::ConfirmAnalyze() => return "analyze",
            Action::Reset() => return "reset",
            Action::Finish() => return "finish",
        }
    }
}
