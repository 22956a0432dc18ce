use super::GeneratedImage;
use super::MenuError;
use super::MenuItem;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    Succeeded(GeneratedImage),
    Failed(String),
}

/// One dish's terminal outcome, tagged with the epoch of the session that
/// asked for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationResult {
    pub epoch: u64,
    pub name: String,
    pub outcome: GenerationOutcome,
}

/// Results reported back to the orchestrator by its worker tasks.
#[derive(Debug)]
pub enum Completion {
    Extraction(u64, Result<Vec<MenuItem>, MenuError>),
    Generation(GenerationResult),
}

impl Completion {
    pub fn epoch(&self) -> u64 {
        match self {
            Completion::Extraction(epoch, _) => return *epoch,
            Completion::Generation(res) => return res.epoch,
        }
    }
}
