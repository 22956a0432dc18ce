#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;

use super::GeneratedImage;
use super::GenerationOutcome;
use super::MachineState;
use super::MenuImagePreview;
use super::MenuItem;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Succeeded(GeneratedImage),
    Failed(String),
}

impl ItemStatus {
    pub fn is_terminal(&self) -> bool {
        return *self != ItemStatus::Pending;
    }
}

impl From<GenerationOutcome> for ItemStatus {
    fn from(outcome: GenerationOutcome) -> ItemStatus {
        match outcome {
            GenerationOutcome::Succeeded(image) => return ItemStatus::Succeeded(image),
            GenerationOutcome::Failed(message) => return ItemStatus::Failed(message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemView {
    pub item: MenuItem,
    pub status: ItemStatus,
}

impl ItemView {
    /// The resolved image, or `None` when a placeholder should be shown.
    pub fn image_url(&self) -> Option<String> {
        if let ItemStatus::Succeeded(image) = &self.status {
            return Some(image.data_url());
        }

        return None;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        return (self.current as f64 / self.total as f64).clamp(0.0, 1.0);
    }
}

/// Read only view of the active session, republished on every transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub state: MachineState,
    pub session_id: Option<String>,
    pub menu_image: Option<MenuImagePreview>,
    pub items: Vec<ItemView>,
    pub progress: Progress,
    pub error: Option<String>,
    pub validation: Option<String>,
}

impl Snapshot {
    pub fn status_message(&self) -> &'static str {
        match self.state {
            MachineState::Idle => return "Select a photo of a menu to get started.",
            MachineState::ImageSelected => return "Ready to read your menu.",
            MachineState::Analyzing => return "Reading your menu...",
            MachineState::GeneratingImages => return "Generating dish visualizations...",
            MachineState::Results => return "Your menu, visualized.",
            MachineState::Finished => return "Enjoy your meal!",
            MachineState::Error => return "Oops! Something went wrong.",
        }
    }

    pub fn failed_count(&self) -> usize {
        return self
            .items
            .iter()
            .filter(|e| return matches!(e.status, ItemStatus::Failed(_)))
            .count();
    }
}
