use super::ItemStatus;
use super::ItemView;
use super::Progress;
use super::Snapshot;
use crate::domain::models::GeneratedImage;
use crate::domain::models::GenerationOutcome;
use crate::domain::models::MachineState;
use crate::domain::models::MenuItem;

#[test]
fn it_converts_outcomes() {
    let image = GeneratedImage::new("image/jpeg", "abc");
    assert_eq!(
        ItemStatus::from(GenerationOutcome::Succeeded(image.clone())),
        ItemStatus::Succeeded(image)
    );
    assert_eq!(
        ItemStatus::from(GenerationOutcome::Failed("nope".to_string())),
        ItemStatus::Failed("nope".to_string())
    );
    assert!(!ItemStatus::Pending.is_terminal());
}

#[test]
fn it_only_exposes_resolved_images() {
    let pending = ItemView {
        item: MenuItem::new("Soup"),
        status: ItemStatus::Pending,
    };
    let failed = ItemView {
        item: MenuItem::new("Soup"),
        status: ItemStatus::Failed("Could not generate an image for Soup".to_string()),
    };
    let done = ItemView {
        item: MenuItem::new("Soup"),
        status: ItemStatus::Succeeded(GeneratedImage::new("image/jpeg", "abc")),
    };

    assert_eq!(pending.image_url(), None);
    assert_eq!(failed.image_url(), None);
    assert_eq!(done.image_url(), Some("data:image/jpeg;base64,abc".to_string()));
}

#[test]
fn it_computes_progress_ratio() {
    assert_eq!(Progress::default().ratio(), 0.0);
    assert_eq!(
        Progress {
            current: 1,
            total: 4
        }
        .ratio(),
        0.25
    );
}

#[test]
fn it_describes_each_state() {
    let snapshot = Snapshot {
        state: MachineState::Analyzing,
        ..Snapshot::default()
    };
    assert_eq!(snapshot.status_message(), "Reading your menu...");
    assert_eq!(Snapshot::default().state, MachineState::Idle);
}
