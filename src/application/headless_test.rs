use super::HeadlessRun;
use super::Step;
use crate::domain::models::Action;
use crate::domain::models::GeneratedImage;
use crate::domain::models::ItemStatus;
use crate::domain::models::ItemView;
use crate::domain::models::MachineState;
use crate::domain::models::MenuItem;
use crate::domain::models::Progress;
use crate::domain::models::Snapshot;

fn generating(statuses: Vec<ItemStatus>) -> Snapshot {
    let names = ["Spaghetti Carbonara", "Caesar Salad"];
    let items = names
        .iter()
        .zip(statuses)
        .map(|(name, status)| {
            return ItemView {
                item: MenuItem::new(name),
                status,
            };
        })
        .collect::<Vec<ItemView>>();
    let current = items.iter().filter(|e| return e.status.is_terminal()).count();

    return Snapshot {
        state: MachineState::GeneratingImages,
        progress: Progress {
            current,
            total: items.len(),
        },
        items,
        ..Snapshot::default()
    };
}

#[test]
fn it_prints_each_dish_once() {
    let mut run = HeadlessRun::default();

    let lines = run.lines(&generating(vec![ItemStatus::Pending, ItemStatus::Pending]));
    insta::assert_snapshot!(lines.join("\n"), @r###"
    ==> Generating dish visualizations...
    Found 2 dishes
    "###);

    let lines = run.lines(&generating(vec![
        ItemStatus::Pending,
        ItemStatus::Failed("No image generated for Caesar Salad".to_string()),
    ]));
    insta::assert_snapshot!(lines.join("\n"), @"✗ 2. Caesar Salad: No image generated for Caesar Salad");

    let lines = run.lines(&generating(vec![
        ItemStatus::Succeeded(GeneratedImage::new("image/jpeg", "AAAA")),
        ItemStatus::Failed("No image generated for Caesar Salad".to_string()),
    ]));
    insta::assert_snapshot!(lines.join("\n"), @"✓ 1. Spaghetti Carbonara [image/jpeg]");

    let lines = run.lines(&generating(vec![
        ItemStatus::Succeeded(GeneratedImage::new("image/jpeg", "AAAA")),
        ItemStatus::Failed("No image generated for Caesar Salad".to_string()),
    ]));
    assert!(lines.is_empty());
}

#[test]
fn it_prints_errors() {
    let mut run = HeadlessRun::default();
    let snapshot = Snapshot {
        state: MachineState::Error,
        error: Some("No menu items could be found. Please try a different image.".to_string()),
        ..Snapshot::default()
    };

    insta::assert_snapshot!(run.lines(&snapshot).join("\n"), @r###"
    ==> Oops! Something went wrong.
    No menu items could be found. Please try a different image.
    "###);
}

#[test]
fn it_steps_through_the_flow() {
    let run = HeadlessRun::default();
    let at = |state: MachineState| {
        return Snapshot {
            state,
            ..Snapshot::default()
        };
    };

    assert!(matches!(
        run.step(&at(MachineState::Idle)),
        Step::Continue(None)
    ));
    assert!(matches!(
        run.step(&at(MachineState::ImageSelected)),
        Step::Continue(Some(Action::ConfirmAnalyze()))
    ));
    assert!(matches!(
        run.step(&at(MachineState::Analyzing)),
        Step::Continue(None)
    ));
    assert!(matches!(
        run.step(&at(MachineState::Results)),
        Step::Continue(Some(Action::Finish()))
    ));
    assert!(matches!(
        run.step(&at(MachineState::Finished)),
        Step::Done(true)
    ));
    assert!(matches!(
        run.step(&at(MachineState::Error)),
        Step::Done(false)
    ));
}

#[test]
fn it_stops_on_rejected_files() {
    let run = HeadlessRun::default();
    let snapshot = Snapshot {
        validation: Some("Please select a valid image file (got text/plain).".to_string()),
        ..Snapshot::default()
    };

    assert!(matches!(run.step(&snapshot), Step::Done(false)));
}

#[test]
fn it_summarizes_results() {
    let mut run = HeadlessRun::default();
    let mut snapshot = generating(vec![
        ItemStatus::Succeeded(GeneratedImage::new("image/jpeg", "AAAA")),
        ItemStatus::Failed("No image generated for Caesar Salad".to_string()),
    ]);
    run.lines(&snapshot);

    snapshot.state = MachineState::Results;
    insta::assert_snapshot!(run.lines(&snapshot).join("\n"), @r###"
    ==> Your menu, visualized.
    1 of 2 dishes visualized
    "###);
}
