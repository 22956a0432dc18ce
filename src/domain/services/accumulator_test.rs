use std::sync::Arc;

use anyhow::Result;

use super::Accumulator;
use crate::domain::models::GeneratedImage;
use crate::domain::models::GenerationOutcome;
use crate::domain::models::ItemStatus;
use crate::domain::models::MenuItem;

fn items(names: &[&str]) -> Vec<MenuItem> {
    return names.iter().map(|e| return MenuItem::new(e)).collect();
}

fn succeeded(data: &str) -> GenerationOutcome {
    return GenerationOutcome::Succeeded(GeneratedImage::new("image/jpeg", data));
}

fn rendered_names(accumulator: &Accumulator) -> Vec<String> {
    return accumulator
        .snapshot()
        .iter()
        .map(|e| return e.item.name.to_string())
        .collect();
}

#[test]
fn it_starts_with_everything_pending() {
    let accumulator = Accumulator::new(items(&["A", "B"]));

    assert_eq!(accumulator.len(), 2);
    assert_eq!(accumulator.completed(), 0);
    assert!(!accumulator.is_complete());
    assert!(accumulator
        .snapshot()
        .iter()
        .all(|e| return e.status == ItemStatus::Pending));
}

#[test]
fn it_keeps_extraction_order_regardless_of_merge_order() {
    let accumulator = Accumulator::new(items(&["A", "B", "C"]));

    assert!(accumulator.merge("C", succeeded("c")));
    assert_eq!(rendered_names(&accumulator), vec!["A", "B", "C"]);
    assert!(accumulator.merge("A", succeeded("a")));
    assert_eq!(rendered_names(&accumulator), vec!["A", "B", "C"]);
    assert!(accumulator.merge("B", succeeded("b")));
    assert_eq!(rendered_names(&accumulator), vec!["A", "B", "C"]);

    assert!(accumulator.is_complete());
    let urls = accumulator
        .snapshot()
        .iter()
        .map(|e| return e.image_url().unwrap())
        .collect::<Vec<String>>();
    assert_eq!(
        urls,
        vec![
            "data:image/jpeg;base64,a",
            "data:image/jpeg;base64,b",
            "data:image/jpeg;base64,c"
        ]
    );
}

#[test]
fn it_merges_idempotently() {
    let accumulator = Accumulator::new(items(&["A", "B"]));

    accumulator.merge("A", succeeded("a"));
    let first = accumulator.snapshot();
    let first_completed = accumulator.completed();

    accumulator.merge("A", succeeded("a"));
    assert_eq!(accumulator.snapshot(), first);
    assert_eq!(accumulator.completed(), first_completed);
}

#[test]
fn it_lets_the_last_write_win() {
    let accumulator = Accumulator::new(items(&["A"]));

    accumulator.merge("A", GenerationOutcome::Failed("nope".to_string()));
    accumulator.merge("A", succeeded("a"));

    assert_eq!(
        accumulator.status("A"),
        Some(ItemStatus::Succeeded(GeneratedImage::new("image/jpeg", "a")))
    );
    assert_eq!(accumulator.completed(), 1);
}

#[test]
fn it_rejects_unknown_dishes() {
    let accumulator = Accumulator::new(items(&["A"]));

    assert!(!accumulator.merge("Z", succeeded("z")));
    assert_eq!(accumulator.status("Z"), None);
    assert_eq!(accumulator.len(), 1);
}

#[test]
fn it_tracks_failures_per_item() {
    let accumulator = Accumulator::new(items(&["A", "B", "C"]));

    accumulator.merge("A", succeeded("a"));
    accumulator.merge("B", GenerationOutcome::Failed("No image generated for B".to_string()));
    accumulator.merge("C", succeeded("c"));

    let snapshot = accumulator.snapshot();
    assert!(accumulator.is_complete());
    assert_eq!(
        snapshot[1].status,
        ItemStatus::Failed("No image generated for B".to_string())
    );
    assert!(snapshot[0].image_url().is_some());
    assert!(snapshot[1].image_url().is_none());
    assert!(snapshot[2].image_url().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn it_handles_concurrent_merges() -> Result<()> {
    let names = (0..64).map(|e| return format!("dish-{e}")).collect::<Vec<String>>();
    let accumulator = Arc::new(Accumulator::new(
        names.iter().map(|e| return MenuItem::new(e)).collect(),
    ));

    let mut handles = vec![];
    for name in names.iter().rev() {
        let accumulator = accumulator.clone();
        let name = name.to_string();
        handles.push(tokio::spawn(async move {
            return accumulator.merge(&name, succeeded(&name));
        }));
    }

    for handle in handles {
        assert!(handle.await?);
    }

    assert!(accumulator.is_complete());
    assert_eq!(
        accumulator
            .snapshot()
            .iter()
            .map(|e| return e.item.name.to_string())
            .collect::<Vec<String>>(),
        names
    );

    return Ok(());
}
