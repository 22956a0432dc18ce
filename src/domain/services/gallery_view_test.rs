use ratatui::style::Color;
use ratatui::text::Line;

use super::GalleryView;
use crate::domain::models::GeneratedImage;
use crate::domain::models::ItemStatus;
use crate::domain::models::ItemView;
use crate::domain::models::MachineState;
use crate::domain::models::MenuItem;
use crate::domain::models::Progress;
use crate::domain::models::Snapshot;

fn to_text(lines: &[Line]) -> String {
    return lines
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| {
                    return span.content.to_string();
                })
                .collect::<Vec<String>>()
                .join("");
        })
        .collect::<Vec<String>>()
        .join("\n");
}

fn snapshot() -> Snapshot {
    return Snapshot {
        state: MachineState::GeneratingImages,
        items: vec![
            ItemView {
                item: MenuItem::with_details(
                    "Spaghetti Carbonara",
                    Some("Egg yolk, pecorino, guanciale and black pepper."),
                    Some("$14.50"),
                ),
                status: ItemStatus::Succeeded(GeneratedImage::new("image/jpeg", "AAAA")),
            },
            ItemView {
                item: MenuItem::with_details("Caesar Salad", None, Some("9")),
                status: ItemStatus::Failed("No image generated for Caesar Salad".to_string()),
            },
            ItemView {
                item: MenuItem::new("Tiramisù"),
                status: ItemStatus::Pending,
            },
        ],
        progress: Progress {
            current: 2,
            total: 3,
        },
        ..Snapshot::default()
    };
}

#[test]
fn it_renders_every_dish_in_order() {
    let text = to_text(&GalleryView::lines(&snapshot()));
    insta::assert_snapshot!(text, @r###"
    ✓ 1. Spaghetti Carbonara ($14.50)
         Egg yolk, pecorino, guanciale and black pepper.
         image ready (image/jpeg)
    ✗ 2. Caesar Salad (9)
         No image generated for Caesar Salad
    … 3. Tiramisù
    "###);
}

#[test]
fn it_colors_markers_by_status() {
    let lines = GalleryView::lines(&snapshot());

    assert_eq!(lines[0].spans[0].style.fg, Some(Color::Green));
    assert_eq!(lines[3].spans[0].style.fg, Some(Color::Red));
    assert_eq!(lines[5].spans[0].style.fg, Some(Color::Yellow));
}

#[test]
fn it_renders_nothing_without_items() {
    assert!(GalleryView::lines(&Snapshot::default()).is_empty());
}
