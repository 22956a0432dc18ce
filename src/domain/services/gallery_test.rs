use std::env;

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use test_utils::png_fixture;
use uuid::Uuid;

use super::slugify;
use super::Gallery;
use crate::domain::models::GeneratedImage;
use crate::domain::models::ItemStatus;
use crate::domain::models::ItemView;
use crate::domain::models::MachineState;
use crate::domain::models::MenuItem;
use crate::domain::models::Snapshot;

#[test]
fn it_slugifies_dish_names() {
    assert_eq!(slugify("Spaghetti Carbonara"), "spaghetti-carbonara");
    assert_eq!(slugify("  Fish & Chips!! "), "fish-chips");
    assert_eq!(slugify("Tiramisù"), "tiramisù");
    assert_eq!(slugify("???"), "dish");
}

#[tokio::test]
async fn it_exports_generated_images() -> Result<()> {
    let dir = env::temp_dir().join(format!("menuviz-{}", Uuid::new_v4()));
    let png = png_fixture();

    let snapshot = Snapshot {
        state: MachineState::Finished,
        items: vec![
            ItemView {
                item: MenuItem::new("Spaghetti Carbonara"),
                status: ItemStatus::Succeeded(GeneratedImage::new(
                    "image/png",
                    &STANDARD.encode(&png),
                )),
            },
            ItemView {
                item: MenuItem::new("Caesar Salad"),
                status: ItemStatus::Failed("No image generated for Caesar Salad".to_string()),
            },
            ItemView {
                item: MenuItem::new("Tiramisù"),
                status: ItemStatus::Succeeded(GeneratedImage::new(
                    "image/jpeg",
                    &STANDARD.encode(b"jpeg"),
                )),
            },
        ],
        ..Snapshot::default()
    };

    let written = Gallery::export(&dir, &snapshot).await?;
    let names = written
        .iter()
        .map(|e| return e.file_name().unwrap().to_string_lossy().to_string())
        .collect::<Vec<String>>();

    assert_eq!(names, vec!["01-spaghetti-carbonara.png", "03-tiramisù.jpg"]);
    assert_eq!(tokio::fs::read(&written[0]).await?, png);
    assert_eq!(tokio::fs::read(&written[1]).await?, b"jpeg".to_vec());

    tokio::fs::remove_dir_all(&dir).await?;
    return Ok(());
}

#[tokio::test]
async fn it_skips_corrupt_image_data() -> Result<()> {
    let dir = env::temp_dir().join(format!("menuviz-{}", Uuid::new_v4()));
    let snapshot = Snapshot {
        items: vec![
            ItemView {
                item: MenuItem::new("Soup"),
                status: ItemStatus::Succeeded(GeneratedImage::new("image/jpeg", "not base64!")),
            },
            ItemView {
                item: MenuItem::new("Bread"),
                status: ItemStatus::Succeeded(GeneratedImage::new(
                    "image/jpeg",
                    &STANDARD.encode(b"bread"),
                )),
            },
        ],
        ..Snapshot::default()
    };

    let written = Gallery::export(&dir, &snapshot).await?;
    assert_eq!(written, vec![dir.join("02-bread.jpg")]);
    assert_eq!(tokio::fs::read(&written[0]).await?, b"bread".to_vec());

    tokio::fs::remove_dir_all(&dir).await?;
    return Ok(());
}
