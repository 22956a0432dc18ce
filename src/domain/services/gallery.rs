#[cfg(test)]
#[path = "gallery_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;

use crate::domain::models::ItemStatus;
use crate::domain::models::Snapshot;

pub struct Gallery {}

/// File name safe version of a dish name.
pub fn slugify(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|e| {
            if e.is_alphanumeric() {
                return e;
            }
            return '-';
        })
        .collect::<String>()
        .split('-')
        .filter(|e| return !e.is_empty())
        .collect::<Vec<&str>>()
        .join("-");

    if slug.is_empty() {
        return "dish".to_string();
    }

    return slug;
}

impl Gallery {
    /// Writes every generated image to `dir` as `<NN>-<slug>.<ext>`, numbered
    /// by menu position. Dishes without an image, or whose image data does
    /// not decode, are skipped.
    pub async fn export(dir: &path::Path, snapshot: &Snapshot) -> Result<Vec<path::PathBuf>> {
        fs::create_dir_all(dir).await?;

        let mut written = vec![];
        for (idx, view) in snapshot.items.iter().enumerate() {
            let image = match &view.status {
                ItemStatus::Succeeded(image) => image,
                _ => continue,
            };

            let bytes = match image.bytes() {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(dish = view.item.name, error = %err, "Skipping undecodable dish image");
                    continue;
                }
            };

            let file_path = dir.join(format!(
                "{:02}-{}.{}",
                idx + 1,
                slugify(&view.item.name),
                image.extension()
            ));
            fs::write(&file_path, bytes).await?;
            tracing::info!(path = ?file_path, dish = view.item.name, "Exported dish image");

            written.push(file_path);
        }

        return Ok(written);
    }
}
