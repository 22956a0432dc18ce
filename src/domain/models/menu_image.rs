#[cfg(test)]
#[path = "menu_image_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;

/// What the presentation layer gets to see of the source photo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuImagePreview {
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
}

/// The user supplied menu photo, held in memory for the life of a session.
#[derive(Clone, PartialEq, Eq)]
pub struct MenuImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// Keeps the raw bytes out of debug logs.
impl std::fmt::Debug for MenuImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f
            .debug_struct("MenuImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish();
    }
}

impl MenuImage {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> MenuImage {
        return MenuImage {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        };
    }

    pub async fn load(file_path: &path::Path) -> Result<MenuImage> {
        if !file_path.is_file() {
            bail!(format!("No file found at {}", file_path.display()));
        }

        let bytes = fs::read(file_path).await?;
        let file_name = file_path
            .file_name()
            .map(|e| return e.to_string_lossy().to_string())
            .unwrap_or_default();

        let mime_type = mime_guess::from_path(file_path)
            .first_or_octet_stream()
            .to_string();

        tracing::debug!(
            file_name = file_name,
            mime_type = mime_type,
            size = bytes.len(),
            "Loaded menu image"
        );

        return Ok(MenuImage::new(&file_name, &mime_type, bytes));
    }

    pub fn is_image(&self) -> bool {
        return self.mime_type.starts_with("image/");
    }

    pub fn base64(&self) -> String {
        return STANDARD.encode(&self.bytes);
    }

    pub fn preview(&self) -> MenuImagePreview {
        return MenuImagePreview {
            file_name: self.file_name.to_string(),
            mime_type: self.mime_type.to_string(),
            size: self.bytes.len(),
        };
    }
}
