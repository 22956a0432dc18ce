#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::MenuImage;
use super::MenuItem;

pub const EXTRACTION_PROMPT: &str = r#"You are an expert menu parser. Analyze the provided image of a restaurant menu. Extract all food items, in the order they appear on the menu. Keep every dish name in the language it is written in on the menu. For each item, provide its name, a brief description if available, and its price. Return the data as a JSON array of objects. Each object must have the following keys: "name", "description", "price". If a description is not present for an item, create a short, appealing description based on the item's name. Ensure the output is only the JSON array. Do not include any other text or markdown.

Example format:
[
  {
    "name": "Classic Burger",
    "description": "A juicy beef patty with lettuce, tomato, and our special sauce.",
    "price": "$12.99"
  }
]"#;

/// Prompt sent to the image generator for a single dish. Built only from the
/// dish's own fields, so the same dish always produces the same prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationPrompt {
    pub text: String,
}

impl GenerationPrompt {
    pub fn from_item(item: &MenuItem) -> GenerationPrompt {
        let mut text = format!(
            "A delicious, high-quality, photorealistic image of {}.",
            item.name
        );

        if let Some(description) = &item.description {
            if !description.trim().is_empty() {
                text += &format!(" {}", description.trim());
            }
        }

        return GenerationPrompt { text };
    }
}

/// A single rendered dish, kept base64 encoded the way it comes off the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl GeneratedImage {
    pub fn new(mime_type: &str, data: &str) -> GeneratedImage {
        return GeneratedImage {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        };
    }

    pub fn data_url(&self) -> String {
        return format!("data:{};base64,{}", self.mime_type, self.data);
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        return Ok(STANDARD.decode(&self.data)?);
    }

    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => return "jpg",
            "image/png" => return "png",
            "image/webp" => return "webp",
            _ => return "img",
        }
    }
}

#[async_trait]
pub trait Extractor {
    /// Used at startup to verify all configurations are available to work with
    /// the extractor.
    async fn health_check(&self) -> Result<()>;

    /// Reads every dish off a menu photo, in the order they appear on the
    /// menu. Failures surface as `MenuError` where the cause is known.
    async fn extract(&self, image: &MenuImage) -> Result<Vec<MenuItem>>;
}

#[async_trait]
pub trait ImageGenerator {
    /// Used at startup to verify all configurations are available to work with
    /// the generator.
    async fn health_check(&self) -> Result<()>;

    /// Renders a single dish. Calls for different dishes are independent and
    /// may run concurrently.
    async fn generate(&self, item: &MenuItem) -> Result<GeneratedImage>;
}

pub type ExtractorBox = Arc<dyn Extractor + Send + Sync>;
pub type ImageGeneratorBox = Arc<dyn ImageGenerator + Send + Sync>;
