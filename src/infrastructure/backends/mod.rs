pub mod gemini;
pub mod imagen;

use std::sync::Arc;

use crate::domain::models::ExtractorBox;
use crate::domain::models::ImageGeneratorBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get_extractor() -> ExtractorBox {
        return Arc::<gemini::Gemini>::default();
    }

    pub fn get_image_generator() -> ImageGeneratorBox {
        return Arc::<imagen::Imagen>::default();
    }
}
