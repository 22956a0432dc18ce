#[cfg(test)]
#[path = "errors_test.rs"]
mod tests;

use strum::Display;

/// How far an error reaches. Validation errors only re-prompt, extraction
/// errors halt the flow, generation errors stay attached to a single dish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Extraction,
    Generation,
}

/// Every message here is safe to show to the user as is. Raw collaborator
/// errors only ever reach the debug log.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("Please select a valid image file (got {mime}).")]
    InvalidImage { mime: String },

    #[error("Could not understand the menu structure. Please try a clearer image.")]
    UnparseableMenu,

    #[error("No menu items could be found. Please try a different image.")]
    NoItemsFound,

    #[error("The menu could not be read. Please try again.")]
    ExtractionFailed,

    #[error("Reading the menu took too long. Please try again.")]
    ExtractionTimedOut,

    #[error("No image generated for {dish}")]
    NoImageGenerated { dish: String },

    #[error("Could not generate an image for {dish}")]
    GenerationFailed { dish: String },

    #[error("Generating an image for {dish} took too long")]
    GenerationTimedOut { dish: String },
}

impl MenuError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MenuError::InvalidImage { .. } => return ErrorKind::Validation,
            MenuError::UnparseableMenu
            | MenuError::NoItemsFound
            | MenuError::ExtractionFailed
            | MenuError::ExtractionTimedOut => return ErrorKind::Extraction,
            MenuError::NoImageGenerated { .. }
            | MenuError::GenerationFailed { .. }
            | MenuError::GenerationTimedOut { .. } => return ErrorKind::Generation,
        }
    }

    /// Maps whatever the extractor failed with on to a user safe error.
    pub fn from_extraction(err: anyhow::Error) -> MenuError {
        if let Some(menu_err) = err.downcast_ref::<MenuError>() {
            if menu_err.kind() == ErrorKind::Extraction {
                tracing::warn!(error = %menu_err, "Menu extraction failed");
                return menu_err.clone();
            }
        }

        tracing::error!(error = ?err, "Menu extraction failed");
        return MenuError::ExtractionFailed;
    }

    /// Maps whatever the image generator failed with on to a user safe error
    /// for a single dish.
    pub fn from_generation(dish: &str, err: anyhow::Error) -> MenuError {
        if let Some(menu_err) = err.downcast_ref::<MenuError>() {
            if menu_err.kind() == ErrorKind::Generation {
                tracing::warn!(dish = dish, error = %menu_err, "Image generation failed");
                return menu_err.clone();
            }
        }

        tracing::error!(dish = dish, error = ?err, "Image generation failed");
        return MenuError::GenerationFailed {
            dish: dish.to_string(),
        };
    }
}
