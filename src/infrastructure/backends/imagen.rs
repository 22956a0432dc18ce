#[cfg(test)]
#[path = "imagen_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::gemini::health_check_model;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::GeneratedImage;
use crate::domain::models::GenerationPrompt;
use crate::domain::models::ImageGenerator;
use crate::domain::models::MenuError;
use crate::domain::models::MenuItem;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Instance {
    prompt: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    sample_count: u32,
    aspect_ratio: String,
    output_options: OutputOptions,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: String,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

pub struct Imagen {
    url: String,
    token: String,
    model: String,
    timeout: String,
}

impl Default for Imagen {
    fn default() -> Imagen {
        return Imagen {
            url: Config::get(ConfigKey::GeminiURL),
            token: Config::get(ConfigKey::GeminiToken),
            model: Config::get(ConfigKey::ImageModel),
            timeout: Config::get(ConfigKey::HealthCheckTimeout),
        };
    }
}

#[async_trait]
impl ImageGenerator for Imagen {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        return health_check_model(&self.url, &self.token, &self.model, &self.timeout).await;
    }

    #[allow(clippy::implicit_return)]
    async fn generate(&self, item: &MenuItem) -> Result<GeneratedImage> {
        let prompt = GenerationPrompt::from_item(item);
        let req = PredictRequest {
            instances: vec![Instance {
                prompt: prompt.text,
            }],
            parameters: Parameters {
                sample_count: 1,
                aspect_ratio: "1:1".to_string(),
                output_options: OutputOptions {
                    mime_type: "image/jpeg".to_string(),
                },
            },
        };

        tracing::debug!(model = self.model, dish = item.name, "Requesting dish image");
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1beta/models/{model}:predict?key={key}",
                url = self.url,
                model = self.model,
                key = self.token,
            ))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                dish = item.name,
                "Failed to make image request to Imagen"
            );
            bail!(format!(
                "Failed to make image request to Imagen, {}",
                res.status().as_u16()
            ));
        }

        let prediction = res
            .json::<PredictResponse>()
            .await?
            .predictions
            .into_iter()
            .find(|e| return !e.bytes_base64_encoded.is_empty());

        match prediction {
            Some(prediction) => {
                return Ok(GeneratedImage::new(
                    prediction.mime_type.as_deref().unwrap_or("image/jpeg"),
                    &prediction.bytes_base64_encoded,
                ));
            }
            None => {
                bail!(MenuError::NoImageGenerated {
                    dish: item.name.to_string()
                });
            }
        }
    }
}
