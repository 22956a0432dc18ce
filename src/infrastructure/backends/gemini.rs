#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Extractor;
use crate::domain::models::MenuError;
use crate::domain::models::MenuImage;
use crate::domain::models::MenuItem;
use crate::domain::models::EXTRACTION_PROMPT;
use crate::domain::services::parse_menu_items;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentPartsBlob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ContentParts {
    Text(String),
    InlineData(ContentPartsBlob),
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<ContentParts>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ResponseContent,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        return self
            .candidates
            .first()
            .map(|e| {
                return e
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| return part.text.clone())
                    .collect::<Vec<String>>()
                    .join("");
            })
            .unwrap_or_default();
    }
}

pub struct Gemini {
    url: String,
    token: String,
    model: String,
    timeout: String,
}

impl Default for Gemini {
    fn default() -> Gemini {
        return Gemini {
            url: Config::get(ConfigKey::GeminiURL),
            token: Config::get(ConfigKey::GeminiToken),
            model: Config::get(ConfigKey::ExtractionModel),
            timeout: Config::get(ConfigKey::HealthCheckTimeout),
        };
    }
}

/// Shared by every Gemini hosted model.
pub async fn health_check_model(url: &str, token: &str, model: &str, timeout: &str) -> Result<()> {
    if url.is_empty() {
        bail!("Gemini URL is not defined");
    }
    if token.is_empty() {
        bail!("Gemini token is not defined, set it with --gemini-token or MENUVIZ_GEMINI_TOKEN");
    }
    if model.is_empty() {
        bail!("Gemini model is not defined");
    }

    let res = reqwest::Client::new()
        .get(format!("{url}/v1beta/models/{model}?key={token}"))
        .timeout(Duration::from_millis(timeout.parse::<u64>()?))
        .send()
        .await;

    let status = match res {
        Ok(res) => res.status().as_u16(),
        Err(err) => {
            tracing::error!(error = ?err, model = model, "Gemini is not reachable");
            bail!("Gemini is not reachable");
        }
    };

    if status >= 400 {
        tracing::error!(status = status, model = model, "Gemini health check failed");
        bail!(format!("Gemini health check failed for model {model}"));
    }

    return Ok(());
}

#[async_trait]
impl Extractor for Gemini {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        return health_check_model(&self.url, &self.token, &self.model, &self.timeout).await;
    }

    #[allow(clippy::implicit_return)]
    async fn extract(&self, image: &MenuImage) -> Result<Vec<MenuItem>> {
        let req = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    ContentParts::InlineData(ContentPartsBlob {
                        mime_type: image.mime_type.to_string(),
                        data: image.base64(),
                    }),
                    ContentParts::Text(EXTRACTION_PROMPT.to_string()),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        tracing::debug!(model = self.model, image = ?image, "Requesting menu extraction");
        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1beta/models/{model}:generateContent?key={key}",
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
                "Failed to make extraction request to Gemini"
            );
            bail!(format!(
                "Failed to make extraction request to Gemini, {}",
                res.status().as_u16()
            ));
        }

        let text = res.json::<GenerateContentResponse>().await?.text();
        if text.trim().is_empty() {
            tracing::error!("Gemini returned no text for the menu");
            bail!(MenuError::UnparseableMenu);
        }

        return parse_menu_items(&text);
    }
}
