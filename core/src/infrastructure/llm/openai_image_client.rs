use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        common::{ImageConfig, LLMConfig, entities::app_errors::CoreError},
        recipe::ports::ImageClient,
    },
    infrastructure::llm::{endpoint, openai_http_client, post_json},
};

#[derive(Debug, Clone)]
pub struct OpenAIImageClient {
    client: Client,
    url: String,
    model: String,
    size: String,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

impl ImageData {
    /// Hosted URL when present, otherwise the inline image as a data URL.
    fn into_url(self) -> Option<String> {
        self.url
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                self.b64_json
                    .filter(|data| !data.is_empty())
                    .map(|data| format!("data:image/png;base64,{}", data))
            })
    }
}

impl OpenAIImageClient {
    pub fn new(llm: &LLMConfig, image: &ImageConfig) -> Result<Self, CoreError> {
        Ok(Self {
            client: openai_http_client(&llm.api_key, llm.timeout)?,
            url: endpoint(&llm.base_url, "images/generations"),
            model: image.model.clone(),
            size: image.size.clone(),
        })
    }
}

impl ImageClient for OpenAIImageClient {
    async fn generate(&self, prompt: String) -> Result<String, CoreError> {
        let request = ImageGenerationRequest {
            model: &self.model,
            prompt: &prompt,
            n: 1,
            size: &self.size,
        };

        let response: ImageGenerationResponse =
            post_json(&self.client, &self.url, &request, "Image").await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(ImageData::into_url)
            .ok_or_else(|| {
                tracing::error!("Image API returned no image");
                CoreError::ExternalServiceError("No image from image API".to_string())
            })
    }
}
