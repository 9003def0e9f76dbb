use std::time::Duration;

use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::domain::common::entities::app_errors::CoreError;

pub mod openai_chat_client;
pub mod openai_image_client;

/// HTTP client authenticated against an OpenAI-compatible API.
pub(crate) fn openai_http_client(api_key: &str, timeout: Duration) -> Result<Client, CoreError> {
    if api_key.trim().is_empty() {
        return Err(CoreError::Configuration(
            "missing OpenAI API key".to_string(),
        ));
    }

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
        .map_err(|e| CoreError::Configuration(format!("invalid OpenAI API key: {}", e)))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| {
            CoreError::Configuration(format!("failed to build OpenAI HTTP client: {}", e))
        })
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// POSTs `body` as JSON and decodes the JSON answer. Transport failures,
/// non-success statuses and undecodable bodies are external service errors.
pub(crate) async fn post_json<Req, Res>(
    client: &Client,
    url: &str,
    body: &Req,
    service: &str,
) -> Result<Res, CoreError>
where
    Req: Serialize + ?Sized,
    Res: DeserializeOwned,
{
    let response = client.post(url).json(body).send().await.map_err(|e| {
        tracing::error!("{} request failed: {}", service, e);
        CoreError::ExternalServiceError(format!("{} API error: {}", service, e))
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("{} API error: {} - {}", service, status, error_text);
        return Err(CoreError::ExternalServiceError(format!(
            "{} API returned error: {} - {}",
            service, status, error_text
        )));
    }

    response.json::<Res>().await.map_err(|e| {
        tracing::error!("Failed to parse {} response: {}", service, e);
        CoreError::ExternalServiceError(format!("Failed to parse {} response: {}", service, e))
    })
}
