//! Fal REST client for image generation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{
    ImageGenerationError, ImageGenerationPort, ImageRequest, SecretPort,
};
use crate::domain::value_objects::AssetRef;
use crate::infrastructure::secrets::FAL_KEY;

/// Client for Fal's stable diffusion generation endpoint
pub struct FalImageClient {
    client: Client,
    base_url: String,
    model: String,
    secrets: Arc<dyn SecretPort>,
}

impl FalImageClient {
    pub fn new(base_url: &str, model: &str, secrets: Arc<dyn SecretPort>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            secrets,
        }
    }
}

#[async_trait]
impl ImageGenerationPort for FalImageClient {
    async fn generate_image(&self, request: ImageRequest) -> Result<AssetRef, ImageGenerationError> {
        let key = self
            .secrets
            .get_secret(FAL_KEY)
            .await
            .map_err(|_| ImageGenerationError::MissingCredential(FAL_KEY.to_string()))?;

        let payload = FalGenerationRequest::from_request(&self.model, &request);
        tracing::debug!(portrait = request.is_portrait(), steps = payload.steps, "Requesting image");

        let response = self
            .client
            .post(format!("{}/api/v1/generation/{}", self.base_url, self.model))
            .header("Authorization", format!("Key {}", key))
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ImageGenerationError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImageGenerationError::GenerationFailed(e.to_string()))?;
        if !status.is_success() {
            return Err(ImageGenerationError::GenerationFailed(format!(
                "Fal API error ({}): {}",
                status, body
            )));
        }

        let parsed: FalGenerationResponse = serde_json::from_str(&body)
            .map_err(|e| ImageGenerationError::GenerationFailed(e.to_string()))?;
        parsed.first_url().map(AssetRef::new)
    }
}

#[derive(Debug, Serialize)]
struct FalGenerationRequest {
    model: String,
    prompt: String,
    negative_prompt: String,
    width: u32,
    height: u32,
    steps: u32,
}

impl FalGenerationRequest {
    fn from_request(model: &str, request: &ImageRequest) -> Self {
        Self {
            model: model.to_string(),
            prompt: request.prompt.clone(),
            negative_prompt: request.negative_prompt.clone(),
            width: request.width,
            height: request.height,
            steps: request.steps,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FalGenerationResponse {
    #[serde(default)]
    images: Vec<FalImage>,
}

#[derive(Debug, Deserialize)]
struct FalImage {
    #[serde(default)]
    url: Option<String>,
}

impl FalGenerationResponse {
    fn first_url(self) -> Result<String, ImageGenerationError> {
        self.images
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or(ImageGenerationError::EmptyResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Genre;

    #[test]
    fn test_payload_carries_framing() {
        let request = ImageRequest::portrait("a masked thief", Genre::Mystery);
        let payload = FalGenerationRequest::from_request("stable-diffusion-xl", &request);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["steps"], 30);
        assert_eq!(json["width"], 1024);
        assert_eq!(json["model"], "stable-diffusion-xl");
        assert!(json["negative_prompt"].as_str().unwrap().contains("extra limbs"));
    }

    #[test]
    fn test_first_image_url_is_used() {
        let response: FalGenerationResponse = serde_json::from_str(
            r#"{"images": [{"url": "https://fal.media/a.png"}, {"url": "https://fal.media/b.png"}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_url().unwrap(), "https://fal.media/a.png");

        let empty: FalGenerationResponse = serde_json::from_str(r#"{"images": []}"#).unwrap();
        assert!(matches!(empty.first_url(), Err(ImageGenerationError::EmptyResult)));
    }
}
