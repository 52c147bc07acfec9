//! Image generation port

use async_trait::async_trait;

use crate::domain::value_objects::{AssetRef, Genre};

const NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted, deformed, disfigured, bad anatomy, extra limbs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePurpose {
    Portrait,
    Scene,
}

/// An image request with the stylistic framing for its purpose already applied
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub purpose: ImagePurpose,
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
}

impl ImageRequest {
    /// Forward-facing, dramatically lit upper body shot
    pub fn portrait(character_description: &str, genre: Genre) -> Self {
        Self {
            purpose: ImagePurpose::Portrait,
            prompt: format!(
                "professional portrait photograph, upper body shot facing forward, \
                 {} character portrait style of {}, photorealistic, dramatic lighting, \
                 direct eye contact with viewer, detailed face, cinematic quality, 4k, high resolution",
                genre.as_str(),
                character_description.trim()
            ),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
            width: 1024,
            height: 1024,
            steps: 30,
        }
    }

    /// Wide atmospheric establishing shot
    pub fn scene(scene_description: &str) -> Self {
        Self {
            purpose: ImagePurpose::Scene,
            prompt: format!(
                "cinematic high-quality scene of {}, atmospheric and dramatic, \
                 suitable for movie scene, wide shot, 4k, high resolution",
                scene_description.trim()
            ),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
            width: 1024,
            height: 1024,
            steps: 20,
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.purpose == ImagePurpose::Portrait
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ImageGenerationError {
    #[error("Image generation failed: {0}")]
    GenerationFailed(String),
    #[error("Image service returned no image")]
    EmptyResult,
    #[error("Secret {0} not found")]
    MissingCredential(String),
}

/// Port for the image generation service
#[async_trait]
pub trait ImageGenerationPort: Send + Sync {
    async fn generate_image(&self, request: ImageRequest) -> Result<AssetRef, ImageGenerationError>;
}
