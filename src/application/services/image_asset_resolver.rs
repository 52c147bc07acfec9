//! Image Asset Resolver
//!
//! Decides whether backgrounds and portraits are generated or reused.

use std::sync::Arc;

use crate::application::ports::outbound::{ImageGenerationError, ImageGenerationPort, ImageRequest};
use crate::domain::value_objects::{AssetRef, Genre};

pub struct ImageAssetResolver<I: ImageGenerationPort + ?Sized> {
    images: Arc<I>,
}

impl<I: ImageGenerationPort + ?Sized> ImageAssetResolver<I> {
    pub fn new(images: Arc<I>) -> Self {
        Self { images }
    }

    /// Generate a background only for a new location or the first scene
    pub async fn resolve_background(
        &self,
        scene_description: &str,
        location_changed: bool,
        persisted: Option<&AssetRef>,
    ) -> Result<AssetRef, ImageGenerationError> {
        match persisted {
            Some(background) if !location_changed => {
                tracing::debug!("Reusing background {}", background);
                Ok(background.clone())
            }
            _ => {
                tracing::info!("Generating background for: {}", scene_description);
                self.images
                    .generate_image(ImageRequest::scene(scene_description))
                    .await
            }
        }
    }

    /// Portrait for a newly introduced identity
    ///
    /// Known identities keep their portrait and never reach this point.
    pub async fn resolve_portrait(
        &self,
        character_description: &str,
        genre: Genre,
    ) -> Result<AssetRef, ImageGenerationError> {
        tracing::info!("Generating portrait for: {}", character_description);
        self.images
            .generate_image(ImageRequest::portrait(character_description, genre))
            .await
    }
}
