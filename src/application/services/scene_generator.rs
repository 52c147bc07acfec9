//! Scene Generator - Builds the next scene from the story so far
//!
//! One call produces a complete scene or an error; nothing half-built is
//! ever returned. Steps:
//!
//! - prompt the text model with genre, previous scene, choice and continuity
//! - validate the JSON reply
//! - ask the location detector whether the setting moved
//! - resolve background and portraits, reusing established assets
//! - pin established identities and assign voices

use std::sync::Arc;

use crate::application::dto::{CharacterDraft, SceneRequestContext, ScenePayload};
use crate::application::ports::outbound::{ChatMessage, ImageGenerationPort, LlmPort, LlmRequest};
use crate::application::services::error::StoryError;
use crate::application::services::image_asset_resolver::ImageAssetResolver;
use crate::application::services::llm::prompt_builder::{
    build_scene_system_prompt, build_scene_user_prompt,
};
use crate::application::services::location_change_detector::LocationChangeDetector;
use crate::domain::entities::{Character, Scene};
use crate::domain::value_objects::VoiceAssignment;

/// A fully built scene, not yet committed to any session
#[derive(Debug, Clone)]
pub struct GeneratedScene {
    pub scene: Scene,
    /// Description matching the background image in use
    pub background_description: String,
    pub location_changed: bool,
}

pub struct SceneGenerator<L: LlmPort + ?Sized, I: ImageGenerationPort + ?Sized> {
    llm: Arc<L>,
    detector: LocationChangeDetector<L>,
    assets: ImageAssetResolver<I>,
    voices: VoiceAssignment,
}

impl<L: LlmPort + ?Sized, I: ImageGenerationPort + ?Sized> SceneGenerator<L, I> {
    pub fn new(llm: Arc<L>, images: Arc<I>, voices: VoiceAssignment) -> Self {
        Self {
            detector: LocationChangeDetector::new(Arc::clone(&llm)),
            assets: ImageAssetResolver::new(images),
            llm,
            voices,
        }
    }

    pub async fn generate(&self, context: &SceneRequestContext) -> Result<GeneratedScene, StoryError> {
        let request = LlmRequest::new(vec![ChatMessage::user(build_scene_user_prompt(context))])
            .with_system_prompt(build_scene_system_prompt())
            .with_temperature(0.8);

        let response = self.llm.generate(request).await?;
        let payload = ScenePayload::parse(&response.content).map_err(|e| {
            tracing::warn!("Rejected scene response: {}", e);
            StoryError::from(e)
        })?;

        let location_changed = self
            .detector
            .has_location_changed(
                context.previous_scene.as_ref(),
                context.choice.as_deref(),
                &payload,
            )
            .await;

        let background = self
            .assets
            .resolve_background(
                &payload.background,
                location_changed,
                context.persisted_background.as_ref(),
            )
            .await?;

        let background_description = match &context.background_description {
            Some(description) if !location_changed && context.persisted_background.is_some() => {
                description.clone()
            }
            _ => payload.background.clone(),
        };

        let characters = self.build_characters(context, &payload.characters).await?;

        tracing::info!(
            scene_id = context.next_scene_id,
            location_changed,
            characters = characters.len(),
            "Scene generated"
        );

        let scene = Scene::new(
            context.next_scene_id,
            payload.background,
            background,
            characters,
            payload.choices,
        )
        .with_arrival(context.choice.clone());

        Ok(GeneratedScene {
            scene,
            background_description,
            location_changed,
        })
    }

    /// Main character first, then the rest in the order the model gave them
    async fn build_characters(
        &self,
        context: &SceneRequestContext,
        drafts: &[CharacterDraft],
    ) -> Result<Vec<Character>, StoryError> {
        // The model may rename the main character; its first line is then
        // attributed to the established identity.
        let main_index = context
            .main_character
            .as_ref()
            .and_then(|main| drafts.iter().position(|d| main.is_same_identity(&d.name)))
            .unwrap_or(0);

        let mut characters = Vec::with_capacity(drafts.len());
        let main_draft = &drafts[main_index];
        let main = match &context.main_character {
            Some(main) => main.speaking(main_draft.dialogue.clone()),
            None => self.introduce(context, main_draft).await?,
        };
        characters.push(main);

        for (index, draft) in drafts.iter().enumerate() {
            if index == main_index {
                continue;
            }
            let character = match context.find_known(&draft.name) {
                Some(known) if !known.is_same_identity(&characters[0].name) => {
                    known.speaking(draft.dialogue.clone())
                }
                Some(_) => continue,
                None => self.introduce(context, draft).await?,
            };
            characters.push(character);
        }

        Ok(characters)
    }

    async fn introduce(
        &self,
        context: &SceneRequestContext,
        draft: &CharacterDraft,
    ) -> Result<Character, StoryError> {
        let portrait = self
            .assets
            .resolve_portrait(&draft.portrait_description(), context.genre)
            .await?;
        tracing::debug!(name = %draft.name, gender = draft.gender.as_str(), "Introducing character");

        Ok(Character::new(
            draft.name.clone(),
            draft
                .description
                .clone()
                .unwrap_or_else(|| draft.name.clone()),
            portrait,
            draft.gender,
            self.voices.voice_for(draft.gender),
        )
        .with_dialogue(draft.dialogue.clone()))
    }
}
