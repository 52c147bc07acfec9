//! Prompt building functions for text generation requests

use crate::application::dto::{SceneRequestContext, ScenePayload};
use crate::application::services::plot_supervisor::PlotSnapshot;
use crate::domain::entities::Scene;

/// System instruction constraining scene output to a single JSON object
pub fn build_scene_system_prompt() -> String {
    let mut prompt = String::new();

    prompt.push_str("You are the narrator of an interactive cinematic story. ");
    prompt.push_str("You write one scene at a time and the player decides what happens next.\n\n");

    prompt.push_str("RESPONSE FORMAT:\n");
    prompt.push_str("Respond with a single JSON object and nothing else. No prose, no markdown.\n");
    prompt.push_str("{\n");
    prompt.push_str("  \"background\": \"vivid description of the physical setting\",\n");
    prompt.push_str("  \"character\": {\"name\": \"...\", \"gender\": \"male|female\", \"description\": \"appearance\", \"dialogue\": \"what they say\"},\n");
    prompt.push_str("  \"otherCharacters\": [{\"name\": \"...\", \"gender\": \"male|female\", \"description\": \"...\", \"dialogue\": \"...\"}],\n");
    prompt.push_str("  \"choices\": [\"first option\", \"second option\", \"third option\"]\n");
    prompt.push_str("}\n\n");

    prompt.push_str("RULES:\n");
    prompt.push_str("- \"character\" is the main character and speaks directly to the player.\n");
    prompt.push_str("- \"otherCharacters\" is optional; omit it when nobody else speaks.\n");
    prompt.push_str("- Dialogue is at most three sentences.\n");
    prompt.push_str("- Offer two to four short choices written from the player's point of view.\n");
    prompt.push_str("- Stay in the same location unless the player and the character agree to go somewhere else.\n");

    prompt
}

/// User prompt carrying genre, previous scene, choice and continuity context
pub fn build_scene_user_prompt(context: &SceneRequestContext) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("GENRE: {}\n", context.genre.display_name()));
    prompt.push_str(&format!(
        "STORY PHASE: {} (tension {})\n\n",
        context.phase, context.tension
    ));

    match &context.previous_scene {
        None => {
            prompt.push_str("This is the opening scene. Introduce the main character ");
            prompt.push_str("and the situation the player is in.\n\n");
        }
        Some(previous) => {
            prompt.push_str("PREVIOUS SCENE:\n");
            prompt.push_str(&describe_scene(previous));
            prompt.push('\n');
        }
    }

    if let Some(choice) = &context.choice {
        prompt.push_str(&format!("Player chose: \"{}\"\n\n", choice));
    }

    if let Some(main) = &context.main_character {
        prompt.push_str("MAIN CHARACTER (must stay the same person):\n");
        prompt.push_str(&format!(
            "Name: {}\nGender: {}\nAppearance: {}\n",
            main.name,
            main.gender.as_str(),
            main.description
        ));
        prompt.push_str("Use exactly this name and gender for \"character\".\n\n");
    }

    let supporting: Vec<_> = context.known_characters.iter().skip(1).collect();
    if !supporting.is_empty() {
        prompt.push_str("OTHER KNOWN CHARACTERS (reuse the same names if they appear):\n");
        for character in supporting {
            prompt.push_str(&format!(
                "- {} ({}): {}\n",
                character.name,
                character.gender.as_str(),
                character.description
            ));
        }
        prompt.push('\n');
    }

    if let Some(setting) = &context.background_description {
        prompt.push_str(&format!("CURRENT LOCATION: {}\n\n", setting));
    }

    if !context.recent_events.is_empty() {
        prompt.push_str("RECENT EVENTS:\n");
        for event in &context.recent_events {
            prompt.push_str(&format!(
                "- [{}] {} -> {}\n",
                event.kind.as_str(),
                event.description,
                event.consequence
            ));
        }
        prompt.push('\n');
    }

    if let Some(direction) = &context.direction {
        if !direction.suggestions.is_empty() {
            prompt.push_str("PLOT DIRECTION:\n");
            for suggestion in &direction.suggestions {
                prompt.push_str(&format!("- {}\n", suggestion));
            }
        }
        if !direction.required_characters.is_empty() {
            prompt.push_str(&format!(
                "Characters who should appear: {}\n",
                direction.required_characters.join(", ")
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str("Write the next scene as JSON.");
    prompt
}

/// Yes/no classification of whether the story moved somewhere else
pub fn build_location_change_prompt(
    previous: &Scene,
    choice: Option<&str>,
    candidate: &ScenePayload,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("Decide whether the story has moved to a different physical location.\n\n");
    prompt.push_str(&format!("PREVIOUS SETTING: {}\n", previous.description));
    if let Some(line) = previous.main_character().map(|c| c.dialogue.as_str()) {
        prompt.push_str(&format!("PREVIOUS DIALOGUE: {}\n", line));
    }
    prompt.push_str(&format!(
        "PLAYER CHOICE: {}\n",
        choice.unwrap_or("(none)")
    ));
    prompt.push_str(&format!("NEW SETTING: {}\n", candidate.background));
    if let Some(main) = candidate.characters.first() {
        prompt.push_str(&format!("NEW DIALOGUE: {}\n", main.dialogue));
    }

    prompt.push_str("\nAnswer true only if the player's choice and the character's dialogue ");
    prompt.push_str("both clearly agree to travel somewhere else. ");
    prompt.push_str("A change described only in the narration does not count.\n");
    prompt.push_str("Respond with exactly one word: true or false.");

    prompt
}

/// Plot analysis request over the recent history of the story
pub fn build_plot_analysis_prompt(snapshot: &PlotSnapshot) -> String {
    let mut prompt = String::new();

    prompt.push_str("You supervise the plot of an interactive story. ");
    prompt.push_str("Analyze its progress and decide whether it should end.\n\n");

    prompt.push_str(&format!("GENRE: {}\n", snapshot.genre.display_name()));
    prompt.push_str(&format!("CURRENT PHASE: {}\n", snapshot.phase));
    prompt.push_str(&format!("CURRENT TENSION: {}\n", snapshot.tension));
    prompt.push_str(&format!("SCENES PLAYED: {}\n", snapshot.scene_count));
    if !snapshot.themes.is_empty() {
        prompt.push_str(&format!("THEMES: {}\n", snapshot.themes.join(", ")));
    }
    prompt.push('\n');

    if !snapshot.characters.is_empty() {
        prompt.push_str("CHARACTERS:\n");
        for character in &snapshot.characters {
            prompt.push_str(&format!("- {}: \"{}\"\n", character.name, character.dialogue));
        }
        prompt.push('\n');
    }

    if !snapshot.character_states.is_empty() {
        prompt.push_str("CHARACTER STATES (mood and trust -10..10, health 0..100):\n");
        for state in &snapshot.character_states {
            prompt.push_str(&format!(
                "- {}: mood {}, trust {}, health {}",
                state.name, state.stats.mood, state.stats.trust, state.stats.health
            ));
            if !state.relationships.is_empty() {
                let relationships: Vec<String> = state
                    .relationships
                    .iter()
                    .map(|r| format!("{} ({} {})", r.with, r.kind.as_str(), r.level))
                    .collect();
                prompt.push_str(&format!("; relationships: {}", relationships.join(", ")));
            }
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    if !snapshot.recent_events.is_empty() {
        prompt.push_str("RECENT EVENTS (oldest first):\n");
        for event in &snapshot.recent_events {
            prompt.push_str(&format!(
                "- [{} severity {}] {} -> {}\n",
                event.kind.as_str(),
                event.severity,
                event.description,
                event.consequence
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str("Phases in order: introduction, rising_action, climax, falling_action, resolution.\n");
    prompt.push_str("End the story only when its central conflict is resolved or the player has clearly failed.\n\n");
    prompt.push_str("Respond with a single JSON object:\n");
    prompt.push_str("{\"shouldEndStory\": bool, \"endReason\": \"third-person sentence about the protagonist\", ");
    prompt.push_str("\"endingType\": \"success|failure\", \"achievement\": \"short title or null\", ");
    prompt.push_str("\"suggestedTension\": 0-100, \"suggestedPhase\": \"...\", ");
    prompt.push_str("\"plotSuggestions\": [\"...\"], \"requiredCharacters\": [\"...\"], ");
    prompt.push_str("\"themes\": [\"...\"], ");
    prompt.push_str("\"characterUpdates\": [{\"name\": \"...\", \"mood\": -10..10, \"trust\": -10..10, \"health\": 0-100, ");
    prompt.push_str("\"relationships\": [{\"with\": \"...\", \"type\": \"friend|enemy|neutral|romantic\", \"level\": -10..10}]}]}");

    prompt
}

fn describe_scene(scene: &Scene) -> String {
    let mut text = format!("Setting: {}\n", scene.description);
    for character in &scene.characters {
        text.push_str(&format!("{}: \"{}\"\n", character.name, character.dialogue));
    }
    if !scene.choices.is_empty() {
        text.push_str(&format!("Choices offered: {}\n", scene.choices.join(" | ")));
    }
    text
}
