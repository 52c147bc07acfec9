//! Plot Supervisor - Pacing and ending decisions
//!
//! Looks at the recent plot history, how the characters feel and the
//! candidate scene, then decides whether the story should end, how tense it
//! is and which phase it is in.
//! Phase and tension suggestions from the model are never trusted as-is:
//! the phase moves at most one step forward and tension is clamped.

use std::sync::Arc;

use crate::application::dto::{CharacterStateAnalysis, PlotAnalysis};
use crate::application::ports::outbound::{ChatMessage, LlmPort, LlmRequest};
use crate::application::services::error::StoryError;
use crate::application::services::llm::prompt_builder::build_plot_analysis_prompt;
use crate::domain::entities::{
    Character, CharacterState, CharacterUpdate, Ending, EndingKind, PlotEvent, Relationship,
    RelationshipKind,
};
use crate::domain::value_objects::{Genre, PlotDirection, StoryPhase, Tension};

const DEFAULT_ENDING_MESSAGE: &str = "The story has reached its end.";

/// What the supervisor sees when it evaluates a scene
#[derive(Debug, Clone)]
pub struct PlotSnapshot {
    pub genre: Genre,
    pub phase: StoryPhase,
    pub tension: Tension,
    pub scene_count: usize,
    pub characters: Vec<Character>,
    pub character_states: Vec<CharacterState>,
    pub themes: Vec<String>,
    pub recent_events: Vec<PlotEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotEvaluation {
    pub ending: Option<Ending>,
    pub suggested_tension: Tension,
    pub suggested_phase: StoryPhase,
    pub direction: PlotDirection,
    pub character_updates: Vec<CharacterUpdate>,
    /// Replacement themes, if the model named any
    pub themes: Option<Vec<String>>,
}

impl PlotEvaluation {
    pub fn should_end(&self) -> bool {
        self.ending.is_some()
    }
}

pub struct PlotSupervisor<L: LlmPort + ?Sized> {
    llm: Arc<L>,
}

impl<L: LlmPort + ?Sized> PlotSupervisor<L> {
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    pub async fn evaluate(&self, snapshot: &PlotSnapshot) -> Result<PlotEvaluation, StoryError> {
        let request = LlmRequest::new(vec![ChatMessage::user(build_plot_analysis_prompt(snapshot))])
            .with_system_prompt("You are a story analyst. Respond with JSON only.")
            .with_temperature(0.3);

        let response = self.llm.generate(request).await?;
        let analysis = PlotAnalysis::parse(&response.content)?;
        let evaluation = interpret(snapshot, analysis);

        tracing::debug!(
            phase = %evaluation.suggested_phase,
            tension = evaluation.suggested_tension.value(),
            should_end = evaluation.should_end(),
            "Plot evaluated"
        );
        Ok(evaluation)
    }
}

fn interpret(snapshot: &PlotSnapshot, analysis: PlotAnalysis) -> PlotEvaluation {
    let suggested_phase = analysis
        .suggested_phase
        .as_deref()
        .and_then(|phase| phase.parse::<StoryPhase>().ok())
        .map(|phase| snapshot.phase.advance_toward(phase))
        .unwrap_or(snapshot.phase);

    let suggested_tension = analysis
        .suggested_tension
        .filter(|t| t.is_finite())
        .map(|t| Tension::new(t.round() as i64))
        .unwrap_or(snapshot.tension);

    let ending = analysis.should_end_story.then(|| {
        let kind = match analysis.ending_type.as_deref().map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("success") => EndingKind::Success,
            Some(t) if t.eq_ignore_ascii_case("failure") => EndingKind::Failure,
            _ if suggested_phase.is_late() => EndingKind::Success,
            _ => EndingKind::Failure,
        };
        let message = analysis
            .end_reason
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ENDING_MESSAGE);
        let ending = Ending::new(kind, message);
        match analysis.achievement {
            Some(achievement) => ending.with_achievement(achievement),
            None => ending,
        }
    });

    let character_updates = analysis
        .character_updates
        .iter()
        .filter_map(character_update)
        .collect();

    PlotEvaluation {
        ending,
        suggested_tension,
        suggested_phase,
        direction: PlotDirection {
            suggestions: analysis.plot_suggestions,
            required_characters: analysis.required_characters,
        },
        character_updates,
        themes: analysis.themes,
    }
}

fn character_update(analysis: &CharacterStateAnalysis) -> Option<CharacterUpdate> {
    let name = analysis.name.trim();
    if name.is_empty() {
        return None;
    }
    let whole = |value: Option<f64>| value.filter(|v| v.is_finite()).map(|v| v.round() as i64);

    Some(CharacterUpdate {
        name: name.to_string(),
        health: whole(analysis.health),
        mood: whole(analysis.mood),
        trust: whole(analysis.trust),
        relationships: analysis
            .relationships
            .iter()
            .filter(|r| !r.with.trim().is_empty())
            .map(|r| {
                Relationship::new(
                    r.with.trim(),
                    r.kind
                        .as_deref()
                        .map(RelationshipKind::from_label)
                        .unwrap_or_default(),
                    whole(r.level).unwrap_or(0),
                )
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{ending_analysis, ScriptedLlm};

    fn snapshot(phase: StoryPhase, tension: i64) -> PlotSnapshot {
        PlotSnapshot {
            genre: Genre::Horror,
            phase,
            tension: Tension::new(tension),
            scene_count: 4,
            characters: vec![],
            character_states: vec![],
            themes: vec![],
            recent_events: vec![],
        }
    }

    #[test]
    fn test_phase_never_regresses_or_skips() {
        let analysis = PlotAnalysis {
            suggested_phase: Some("resolution".to_string()),
            ..PlotAnalysis::default()
        };
        let evaluation = interpret(&snapshot(StoryPhase::RisingAction, 10), analysis);
        assert_eq!(evaluation.suggested_phase, StoryPhase::Climax);

        let analysis = PlotAnalysis {
            suggested_phase: Some("introduction".to_string()),
            ..PlotAnalysis::default()
        };
        let evaluation = interpret(&snapshot(StoryPhase::Climax, 10), analysis);
        assert_eq!(evaluation.suggested_phase, StoryPhase::Climax);
    }

    #[test]
    fn test_unknown_phase_holds_and_tension_is_clamped() {
        let analysis = PlotAnalysis {
            suggested_phase: Some("denouement".to_string()),
            suggested_tension: Some(250.0),
            ..PlotAnalysis::default()
        };
        let evaluation = interpret(&snapshot(StoryPhase::Introduction, 10), analysis);
        assert_eq!(evaluation.suggested_phase, StoryPhase::Introduction);
        assert_eq!(evaluation.suggested_tension.value(), 100);
        assert!(!evaluation.should_end());
    }

    #[test]
    fn test_ending_kind_falls_back_to_phase() {
        let analysis = PlotAnalysis {
            should_end_story: true,
            ..PlotAnalysis::default()
        };
        let early = interpret(&snapshot(StoryPhase::Introduction, 10), analysis.clone());
        assert_eq!(early.ending.unwrap().kind, EndingKind::Failure);

        let late = interpret(&snapshot(StoryPhase::FallingAction, 10), analysis);
        let ending = late.ending.unwrap();
        assert_eq!(ending.kind, EndingKind::Success);
        assert_eq!(ending.message, DEFAULT_ENDING_MESSAGE);
    }

    #[test]
    fn test_character_updates_are_rounded_and_nameless_ones_dropped() {
        let analysis = PlotAnalysis::parse(
            r#"{"themes": ["trust"], "characterUpdates": [
                {"name": " Alice ", "mood": 2.6,
                 "relationships": [{"with": "Bob", "type": "lover", "level": 3.2}, {"with": " "}]},
                {"name": "", "mood": 5}
            ]}"#,
        )
        .unwrap();

        let evaluation = interpret(&snapshot(StoryPhase::Climax, 40), analysis);

        assert_eq!(evaluation.themes, Some(vec!["trust".to_string()]));
        assert_eq!(evaluation.character_updates.len(), 1);
        let alice = &evaluation.character_updates[0];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.mood, Some(3));
        assert_eq!(alice.health, None);
        assert_eq!(alice.trust, None);
        assert_eq!(alice.relationships, vec![Relationship::new("Bob", RelationshipKind::Romantic, 3)]);
    }

    #[tokio::test]
    async fn test_evaluate_reads_model_analysis() {
        let llm = Arc::new(ScriptedLlm::new([ending_analysis(
            "success",
            "Mara's courage drove the spirit away",
        )]));
        let supervisor = PlotSupervisor::new(llm.clone());

        let evaluation = supervisor.evaluate(&snapshot(StoryPhase::FallingAction, 70)).await.unwrap();

        let ending = evaluation.ending.unwrap();
        assert_eq!(ending.kind, EndingKind::Success);
        assert_eq!(ending.achievement.as_deref(), Some("Survivor"));
        assert_eq!(ending.display_message(), "Your courage drove the spirit away");
        assert_eq!(evaluation.suggested_phase, StoryPhase::Resolution);
        assert!(llm.last_prompt().contains("CURRENT PHASE: falling_action"));
    }

    #[tokio::test]
    async fn test_evaluate_rejects_non_json() {
        let llm = Arc::new(ScriptedLlm::new(["The story should continue."]));
        let supervisor = PlotSupervisor::new(llm);

        let result = supervisor.evaluate(&snapshot(StoryPhase::Climax, 50)).await;
        assert!(matches!(result, Err(StoryError::MalformedResponse(_))));
    }
}
