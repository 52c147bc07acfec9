//! Story Service - Orchestrates a playthrough
//!
//! The only code that mutates a [`StoryState`]. Each session sits behind its
//! own async mutex, but the lock is never held while a collaborator is
//! awaited: a generation cycle claims the session's single generation slot,
//! snapshots the context, runs unlocked under a timeout and then re-locks to
//! commit. A commit from an earlier epoch (the user restarted meanwhile) is
//! discarded.

use std::sync::Arc;
use std::time::Duration;

use crate::application::dto::SceneRequestContext;
use crate::application::ports::outbound::{
    ImageGenerationPort, LlmPort, RecordedAudio, SessionStorePort, SharedStory, SpeechAudio,
    SpeechToTextPort, TextToSpeechPort,
};
use crate::application::services::error::StoryError;
use crate::application::services::plot_supervisor::{PlotEvaluation, PlotSnapshot, PlotSupervisor};
use crate::application::services::scene_generator::{GeneratedScene, SceneGenerator};
use crate::domain::entities::{PlotEvent, PlotEventKind, Scene, StoryState};
use crate::domain::value_objects::{Genre, SessionId, VoiceAssignment, VoiceId};

const CHOICE_SEVERITY: u8 = 3;
const DIALOGUE_SEVERITY: u8 = 1;

/// Tunables for story orchestration
#[derive(Debug, Clone)]
pub struct StorySettings {
    /// Upper bound on one generation cycle, including plot evaluation
    pub generation_timeout: Duration,
    pub plot_supervisor_enabled: bool,
    /// How many recent plot events are fed back into prompts
    pub history_window: usize,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(120),
            plot_supervisor_enabled: true,
            history_window: 5,
        }
    }
}

/// External collaborators the story service drives
pub struct StoryPorts {
    pub sessions: Arc<dyn SessionStorePort>,
    pub llm: Arc<dyn LlmPort>,
    pub images: Arc<dyn ImageGenerationPort>,
    pub text_to_speech: Arc<dyn TextToSpeechPort>,
    pub speech_to_text: Arc<dyn SpeechToTextPort>,
}

/// Result of one unlocked generation cycle
struct Cycle {
    generated: GeneratedScene,
    events: Vec<PlotEvent>,
    evaluation: Option<PlotEvaluation>,
}

pub struct StoryService {
    sessions: Arc<dyn SessionStorePort>,
    generator: SceneGenerator<dyn LlmPort, dyn ImageGenerationPort>,
    supervisor: Option<PlotSupervisor<dyn LlmPort>>,
    text_to_speech: Arc<dyn TextToSpeechPort>,
    speech_to_text: Arc<dyn SpeechToTextPort>,
    voices: VoiceAssignment,
    settings: StorySettings,
}

impl StoryService {
    pub fn new(ports: StoryPorts, voices: VoiceAssignment, settings: StorySettings) -> Self {
        let supervisor = settings
            .plot_supervisor_enabled
            .then(|| PlotSupervisor::new(Arc::clone(&ports.llm)));
        Self {
            sessions: ports.sessions,
            generator: SceneGenerator::new(ports.llm, ports.images, voices.clone()),
            supervisor,
            text_to_speech: ports.text_to_speech,
            speech_to_text: ports.speech_to_text,
            voices,
            settings,
        }
    }

    /// Create a session and generate its opening scene
    ///
    /// A missing genre picks one at random. If the opening scene cannot be
    /// generated the session is discarded.
    pub async fn start_session(&self, genre: Option<Genre>) -> Result<(SessionId, Scene), StoryError> {
        let genre = genre.unwrap_or_else(Genre::random);
        let (session_id, shared) = self.sessions.insert(StoryState::with_genre(genre)).await;
        tracing::info!(session_id = %session_id, genre = %genre, "Starting story session");

        match self.advance(session_id, &shared, None).await {
            Ok(scene) => Ok((session_id, scene)),
            Err(e) => {
                self.sessions.remove(session_id).await;
                tracing::warn!(session_id = %session_id, "Opening scene failed: {}", e);
                Err(e)
            }
        }
    }

    /// Pick a genre for a session that was restarted and open its story
    pub async fn select_genre(&self, session_id: SessionId, genre: Option<Genre>) -> Result<Scene, StoryError> {
        let shared = self.session(session_id).await?;
        {
            let mut state = shared.lock().await;
            state.select_genre(genre.unwrap_or_else(Genre::random))?;
        }
        self.advance(session_id, &shared, None).await
    }

    pub async fn submit_choice(&self, session_id: SessionId, choice: &str) -> Result<Scene, StoryError> {
        let choice = choice.trim();
        if choice.is_empty() {
            return Err(StoryError::InvalidRequest("choice is empty".to_string()));
        }
        let shared = self.session(session_id).await?;
        self.advance(session_id, &shared, Some(choice.to_string())).await
    }

    /// Voice input is handled exactly like a typed choice
    pub async fn submit_voice_transcript(
        &self,
        session_id: SessionId,
        transcript: &str,
    ) -> Result<Scene, StoryError> {
        if transcript.trim().is_empty() {
            return Err(StoryError::RecordingFailure("nothing was heard".to_string()));
        }
        self.submit_choice(session_id, transcript).await
    }

    /// Transcribe a recording and submit it as the next choice
    ///
    /// The capture slot is held only for the transcription.
    pub async fn submit_recording(
        &self,
        session_id: SessionId,
        audio: RecordedAudio,
    ) -> Result<Scene, StoryError> {
        let shared = self.session(session_id).await?;
        shared.lock().await.begin_recording()?;

        let transcript = if audio.bytes.is_empty() {
            Err(StoryError::RecordingFailure("recording is empty".to_string()))
        } else {
            self.speech_to_text
                .transcribe(audio)
                .await
                .map_err(StoryError::from)
        };
        shared.lock().await.finish_recording();

        let transcript = transcript?;
        tracing::debug!(session_id = %session_id, transcript = %transcript, "Recording transcribed");
        self.submit_voice_transcript(session_id, &transcript).await
    }

    /// Discard the story and return the session to genre selection
    pub async fn restart(&self, session_id: SessionId) -> Result<(), StoryError> {
        let shared = self.session(session_id).await?;
        let mut state = shared.lock().await;
        state.reset();
        tracing::info!(session_id = %session_id, epoch = state.epoch(), "Story restarted");
        Ok(())
    }

    pub async fn end_session(&self, session_id: SessionId) -> Result<(), StoryError> {
        if self.sessions.remove(session_id).await {
            tracing::info!(session_id = %session_id, "Story session ended");
            Ok(())
        } else {
            Err(StoryError::NoActiveStory(session_id.to_string()))
        }
    }

    /// A copy of the session's current state
    pub async fn snapshot(&self, session_id: SessionId) -> Result<StoryState, StoryError> {
        let shared = self.session(session_id).await?;
        let state = shared.lock().await;
        Ok(state.clone())
    }

    pub async fn transcript(&self, session_id: SessionId) -> Result<String, StoryError> {
        let shared = self.session(session_id).await?;
        let state = shared.lock().await;
        Ok(state.transcript())
    }

    /// Speak a character's current line with its assigned voice
    pub async fn narrate(&self, session_id: SessionId, character_index: usize) -> Result<SpeechAudio, StoryError> {
        let shared = self.session(session_id).await?;
        let (text, voice) = {
            let state = shared.lock().await;
            let character = state
                .current_scene()
                .and_then(|scene| scene.characters.get(character_index))
                .ok_or_else(|| {
                    StoryError::InvalidRequest(format!("no character at index {}", character_index))
                })?;
            (character.dialogue.clone(), character.voice_id.clone())
        };
        self.speak(&text, Some(voice)).await
    }

    /// Synthesize arbitrary text, defaulting to the female voice
    pub async fn speak(&self, text: &str, voice: Option<VoiceId>) -> Result<SpeechAudio, StoryError> {
        if text.trim().is_empty() {
            return Err(StoryError::InvalidRequest("text is empty".to_string()));
        }
        let voice = voice.unwrap_or_else(|| self.voices.female_voice().clone());
        Ok(self.text_to_speech.synthesize(text, &voice).await?)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.count().await
    }

    async fn session(&self, session_id: SessionId) -> Result<SharedStory, StoryError> {
        self.sessions
            .get(session_id)
            .await
            .ok_or_else(|| StoryError::NoActiveStory(session_id.to_string()))
    }

    /// One full generation cycle for a session
    async fn advance(
        &self,
        session_id: SessionId,
        shared: &SharedStory,
        choice: Option<String>,
    ) -> Result<Scene, StoryError> {
        let (context, ticket) = {
            let mut state = shared.lock().await;
            let context = SceneRequestContext::from_state(&state, choice, self.settings.history_window)
                .ok_or_else(|| StoryError::NoActiveStory("no genre selected".to_string()))?;
            let ticket = state.begin_generation().map_err(|e| {
                tracing::debug!(session_id = %session_id, "Generation refused: {}", e);
                StoryError::from(e)
            })?;
            (context, ticket)
        };

        tracing::debug!(
            session_id = %session_id,
            epoch = ticket.epoch(),
            scene_id = context.next_scene_id,
            "Generating scene"
        );

        let outcome = tokio::time::timeout(self.settings.generation_timeout, self.run_cycle(&context)).await;

        let mut state = shared.lock().await;
        let cycle = match outcome {
            Ok(Ok(cycle)) => cycle,
            Ok(Err(e)) => {
                if !state.abort_generation(ticket) {
                    tracing::info!(session_id = %session_id, "Ignoring failure of superseded generation: {}", e);
                    return Err(StoryError::Superseded);
                }
                tracing::warn!(session_id = %session_id, "Scene generation failed: {}", e);
                return Err(e);
            }
            Err(_) => {
                if !state.abort_generation(ticket) {
                    tracing::info!(session_id = %session_id, "Superseded generation timed out");
                    return Err(StoryError::Superseded);
                }
                let secs = self.settings.generation_timeout.as_secs();
                tracing::error!(session_id = %session_id, "Scene generation timed out after {}s", secs);
                return Err(StoryError::Timeout(secs));
            }
        };

        let Cycle {
            generated,
            events,
            evaluation,
        } = cycle;
        state
            .commit_scene(ticket, generated.scene, generated.background_description, events)
            .map_err(|e| {
                tracing::info!(session_id = %session_id, "Discarding generated scene: {}", e);
                StoryError::from(e)
            })?;

        if let Some(evaluation) = evaluation {
            state.raise_tension_to(evaluation.suggested_tension);
            state.advance_phase(evaluation.suggested_phase);
            for update in &evaluation.character_updates {
                if !state.apply_character_update(update) {
                    tracing::debug!(session_id = %session_id, name = %update.name, "Ignoring update for unknown character");
                }
            }
            if let Some(themes) = evaluation.themes {
                state.set_themes(themes);
            }
            match evaluation.ending {
                Some(ending) => {
                    if state.conclude(ending) {
                        tracing::info!(session_id = %session_id, "Story reached its ending");
                    }
                }
                None => state.set_direction(evaluation.direction),
            }
        }

        let scene = state
            .current_scene()
            .cloned()
            .ok_or_else(|| StoryError::GenerationFailure("no scene after commit".to_string()))?;
        tracing::info!(
            session_id = %session_id,
            scene_id = scene.id,
            tension = state.tension().value(),
            phase = %state.phase(),
            "Scene committed"
        );
        Ok(scene)
    }

    /// Generation and plot evaluation, with no session lock held
    async fn run_cycle(&self, context: &SceneRequestContext) -> Result<Cycle, StoryError> {
        let generated = self.generator.generate(context).await?;
        let events = scene_events(context.choice.as_deref(), &generated.scene);

        let evaluation = match &self.supervisor {
            Some(supervisor) => {
                let snapshot = plot_snapshot(context, &generated.scene, &events, self.settings.history_window);
                match supervisor.evaluate(&snapshot).await {
                    Ok(evaluation) => Some(evaluation),
                    Err(e) => {
                        tracing::warn!("Plot evaluation skipped: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        Ok(Cycle {
            generated,
            events,
            evaluation,
        })
    }
}

/// Plot events a committed scene contributes
fn scene_events(choice: Option<&str>, scene: &Scene) -> Vec<PlotEvent> {
    let mut events = Vec::new();
    if let Some(choice) = choice {
        events.push(PlotEvent::new(
            PlotEventKind::Decision,
            format!("Player chose \"{}\"", choice),
            scene.description.clone(),
            CHOICE_SEVERITY,
        ));
    }
    if let Some(main) = scene.main_character() {
        events.push(PlotEvent::new(
            PlotEventKind::Dialogue,
            format!("{} said \"{}\"", main.name, main.dialogue),
            format!("Options: {}", scene.choices.join(" | ")),
            DIALOGUE_SEVERITY,
        ));
    }
    events
}

/// The story as it would look once the candidate scene is committed
fn plot_snapshot(
    context: &SceneRequestContext,
    scene: &Scene,
    events: &[PlotEvent],
    history_window: usize,
) -> PlotSnapshot {
    let mut recent_events: Vec<PlotEvent> = context.recent_events.iter().chain(events).cloned().collect();
    let overflow = recent_events.len().saturating_sub(history_window);
    recent_events.drain(..overflow);

    PlotSnapshot {
        genre: context.genre,
        phase: context.phase,
        tension: events.iter().fold(context.tension, |t, e| t.raise(e.severity)),
        scene_count: scene.id as usize,
        characters: scene.characters.clone(),
        character_states: context.character_states.clone(),
        themes: context.themes.clone(),
        recent_events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::LlmError;
    use crate::application::services::test_support::{
        ending_analysis, quiet_analysis, scene_json, MockImages, MockSpeech, ScriptedLlm,
    };
    use crate::domain::entities::EndingKind;
    use crate::domain::value_objects::DEFAULT_FEMALE_VOICE_ID;
    use crate::infrastructure::session::SessionManager;

    struct Harness {
        service: Arc<StoryService>,
        llm: Arc<ScriptedLlm>,
        speech: Arc<MockSpeech>,
    }

    fn harness(llm: ScriptedLlm, speech: MockSpeech, settings: StorySettings) -> Harness {
        let llm = Arc::new(llm);
        let speech = Arc::new(speech);
        let ports = StoryPorts {
            sessions: Arc::new(SessionManager::new()),
            llm: llm.clone(),
            images: Arc::new(MockImages::default()),
            text_to_speech: speech.clone(),
            speech_to_text: speech.clone(),
        };
        Harness {
            service: Arc::new(StoryService::new(ports, VoiceAssignment::default(), settings)),
            llm,
            speech,
        }
    }

    fn without_supervisor() -> StorySettings {
        StorySettings {
            plot_supervisor_enabled: false,
            ..StorySettings::default()
        }
    }

    fn alice(line: &str) -> String {
        scene_json("Alice", "female", line, "An abandoned subway station")
    }

    #[tokio::test]
    async fn test_start_session_opens_first_scene() {
        let h = harness(
            ScriptedLlm::new([alice("Stay close."), quiet_analysis()]),
            MockSpeech::default(),
            StorySettings::default(),
        );

        let (session_id, scene) = h.service.start_session(Some(Genre::Action)).await.unwrap();

        assert_eq!(scene.id, 1);
        assert_eq!(scene.characters[0].name, "Alice");
        assert!(!scene.choices.is_empty());

        let state = h.service.snapshot(session_id).await.unwrap();
        assert_eq!(state.genre(), Some(Genre::Action));
        assert_eq!(state.main_character().unwrap().name, "Alice");
        assert_eq!(state.phase(), crate::domain::value_objects::StoryPhase::RisingAction);
        assert_eq!(state.direction().unwrap().suggestions, vec!["Reveal a secret"]);
        assert!(!state.is_generating());
    }

    #[tokio::test]
    async fn test_failed_opening_discards_session() {
        let h = harness(ScriptedLlm::new(["not json"]), MockSpeech::default(), without_supervisor());

        let result = h.service.start_session(None).await;

        assert!(matches!(result, Err(StoryError::MalformedResponse(_))));
        assert_eq!(h.service.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_choices_advance_scene_ids_and_plot_events() {
        let h = harness(
            ScriptedLlm::new([alice("Hello."), alice("Follow me."), "false".to_string()]),
            MockSpeech::default(),
            without_supervisor(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Thriller)).await.unwrap();

        let scene = h.service.submit_choice(session_id, "  Follow her  ").await.unwrap();

        assert_eq!(scene.id, 2);
        assert_eq!(scene.arrived_by.as_deref(), Some("Follow her"));
        let state = h.service.snapshot(session_id).await.unwrap();
        assert_eq!(state.history().len(), 1);
        // Opening dialogue (1) + choice (3) + dialogue (1)
        assert_eq!(state.tension().value(), 5);
        assert!(h.llm.requests.lock().unwrap()[1]
            .messages[0]
            .content
            .contains("Player chose: \"Follow her\""));
    }

    #[tokio::test]
    async fn test_generation_error_keeps_last_good_scene() {
        let h = harness(ScriptedLlm::new([alice("Hello.")]), MockSpeech::default(), without_supervisor());
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();
        h.llm.push_error(LlmError::RequestFailed("503".to_string()));

        let result = h.service.submit_choice(session_id, "Run").await;

        assert!(matches!(result, Err(StoryError::GenerationFailure(_))));
        let state = h.service.snapshot(session_id).await.unwrap();
        assert_eq!(state.current_scene().unwrap().id, 1);
        assert!(!state.is_generating());

        // The same choice can be retried
        h.llm.push(alice("Too late."));
        h.llm.push("false");
        assert_eq!(h.service.submit_choice(session_id, "Run").await.unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_concurrent_choice_is_rejected_without_effect() {
        let h = harness(
            ScriptedLlm::new([alice("Hello."), alice("Quick!"), "false".to_string()]),
            MockSpeech::default(),
            without_supervisor(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();
        h.llm.set_delay(Duration::from_millis(100));

        let service = h.service.clone();
        let first = tokio::spawn(async move { service.submit_choice(session_id, "Left").await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = h.service.submit_choice(session_id, "Right").await;
        assert_eq!(second, Err(StoryError::Busy));
        let state = h.service.snapshot(session_id).await.unwrap();
        assert!(state.is_generating());
        assert_eq!(state.current_scene().unwrap().id, 1);

        let scene = first.await.unwrap().unwrap();
        assert_eq!(scene.id, 2);
        assert_eq!(scene.arrived_by.as_deref(), Some("Left"));
        assert_eq!(h.llm.request_count(), 3);
    }

    #[tokio::test]
    async fn test_restart_discards_in_flight_generation() {
        let h = harness(
            ScriptedLlm::new([alice("Hello."), alice("Stale."), "false".to_string()]),
            MockSpeech::default(),
            without_supervisor(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Horror)).await.unwrap();
        h.llm.set_delay(Duration::from_millis(100));

        let service = h.service.clone();
        let pending = tokio::spawn(async move { service.submit_choice(session_id, "Open the door").await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.service.restart(session_id).await.unwrap();

        assert_eq!(pending.await.unwrap(), Err(StoryError::Superseded));
        let state = h.service.snapshot(session_id).await.unwrap();
        assert!(state.genre().is_none());
        assert!(state.current_scene().is_none());
        assert!(!state.is_generating());
    }

    #[tokio::test]
    async fn test_failure_after_restart_reports_superseded() {
        let h = harness(ScriptedLlm::new([alice("Hello.")]), MockSpeech::default(), without_supervisor());
        let (session_id, _) = h.service.start_session(Some(Genre::Mystery)).await.unwrap();
        h.llm.set_delay(Duration::from_millis(100));
        h.llm.push_error(LlmError::RequestFailed("502".to_string()));

        let service = h.service.clone();
        let pending = tokio::spawn(async move { service.submit_choice(session_id, "Search the desk").await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.service.restart(session_id).await.unwrap();

        assert_eq!(pending.await.unwrap(), Err(StoryError::Superseded));
        assert!(!h.service.snapshot(session_id).await.unwrap().is_generating());
    }

    #[tokio::test]
    async fn test_timeout_after_restart_reports_superseded() {
        let settings = StorySettings {
            generation_timeout: Duration::from_millis(80),
            ..without_supervisor()
        };
        let h = harness(ScriptedLlm::new([alice("Hello."), alice("Slow.")]), MockSpeech::default(), settings);
        let (session_id, _) = h.service.start_session(Some(Genre::Mystery)).await.unwrap();
        h.llm.set_delay(Duration::from_millis(500));

        let service = h.service.clone();
        let pending = tokio::spawn(async move { service.submit_choice(session_id, "Wait").await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.service.restart(session_id).await.unwrap();

        assert_eq!(pending.await.unwrap(), Err(StoryError::Superseded));
    }

    #[tokio::test]
    async fn test_restart_then_select_genre_starts_over() {
        let h = harness(
            ScriptedLlm::new([alice("Hello."), scene_json("Bob", "male", "Howdy.", "A ranch")]),
            MockSpeech::default(),
            without_supervisor(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();
        h.service.restart(session_id).await.unwrap();

        let scene = h.service.select_genre(session_id, Some(Genre::Comedy)).await.unwrap();

        assert_eq!(scene.id, 1);
        let state = h.service.snapshot(session_id).await.unwrap();
        assert_eq!(state.main_character().unwrap().name, "Bob");
        assert!(state.history().is_empty());
    }

    #[tokio::test]
    async fn test_hung_generation_times_out_and_releases_guard() {
        let settings = StorySettings {
            generation_timeout: Duration::from_millis(50),
            ..without_supervisor()
        };
        let h = harness(ScriptedLlm::new([alice("Hello."), alice("Slow.")]), MockSpeech::default(), settings);
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();
        h.llm.set_delay(Duration::from_millis(500));

        let result = h.service.submit_choice(session_id, "Wait").await;

        assert!(matches!(result, Err(StoryError::Timeout(_))));
        let state = h.service.snapshot(session_id).await.unwrap();
        assert!(!state.is_generating());
        assert_eq!(state.current_scene().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_supervisor_ending_is_terminal_and_shown_once() {
        let h = harness(
            ScriptedLlm::new([
                alice("Hello."),
                quiet_analysis(),
                alice("It's over."),
                "false".to_string(),
                ending_analysis("failure", "Alice's heart was broken by the lie"),
            ]),
            MockSpeech::default(),
            StorySettings::default(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Romance)).await.unwrap();
        assert!(!h.service.snapshot(session_id).await.unwrap().has_shown_ending());

        let scene = h.service.submit_choice(session_id, "Lie to her").await.unwrap();

        assert!(scene.choices.is_empty());
        assert!(scene.is_complete);
        let ending = scene.ending.unwrap();
        assert_eq!(ending.kind, EndingKind::Failure);
        assert_eq!(ending.display_message(), "Your heart was broken by the lie");

        let state = h.service.snapshot(session_id).await.unwrap();
        assert!(state.has_shown_ending());
        assert_eq!(state.tension().value(), 100);

        let requests = h.llm.request_count();
        assert_eq!(
            h.service.submit_choice(session_id, "Apologize").await,
            Err(StoryError::StoryEnded)
        );
        assert_eq!(h.llm.request_count(), requests);
    }

    #[tokio::test]
    async fn test_supervisor_guidance_reaches_the_next_requests() {
        let guidance = serde_json::json!({
            "shouldEndStory": false,
            "suggestedTension": 30,
            "suggestedPhase": "rising_action",
            "plotSuggestions": ["A stranger knocks"],
            "requiredCharacters": ["Bob"],
            "themes": ["loyalty"],
            "characterUpdates": [{"name": "Alice", "mood": 4, "trust": -2}]
        })
        .to_string();
        let h = harness(
            ScriptedLlm::new([
                alice("Stay close."),
                guidance,
                alice("Who's there?"),
                "false".to_string(),
                quiet_analysis(),
            ]),
            MockSpeech::default(),
            StorySettings::default(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Thriller)).await.unwrap();

        let state = h.service.snapshot(session_id).await.unwrap();
        assert_eq!(state.character_state("Alice").unwrap().stats.mood, 4);
        assert_eq!(state.themes(), ["loyalty"]);

        h.service.submit_choice(session_id, "Open the door").await.unwrap();

        let requests = h.llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 5);
        let next_scene = &requests[2].messages[0].content;
        assert!(next_scene.contains("STORY PHASE: rising_action (tension 30/100)\n"));
        assert!(next_scene.contains("Name: Alice\nGender: female\n"));
        assert!(next_scene.contains("PLOT DIRECTION:\n- A stranger knocks\n"));
        assert!(next_scene.contains("Characters who should appear: Bob\n"));
        assert!(next_scene.contains("RECENT EVENTS:\n- [dialogue] Alice said \"Stay close.\""));

        let analysis = &requests[4].messages[0].content;
        assert!(analysis.contains("THEMES: loyalty\n"));
        assert!(analysis.contains("- Alice: mood 4, trust -2, health 100\n"));
        assert!(!analysis.contains("/100/100"));
    }

    #[tokio::test]
    async fn test_supervisor_failure_does_not_block_the_story() {
        let h = harness(
            ScriptedLlm::new([alice("Hello."), "no idea".to_string()]),
            MockSpeech::default(),
            StorySettings::default(),
        );

        let (session_id, scene) = h.service.start_session(Some(Genre::Drama)).await.unwrap();

        assert_eq!(scene.id, 1);
        assert!(!h.service.snapshot(session_id).await.unwrap().has_ended());
    }

    #[tokio::test]
    async fn test_recording_is_transcribed_into_a_choice() {
        let h = harness(
            ScriptedLlm::new([alice("Hello."), alice("Right away."), "false".to_string()]),
            MockSpeech::transcribing("Take the stairs"),
            without_supervisor(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();

        let audio = RecordedAudio::new(vec![1, 2, 3], "audio/webm");
        let scene = h.service.submit_recording(session_id, audio).await.unwrap();

        assert_eq!(scene.arrived_by.as_deref(), Some("Take the stairs"));
        assert!(!h.service.snapshot(session_id).await.unwrap().is_recording());
    }

    #[tokio::test]
    async fn test_empty_transcript_is_a_recording_failure() {
        let h = harness(
            ScriptedLlm::new([alice("Hello.")]),
            MockSpeech::transcribing("   "),
            without_supervisor(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();

        let result = h
            .service
            .submit_recording(session_id, RecordedAudio::new(vec![0; 8], "audio/wav"))
            .await;

        assert!(matches!(result, Err(StoryError::RecordingFailure(_))));
        let state = h.service.snapshot(session_id).await.unwrap();
        assert!(!state.is_recording());
        assert_eq!(state.current_scene().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_narration_uses_the_character_voice() {
        let h = harness(ScriptedLlm::new([alice("Listen.")]), MockSpeech::default(), without_supervisor());
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();

        let audio = h.service.narrate(session_id, 0).await.unwrap();

        assert_eq!(audio.bytes, b"Listen.".to_vec());
        assert_eq!(h.speech.voices.lock().unwrap()[0].as_str(), DEFAULT_FEMALE_VOICE_ID);
        assert!(matches!(
            h.service.narrate(session_id, 3).await,
            Err(StoryError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_session_and_end_session() {
        let h = harness(ScriptedLlm::new([alice("Hello.")]), MockSpeech::default(), without_supervisor());
        let (session_id, _) = h.service.start_session(Some(Genre::Action)).await.unwrap();

        h.service.end_session(session_id).await.unwrap();

        assert!(matches!(
            h.service.submit_choice(session_id, "Hi").await,
            Err(StoryError::NoActiveStory(_))
        ));
        assert!(matches!(
            h.service.end_session(session_id).await,
            Err(StoryError::NoActiveStory(_))
        ));
    }

    #[tokio::test]
    async fn test_transcript_covers_played_scenes() {
        let h = harness(
            ScriptedLlm::new([alice("Who's there?"), alice("Come in."), "false".to_string()]),
            MockSpeech::default(),
            without_supervisor(),
        );
        let (session_id, _) = h.service.start_session(Some(Genre::Mystery)).await.unwrap();
        h.service.submit_choice(session_id, "A friend").await.unwrap();

        let transcript = h.service.transcript(session_id).await.unwrap();

        assert!(transcript.starts_with("Scene 1:\nAlice: Who's there?\nYou chose: \"A friend\""));
        assert!(transcript.contains("Scene 2:\nAlice: Come in."));
    }
}
