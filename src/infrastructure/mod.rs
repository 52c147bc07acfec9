//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - HTTP: REST API routes
//! - LLM: OpenAI-compatible chat client (OpenAI or Ollama)
//! - Fal: Portrait and background image generation
//! - ElevenLabs / Whisper: Speech synthesis and transcription
//! - Secrets: Credential lookup by name
//! - Config: Application configuration
//! - State: Shared application state
//! - Session: In-memory story session store

pub mod config;
pub mod elevenlabs;
pub mod fal;
pub mod http;
pub mod llm_client;
pub mod secrets;
pub mod session;
pub mod state;
pub mod whisper;
