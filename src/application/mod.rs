//! Application layer - Use cases and port definitions
//!
//! This layer contains:
//! - Ports: Interfaces for the text, image and speech services, secrets and session storage
//! - Services: Scene generation and story orchestration
//! - DTOs: Model output shapes and API payloads

pub mod dto;
pub mod ports;
pub mod services;
