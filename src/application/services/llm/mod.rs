//! Prompt construction for the text generation service

pub mod prompt_builder;
