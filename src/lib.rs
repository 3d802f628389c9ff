//! gymtracky - Weekly gym routine tracker with an AI coach
//!
//! Routine state lives in memory only; the AI features call the Gemini API.

pub mod analytics;
pub mod coach;
pub mod config;
pub mod exercises;
pub mod form;
pub mod store;
pub mod tui;

pub use store::WorkoutStore;
