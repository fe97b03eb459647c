//! Personas built from profiles
//!
//! A persona answers in the voice of a profile. Each question gets its own
//! system prompt, focused on the parts of the profile the question touches:
//! - `prompt`: scored section selection, tone and focus keywords
//! - `agent`: hands the prompt to a generation client

pub mod agent;
pub mod prompt;
