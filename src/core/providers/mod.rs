//! Shared plumbing for upstream AI service providers.

pub mod openai;
