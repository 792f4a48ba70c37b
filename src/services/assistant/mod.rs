//! Assistant Service Module
//!
//! The AI-generation-and-persistence flow: prompt construction, the
//! outbound chat-completion call, and the per-user reply store.
//!
//! # Architecture
//! ```text
//! ┌──────────────────┐
//! │ AssistantService │  ← orchestration (validate → prompt → infer → persist)
//! └───────┬──────────┘
//!         │
//!    ┌────┴─────────┐
//!    ▼              ▼
//! ┌─────────┐  ┌───────────────┐
//! │LLMClient│  │ReplyRepository│
//! │(reqwest)│  │ (sqlx/sqlite) │
//! └─────────┘  └───────────────┘
//! ```

mod client;
mod models;
mod prompt;
mod repository;
mod service;

// Re-exports for external use
pub use client::{InferenceClient, LLMClient};
pub use models::*;
pub use prompt::build_prompt;
pub use repository::ReplyRepository;
pub use service::AssistantService;
