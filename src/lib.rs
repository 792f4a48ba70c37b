//! MailAssist Library
//!
//! This library contains all the core modules for the MailAssist service.

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use services::{
    AccountService, AdminIdentityStore, AssistantError, AssistantService, AuthService,
    GenerationOutcome, InferenceClient, LLMClient,
};
pub use utils::JwtUtil;

/// Application shared state
///
/// Design Philosophy: Keep it simple - Rust's type system IS our DI container.
/// All services are wrapped in Arc for cheap cloning and thread safety.
/// Each request obtains collaborators through here; nothing is a
/// process-wide singleton, so tests substitute their own instances.
#[derive(Clone)]
pub struct AppState {
    pub jwt_util: Arc<JwtUtil>,

    pub auth_service: Arc<AuthService>,
    pub assistant_service: Arc<AssistantService>,
    pub account_service: Arc<AccountService>,
}

#[cfg(test)]
mod tests;
