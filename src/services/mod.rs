pub mod account_service;
pub mod assistant;
pub mod auth_service;

pub use account_service::{AccountError, AccountService, AdminIdentityStore};
pub use assistant::{
    ActionType, AssistantError, AssistantService, GenerateRequest, GenerateResponse,
    GenerationOutcome, InferenceClient, LLMClient, Reply, ReplyRepository, Tone,
};
pub use auth_service::AuthService;
