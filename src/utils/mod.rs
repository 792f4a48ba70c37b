pub mod error;
pub mod json;
pub mod jwt;

pub use error::{ApiError, ApiResult};
pub use json::ApiJson;
pub use jwt::JwtUtil;
