// Test modules

mod auth_middleware_test;
mod generate_endpoint_test;
pub mod common;
