pub mod account;
pub mod auth;
pub mod generate;
pub mod replies;
