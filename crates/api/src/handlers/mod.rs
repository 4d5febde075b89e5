pub mod admin;
pub mod notification;
pub mod user_config;
