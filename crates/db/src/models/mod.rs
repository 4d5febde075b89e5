pub mod user_notification_config;
