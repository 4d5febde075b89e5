pub mod user_notification_config_repo;

pub use user_notification_config_repo::UserNotificationConfigRepo;
