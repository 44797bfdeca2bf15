pub mod chat_service;
pub mod dashboard_service;
pub mod service;
pub mod settings_service;
