pub mod app;
pub mod pipeline;
pub mod prefs;
