pub mod format;
pub mod history;
pub mod models;
pub mod notice;
pub mod outcome;
pub mod remote;
pub mod render;
pub mod request;
pub mod validator;
