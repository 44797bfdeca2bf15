pub mod endpoints;
pub mod store;
