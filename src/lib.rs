pub mod app_config;
pub mod dex;
pub mod error;
pub mod node;
