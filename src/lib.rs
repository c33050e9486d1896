pub mod api;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod load_config;
pub mod publish;
pub mod transfer;
