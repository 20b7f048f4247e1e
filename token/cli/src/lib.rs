pub mod clap_app;
pub mod command;
pub mod config;
pub mod keypair;
pub mod output;

pub type Error = Box<dyn std::error::Error>;
