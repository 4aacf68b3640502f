pub mod client;
pub mod config;
pub mod message;
pub mod persist;
pub mod prompts;
pub mod status;
pub mod text;
pub mod tokens;

pub use client::Agent;
