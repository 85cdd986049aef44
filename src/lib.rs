pub mod catalog;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod identify;
pub mod llm;
pub mod scanner;
pub mod server;
