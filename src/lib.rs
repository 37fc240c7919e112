pub mod agent;
pub mod api;
pub mod artifacts;
pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod files;
pub mod orchestrator;
pub mod progress;
pub mod run;
pub mod ui;
