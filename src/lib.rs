// ABOUTME: Library crate for gatsby-hub exposing the dispatcher, session model and hosts for testing

pub mod app;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod models;
pub mod preview;
pub mod registry;
pub mod tmux;
pub mod workspace;
