//! Smart To-Do List Manager Library
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod interactive;
pub mod store;
pub mod types;
