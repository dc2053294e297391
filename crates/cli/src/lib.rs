//! `stockfile-cli`
//!
//! **Responsibility:** the interactive shell around the inventory store.
//!
//! This crate provides:
//! - Startup configuration read from the environment
//! - The numbered menu driver, generic over its console streams

pub mod config;
pub mod menu;

pub use config::{Config, ConfigError};
pub use menu::{Choice, run};
