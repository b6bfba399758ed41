//! AgriGuard Core - Domain models, configuration, ports and view models
//!
//! This crate contains the domain logic shared by the AgriGuard dashboard
//! server and command-line client.

pub mod config;
pub mod error;
pub mod labels;
pub mod models;
pub mod ports;
pub mod render;
pub mod tiles;

pub use error::{AgriguardError, Result};
