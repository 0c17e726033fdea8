//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod settings;

pub use settings::*;
