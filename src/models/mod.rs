//! Display models for CLI output
//!
//! This module provides shared display model abstractions for converting
//! domain types into CLI-friendly display formats.

pub mod display;

pub use display::{AppTypeDisplay, RepositoryDisplay, SummaryRow};
