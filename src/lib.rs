//! cdprov - continuous delivery provisioning for Azure web apps
//!
//! Classifies a source repository, validates the app's build configuration,
//! makes sure a Team Services account exists and asks the continuous
//! delivery service to create the build and release pipeline.

pub mod build_config;
pub mod classify;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod progress;
pub mod provision;

pub use error::{Error, Result};
