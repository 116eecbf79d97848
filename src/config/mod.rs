// src/config/mod.rs

//! Configuration surface for `beamline`.
//!
//! - [`model`] holds the raw (as-deserialized) and validated config types.
//! - [`loader`] reads and parses the TOML file.
//! - [`validate`] turns a [`model::RawConfigFile`] into a checked
//!   [`model::ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    AppSection, CircuitBreakerSection, ConfigFile, PathsSection, RawConfigFile,
    ResourcesSection, RetrySection, SshSection,
};
