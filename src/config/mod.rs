//! Configuration Management
//!
//! Client configuration, API credentials and parameter store access.

pub mod client;
pub mod credentials;
pub mod params;

// Re-export
pub use client::{ClientConfig, Environment};
pub use credentials::{Credentials, SecretString};
pub use params::{
    install_parameter_store, shared_parameter_store, EnvParameterStore, MemoryParameterStore,
    Param, ParamError, ParameterStore,
};
