//! # keyroute-core
//!
//! Core types, error definitions and configuration shared by every keyroute
//! crate.
//!
//! ## Internal Crate Warning
//!
//! **This crate is an internal implementation detail of `keyroute`.** The API
//! is unstable and may change without notice.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`types`] - Secret and key material, algorithm names
//! - [`card`] - Card model used by the directory
//! - [`config`] - Configuration file structures
//! - [`config_loader`] - Reading and writing the configuration file
//! - [`encoding`] - Base64 helpers
//!
//! ## Error Handling
//!
//! ```rust
//! use keyroute_core::{ArgumentError, KeyrouteError};
//!
//! let err: KeyrouteError = ArgumentError::invalid_token("nocolon").into();
//! assert!(err.to_string().contains("nocolon"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod card;
pub mod config;
pub mod config_loader;
pub mod encoding;
pub mod error;
pub mod types;

pub use card::{Card, CardRequest, CardScope, RevocationReason, SearchCriteria};
pub use config::{ArgumentSetting, Config, ConfigBuilder, DirectoryConfig, LoggingConfig};
pub use config_loader::{expand_path, load_config, ConfigLoader};
pub use error::{
    ArgumentError, ArgumentResult, ConfigError, ConfigResult, CryptoError, CryptoResult,
    DirectoryError, DirectoryResult, KeyrouteError, Result,
};
pub use types::{HashAlgorithm, KeyAlgorithm, Password, PrivateKey, PublicKey};
