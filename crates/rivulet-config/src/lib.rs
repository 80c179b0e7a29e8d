//! Rivulet Config - runtime configuration and patch files.
//!
//! This crate provides:
//!
//! - **Runtime configuration**: pick the connection graph or pass-through
//!   backend from a TOML file or the `RIVULET_DISABLE_CONNECTORS` variable
//! - **Patches**: declarative module graphs loaded from TOML and built on any
//!   [`rivulet_core::Runtime`]
//! - **Paths**: platform-specific config and patch directories
//!
//! # Example
//!
//! ```rust
//! use rivulet_config::{Patch, RuntimeConfig};
//! use rivulet_modules::ModuleRegistry;
//!
//! let patch = Patch::from_toml(r#"
//!     name = "double"
//!     reads = ["b.GetOutput"]
//!
//!     [[modules]]
//!     id = "a"
//!     type = "value"
//!     values = { SetValue = 5.0 }
//!
//!     [[modules]]
//!     id = "b"
//!     type = "scale"
//!     values = { SetFactor = 2.0 }
//!
//!     [[connections]]
//!     from = "a.GetValue"
//!     to = "b.SetValue"
//! "#).unwrap();
//!
//! let mut runtime = RuntimeConfig::default().build_runtime();
//! let built = patch.build(&ModuleRegistry::new(), &mut *runtime).unwrap();
//! let readings = built.read_all(&mut *runtime).unwrap();
//! assert_eq!(readings[0].to_string(), "b.GetOutput = 10");
//! ```

pub mod error;
pub mod patch;
pub mod paths;
pub mod runtime_config;
pub mod values;

pub use error::ConfigError;
pub use patch::{
    BuiltPatch, ConnectionConfig, ModuleConfig, Patch, parse_assignment, split_reference,
};
pub use paths::{default_config_path, find_patch, user_config_dir, user_patches_dir};
pub use runtime_config::{ConnectorMode, DISABLE_ENV, RuntimeConfig, is_truthy};
pub use values::{Reading, ReadingValue, parse_literal, value_from_toml};
