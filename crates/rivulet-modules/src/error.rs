//! Failures raised by the reference modules.

use rivulet_core::Value;
use thiserror::Error;

/// Errors returned from reference module methods.
///
/// Converted into [`ModuleError`](rivulet_core::ModuleError) by `?` at the
/// [`Module`](rivulet_core::Module) boundary; the runtime wraps them in
/// `ConnectorError::Module`.
#[derive(Debug, Error, PartialEq)]
pub enum ModuleFailure {
    /// The payload was not of the type the port works with.
    #[error("port {port} expects {expected}, got {found}")]
    UnexpectedPayload {
        /// Port index.
        port: usize,
        /// Expected type name.
        expected: &'static str,
        /// Type name of the payload received.
        found: &'static str,
    },

    /// The port index is not declared by this module.
    #[error("{module} has no port {port}")]
    UnknownPort {
        /// Module type name.
        module: &'static str,
        /// Port index.
        port: usize,
    },

    /// A numeric parameter was NaN or infinite.
    #[error("port {port} rejects non-finite value {value}")]
    NonFinite {
        /// Port index.
        port: usize,
        /// Offending value.
        value: f64,
    },

    /// The contribution ID is not held by this module.
    #[error("no contribution {0}")]
    UnknownContribution(u32),
}

/// Extracts a finite `f64` from a payload.
pub(crate) fn finite_f64(port: usize, value: &Value) -> Result<f64, ModuleFailure> {
    let v = value
        .cloned::<f64>()
        .ok_or(ModuleFailure::UnexpectedPayload {
            port,
            expected: "f64",
            found: value.type_name(),
        })?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ModuleFailure::NonFinite { port, value: v })
    }
}
