//! Rivulet Core - reactive connectors for processing modules
//!
//! This crate lets processing objects ("modules") expose typed connectors and
//! wires them into a dataflow graph that keeps results current as inputs
//! change.
//!
//! # Core Abstractions
//!
//! ## Connectors
//!
//! - [`Module`] - Object-safe trait a processing object implements
//! - [`ConnectorSpec`] - Declaration of one connector (name, [`Role`], type, dependents)
//! - [`Value`] / [`ValueType`] - Type-erased payloads and their declared types
//!
//! ## Runtimes
//!
//! - [`ConnectionGraph`] - Push-invalidate, pull-recompute graph with caching,
//!   batching and a per-pass cycle guard
//! - [`PassThrough`] - Same interface as direct method calls, for when the graph is disabled
//! - [`Runtime`] - Object-safe trait over both, see [`build_runtime`]
//!
//! ## Progress
//!
//! - [`ProgressObserver`] - Receives one call per recomputation in a pass
//! - [`ProgressCounter`] - Observer that records passes, useful in tests
//!
//! # Feature Flags
//!
//! - `tracing` - emit `tracing` events for graph mutations and propagation
//!
//! # Example
//!
//! ```rust,ignore
//! use rivulet_core::{ConnectionGraph, Value};
//!
//! let mut graph = ConnectionGraph::new();
//! let source = graph.add_module(Box::new(holder))?;
//! let scale = graph.add_module(Box::new(scaler))?;
//!
//! graph.connect(
//!     graph.connector(source, "GetValue")?,
//!     graph.connector(scale, "SetValue")?,
//! )?;
//! graph.set(graph.connector(source, "SetValue")?, Value::new(5.0))?;
//! ```

mod arena;
pub mod connector;
pub mod edge;
pub mod error;
pub mod graph;
pub mod module;
pub mod passthrough;
pub mod progress;
pub mod runtime;
pub mod value;

pub use connector::{ConnectorId, ConnectorSpec, Role};
pub use edge::{Connection, ContributionId, EdgeId};
pub use error::ConnectorError;
pub use graph::ConnectionGraph;
pub use module::{Module, ModuleError, ModuleId, UnboundPort};
pub use passthrough::PassThrough;
pub use progress::{PassRecord, Progress, ProgressCounter, ProgressObserver};
pub use runtime::{Runtime, RuntimeKind, build_runtime};
pub use value::{Value, ValueType};
