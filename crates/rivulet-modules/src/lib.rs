//! Rivulet Modules - reference processing modules
//!
//! Small modules that exercise every connector role, plus a registry for
//! creating them by type ID:
//!
//! - [`ValueHolder`] (`value`) - Input and Output on one number
//! - [`Scaler`] (`scale`) - several Inputs feeding one Output
//! - [`Sum`] (`sum`) - MultiInput with ordered contributions
//! - [`Accumulator`] (`accumulator`) - Input, Trigger and a non-caching Output
//! - [`Counter`] (`counter`) - Trigger-driven event count
//!
//! ## Example
//!
//! ```rust
//! use rivulet_core::{ConnectionGraph, Value};
//! use rivulet_modules::ModuleRegistry;
//!
//! let registry = ModuleRegistry::new();
//! let mut graph = ConnectionGraph::new();
//! let sum = graph.add_module(registry.create("sum").unwrap()).unwrap();
//! for v in [1.0, 2.0] {
//!     let src = graph.add_module(registry.create("value").unwrap()).unwrap();
//!     graph.set(graph.connector(src, "SetValue").unwrap(), Value::new(v)).unwrap();
//!     graph
//!         .connect(
//!             graph.connector(src, "GetValue").unwrap(),
//!             graph.connector(sum, "AddSummand").unwrap(),
//!         )
//!         .unwrap();
//! }
//! let total = graph.get(graph.connector(sum, "GetSum").unwrap()).unwrap();
//! assert_eq!(total.cloned::<f64>(), Some(3.0));
//! ```

pub mod accumulator;
pub mod counter;
pub mod error;
pub mod holder;
pub mod registry;
pub mod scaler;
pub mod sum;

pub use accumulator::Accumulator;
pub use counter::Counter;
pub use error::ModuleFailure;
pub use holder::ValueHolder;
pub use registry::{ModuleCategory, ModuleDescriptor, ModuleRegistry};
pub use scaler::Scaler;
pub use sum::Sum;
