//! Affine scaler: `output = input * factor + offset`.

use rivulet_core::{ConnectorSpec, Module, ModuleError, Value, ValueType};

use crate::error::{ModuleFailure, finite_f64};

/// Scales and offsets its input.
///
/// ## Connectors
///
/// | Port | Name | Role | Type | Default |
/// |------|------|------|------|---------|
/// | 0 | SetValue | Input -> GetOutput | f64 | 0.0 |
/// | 1 | SetFactor | Input -> GetOutput | f64 | 1.0 |
/// | 2 | SetOffset | Input -> GetOutput | f64 | 0.0 |
/// | 3 | GetOutput | Output | f64 | |
///
/// # Example
///
/// ```rust
/// use rivulet_core::{ConnectionGraph, Value};
/// use rivulet_modules::{Scaler, ValueHolder};
///
/// let mut graph = ConnectionGraph::new();
/// let a = graph.add_module(Box::new(ValueHolder::default())).unwrap();
/// let b = graph.add_module(Box::new(Scaler::new(2.0))).unwrap();
///
/// let a_get = graph.connector(a, "GetValue").unwrap();
/// let b_set = graph.connector(b, "SetValue").unwrap();
/// graph.connect(a_get, b_set).unwrap();
///
/// let a_set = graph.connector(a, "SetValue").unwrap();
/// graph.set(a_set, Value::new(5.0)).unwrap();
///
/// let b_out = graph.connector(b, "GetOutput").unwrap();
/// assert_eq!(graph.get(b_out).unwrap().cloned::<f64>(), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct Scaler {
    value: f64,
    factor: f64,
    offset: f64,
}

impl Default for Scaler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Scaler {
    /// Port index of `SetValue`.
    pub const SET_VALUE: usize = 0;
    /// Port index of `SetFactor`.
    pub const SET_FACTOR: usize = 1;
    /// Port index of `SetOffset`.
    pub const SET_OFFSET: usize = 2;
    /// Port index of `GetOutput`.
    pub const GET_OUTPUT: usize = 3;

    /// Creates a scaler with the given factor and no offset.
    pub fn new(factor: f64) -> Self {
        Self {
            value: 0.0,
            factor,
            offset: 0.0,
        }
    }

    fn output(&self) -> f64 {
        self.value * self.factor + self.offset
    }
}

impl Module for Scaler {
    fn type_name(&self) -> &'static str {
        "scale"
    }

    fn connectors(&self) -> Vec<ConnectorSpec> {
        let f64_type = ValueType::of::<f64>();
        vec![
            ConnectorSpec::input("SetValue", f64_type, &["GetOutput"]),
            ConnectorSpec::input("SetFactor", f64_type, &["GetOutput"]),
            ConnectorSpec::input("SetOffset", f64_type, &["GetOutput"]),
            ConnectorSpec::output("GetOutput", f64_type),
        ]
    }

    fn set_input(&mut self, port: usize, value: Value) -> Result<(), ModuleError> {
        let v = finite_f64(port, &value)?;
        match port {
            Self::SET_VALUE => self.value = v,
            Self::SET_FACTOR => self.factor = v,
            Self::SET_OFFSET => self.offset = v,
            _ => {
                return Err(ModuleFailure::UnknownPort {
                    module: "scale",
                    port,
                }
                .into());
            }
        }
        Ok(())
    }

    fn get_output(&mut self, port: usize) -> Result<Value, ModuleError> {
        match port {
            Self::GET_OUTPUT => Ok(Value::new(self.output())),
            _ => Err(ModuleFailure::UnknownPort {
                module: "scale",
                port,
            }
            .into()),
        }
    }
}
