//! Value holder: the simplest source module.

use rivulet_core::{ConnectorSpec, Module, ModuleError, Value, ValueType};

use crate::error::{ModuleFailure, finite_f64};

/// Stores one number and reads it back unchanged.
///
/// ## Connectors
///
/// | Port | Name | Role | Type |
/// |------|------|------|------|
/// | 0 | SetValue | Input -> GetValue | f64 |
/// | 1 | GetValue | Output | f64 |
#[derive(Debug, Clone, Default)]
pub struct ValueHolder {
    value: f64,
}

impl ValueHolder {
    /// Port index of `SetValue`.
    pub const SET_VALUE: usize = 0;
    /// Port index of `GetValue`.
    pub const GET_VALUE: usize = 1;

    /// Creates a holder with an initial value.
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Module for ValueHolder {
    fn type_name(&self) -> &'static str {
        "value"
    }

    fn connectors(&self) -> Vec<ConnectorSpec> {
        vec![
            ConnectorSpec::input("SetValue", ValueType::of::<f64>(), &["GetValue"]),
            ConnectorSpec::output("GetValue", ValueType::of::<f64>()),
        ]
    }

    fn set_input(&mut self, port: usize, value: Value) -> Result<(), ModuleError> {
        match port {
            Self::SET_VALUE => self.value = finite_f64(port, &value)?,
            _ => return Err(unknown(port)),
        }
        Ok(())
    }

    fn get_output(&mut self, port: usize) -> Result<Value, ModuleError> {
        match port {
            Self::GET_VALUE => Ok(Value::new(self.value)),
            _ => Err(unknown(port)),
        }
    }
}

fn unknown(port: usize) -> ModuleError {
    ModuleFailure::UnknownPort {
        module: "value",
        port,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_what_was_set() {
        let mut holder = ValueHolder::new(1.0);
        holder
            .set_input(ValueHolder::SET_VALUE, Value::new(4.5))
            .unwrap();
        let out = holder.get_output(ValueHolder::GET_VALUE).unwrap();
        assert_eq!(out.cloned::<f64>(), Some(4.5));
        assert_eq!(holder.value(), 4.5);
    }

    #[test]
    fn rejects_non_numbers() {
        let mut holder = ValueHolder::default();
        assert!(
            holder
                .set_input(ValueHolder::SET_VALUE, Value::new("x"))
                .is_err()
        );
        assert_eq!(holder.value(), 0.0);
    }

    #[test]
    fn ports_match_declaration_order() {
        let specs = ValueHolder::default().connectors();
        assert_eq!(specs[ValueHolder::SET_VALUE].name, "SetValue");
        assert_eq!(specs[ValueHolder::GET_VALUE].name, "GetValue");
    }
}
