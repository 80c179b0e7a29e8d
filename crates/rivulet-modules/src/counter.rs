//! Event counter driven by triggers.

use rivulet_core::{ConnectorSpec, Module, ModuleError, Value, ValueType};

use crate::error::ModuleFailure;

/// Counts how often `Increment` fires.
///
/// Connecting any output to `Increment` counts that output's changes, since
/// triggers ignore the payload.
///
/// ## Connectors
///
/// | Port | Name | Role | Type |
/// |------|------|------|------|
/// | 0 | Increment | Trigger -> GetCount | any |
/// | 1 | Reset | Trigger -> GetCount | any |
/// | 2 | GetCount | Output | u64 |
#[derive(Debug, Clone, Default)]
pub struct Counter {
    count: u64,
}

impl Counter {
    /// Port index of `Increment`.
    pub const INCREMENT: usize = 0;
    /// Port index of `Reset`.
    pub const RESET: usize = 1;
    /// Port index of `GetCount`.
    pub const GET_COUNT: usize = 2;

    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Module for Counter {
    fn type_name(&self) -> &'static str {
        "counter"
    }

    fn connectors(&self) -> Vec<ConnectorSpec> {
        vec![
            ConnectorSpec::trigger("Increment", &["GetCount"]),
            ConnectorSpec::trigger("Reset", &["GetCount"]),
            ConnectorSpec::output("GetCount", ValueType::of::<u64>()),
        ]
    }

    fn trigger(&mut self, port: usize) -> Result<(), ModuleError> {
        match port {
            Self::INCREMENT => self.count = self.count.saturating_add(1),
            Self::RESET => self.count = 0,
            _ => {
                return Err(ModuleFailure::UnknownPort {
                    module: "counter",
                    port,
                }
                .into());
            }
        }
        Ok(())
    }

    fn get_output(&mut self, port: usize) -> Result<Value, ModuleError> {
        if port == Self::GET_COUNT {
            Ok(Value::new(self.count))
        } else {
            Err(ModuleFailure::UnknownPort {
                module: "counter",
                port,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_and_resets() {
        let mut c = Counter::new();
        c.trigger(Counter::INCREMENT).unwrap();
        c.trigger(Counter::INCREMENT).unwrap();
        assert_eq!(c.count(), 2);
        c.trigger(Counter::RESET).unwrap();
        assert_eq!(c.count(), 0);
    }

    #[test]
    fn output_port_is_not_a_trigger() {
        let mut c = Counter::new();
        assert!(c.trigger(Counter::GET_COUNT).is_err());
    }
}
