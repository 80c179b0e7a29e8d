//! Running accumulator over every value pushed into it.

use rivulet_core::{ConnectorSpec, Module, ModuleError, Value, ValueType};

use crate::error::{ModuleFailure, finite_f64};

/// Accumulates a running total of received values.
///
/// Every value arriving at `Push` is added, so an upstream output connected
/// to it contributes once per propagation. `Reset` clears the totals.
/// `GetMean` does not cache: it is cheap and reads the live totals.
///
/// ## Connectors
///
/// | Port | Name | Role | Type |
/// |------|------|------|------|
/// | 0 | Push | Input -> GetTotal, GetCount, GetMean | f64 |
/// | 1 | Reset | Trigger -> GetTotal, GetCount, GetMean | any |
/// | 2 | GetTotal | Output | f64 |
/// | 3 | GetCount | Output | u64 |
/// | 4 | GetMean | Output, non-caching | f64 |
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    total: f64,
    count: u64,
}

impl Accumulator {
    /// Port index of `Push`.
    pub const PUSH: usize = 0;
    /// Port index of `Reset`.
    pub const RESET: usize = 1;
    /// Port index of `GetTotal`.
    pub const GET_TOTAL: usize = 2;
    /// Port index of `GetCount`.
    pub const GET_COUNT: usize = 3;
    /// Port index of `GetMean`.
    pub const GET_MEAN: usize = 4;

    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }

    fn unknown(port: usize) -> ModuleError {
        ModuleFailure::UnknownPort {
            module: "accumulator",
            port,
        }
        .into()
    }
}

impl Module for Accumulator {
    fn type_name(&self) -> &'static str {
        "accumulator"
    }

    fn connectors(&self) -> Vec<ConnectorSpec> {
        const ALL: &[&str] = &["GetTotal", "GetCount", "GetMean"];
        vec![
            ConnectorSpec::input("Push", ValueType::of::<f64>(), ALL),
            ConnectorSpec::trigger("Reset", ALL),
            ConnectorSpec::output("GetTotal", ValueType::of::<f64>()),
            ConnectorSpec::output("GetCount", ValueType::of::<u64>()),
            ConnectorSpec::output("GetMean", ValueType::of::<f64>()).non_caching(),
        ]
    }

    fn set_input(&mut self, port: usize, value: Value) -> Result<(), ModuleError> {
        if port != Self::PUSH {
            return Err(Self::unknown(port));
        }
        self.total += finite_f64(port, &value)?;
        self.count += 1;
        Ok(())
    }

    fn trigger(&mut self, port: usize) -> Result<(), ModuleError> {
        if port != Self::RESET {
            return Err(Self::unknown(port));
        }
        self.total = 0.0;
        self.count = 0;
        Ok(())
    }

    fn get_output(&mut self, port: usize) -> Result<Value, ModuleError> {
        match port {
            Self::GET_TOTAL => Ok(Value::new(self.total)),
            Self::GET_COUNT => Ok(Value::new(self.count)),
            Self::GET_MEAN => Ok(Value::new(self.mean())),
            _ => Err(Self::unknown(port)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_and_mean() {
        let mut acc = Accumulator::new();
        for v in [1.0, 2.0, 6.0] {
            acc.set_input(Accumulator::PUSH, Value::new(v)).unwrap();
        }
        let total = acc.get_output(Accumulator::GET_TOTAL).unwrap();
        let count = acc.get_output(Accumulator::GET_COUNT).unwrap();
        let mean = acc.get_output(Accumulator::GET_MEAN).unwrap();
        assert_eq!(total.cloned::<f64>(), Some(9.0));
        assert_eq!(count.cloned::<u64>(), Some(3));
        assert_eq!(mean.cloned::<f64>(), Some(3.0));
    }

    #[test]
    fn reset_clears_state() {
        let mut acc = Accumulator::new();
        acc.set_input(Accumulator::PUSH, Value::new(5.0)).unwrap();
        acc.trigger(Accumulator::RESET).unwrap();
        let mean = acc.get_output(Accumulator::GET_MEAN).unwrap();
        assert_eq!(mean.cloned::<f64>(), Some(0.0));
        assert!(acc.trigger(Accumulator::PUSH).is_err());
    }

    #[test]
    fn mean_is_declared_non_caching() {
        let specs = Accumulator::new().connectors();
        assert!(!specs[Accumulator::GET_MEAN].caching);
        assert!(specs[Accumulator::GET_TOTAL].caching);
    }
}
