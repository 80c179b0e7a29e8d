//! Sum over a variable number of contributions.

use rivulet_core::{ConnectorSpec, ContributionId, Module, ModuleError, Value, ValueType};

use crate::error::{ModuleFailure, finite_f64};

/// Adds up every contribution made to its `AddSummand` multi-input.
///
/// Contributions are kept in the order they were added; `GetTerms` exposes
/// them as a list so that order is observable.
///
/// ## Connectors
///
/// | Port | Name | Role | Type |
/// |------|------|------|------|
/// | 0 | AddSummand | MultiInput -> GetSum, GetTerms | f64 |
/// | 1 | GetSum | Output | f64 |
/// | 2 | GetTerms | Output | `Vec<f64>` |
#[derive(Debug, Clone, Default)]
pub struct Sum {
    terms: Vec<(ContributionId, f64)>,
}

impl Sum {
    /// Port index of `AddSummand`.
    pub const ADD_SUMMAND: usize = 0;
    /// Port index of `GetSum`.
    pub const GET_SUM: usize = 1;
    /// Port index of `GetTerms`.
    pub const GET_TERMS: usize = 2;

    /// Creates a sum with no contributions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of held contributions.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if no contributions are held.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn check_port(port: usize) -> Result<(), ModuleFailure> {
        if port == Self::ADD_SUMMAND {
            Ok(())
        } else {
            Err(ModuleFailure::UnknownPort { module: "sum", port })
        }
    }

    fn position(&self, id: ContributionId) -> Result<usize, ModuleFailure> {
        self.terms
            .iter()
            .position(|(c, _)| *c == id)
            .ok_or(ModuleFailure::UnknownContribution(id.index()))
    }
}

impl Module for Sum {
    fn type_name(&self) -> &'static str {
        "sum"
    }

    fn connectors(&self) -> Vec<ConnectorSpec> {
        vec![
            ConnectorSpec::multi_input(
                "AddSummand",
                ValueType::of::<f64>(),
                &["GetSum", "GetTerms"],
            ),
            ConnectorSpec::output("GetSum", ValueType::of::<f64>()),
            ConnectorSpec::output("GetTerms", ValueType::of::<Vec<f64>>()),
        ]
    }

    fn add_contribution(
        &mut self,
        port: usize,
        id: ContributionId,
        value: Value,
    ) -> Result<(), ModuleError> {
        Self::check_port(port)?;
        self.terms.push((id, finite_f64(port, &value)?));
        Ok(())
    }

    fn replace_contribution(
        &mut self,
        port: usize,
        id: ContributionId,
        value: Value,
    ) -> Result<(), ModuleError> {
        Self::check_port(port)?;
        let v = finite_f64(port, &value)?;
        let index = self.position(id)?;
        self.terms[index].1 = v;
        Ok(())
    }

    fn remove_contribution(&mut self, port: usize, id: ContributionId) -> Result<(), ModuleError> {
        Self::check_port(port)?;
        let index = self.position(id)?;
        self.terms.remove(index);
        Ok(())
    }

    fn get_output(&mut self, port: usize) -> Result<Value, ModuleError> {
        match port {
            Self::GET_SUM => Ok(Value::new(self.terms.iter().map(|(_, v)| v).sum::<f64>())),
            Self::GET_TERMS => Ok(Value::new(
                self.terms.iter().map(|(_, v)| *v).collect::<Vec<f64>>(),
            )),
            _ => Err(ModuleFailure::UnknownPort { module: "sum", port }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivulet_core::ConnectionGraph;

    // ContributionIds can only be minted by a runtime, so these tests go
    // through a graph.
    #[test]
    fn direct_contributions_sum_in_order() {
        let mut graph = ConnectionGraph::new();
        let m = graph.add_module(Box::new(Sum::new())).unwrap();
        let add = graph.connector(m, "AddSummand").unwrap();
        let first = graph.add_contribution(add, Value::new(1.5)).unwrap();
        graph.add_contribution(add, Value::new(2.5)).unwrap();

        let sum = graph.connector(m, "GetSum").unwrap();
        let terms = graph.connector(m, "GetTerms").unwrap();
        assert_eq!(graph.get(sum).unwrap().cloned::<f64>(), Some(4.0));

        graph.remove_contribution(add, first).unwrap();
        assert_eq!(graph.get(sum).unwrap().cloned::<f64>(), Some(2.5));
        assert_eq!(
            graph.get(terms).unwrap().cloned::<Vec<f64>>(),
            Some(vec![2.5])
        );
    }

    #[test]
    fn empty_sum_is_zero() {
        let mut sum = Sum::new();
        assert!(sum.is_empty());
        let out = sum.get_output(Sum::GET_SUM).unwrap();
        assert_eq!(out.cloned::<f64>(), Some(0.0));
    }
}
