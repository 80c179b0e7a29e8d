//! Property-based tests for the connection graph.
//!
//! Random chains, random batch contents and random edit sequences check that
//! propagation always settles on the directly computed result and that the
//! edge bookkeeping stays consistent.

use proptest::prelude::*;
use rivulet_core::{
    ConnectionGraph, ConnectorId, ConnectorSpec, ContributionId, Module, ModuleError, ModuleId,
    Value, ValueType,
};

/// Adds a constant to its input.
struct Offset {
    offset: f64,
    value: f64,
}

impl Module for Offset {
    fn type_name(&self) -> &'static str {
        "offset"
    }

    fn connectors(&self) -> Vec<ConnectorSpec> {
        vec![
            ConnectorSpec::input("SetValue", ValueType::of::<f64>(), &["GetValue"]),
            ConnectorSpec::output("GetValue", ValueType::of::<f64>()),
        ]
    }

    fn set_input(&mut self, _port: usize, value: Value) -> Result<(), ModuleError> {
        self.value = value.cloned::<f64>().ok_or("expected f64")?;
        Ok(())
    }

    fn get_output(&mut self, _port: usize) -> Result<Value, ModuleError> {
        Ok(Value::new(self.value + self.offset))
    }
}

/// Ordered contribution list.
#[derive(Default)]
struct Terms(Vec<(ContributionId, f64)>);

impl Module for Terms {
    fn type_name(&self) -> &'static str {
        "terms"
    }

    fn connectors(&self) -> Vec<ConnectorSpec> {
        vec![
            ConnectorSpec::multi_input("AddTerm", ValueType::of::<f64>(), &["GetTerms"]),
            ConnectorSpec::output("GetTerms", ValueType::of::<Vec<f64>>()),
        ]
    }

    fn add_contribution(
        &mut self,
        _port: usize,
        id: ContributionId,
        value: Value,
    ) -> Result<(), ModuleError> {
        self.0.push((id, value.cloned::<f64>().ok_or("expected f64")?));
        Ok(())
    }

    fn replace_contribution(
        &mut self,
        _port: usize,
        id: ContributionId,
        value: Value,
    ) -> Result<(), ModuleError> {
        if let Some(slot) = self.0.iter_mut().find(|(c, _)| *c == id) {
            slot.1 = value.cloned::<f64>().ok_or("expected f64")?;
        }
        Ok(())
    }

    fn remove_contribution(&mut self, _port: usize, id: ContributionId) -> Result<(), ModuleError> {
        self.0.retain(|(c, _)| *c != id);
        Ok(())
    }

    fn get_output(&mut self, _port: usize) -> Result<Value, ModuleError> {
        Ok(Value::new(self.0.iter().map(|(_, v)| *v).collect::<Vec<_>>()))
    }
}

fn add_offset(graph: &mut ConnectionGraph, offset: f64) -> ModuleId {
    graph
        .add_module(Box::new(Offset { offset, value: 0.0 }))
        .unwrap()
}

fn read(graph: &mut ConnectionGraph, output: ConnectorId) -> f64 {
    graph.get(output).unwrap().cloned::<f64>().unwrap()
}

/// Builds a linear chain and returns (head input, tail output).
fn chain(graph: &mut ConnectionGraph, offsets: &[f64]) -> (ConnectorId, ConnectorId) {
    let ids: Vec<ModuleId> = offsets.iter().map(|&o| add_offset(graph, o)).collect();
    for pair in ids.windows(2) {
        let from = graph.connector(pair[0], "GetValue").unwrap();
        let to = graph.connector(pair[1], "SetValue").unwrap();
        graph.connect(from, to).unwrap();
    }
    let head = graph.connector(ids[0], "SetValue").unwrap();
    let tail = graph.connector(ids[ids.len() - 1], "GetValue").unwrap();
    (head, tail)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The tail of a chain always equals the input plus every offset,
    /// whatever sequence of sets preceded the read.
    #[test]
    fn chain_settles_on_last_set(
        offsets in prop::collection::vec(-10i32..10, 1..8),
        sets in prop::collection::vec(-100i32..100, 1..10),
    ) {
        let offsets: Vec<f64> = offsets.into_iter().map(f64::from).collect();
        let mut graph = ConnectionGraph::new();
        let (head, tail) = chain(&mut graph, &offsets);
        for &v in &sets {
            graph.set(head, Value::new(f64::from(v))).unwrap();
        }
        let expected = f64::from(sets[sets.len() - 1]) + offsets.iter().sum::<f64>();
        prop_assert_eq!(read(&mut graph, tail), expected);
    }

    /// A batch leaves every chain where applying the same sets one by one
    /// would leave it.
    #[test]
    fn batch_matches_sequential_sets(
        values in prop::collection::vec((0usize..3, -50i32..50), 1..12),
    ) {
        let mut batched = ConnectionGraph::new();
        let mut sequential = ConnectionGraph::new();
        let mut heads = (Vec::new(), Vec::new());
        let mut tails = (Vec::new(), Vec::new());
        for offset in [1.0, 2.0, 3.0] {
            let (h, t) = chain(&mut batched, &[offset, offset]);
            heads.0.push(h);
            tails.0.push(t);
            let (h, t) = chain(&mut sequential, &[offset, offset]);
            heads.1.push(h);
            tails.1.push(t);
        }

        batched
            .set_multiple_values(
                values.iter().map(|&(i, v)| (heads.0[i], Value::new(f64::from(v)))),
            )
            .unwrap();
        for &(i, v) in &values {
            sequential.set(heads.1[i], Value::new(f64::from(v))).unwrap();
        }

        for i in 0..3 {
            prop_assert_eq!(read(&mut batched, tails.0[i]), read(&mut sequential, tails.1[i]));
            prop_assert!(batched.is_active(tails.0[i]).unwrap());
        }
    }

    /// After any sequence of connections and removals, the multi-input holds
    /// exactly the surviving sources' values in connection order.
    #[test]
    fn multi_input_order_survives_edits(
        values in prop::collection::vec(-20i32..20, 1..8),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..5),
    ) {
        let mut graph = ConnectionGraph::new();
        let terms = graph.add_module(Box::new(Terms::default())).unwrap();
        let add = graph.connector(terms, "AddTerm").unwrap();
        let out = graph.connector(terms, "GetTerms").unwrap();

        let mut live: Vec<(ConnectorId, f64)> = Vec::new();
        for &v in &values {
            let m = add_offset(&mut graph, 0.0);
            graph.set(graph.connector(m, "SetValue").unwrap(), Value::new(f64::from(v))).unwrap();
            let get = graph.connector(m, "GetValue").unwrap();
            graph.connect(get, add).unwrap();
            live.push((get, f64::from(v)));
        }
        for index in removals {
            if live.is_empty() {
                break;
            }
            let (get, _) = live.remove(index.index(live.len()));
            graph.disconnect(get, add).unwrap();
        }

        let expected: Vec<f64> = live.iter().map(|&(_, v)| v).collect();
        prop_assert_eq!(graph.get(out).unwrap().cloned::<Vec<f64>>().unwrap(), expected);
        prop_assert_eq!(graph.edge_count(), live.len());
        prop_assert_eq!(graph.contributions(add).unwrap().len(), live.len());
    }

    /// Rings of any length terminate on every set and every module in the
    /// ring ends up holding the value that was set.
    #[test]
    fn rings_terminate(len in 1usize..6, v in -100i32..100) {
        let mut graph = ConnectionGraph::new();
        let ids: Vec<ModuleId> = (0..len).map(|_| add_offset(&mut graph, 0.0)).collect();
        for i in 0..len {
            let from = graph.connector(ids[i], "GetValue").unwrap();
            let to = graph.connector(ids[(i + 1) % len], "SetValue").unwrap();
            graph.connect(from, to).unwrap();
        }
        graph.set(graph.connector(ids[0], "SetValue").unwrap(), Value::new(f64::from(v))).unwrap();
        for &id in &ids {
            let get = graph.connector(id, "GetValue").unwrap();
            prop_assert_eq!(read(&mut graph, get), f64::from(v));
        }
    }
}
