//! Integration tests: reference modules wired through a connection graph.

use rivulet_core::{ConnectionGraph, ConnectorError, ConnectorId, ModuleId, Value};
use rivulet_modules::{ModuleFailure, ModuleRegistry, Scaler, ValueHolder};

fn add(graph: &mut ConnectionGraph, registry: &ModuleRegistry, id: &str) -> ModuleId {
    graph.add_module(registry.create(id).unwrap()).unwrap()
}

fn port(graph: &ConnectionGraph, module: ModuleId, name: &str) -> ConnectorId {
    graph.connector(module, name).unwrap()
}

fn read<T: Clone + 'static>(graph: &mut ConnectionGraph, module: ModuleId, name: &str) -> T {
    let output = port(graph, module, name);
    graph.get(output).unwrap().cloned::<T>().unwrap()
}

#[test]
fn holder_into_doubling_scaler_reads_ten() {
    let mut graph = ConnectionGraph::new();
    let a = graph.add_module(Box::new(ValueHolder::default())).unwrap();
    let b = graph.add_module(Box::new(Scaler::new(2.0))).unwrap();

    graph
        .connect(port(&graph, a, "GetValue"), port(&graph, b, "SetValue"))
        .unwrap();
    graph.set(port(&graph, a, "SetValue"), Value::new(5.0)).unwrap();

    assert_eq!(read::<f64>(&mut graph, b, "GetOutput"), 10.0);
}

#[test]
fn scaler_parameters_batch_into_one_update() {
    let registry = ModuleRegistry::new();
    let mut graph = ConnectionGraph::new();
    let s = add(&mut graph, &registry, "scale");
    let acc = add(&mut graph, &registry, "accumulator");
    graph
        .connect(port(&graph, s, "GetOutput"), port(&graph, acc, "Push"))
        .unwrap();
    // The initial delivery pushed 0.0 once.
    assert_eq!(read::<u64>(&mut graph, acc, "GetCount"), 1);

    graph
        .set_multiple_values([
            (port(&graph, s, "SetValue"), Value::new(3.0)),
            (port(&graph, s, "SetFactor"), Value::new(4.0)),
            (port(&graph, s, "SetOffset"), Value::new(1.0)),
        ])
        .unwrap();

    assert_eq!(read::<u64>(&mut graph, acc, "GetCount"), 2);
    assert_eq!(read::<f64>(&mut graph, acc, "GetTotal"), 13.0);
}

#[test]
fn sum_follows_sources() {
    let registry = ModuleRegistry::new();
    let mut graph = ConnectionGraph::new();
    let sum = add(&mut graph, &registry, "sum");
    let summand = port(&graph, sum, "AddSummand");
    let mut sources = Vec::new();
    for v in [1.0, 2.0, 3.0] {
        let h = add(&mut graph, &registry, "value");
        graph.set(port(&graph, h, "SetValue"), Value::new(v)).unwrap();
        graph.connect(port(&graph, h, "GetValue"), summand).unwrap();
        sources.push(h);
    }
    assert_eq!(read::<f64>(&mut graph, sum, "GetSum"), 6.0);

    graph
        .set(port(&graph, sources[2], "SetValue"), Value::new(10.0))
        .unwrap();
    assert_eq!(read::<Vec<f64>>(&mut graph, sum, "GetTerms"), vec![1.0, 2.0, 10.0]);

    graph.destroy_connectors(sources[0]).unwrap();
    assert_eq!(read::<Vec<f64>>(&mut graph, sum, "GetTerms"), vec![2.0, 10.0]);
    assert_eq!(read::<f64>(&mut graph, sum, "GetSum"), 12.0);
}

#[test]
fn counter_counts_upstream_changes() {
    let registry = ModuleRegistry::new();
    let mut graph = ConnectionGraph::new();
    let h = add(&mut graph, &registry, "value");
    let c = add(&mut graph, &registry, "counter");
    graph
        .connect(port(&graph, h, "GetValue"), port(&graph, c, "Increment"))
        .unwrap();

    for v in [1.0, 2.0, 3.0] {
        graph.set(port(&graph, h, "SetValue"), Value::new(v)).unwrap();
    }
    assert_eq!(read::<u64>(&mut graph, c, "GetCount"), 4);

    graph.trigger(port(&graph, c, "Reset")).unwrap();
    assert_eq!(read::<u64>(&mut graph, c, "GetCount"), 0);
}

#[test]
fn accumulator_mean_is_never_cached() {
    let registry = ModuleRegistry::new();
    let mut graph = ConnectionGraph::new();
    let acc = add(&mut graph, &registry, "accumulator");
    let push = port(&graph, acc, "Push");
    graph.set(push, Value::new(2.0)).unwrap();
    graph.set(push, Value::new(4.0)).unwrap();
    assert_eq!(read::<f64>(&mut graph, acc, "GetMean"), 3.0);
    assert!(graph.is_dirty(port(&graph, acc, "GetMean")).unwrap());
}

#[test]
fn module_failures_surface_through_graph() {
    let mut graph = ConnectionGraph::new();
    let s = graph.add_module(Box::new(Scaler::new(1.0))).unwrap();
    let err = graph
        .set(port(&graph, s, "SetFactor"), Value::new(f64::NAN))
        .unwrap_err();
    let source = match err {
        ConnectorError::Module { source, .. } => source,
        other => panic!("expected module failure, got {other:?}"),
    };
    let failure = source.downcast_ref::<ModuleFailure>().unwrap();
    assert!(matches!(failure, ModuleFailure::NonFinite { port: 1, .. }));
}
