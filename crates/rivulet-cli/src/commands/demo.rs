//! Step-by-step walkthrough of a small connection graph.

use clap::Args;
use rivulet_core::{ConnectionGraph, ConnectorId, ModuleId, ProgressCounter, Value};
use rivulet_modules::{Accumulator, Scaler, ValueHolder};

#[derive(Args)]
pub struct DemoArgs {
    /// Value set on the source holder
    #[arg(long, default_value_t = 5.0)]
    value: f64,

    /// Factor of the scaler
    #[arg(long, default_value_t = 2.0)]
    factor: f64,
}

fn port(graph: &ConnectionGraph, module: ModuleId, name: &str) -> anyhow::Result<ConnectorId> {
    Ok(graph.connector(module, name)?)
}

fn read_f64(graph: &mut ConnectionGraph, module: ModuleId, name: &str) -> anyhow::Result<f64> {
    let output = port(graph, module, name)?;
    graph
        .get(output)?
        .cloned::<f64>()
        .ok_or_else(|| anyhow::anyhow!("{name} did not produce a number"))
}

fn read_u64(graph: &mut ConnectionGraph, module: ModuleId, name: &str) -> anyhow::Result<u64> {
    let output = port(graph, module, name)?;
    graph
        .get(output)?
        .cloned::<u64>()
        .ok_or_else(|| anyhow::anyhow!("{name} did not produce a count"))
}

pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    let counter = ProgressCounter::new();
    let mut graph = ConnectionGraph::new();
    graph.set_observer(Some(Box::new(counter.clone())));

    let a = graph.add_module(Box::new(ValueHolder::default()))?;
    let b = graph.add_module(Box::new(Scaler::new(args.factor)))?;
    let c = graph.add_module(Box::new(Accumulator::new()))?;
    println!("Modules: a (value), b (scale x{}), c (accumulator)", args.factor);
    println!();

    let a_in = port(&graph, a, "SetValue")?;
    let a_out = port(&graph, a, "GetValue")?;
    let b_in = port(&graph, b, "SetValue")?;
    let b_out = port(&graph, b, "GetOutput")?;
    let c_in = port(&graph, c, "Push")?;

    graph.connect(a_out, b_in)?;
    graph.connect(b_out, c_in)?;
    println!("1. connect a.GetValue -> b.SetValue, b.GetOutput -> c.Push");
    println!("   c.GetCount = {}", read_u64(&mut graph, c, "GetCount")?);

    graph.set(a_in, Value::new(args.value))?;
    println!("2. a.SetValue({})", args.value);
    println!("   b.GetOutput = {}", read_f64(&mut graph, b, "GetOutput")?);
    println!("   c.GetCount = {}", read_u64(&mut graph, c, "GetCount")?);

    let before = counter.total_recomputed();
    let factor = port(&graph, b, "SetFactor")?;
    let offset = port(&graph, b, "SetOffset")?;
    graph.set_multiple_values([
        (factor, Value::new(args.factor + 1.0)),
        (offset, Value::new(1.0)),
    ])?;
    println!(
        "3. batch b.SetFactor({}) + b.SetOffset(1): {} recomputation(s)",
        args.factor + 1.0,
        counter.total_recomputed() - before
    );
    println!("   b.GetOutput = {}", read_f64(&mut graph, b, "GetOutput")?);
    println!("   c.GetCount = {}", read_u64(&mut graph, c, "GetCount")?);

    graph.disconnect(a_out, b_in)?;
    graph.set(a_in, Value::new(args.value * 10.0))?;
    println!("4. disconnect a.GetValue -> b.SetValue, then a.SetValue({})", args.value * 10.0);
    println!("   b.GetOutput = {}", read_f64(&mut graph, b, "GetOutput")?);
    println!("   c.GetTotal = {}", read_f64(&mut graph, c, "GetTotal")?);

    graph.destroy_connectors(a)?;
    println!("5. destroy a");
    match graph.set(a_in, Value::new(0.0)) {
        Err(e) => println!("   a.SetValue -> {e}"),
        Ok(()) => anyhow::bail!("destroyed module still accepted a value"),
    }

    Ok(())
}
