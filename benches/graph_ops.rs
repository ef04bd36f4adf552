//! Benchmarks for graph mutation operations
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flowvis_rs::graph::{DataEdge, Graph, Module, Sensor};
use flowvis_rs::render::RecordingRenderer;

fn sensor(i: usize) -> Sensor {
    Sensor {
        id: format!("sensor_{i}"),
        state_keys: vec!["state".to_string()],
        returns: vec!["out".to_string()],
    }
}

fn module(i: usize) -> Module {
    Module {
        id: format!("module_{i}"),
        params: vec!["in".to_string()],
        returns: vec!["out".to_string()],
        network: false,
    }
}

fn edge(i: usize) -> DataEdge {
    DataEdge {
        stateless: true,
        out_id: format!("sensor_{i}"),
        out_ret: "out".to_string(),
        module_id: format!("module_{i}"),
        module_param: "in".to_string(),
    }
}

/// Graph with n sensors and n modules, no edges.
fn populated_graph(n: usize) -> Graph<RecordingRenderer> {
    let mut graph = Graph::new(RecordingRenderer::new());
    for i in 0..n {
        graph.register_sensor(sensor(i)).expect("register sensor");
        graph.register_module(module(i)).expect("register module");
    }
    graph
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    group.throughput(Throughput::Elements(1));

    group.bench_function("register_sensor", |b| {
        let mut graph = Graph::new(RecordingRenderer::new());
        let mut i = 0usize;
        b.iter(|| {
            graph.register_sensor(black_box(sensor(i))).expect("fresh id");
            i += 1;
        });
    });

    group.finish();
}

fn bench_edge_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_edge_cycle");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("add_remove", size), size, |b, &size| {
            let mut graph = populated_graph(size);
            let edge = edge(size / 2);
            b.iter(|| {
                graph.add_data_edge(black_box(edge.clone())).expect("add");
                graph.remove_data_edge(black_box(&edge)).expect("remove");
            });
        });
    }

    group.finish();
}

fn bench_duplicate_rejection(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_rejection");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("add_duplicate", size), size, |b, &size| {
            let mut graph = populated_graph(size);
            let edge = edge(size / 2);
            graph.add_data_edge(edge.clone()).expect("seed edge");
            b.iter(|| {
                let result = graph.add_data_edge(black_box(edge.clone()));
                assert!(result.is_err());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_registration,
    bench_edge_cycle,
    bench_duplicate_rejection
);
criterion_main!(benches);
