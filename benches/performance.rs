//! Performance benchmarks for fragment encoding and sync cycles.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::sync::Arc;
use url_hash_binding::{
    decode_component, parse_object, BindingConfig, EncodedState, FnFetcher, JsonStateTree,
    MemoryNavigation, RecordingStatus, RemoteLoader, ResolvedUrl, Result, StandardResolver,
    UrlHashBinding,
};

fn no_fetch(_: &ResolvedUrl) -> Result<String> {
    Ok("{}".to_string())
}

/// A state with `layers` entries, shaped like a typical viewer layout.
fn make_state(layers: usize) -> Value {
    let layers: Vec<Value> = (0..layers)
        .map(|i| {
            json!({
                "name": format!("layer {}", i),
                "source": format!("gs://bucket/volume-{}", i),
                "shader": "void main() { emitGrayscale(toNormalized(getDataValue())); }",
                "visible": i % 2 == 0,
                "opacity": 0.5,
            })
        })
        .collect();
    json!({
        "layers": layers,
        "position": [1024.5, 2048.5, 96.0],
        "crossSectionScale": 1.5,
        "layout": "4panel",
    })
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_state");

    for layers in [1, 10, 100] {
        let state = make_state(layers);
        group.bench_with_input(BenchmarkId::new("layers", layers), &state, |b, state| {
            b.iter(|| black_box(EncodedState::from_value(state)));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_state");

    for layers in [1, 10, 100] {
        let escaped = EncodedState::from_value(&make_state(layers)).escaped;
        group.bench_with_input(BenchmarkId::new("layers", layers), &escaped, |b, escaped| {
            b.iter(|| {
                let text = decode_component(escaped).unwrap();
                black_box(parse_object(&text).unwrap())
            });
        });
    }

    group.finish();
}

/// Outbound cycle on a changed tree, then the echo of that write.
fn bench_sync_cycle(c: &mut Criterion) {
    c.bench_function("outbound_then_echo", |b| {
        let tree = Arc::new(JsonStateTree::new());
        let nav = Arc::new(MemoryNavigation::new("https://app/").unwrap());
        let remote = RemoteLoader::new(
            Arc::new(StandardResolver),
            Arc::new(FnFetcher(no_fetch)),
            Arc::new(RecordingStatus::new()),
        );
        let mut binding = UrlHashBinding::new(tree.clone(), nav, remote, BindingConfig::default());
        binding.update_from_url_hash();
        tree.set("layers", make_state(10)["layers"].clone());

        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            tree.set("frame", json!(i));
            black_box(binding.update_url_hash());
            black_box(binding.update_from_url_hash());
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_sync_cycle);
criterion_main!(benches);
