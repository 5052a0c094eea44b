use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rptdiff::graph::build_rise_fall;
use rptdiff::model::{ArcKind, Net, Path, Pin, RiseFall};
use rptdiff::model::Db;

const CHAIN_LEN: usize = 2_000;

/// A single straight-line path of `CHAIN_LEN` alternating cell/net arcs,
/// the worst case for the topological-order precomputation.
fn chain_db() -> Db {
    let mut db = Db::new();
    let mut pins = Vec::with_capacity(CHAIN_LEN);
    for i in 0..CHAIN_LEN {
        let is_input = i % 2 == 0;
        let name = format!("p{i}");
        let id = db.intern_pin(&name, || {
            let mut pin = Pin::new(&name, is_input, RiseFall::Rise);
            pin.incr_delay = 0.01;
            pin
        });
        pins.push(id);
    }
    for window in pins.windows(2) {
        db.add_net(Net {
            name: format!("net_{}", window[0].index()),
            fanout: 1,
            cap: 0.0,
            driver: window[0],
            sink: window[1],
        });
    }
    db.add_path(Path {
        startpoint: "p0".into(),
        endpoint: format!("p{}", CHAIN_LEN - 1),
        group: "default".into(),
        path_type: "max".into(),
        clock: None,
        slack: 0.0,
        pins,
    });
    db.finalize();
    db
}

fn build(c: &mut Criterion) {
    let db = chain_db();
    c.bench_function("build rise/fall graphs over a 2000-pin chain", |b| {
        b.iter(|| black_box(build_rise_fall(black_box(&db))));
    });
}

fn query(c: &mut Criterion) {
    let db = chain_db();
    let graphs = build_rise_fall(&db);
    let endpoint = format!("p{}", CHAIN_LEN - 1);
    c.bench_function("query end-to-end shortest path over a 2000-pin chain", |b| {
        b.iter(|| black_box(graphs.rise.query(black_box("p0"), black_box(&endpoint))));
    });
}

criterion_group!(benches, build, query);
criterion_main!(benches);
