use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ome_core::{MatchingEngine, Nos, OrderType, Side};
use uuid::Uuid;

fn test_nos(side: Side, order_type: OrderType, price: u32, qty: u32) -> Nos {
    Nos {
        order_id: Uuid::new_v4(),
        symbol: "AAPL".to_string(),
        side,
        order_type,
        price,
        qty,
        ts: 0,
    }
}

fn new_engine() -> MatchingEngine {
    let (audit_tx, _audit_rx) = crossbeam_channel::unbounded();
    let (engine, _reports_rx) = MatchingEngine::new(audit_tx);
    engine
}

fn matching_engine_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching_engine_operations");

    group.bench_function("resting_limit_order", |b| {
        let mut engine = new_engine();
        b.iter(|| {
            black_box(engine.on_nos(test_nos(Side::Buy, OrderType::Limit, 100, 1)));
        });
    });

    group.bench_function("crossing_limit_order", |b| {
        let mut engine = new_engine();
        b.iter(|| {
            engine.on_nos(test_nos(Side::Sell, OrderType::Limit, 100, 1));
            black_box(engine.on_nos(test_nos(Side::Buy, OrderType::Limit, 100, 1)));
        });
    });

    group.bench_function("market_order_against_deep_book", |b| {
        let mut engine = new_engine();
        for i in 0..100 {
            engine.on_nos(test_nos(Side::Sell, OrderType::Limit, 100 + i, 10));
        }
        b.iter(|| {
            black_box(engine.on_nos(test_nos(Side::Buy, OrderType::Market, 0, 1)));
        });
    });

    group.bench_function("ioc_partial_fill_then_cancel", |b| {
        let mut engine = new_engine();
        for _ in 0..5 {
            engine.on_nos(test_nos(Side::Sell, OrderType::Limit, 100, 1));
        }
        b.iter(|| {
            black_box(engine.on_nos(test_nos(Side::Buy, OrderType::Ioc, 100, 10)));
        });
    });

    group.bench_function("cascading_match_against_resting_ladder", |b| {
        let mut engine = new_engine();
        b.iter(|| {
            for i in 0..10 {
                engine.on_nos(test_nos(Side::Sell, OrderType::Limit, 100 + i, 1));
            }
            black_box(engine.on_nos(test_nos(Side::Buy, OrderType::Limit, 109, 10)));
        });
    });

    group.finish();
}

criterion_group!(benches, matching_engine_benchmark);
criterion_main!(benches);
