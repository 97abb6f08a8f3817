//! Benchmark harness using Criterion for latency measurement.
//!
//! Measures:
//! - Add order (no match / full match at varying depth)
//! - Cancel and modify at varying book sizes
//! - Quote reads
//! - Mixed add/cancel/modify/quote workload

use bitlob::{OrderBook, Side};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Benchmark: add an order that rests (no matching)
fn bench_add_no_match(c: &mut Criterion) {
    let mut book = OrderBook::new();
    book.warm_up();

    let mut order_id = 0u64;

    c.bench_function("add_no_match", |b| {
        b.iter(|| {
            order_id += 1;
            // rests below any ask
            book.add_order(order_id, Side::Buy, 9_000, 100);
            black_box(book.trades().len())
        })
    });
}

/// Benchmark: add an order that fully matches against resting depth
fn bench_add_full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_full_match");

    for depth in [1u64, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let mut book = OrderBook::new();
            book.warm_up();

            for i in 0..depth {
                book.add_order(i, Side::Sell, 10_000, 100);
            }

            let mut order_id = 1_000u64;

            b.iter(|| {
                order_id += 1;
                book.add_order(order_id, Side::Buy, 10_000, 100);
                let trades = black_box(book.trades().len());

                // replenish the consumed maker
                book.add_order(order_id + 1_000_000, Side::Sell, 10_000, 100);
                trades
            })
        });
    }

    group.finish();
}

/// Benchmark: cancel with varying book sizes
fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel");

    for book_size in [100u64, 1_000, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(book_size),
            book_size,
            |b, &book_size| {
                let mut book = OrderBook::new();
                book.warm_up();

                for i in 0..book_size {
                    let (side, price) = if i % 2 == 0 {
                        (Side::Buy, 9_000 + (i as u32 % 100) * 10)
                    } else {
                        (Side::Sell, 11_000 + (i as u32 % 100) * 10)
                    };
                    book.add_order(i, side, price, 100);
                }

                let mut cancel_id = 0u64;
                let mut next_order_id = book_size;

                b.iter(|| {
                    book.cancel_order(cancel_id);

                    // replenish
                    let (side, price) = if cancel_id % 2 == 0 {
                        (Side::Buy, 9_000 + (cancel_id as u32 % 100) * 10)
                    } else {
                        (Side::Sell, 11_000 + (cancel_id as u32 % 100) * 10)
                    };
                    book.add_order(next_order_id, side, price, 100);

                    cancel_id = next_order_id;
                    next_order_id += 1;
                })
            },
        );
    }

    group.finish();
}

/// Benchmark: quantity-only amendments
fn bench_modify(c: &mut Criterion) {
    let mut book = OrderBook::new();
    book.warm_up();

    for i in 0..10_000u64 {
        book.add_order(i, Side::Buy, 9_000 + (i as u32 % 200), 100);
    }

    let mut modify_id = 0u64;
    let mut new_qty = 1u32;

    c.bench_function("modify", |b| {
        b.iter(|| {
            modify_id = (modify_id + 1) % 10_000;
            new_qty = new_qty % 500 + 1;
            book.modify_order(modify_id, new_qty);
        })
    });
}

/// Benchmark: top-of-book reads against a populated book
fn bench_quote(c: &mut Criterion) {
    let mut book = OrderBook::new();
    book.warm_up();

    for i in 0..1_000u64 {
        book.add_order(i + 1, Side::Buy, 10_000 - i as u32, 100);
        book.add_order(i + 1_001, Side::Sell, 10_001 + i as u32, 100);
    }

    c.bench_function("quote", |b| b.iter(|| black_box(book.quote())));
}

/// Benchmark: mixed workload (add / cancel / modify / quote)
fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_workload");

    group.bench_function("add_cancel_modify_quote", |b| {
        let mut book = OrderBook::new();
        book.warm_up();

        let mut rng = ChaCha8Rng::seed_from_u64(0xDEAD_BEEF);
        let mut next_order_id = 1u64;

        // pre-populate both sides around the spread
        for i in 0..100u32 {
            book.add_order(next_order_id, Side::Buy, 9_950 - i, 100);
            next_order_id += 1;
            book.add_order(next_order_id, Side::Sell, 10_050 + i, 100);
            next_order_id += 1;
        }

        b.iter(|| {
            match rng.gen_range(0..4) {
                0 => {
                    let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                    book.add_order(
                        next_order_id,
                        side,
                        rng.gen_range(9_900..10_100),
                        rng.gen_range(1..100),
                    );
                    next_order_id += 1;
                }
                1 => {
                    book.cancel_order(rng.gen_range(1..next_order_id));
                }
                2 => {
                    book.modify_order(rng.gen_range(1..next_order_id), rng.gen_range(1..100));
                }
                _ => {
                    black_box(book.quote());
                }
            };
        })
    });

    group.finish();
}

/// Benchmark: throughput (orders per second)
fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.throughput(criterion::Throughput::Elements(1_000));

    group.bench_function("1000_orders", |b| {
        let mut book = OrderBook::new();
        book.warm_up();

        let mut rng = ChaCha8Rng::seed_from_u64(0xCAFE_BABE);

        b.iter(|| {
            for i in 0..1_000u64 {
                let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                book.add_order(i, side, rng.gen_range(9_900..10_100), rng.gen_range(1..500));
                black_box(book.trades().len());
            }
            book.clear();
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_add_no_match,
    bench_add_full_match,
    bench_cancel,
    bench_modify,
    bench_quote,
    bench_mixed_workload,
    bench_throughput,
);

criterion_main!(benches);
