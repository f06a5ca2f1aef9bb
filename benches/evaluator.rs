use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use poker_eval::equity::holdem_equities;
use poker_eval::{eval5, eval7, Card};

fn cards<const N: usize>(s: &str) -> [Card; N] {
    s.split(' ')
        .map(|p| Card::parse(p).unwrap())
        .collect::<Vec<_>>()
        .try_into()
        .unwrap()
}

fn bench_eval5(c: &mut Criterion) {
    let hi: [Card; 5] = cards("HA DK S7 C5 D2");
    let sf: [Card; 5] = cards("SA SK SQ SJ ST");

    let mut g = c.benchmark_group("eval5");
    g.bench_function("high_card", |b| b.iter(|| eval5(black_box(&hi))));
    g.bench_function("straight_flush", |b| b.iter(|| eval5(black_box(&sf))));
    g.finish();
}

fn bench_eval7(c: &mut Criterion) {
    let h: [Card; 7] = cards("HK DK S2 D3 CQ DJ D7");
    c.bench_function("eval7", |b| b.iter(|| eval7(black_box(&h))));
}

fn bench_flop_equity(c: &mut Criterion) {
    let hands = [
        [Card::parse("Ac").unwrap(), Card::parse("Kh").unwrap()],
        [Card::parse("Kd").unwrap(), Card::parse("Th").unwrap()],
        [Card::parse("9h").unwrap(), Card::parse("9d").unwrap()],
    ];
    let board: [Card; 3] = cards("2d 2h 2s");
    c.bench_function("flop_equity_3way", |b| {
        b.iter(|| holdem_equities(black_box(&hands), black_box(&board)).unwrap())
    });
}

criterion_group!(benches, bench_eval5, bench_eval7, bench_flop_equity);
criterion_main!(benches);
