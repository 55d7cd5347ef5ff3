use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reversible::{prelude::*, random::random_acceptor, random::random_sample};

const TOKENS: [&str; 4] = ["a", "b", "c", "d"];
const SEEDS: [u64; 3] = [3, 2, 7];

lazy_static::lazy_static! {
    static ref SAMPLES: Vec<Sample> = SEEDS
        .iter()
        .map(|&seed| Sample::new(random_sample(&TOKENS, 20, 6, seed)))
        .collect();
    static ref ACCEPTORS: Vec<Acceptor> = SEEDS
        .iter()
        .map(|&seed| random_acceptor(&TOKENS, 40, seed))
        .collect();
}

fn inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference");
    for k in 0..=2 {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| {
                for sample in SAMPLES.iter() {
                    let _ = black_box(Inference::new(k).infer(sample));
                }
            })
        });
    }
    group.finish();
}

fn minimization(c: &mut Criterion) {
    let alphabet = Alphabet::new(TOKENS);
    c.bench_function("minimize random acceptors", |b| {
        b.iter(|| {
            for acceptor in ACCEPTORS.iter() {
                let _ = black_box(minimize(acceptor, &alphabet));
            }
        })
    });
}

criterion_group!(benches, inference, minimization);
criterion_main!(benches);
