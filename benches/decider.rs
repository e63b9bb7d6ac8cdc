//! Regression-tracking benchmark for the light decider on a scaled random
//! curve pair, not a correctness check (see `tests/` for that).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frechet::config::DeciderFlags;
use frechet::curve::Curve;
use frechet::decider;
use frechet::geometry::Point;
use frechet::metrics::Metrics;
use rand::{Rng, SeedableRng};

fn random_curve(rng: &mut impl Rng, len: usize) -> Curve {
    let mut points = Vec::with_capacity(len);
    let mut x = 0.0;
    let mut y = 0.0;
    for _ in 0..len {
        x += rng.gen_range(-1.0..1.0);
        y += rng.gen_range(-1.0..1.0);
        points.push(Point::new(x, y));
    }
    Curve::new(points, "bench")
}

fn bench_decider(c: &mut Criterion) {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(99);
    let p = random_curve(&mut rng, 500);
    let q = random_curve(&mut rng, 500);

    c.bench_function("decider::decide 500x500", |b| {
        b.iter(|| {
            let mut metrics = Metrics::default();
            black_box(decider::decide(black_box(&p), black_box(&q), 2.0, DeciderFlags::all(), &mut metrics))
        })
    });
}

criterion_group!(benches, bench_decider);
criterion_main!(benches);
