//! Black-box integration tests for the cross-module invariants of spec §8,
//! run against the public API only.

use frechet::certificate::{self, Certificate};
use frechet::config::DeciderFlags;
use frechet::curve::Curve;
use frechet::database::Database;
use frechet::distance::calc_distance;
use frechet::geometry::Point;
use frechet::metrics::Metrics;
use frechet::{decider, naive};

use rand::SeedableRng;
use rand::Rng;

fn random_curve(rng: &mut impl Rng, len: usize) -> Curve {
    let mut points = Vec::with_capacity(len);
    let mut x = 0.0;
    let mut y = 0.0;
    for _ in 0..len {
        x += rng.gen_range(-1.0..1.0);
        y += rng.gen_range(-1.0..1.0);
        points.push(Point::new(x, y));
    }
    Curve::new(points, "random")
}

#[test]
fn correctness_vs_naive_on_random_curves() {
    for seed in 0..25u64 {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..40 {
            let p = random_curve(&mut rng, rng.gen_range(2..40));
            let q = random_curve(&mut rng, rng.gen_range(2..40));
            let delta = rng.gen_range(0.05..8.0);
            let mut metrics = Metrics::default();
            let light = decider::decide(&p, &q, delta, DeciderFlags::all(), &mut metrics);
            let naive = naive::decide(&p, &q, delta);
            assert_eq!(light, naive, "mismatch for seed={seed} delta={delta}");
        }
    }
}

#[test]
fn monotonicity_in_delta() {
    let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(3.0, 1.0), Point::new(6.0, -1.0)], "p");
    let q = Curve::new(vec![Point::new(0.0, 2.0), Point::new(3.0, -2.0), Point::new(6.0, 2.0)], "q");
    let d = calc_distance(&p, &q);
    let mut metrics = Metrics::default();
    assert!(decider::decide(&p, &q, d + 0.5, DeciderFlags::all(), &mut metrics));
    assert!(decider::decide(&p, &q, d + 5.0, DeciderFlags::all(), &mut metrics));
}

#[test]
fn symmetry() {
    let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 3.0), Point::new(5.0, 0.0)], "p");
    let q = Curve::new(vec![Point::new(0.0, 1.0), Point::new(3.0, 4.0), Point::new(5.0, 1.0)], "q");
    let mut metrics = Metrics::default();
    for delta in [0.5, 1.0, 2.0, 4.0] {
        let pq = decider::decide(&p, &q, delta, DeciderFlags::all(), &mut metrics);
        let qp = decider::decide(&q, &p, delta, DeciderFlags::all(), &mut metrics);
        assert_eq!(pq, qp, "asymmetric at delta={delta}");
    }
}

#[test]
fn reflexivity() {
    let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0), Point::new(9.0, 1.0)], "p");
    let mut metrics = Metrics::default();
    assert!(decider::decide(&p, &p.clone(), 0.0, DeciderFlags::all(), &mut metrics));
    assert!((calc_distance(&p, &p.clone())).abs() < 1e-6);
}

#[test]
fn triangle_sanity() {
    let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)], "p");
    let q = Curve::new(vec![Point::new(0.0, 1.0), Point::new(5.0, 1.0)], "q");
    let r = Curve::new(vec![Point::new(0.0, 3.0), Point::new(5.0, 3.0)], "r");

    let d_pq = calc_distance(&p, &q);
    let d_pr = calc_distance(&p, &r);
    let d_qr = calc_distance(&q, &r);

    assert!((d_pq - d_pr).abs() <= d_qr + 2e-6);
}

#[test]
fn certificate_soundness() {
    let pairs = [
        (
            Curve::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], "p"),
            Curve::new(vec![Point::new(0.0, 1.0), Point::new(1.0, 1.5), Point::new(2.0, 1.0)], "q"),
            1.5,
        ),
        (
            Curve::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)], "p"),
            Curve::new(vec![Point::new(0.0, 5.0), Point::new(10.0, 5.0)], "q"),
            4.999,
        ),
    ];
    for (p, q, delta) in pairs {
        let cert = certificate::build(&p, &q, delta);
        assert!(certificate::check(&cert, &p, &q, delta));
    }
}

#[test]
fn certificate_soundness_on_random_curves() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(19);
    for _ in 0..60 {
        let p = random_curve(&mut rng, rng.gen_range(2..25));
        let q = random_curve(&mut rng, rng.gen_range(2..25));
        let delta = rng.gen_range(0.05..8.0);
        let cert = certificate::build(&p, &q, delta);
        assert!(
            certificate::check(&cert, &p, &q, delta),
            "certificate failed its own checker for delta={delta}, p={p:?}, q={q:?}"
        );
        let decided_yes = matches!(cert, Certificate::Yes(_));
        assert_eq!(decided_yes, naive::decide(&p, &q, delta));
    }
}

#[test]
fn flipping_certificate_tag_is_rejected() {
    let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], "p");
    let q = Curve::new(vec![Point::new(0.0, 1.0), Point::new(1.0, 1.5), Point::new(2.0, 1.0)], "q");
    let cert = certificate::build(&p, &q, 1.5);
    assert!(matches!(cert, Certificate::Yes(_)));
    if let Certificate::Yes(path) = cert {
        let flipped = Certificate::No(path);
        assert!(!certificate::check(&flipped, &p, &q, 1.5));
    }
}

#[test]
fn kd_tree_soundness_every_true_positive_is_a_candidate() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
    let stored: Vec<Curve> = (0..30).map(|_| random_curve(&mut rng, rng.gen_range(2..6))).collect();
    let query = random_curve(&mut rng, 4);
    let delta = 3.0;

    let mut metrics = Metrics::default();
    let mut true_positives = Vec::new();
    for (i, c) in stored.iter().enumerate() {
        if decider::decide(&query, c, delta, DeciderFlags::all(), &mut metrics) {
            true_positives.push(i);
        }
    }

    let db = Database::build(stored);
    let candidates: Vec<usize> = db.range_candidates(&query, delta).into_iter().map(|id| id.get()).collect();
    for tp in true_positives {
        assert!(candidates.contains(&tp), "true positive {tp} missing from kd-tree candidates");
    }
}
