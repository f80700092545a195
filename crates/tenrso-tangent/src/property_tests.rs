//! Property-based tests for the tangent projection
//!
//! These tests verify properties that hold for every valid TT shape and sample set

use super::*;
use proptest::collection::vec;
use proptest::prelude::*;
use scirs2_core::random::{rngs::StdRng, Rng, SeedableRng};

const TOL: f64 = 1e-9;

struct Case {
    shape: TtShape,
    u: Vec<Vec<f64>>,
    v: Vec<Vec<f64>>,
    samples: SampleSet<f64>,
}

fn build_case(modes: Vec<usize>, interior: Vec<usize>, seed: u64, n_samples: usize) -> Case {
    let mut ranks = vec![1];
    ranks.extend(interior);
    ranks.push(1);
    let shape = TtShape::new(modes, ranks).unwrap();
    let d = shape.order();

    // Deterministic core and weight values in [-1, 1)
    let mut rng = StdRng::seed_from_u64(seed);
    let random_cores = |rng: &mut StdRng| -> Vec<Vec<f64>> {
        (0..d)
            .map(|i| {
                (0..shape.core_len(i))
                    .map(|_| rng.random_range(-1.0..1.0))
                    .collect()
            })
            .collect()
    };
    let u = random_cores(&mut rng);
    let v = random_cores(&mut rng);

    let mut indices = Vec::with_capacity(d * n_samples);
    for _ in 0..n_samples {
        for &n in shape.mode_sizes() {
            indices.push(rng.random_range(0..n));
        }
    }
    let weights: Vec<f64> = (0..n_samples)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect();
    let samples = SampleSet::from_zero_based(d, indices, weights).unwrap();

    Case {
        shape,
        u,
        v,
        samples,
    }
}

/// Strategy for (mode sizes, interior ranks, seed, sample count)
fn tt_case() -> impl Strategy<Value = (Vec<usize>, Vec<usize>, u64, usize)> {
    (2usize..6).prop_flat_map(|d| {
        (
            vec(1usize..5, d),
            vec(1usize..4, d - 1),
            any::<u64>(),
            0usize..25,
        )
    })
}

proptest! {
    /// Accumulators have the shape of the cores
    #[test]
    fn test_projection_shape((modes, interior, seed, m) in tt_case()) {
        let case = build_case(modes, interior, seed, m);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let result = tt_tangent_project(&u, &v, &case.samples).unwrap();

        prop_assert_eq!(result.order(), case.shape.order());
        for i in 0..case.shape.order() {
            prop_assert_eq!(result.core(i).len(), case.shape.core_len(i));
        }
    }

    /// project(w) + project(w') = project(w + w')
    #[test]
    fn test_linearity_in_weights((modes, interior, seed, m) in tt_case()) {
        let case = build_case(modes, interior, seed, m);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let w1 = case.samples.weights().to_vec();
        let w2: Vec<f64> = w1.iter().enumerate().map(|(j, w)| w * 0.5 - (j as f64) * 0.125).collect();
        let sum: Vec<f64> = w1.iter().zip(w2.iter()).map(|(a, b)| a + b).collect();

        let mut lhs = tt_tangent_project(&u, &v, &case.samples.with_weights(w1).unwrap()).unwrap();
        let rhs_part = tt_tangent_project(&u, &v, &case.samples.with_weights(w2).unwrap()).unwrap();
        lhs.merge(&rhs_part).unwrap();
        let rhs = tt_tangent_project(&u, &v, &case.samples.with_weights(sum).unwrap()).unwrap();

        prop_assert!(lhs.max_abs_diff(&rhs).unwrap() < TOL);
    }

    /// Scaling all weights scales the result
    #[test]
    fn test_homogeneity((modes, interior, seed, m) in tt_case(), alpha in -4.0f64..4.0) {
        let case = build_case(modes, interior, seed, m);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let scaled: Vec<f64> = case.samples.weights().iter().map(|w| w * alpha).collect();

        let mut expected = tt_tangent_project(&u, &v, &case.samples).unwrap();
        expected.scale(alpha);
        let actual = tt_tangent_project(&u, &v, &case.samples.with_weights(scaled).unwrap()).unwrap();

        prop_assert!(expected.max_abs_diff(&actual).unwrap() < TOL);
    }

    /// All-zero weights give exactly zero accumulators
    #[test]
    fn test_zero_weights((modes, interior, seed, m) in tt_case()) {
        let case = build_case(modes, interior, seed, m);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let zeros = vec![0.0; case.samples.len()];
        let result = tt_tangent_project(&u, &v, &case.samples.with_weights(zeros).unwrap()).unwrap();

        prop_assert!(result.is_zero());
    }

    /// A single sample only touches the slices its multi-index addresses
    #[test]
    fn test_single_sample_localization((modes, interior, seed, _m) in tt_case()) {
        let case = build_case(modes, interior, seed, 1);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let result = tt_tangent_project(&u, &v, &case.samples).unwrap();
        let index = case.samples.index(0);

        for (i, &n) in case.shape.mode_sizes().iter().enumerate() {
            for k in (0..n).filter(|&k| k != index[i]) {
                prop_assert!(result.slice(i, k).iter().all(|&x| x == 0.0),
                    "core {} slice {} touched", i, k);
            }
        }
    }

    /// Reordering samples leaves the result unchanged up to rounding
    #[test]
    fn test_permutation_invariance((modes, interior, seed, m) in tt_case(), shift in 0usize..25) {
        let case = build_case(modes, interior, seed, m);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let d = case.samples.order();
        let len = case.samples.len();
        let mut order: Vec<usize> = (0..len).rev().collect();
        if len > 0 {
            order.rotate_left(shift % len);
        }

        let mut indices = Vec::with_capacity(d * len);
        let mut weights = Vec::with_capacity(len);
        for &j in &order {
            indices.extend_from_slice(case.samples.index(j));
            weights.push(case.samples.weight(j));
        }
        let permuted = SampleSet::from_zero_based(d, indices, weights).unwrap();

        let a = tt_tangent_project(&u, &v, &case.samples).unwrap();
        let b = tt_tangent_project(&u, &v, &permuted).unwrap();

        prop_assert!(a.max_abs_diff(&b).unwrap() < TOL);
    }

    /// Accumulating two halves equals projecting the whole batch
    #[test]
    fn test_split_batches((modes, interior, seed, m) in tt_case(), split in 0usize..25) {
        let case = build_case(modes, interior, seed, m);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let cut = split.min(case.samples.len());
        let head = case.samples.subset(0, cut);
        let tail = case.samples.subset(cut, case.samples.len());

        let mut acc = tt_tangent_project(&u, &v, &head).unwrap();
        tt_tangent_project_into(&u, &v, &tail, &mut acc).unwrap();
        let whole = tt_tangent_project(&u, &v, &case.samples).unwrap();

        prop_assert!(acc.max_abs_diff(&whole).unwrap() < TOL);
    }
}

#[cfg(feature = "parallel")]
proptest! {
    /// Parallel and serial projections agree for any chunk size
    #[test]
    fn test_parallel_matches_serial((modes, interior, seed, m) in tt_case(), chunk in 1usize..8) {
        let case = build_case(modes, interior, seed, m);
        let u = CoreFamily::from_vecs("U", &case.shape, &case.u).unwrap();
        let v = CoreFamily::from_vecs("V", &case.shape, &case.v).unwrap();

        let serial = tt_tangent_project(&u, &v, &case.samples).unwrap();
        let parallel = tt_tangent_project_parallel(&u, &v, &case.samples, chunk).unwrap();

        prop_assert!(serial.max_abs_diff(&parallel).unwrap() < TOL);
    }
}
