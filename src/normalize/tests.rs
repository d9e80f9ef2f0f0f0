use super::*;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;

fn matrix(rows: &[Vec<f64>]) -> FeatureMatrix {
    FeatureMatrix::from_rows(rows).unwrap()
}

#[test]
fn test_stats_mean_and_population_std() {
    let m = matrix(&[vec![1.0, 10.0], vec![3.0, 20.0], vec![5.0, 30.0]]);
    let stats = compute_normalization_stats(&m).unwrap();

    assert_abs_diff_eq!(stats.mean[0], 3.0);
    assert_abs_diff_eq!(stats.mean[1], 20.0);
    // population std of [1, 3, 5] is sqrt(8/3)
    assert_abs_diff_eq!(stats.std[0], (8.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(stats.std[1], (200.0f64 / 3.0).sqrt(), epsilon = 1e-12);
}

#[test]
fn test_stats_empty_input_fails() {
    let m = FeatureMatrix::empty();
    assert!(matches!(
        compute_normalization_stats(&m),
        Err(ClusterError::EmptyInput(_))
    ));
}

#[test]
fn test_constant_dimension_gets_unit_std() {
    let m = matrix(&[vec![7.0, 1.0], vec![7.0, 2.0], vec![7.0, 3.0]]);
    let stats = compute_normalization_stats(&m).unwrap();
    assert_eq!(stats.std[0], 1.0);

    let out = normalize_features(&m, None).unwrap();
    for row in out.features.rows() {
        assert_eq!(row[0], 0.0);
        assert!(row[1].is_finite());
    }
}

#[test]
fn test_normalized_has_zero_mean_unit_variance() {
    let m = matrix(&[
        vec![2.0, -1.0],
        vec![4.0, 0.0],
        vec![6.0, 5.0],
        vec![8.0, 12.0],
    ]);
    let out = normalize_features(&m, None).unwrap();
    let again = compute_normalization_stats(&out.features).unwrap();

    for d in 0..2 {
        assert_abs_diff_eq!(again.mean[d], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(again.std[d], 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_normalize_with_external_stats() {
    let stats = NormalizationStats {
        mean: vec![10.0],
        std: vec![2.0],
    };
    let m = matrix(&[vec![12.0], vec![8.0]]);
    let out = normalize_features(&m, Some(&stats)).unwrap();

    assert_eq!(out.features.row(0), &[1.0]);
    assert_eq!(out.features.row(1), &[-1.0]);
    assert_eq!(out.stats, stats);
}

#[test]
fn test_stats_dimension_mismatch() {
    let stats = NormalizationStats {
        mean: vec![0.0, 0.0],
        std: vec![1.0, 1.0],
    };
    let m = matrix(&[vec![1.0, 2.0, 3.0]]);
    assert_eq!(
        normalize_features(&m, Some(&stats)).unwrap_err(),
        ClusterError::DimensionMismatch {
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn test_denormalize_single_vector() {
    let stats = NormalizationStats {
        mean: vec![1.0, 2.0],
        std: vec![3.0, 4.0],
    };
    assert_eq!(stats.denormalize(&[1.0, -1.0]).unwrap(), vec![4.0, -2.0]);
}

proptest! {
    #[test]
    fn prop_round_trip(rows in prop::collection::vec(
        prop::collection::vec(-1.0e6f64..1.0e6, 3),
        1..40,
    )) {
        let m = matrix(&rows);
        let out = normalize_features(&m, None).unwrap();
        let back = denormalize_features(&out.features, &out.stats).unwrap();

        for (orig, restored) in m.rows().zip(back.rows()) {
            for (a, b) in orig.iter().zip(restored) {
                prop_assert!((a - b).abs() <= 1e-6 * a.abs().max(1.0), "{a} vs {b}");
            }
        }
    }
}
