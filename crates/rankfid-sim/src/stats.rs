//! Summary statistics used by the evaluator.

use rankfid_core::error::SliceError;

/// Sample standard deviation (divisor `n - 1`). Needs at least two values.
pub fn sample_sd(values: &[f64]) -> Result<f64, SliceError> {
    let n = values.len();
    if n < 2 {
        return Err(SliceError::Degenerate { size: n });
    }
    let m = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Ok((ss / (n - 1) as f64).sqrt())
}

/// Pearson correlation coefficient, clamped to `[-1, 1]`.
///
/// Undefined for fewer than two points or when either series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, SliceError> {
    let n = x.len();
    if n != y.len() {
        return Err(SliceError::LengthMismatch {
            left: n,
            right: y.len(),
        });
    }
    if n < 2 {
        return Err(SliceError::Degenerate { size: n });
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    if den_x == 0.0 || den_y == 0.0 {
        return Err(SliceError::ZeroVariance { size: n });
    }
    Ok((num / (den_x.sqrt() * den_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sample_sd_known_value() {
        // Sample variance of 2,4,4,4,5,5,7,9 is 32/7.
        let sd = sample_sd(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn sample_sd_of_constant_is_zero() {
        assert_eq!(sample_sd(&[3.0, 3.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn sample_sd_needs_two_points() {
        assert_eq!(sample_sd(&[1.0]), Err(SliceError::Degenerate { size: 1 }));
        assert_eq!(sample_sd(&[]), Err(SliceError::Degenerate { size: 0 }));
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_degenerate_cases() {
        assert_eq!(pearson(&[1.0], &[2.0]), Err(SliceError::Degenerate { size: 1 }));
        assert_eq!(
            pearson(&[1.0, 2.0], &[5.0, 5.0]),
            Err(SliceError::ZeroVariance { size: 2 })
        );
        assert_eq!(
            pearson(&[1.0, 2.0], &[1.0]),
            Err(SliceError::LengthMismatch { left: 2, right: 1 })
        );
    }

    proptest! {
        #[test]
        fn pearson_bounded(
            pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 2..100)
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            if let Ok(r) = pearson(&x, &y) {
                prop_assert!((-1.0..=1.0).contains(&r));
            }
        }

        #[test]
        fn pearson_symmetric(
            pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 2..100)
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            match (pearson(&x, &y), pearson(&y, &x)) {
                (Ok(a), Ok(b)) => prop_assert!((a - b).abs() < 1e-12),
                (a, b) => prop_assert_eq!(a.is_err(), b.is_err()),
            }
        }

        #[test]
        fn sample_sd_non_negative(values in prop::collection::vec(-1e6f64..1e6, 2..100)) {
            prop_assert!(sample_sd(&values).unwrap() >= 0.0);
        }
    }
}
