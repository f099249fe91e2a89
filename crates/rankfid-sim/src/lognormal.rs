//! Moment-matched log-normal parameterisation.
//!
//! A log-normal variate `exp(location + scale * Z)` has linear-scale mean `m`
//! and standard deviation `s` when
//!
//! ```text
//! location = ln(m^2 / sqrt(s^2 + m^2))
//! scale    = sqrt(ln(1 + s^2 / m^2))
//! ```
//!
//! Both the population and every noise regime sample through this module.

use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use rankfid_core::error::ParameterError;

/// Parameters of the underlying normal distribution in log space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalParams {
    pub location: f64,
    pub scale: f64,
}

impl LogNormalParams {
    /// Parameters whose exponentiated samples have linear-scale `mean` and `sd`.
    ///
    /// ```
    /// use rankfid_sim::LogNormalParams;
    /// let p = LogNormalParams::from_moments(2.0, 1.0).unwrap();
    /// assert!((p.mean() - 2.0).abs() < 1e-12);
    /// assert!((p.sd() - 1.0).abs() < 1e-12);
    /// assert!(LogNormalParams::from_moments(0.0, 1.0).is_err());
    /// ```
    pub fn from_moments(mean: f64, sd: f64) -> Result<Self, ParameterError> {
        if !(mean.is_finite() && mean > 0.0) {
            return Err(ParameterError::NonPositiveMean(mean));
        }
        if !(sd.is_finite() && sd > 0.0) {
            return Err(ParameterError::NonPositiveSd(sd));
        }

        // ln(m^2 / sqrt(s^2 + m^2)) == ln(m) - ln(1 + s^2/m^2) / 2, without squaring m.
        let ratio = sd / mean;
        let scale_sq = (ratio * ratio).ln_1p();
        let location = mean.ln() - 0.5 * scale_sq;
        let scale = scale_sq.sqrt();

        if !(location.is_finite() && scale.is_finite()) {
            return Err(ParameterError::NonFiniteResult { mean, sd });
        }
        Ok(Self { location, scale })
    }

    /// Linear-scale mean implied by the parameters.
    pub fn mean(&self) -> f64 {
        (self.location + 0.5 * self.scale * self.scale).exp()
    }

    /// Linear-scale standard deviation implied by the parameters.
    pub fn sd(&self) -> f64 {
        let scale_sq = self.scale * self.scale;
        (scale_sq.exp_m1() * (2.0 * self.location + scale_sq).exp()).sqrt()
    }

    pub fn distribution(&self) -> Result<LogNormal<f64>, ParameterError> {
        LogNormal::new(self.location, self.scale).map_err(|_| ParameterError::NonFiniteResult {
            mean: self.mean(),
            sd: self.sd(),
        })
    }

    /// Draw one strictly positive linear-scale variate.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, ParameterError> {
        Ok(self.distribution()?.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn reference_attribute_parameters() {
        // mean 2, sd 1: scale^2 = ln(1.25), location = ln(4 / sqrt(5)).
        let p = LogNormalParams::from_moments(2.0, 1.0).unwrap();
        assert!(close(p.scale, 1.25f64.ln().sqrt(), 1e-12));
        assert!(close(p.location, (4.0 / 5.0f64.sqrt()).ln(), 1e-12));
    }

    #[test]
    fn rejects_non_positive_mean() {
        assert_eq!(
            LogNormalParams::from_moments(0.0, 1.0),
            Err(ParameterError::NonPositiveMean(0.0))
        );
        assert_eq!(
            LogNormalParams::from_moments(-3.0, 1.0),
            Err(ParameterError::NonPositiveMean(-3.0))
        );
        assert!(matches!(
            LogNormalParams::from_moments(f64::NAN, 1.0),
            Err(ParameterError::NonPositiveMean(_))
        ));
    }

    #[test]
    fn rejects_non_positive_sd() {
        assert_eq!(
            LogNormalParams::from_moments(2.0, 0.0),
            Err(ParameterError::NonPositiveSd(0.0))
        );
        assert!(matches!(
            LogNormalParams::from_moments(2.0, f64::INFINITY),
            Err(ParameterError::NonPositiveSd(_))
        ));
    }

    #[test]
    fn tiny_sd_is_nearly_deterministic() {
        let p = LogNormalParams::from_moments(3.0, 1e-9).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let x = p.sample(&mut rng).unwrap();
            assert!(close(x, 3.0, 1e-7), "sample {x}");
        }
    }

    #[test]
    fn empirical_moments_converge() {
        let p = LogNormalParams::from_moments(2.0, 0.5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let n = 200_000;
        let draws: Vec<f64> = (0..n).map(|_| p.sample(&mut rng).unwrap()).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!(close(mean, 2.0, 0.01), "mean {mean}");
        assert!(close(var.sqrt(), 0.5, 0.02), "sd {}", var.sqrt());
    }

    #[test]
    fn same_seed_same_draws() {
        let p = LogNormalParams::from_moments(2.0, 1.0).unwrap();
        let mut a = ChaCha8Rng::seed_from_u64(13);
        let mut b = ChaCha8Rng::seed_from_u64(13);
        for _ in 0..50 {
            assert_eq!(
                p.sample(&mut a).unwrap().to_bits(),
                p.sample(&mut b).unwrap().to_bits()
            );
        }
    }

    proptest! {
        #[test]
        fn moments_round_trip(mean in 1e-3f64..1e3, sd in 1e-3f64..1e3) {
            let p = LogNormalParams::from_moments(mean, sd).unwrap();
            prop_assert!(p.scale > 0.0);
            prop_assert!(close(p.mean(), mean, 1e-9), "mean {} vs {}", p.mean(), mean);
            prop_assert!(close(p.sd(), sd, 1e-9), "sd {} vs {}", p.sd(), sd);
        }

        #[test]
        fn samples_strictly_positive(mean in 1e-2f64..1e2, sd in 1e-2f64..1e2, seed in any::<u64>()) {
            let p = LogNormalParams::from_moments(mean, sd).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..16 {
                let x = p.sample(&mut rng).unwrap();
                prop_assert!(x > 0.0 && x.is_finite());
            }
        }
    }
}
