//! Binomial distribution primitives.
//!
//! The estimator models every block and endorsement slot as an independent
//! Bernoulli trial, so its only non-trivial dependency is the binomial
//! quantile (percent-point function). It is computed exactly by walking the
//! CDF term by term; a normal approximation would be wrong in the common
//! case of a small baker (low `p`, low expected count).

use crate::types::EstimatorError;

/// Binomial expectation for `n` trials at success probability `p`.
pub fn binomial_mean(n: u64, p: f64) -> f64 {
    n as f64 * p
}

/// Binomial percent-point function: the smallest integer `k` such that
/// `P(X <= k; n, p) >= confidence`.
///
/// The PMF is advanced with the recurrence
/// `pmf(k+1) = pmf(k) * (n-k)/(k+1) * p/(1-p)`, carried in log space so the
/// starting term `(1-p)^n` stays representable for large `n`. The CDF itself
/// is accumulated in linear space; terms too small for f64 contribute
/// negligible mass and round to zero harmlessly.
pub fn binomial_ppf(confidence: f64, n: u64, p: f64) -> Result<f64, EstimatorError> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(EstimatorError::Computation(format!(
            "probability {p} outside [0, 1]"
        )));
    }
    if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
        return Err(EstimatorError::Computation(format!(
            "confidence {confidence} outside (0, 1)"
        )));
    }
    if n == 0 || p == 0.0 {
        return Ok(0.0);
    }
    if p == 1.0 {
        return Ok(n as f64);
    }

    let nf = n as f64;
    let log_odds = p.ln() - (-p).ln_1p();
    let mut ln_pmf = nf * (-p).ln_1p();
    let mut cdf = ln_pmf.exp();
    let mut k: u64 = 0;
    while cdf < confidence && k < n {
        ln_pmf += ((nf - k as f64) / (k as f64 + 1.0)).ln() + log_odds;
        k += 1;
        cdf += ln_pmf.exp();
    }
    // cdf sums to 1 up to rounding, so the loop can only exhaust at k == n.
    Ok(k as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_is_n_times_p() {
        assert_eq!(binomial_mean(10, 0.5), 5.0);
        assert!((binomial_mean(40_960, 1.0 / 85_000.0) - 0.481_882_35).abs() < 1e-6);
        assert_eq!(binomial_mean(0, 0.3), 0.0);
    }

    #[test]
    fn test_ppf_known_values_fair_coin() {
        // n=10, p=0.5: cdf(4)=0.37695, cdf(5)=0.62305, cdf(7)=0.94531, cdf(8)=0.98926
        assert_eq!(binomial_ppf(0.37, 10, 0.5).unwrap(), 4.0);
        assert_eq!(binomial_ppf(0.5, 10, 0.5).unwrap(), 5.0);
        assert_eq!(binomial_ppf(0.62, 10, 0.5).unwrap(), 5.0);
        assert_eq!(binomial_ppf(0.95, 10, 0.5).unwrap(), 8.0);
    }

    #[test]
    fn test_ppf_small_baker_scenario() {
        // 5 cycles of 8192 blocks on a network of 85000 rolls: cdf(0)=0.6176,
        // cdf(1)=0.9152, so the 90% quantile is exactly one block.
        let ppf = binomial_ppf(0.9, 40_960, 1.0 / 85_000.0).unwrap();
        assert_eq!(ppf, 1.0);
        // and at 50% confidence the baker should expect to bake nothing
        assert_eq!(binomial_ppf(0.5, 40_960, 1.0 / 85_000.0).unwrap(), 0.0);
    }

    #[test]
    fn test_ppf_degenerate_probabilities() {
        assert_eq!(binomial_ppf(0.9, 100, 0.0).unwrap(), 0.0);
        assert_eq!(binomial_ppf(0.9, 100, 1.0).unwrap(), 100.0);
        assert_eq!(binomial_ppf(0.9, 0, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn test_ppf_large_n_does_not_underflow() {
        // (1-p)^n underflows f64 here; the quantile must still land near n*p.
        let n = 1_310_720; // 8192 * 32 * 5
        let p = 0.01;
        let mean = binomial_mean(n, p);
        let ppf = binomial_ppf(0.9, n, p).unwrap();
        assert!(ppf >= mean.floor());
        // within a handful of standard deviations of the mean
        let sd = (n as f64 * p * (1.0 - p)).sqrt();
        assert!(ppf <= mean + 6.0 * sd, "ppf {ppf} too far above mean {mean}");
    }

    #[test]
    fn test_ppf_monotone_in_confidence() {
        let mut prev = 0.0;
        for c in [0.05, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            let k = binomial_ppf(c, 200, 0.07).unwrap();
            assert!(k >= prev, "ppf must be non-decreasing in confidence");
            prev = k;
        }
    }

    #[test]
    fn test_ppf_is_valid_count() {
        for (n, p) in [(1u64, 0.3), (17, 0.9), (1000, 0.001), (64, 0.5)] {
            for c in [0.1, 0.5, 0.9, 0.999] {
                let k = binomial_ppf(c, n, p).unwrap();
                assert_eq!(k, k.trunc(), "quantile must be integer-valued");
                assert!((0.0..=n as f64).contains(&k));
            }
        }
    }

    #[test]
    fn test_ppf_at_least_floor_of_mean_above_median() {
        for (n, p) in [(100u64, 0.3), (8192, 0.01), (50, 0.5)] {
            let mean = binomial_mean(n, p);
            for c in [0.5, 0.7, 0.9] {
                let k = binomial_ppf(c, n, p).unwrap();
                assert!(k >= mean.floor(), "ppf({c}) = {k} below floor of mean {mean}");
            }
        }
    }

    #[test]
    fn test_ppf_rejects_out_of_domain() {
        assert!(matches!(
            binomial_ppf(0.9, 10, 1.5),
            Err(EstimatorError::Computation(_))
        ));
        assert!(matches!(
            binomial_ppf(0.9, 10, -0.1),
            Err(EstimatorError::Computation(_))
        ));
        assert!(matches!(
            binomial_ppf(0.9, 10, f64::NAN),
            Err(EstimatorError::Computation(_))
        ));
        assert!(binomial_ppf(0.0, 10, 0.5).is_err());
        assert!(binomial_ppf(1.0, 10, 0.5).is_err());
    }
}
