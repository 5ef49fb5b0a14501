//! Assorted log-domain helpers.

/// `ln(0.5)`: the fixed split between staying in a sub-state and advancing.
pub const LOG_HALF: f64 = -std::f64::consts::LN_2;

/// Number of sub-states in every phone model.
pub const SUBSTATES_PER_PHONE: usize = 3;

/// Score-vector index of `position` within the phone at `phoneme_index`.
#[inline]
pub fn substate_index(phoneme_index: usize, position: usize) -> usize {
    debug_assert!(position < SUBSTATES_PER_PHONE);
    phoneme_index * SUBSTATES_PER_PHONE + position
}

/// A score is admissible when it is finite or exactly negative infinity.
///
/// Negative infinity is the deliberate "impossible" sentinel; NaN and
/// positive infinity would poison every comparison downstream.
#[inline]
pub fn is_admissible_score(value: f64) -> bool {
    value.is_finite() || value == f64::NEG_INFINITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_half_matches_ln() {
        assert!((LOG_HALF - 0.5f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn substate_layout() {
        assert_eq!(substate_index(0, 0), 0);
        assert_eq!(substate_index(0, 2), 2);
        assert_eq!(substate_index(3, 1), 10);
    }

    #[test]
    fn admissibility() {
        assert!(is_admissible_score(0.0));
        assert!(is_admissible_score(-1e300));
        assert!(is_admissible_score(f64::NEG_INFINITY));
        assert!(!is_admissible_score(f64::INFINITY));
        assert!(!is_admissible_score(f64::NAN));
    }
}
