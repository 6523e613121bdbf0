use crate::storage::{Weights, SCALE};

/// SCALE-scaled fraction `part / whole`; zero when either side is empty.
pub fn share_of(part: i128, whole: i128) -> Option<i128> {
    if part <= 0 || whole <= 0 {
        return Some(0);
    }
    part.checked_mul(SCALE)?.checked_div(whole)
}

/// Combine the three SCALE-scaled shares under the configured weights.
///
/// allocation = (α·staked_share + β·duration_share + θ·extra_share) / SCALE
pub fn weighted_allocation(
    weights: &Weights,
    staked_share: i128,
    duration_share: i128,
    extra_share: i128,
) -> Option<i128> {
    weights
        .alpha
        .checked_mul(staked_share)?
        .checked_add(weights.beta.checked_mul(duration_share)?)?
        .checked_add(weights.theta.checked_mul(extra_share)?)?
        .checked_div(SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_of_quarter() {
        assert_eq!(share_of(100, 400).unwrap(), SCALE / 4);
    }

    #[test]
    fn test_share_of_empty_pool() {
        assert_eq!(share_of(100, 0), Some(0));
        assert_eq!(share_of(0, 400), Some(0));
    }

    #[test]
    fn test_single_term_passes_through() {
        let weights = Weights {
            alpha: SCALE,
            beta: 0,
            theta: 0,
        };
        let alloc = weighted_allocation(&weights, SCALE / 4, SCALE, SCALE).unwrap();
        assert_eq!(alloc, SCALE / 4);
    }

    #[test]
    fn test_blended_terms() {
        // 0.8 / 0.1 / 0.1 over shares 0.5 / 0.25 / 1.0
        let weights = Weights {
            alpha: 8 * SCALE / 10,
            beta: SCALE / 10,
            theta: SCALE / 10,
        };
        let alloc =
            weighted_allocation(&weights, SCALE / 2, SCALE / 4, SCALE).unwrap();
        assert_eq!(alloc, 4 * SCALE / 10 + SCALE / 40 + SCALE / 10);
    }

    #[test]
    fn test_sole_staker_caps_at_unit() {
        let weights = Weights {
            alpha: 7 * SCALE / 10,
            beta: 3 * SCALE / 10,
            theta: 0,
        };
        let alloc = weighted_allocation(&weights, SCALE, SCALE, 0).unwrap();
        assert_eq!(alloc, SCALE);
    }
}
