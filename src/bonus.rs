//! Random bonus selection.

use rand::prelude::*;
use thiserror::Error;

/// Candidate amounts used when none are configured.
pub const DEFAULT_CANDIDATES: [i64; 5] = [1000, 2000, 3000, 5000, 10000];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BonusError {
    #[error("bonus candidate list is empty")]
    NoCandidates,
}

/// Picks one bonus amount uniformly at random from a fixed candidate set.
#[derive(Debug, Clone)]
pub struct BonusPicker {
    candidates: Vec<i64>,
}

impl BonusPicker {
    /// Create a picker. The candidate list must not be empty.
    pub fn new(candidates: Vec<i64>) -> Result<Self, BonusError> {
        if candidates.is_empty() {
            return Err(BonusError::NoCandidates);
        }
        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[i64] {
        &self.candidates
    }

    /// Draw one candidate.
    pub fn pick(&self) -> i64 {
        self.pick_with(&mut thread_rng())
    }

    /// Draw one candidate using the given generator.
    ///
    /// The index is drawn with `gen_range`, which is uniform over the
    /// candidate positions; the list is never empty.
    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        self.candidates[rng.gen_range(0..self.candidates.len())]
    }
}

impl Default for BonusPicker {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_empty_candidates_rejected() {
        assert_eq!(BonusPicker::new(vec![]).unwrap_err(), BonusError::NoCandidates);
    }

    #[test]
    fn test_default_candidates() {
        assert_eq!(BonusPicker::default().candidates(), &DEFAULT_CANDIDATES);
    }

    #[test]
    fn test_pick_stays_within_candidates() {
        let picker = BonusPicker::default();
        for _ in 0..1000 {
            assert!(DEFAULT_CANDIDATES.contains(&picker.pick()));
        }
    }

    #[test]
    fn test_every_candidate_reachable() {
        let picker = BonusPicker::default();
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<i64> = (0..2000).map(|_| picker.pick_with(&mut rng)).collect();

        assert_eq!(seen.len(), DEFAULT_CANDIDATES.len());
    }

    #[test]
    fn test_pick_uses_uniform_index() {
        let picker = BonusPicker::new(vec![10, 20, 30]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut expected = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let index = expected.gen_range(0..3);
            assert_eq!(picker.pick_with(&mut rng), picker.candidates()[index]);
        }
    }

    #[test]
    fn test_single_candidate() {
        let picker = BonusPicker::new(vec![500]).unwrap();
        assert_eq!(picker.pick(), 500);
    }
}
