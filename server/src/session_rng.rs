use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seedable random source; fixed seeds give reproducible picks in tests.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.random_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SessionRng::new(7);
        let mut b = SessionRng::new(7);
        for _ in 0..20 {
            assert_eq!(a.pick_index(10), b.pick_index(10));
        }
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_pick_index_stays_in_range() {
        let mut rng = SessionRng::from_random();
        assert_eq!(rng.pick_index(0), None);
        for _ in 0..50 {
            assert!(rng.pick_index(3).unwrap() < 3);
        }
    }
}
