//! # Random Helpers
//!
//! Small uniform-sampling helpers used by every generation stage.
//!
//! All of them are provided as an extension trait over [`rand::Rng`], so the
//! stages never name a concrete generator: production code passes whatever RNG
//! it likes and tests pass a seeded [`StdRng`] for reproducible fixtures.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Uniform integer, choice and probability helpers.
pub trait RandomUtils {
    /// Uniform integer in `min..=max`. Degenerate ranges collapse to `min`.
    fn random_int(&mut self, min: i32, max: i32) -> i32;

    /// Uniform pick from a slice, `None` when it is empty.
    fn random_choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>;

    /// Returns true with the given probability, clamped to `[0, 1]`.
    fn chance(&mut self, probability: f64) -> bool;
}

impl<R: Rng + ?Sized> RandomUtils for R {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.gen_range(min..=max)
    }

    fn random_choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(self)
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.gen_bool(probability)
    }
}

/// Euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use deluge::distance;
///
/// assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
/// ```
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Creates a seeded random number generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_int_is_inclusive() {
        let mut rng = create_rng(7);
        let mut saw_min = false;
        let mut saw_max = false;

        for _ in 0..500 {
            let value = rng.random_int(2, 5);
            assert!((2..=5).contains(&value));
            saw_min |= value == 2;
            saw_max |= value == 5;
        }

        assert!(saw_min && saw_max);
    }

    #[test]
    fn test_random_int_degenerate_range() {
        let mut rng = create_rng(7);
        assert_eq!(rng.random_int(4, 4), 4);
        assert_eq!(rng.random_int(9, 3), 9);
    }

    #[test]
    fn test_random_choice() {
        let mut rng = create_rng(11);
        let empty: [u8; 0] = [];
        assert!(rng.random_choice(&empty).is_none());

        let items = ['a', 'b', 'c'];
        for _ in 0..50 {
            let picked = rng.random_choice(&items).copied();
            assert!(matches!(picked, Some('a' | 'b' | 'c')));
        }
    }

    #[test]
    fn test_chance_bounds() {
        let mut rng = create_rng(3);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(!rng.chance(-1.0));
            assert!(!rng.chance(f64::NAN));
            assert!(rng.chance(1.0));
            assert!(rng.chance(2.5));
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = create_rng(99);
        let mut b = create_rng(99);
        let first: Vec<i32> = (0..20).map(|_| a.random_int(0, 1000)).collect();
        let second: Vec<i32> = (0..20).map(|_| b.random_int(0, 1000)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut rng = create_rng(5);
        let dynamic: &mut dyn rand::RngCore = &mut rng;
        let value = dynamic.random_int(10, 12);
        assert!((10..=12).contains(&value));
    }
}
