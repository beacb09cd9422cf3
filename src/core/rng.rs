//! Dice sources: the engine's only randomness.
//!
//! The engine draws die faces through the `DiceSource` trait so tests can
//! substitute fixed sequences. The default source is a seeded ChaCha8
//! stream: same seed, same match.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplier of die faces in 1..=6.
pub trait DiceSource {
    /// Draw the next face.
    fn roll_die(&mut self) -> u8;
}

/// Deterministic default dice source.
///
/// Uses ChaCha8 for speed while keeping a reproducible stream per seed.
#[derive(Clone, Debug)]
pub struct DiceRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DiceRng {
    /// Create a dice source with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a dice source from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().gen();
        Self::new(seed)
    }

    /// The seed this source was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DiceSource for DiceRng {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }
}

/// Dice source that replays a fixed sequence, cycling when exhausted.
///
/// For deterministic tests and replays; faces outside 1..=6 are the
/// caller's bug and are rejected at construction.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Create a scripted source from a non-empty face sequence.
    #[must_use]
    pub fn new(faces: impl Into<Vec<u8>>) -> Self {
        let faces = faces.into();
        assert!(!faces.is_empty(), "Script must contain at least one face");
        assert!(
            faces.iter().all(|&f| (1..=6).contains(&f)),
            "Die faces must be in 1..=6"
        );
        Self { faces, next: 0 }
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        let face = self.faces[self.next];
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = DiceRng::new(42);
        let mut rng2 = DiceRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll_die(), rng2.roll_die());
        }
    }

    #[test]
    fn test_faces_in_range() {
        let mut rng = DiceRng::new(7);
        for _ in 0..1000 {
            let face = rng.roll_die();
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = DiceRng::new(1);
        let mut rng2 = DiceRng::new(2);

        let seq1: Vec<_> = (0..20).map(|_| rng1.roll_die()).collect();
        let seq2: Vec<_> = (0..20).map(|_| rng2.roll_die()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_scripted_cycles() {
        let mut dice = ScriptedDice::new([6, 3, 1]);
        let rolled: Vec<_> = (0..7).map(|_| dice.roll_die()).collect();
        assert_eq!(rolled, vec![6, 3, 1, 6, 3, 1, 6]);
    }

    #[test]
    #[should_panic(expected = "Die faces must be in 1..=6")]
    fn test_scripted_rejects_bad_face() {
        ScriptedDice::new([6, 7]);
    }

    #[test]
    #[should_panic(expected = "Script must contain at least one face")]
    fn test_scripted_rejects_empty() {
        ScriptedDice::new([]);
    }
}
