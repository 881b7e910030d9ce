use crate::word::{FallingWord, WordId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Horizontal extent of the logical play field.
pub const FIELD_WIDTH: f64 = 100.0;

/// Words spawn with a right-hand margin so the rendered text stays inside
/// the field.
const SPAWN_MARGIN: f64 = 10.0;

/// Picks random words from the active category and turns them into falling
/// words with level-derived speed and a random horizontal lane.
#[derive(Debug)]
pub struct WordSpawner {
    rng: StdRng,
    next_id: u64,
}

impl WordSpawner {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic spawner for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self { rng, next_id: 0 }
    }

    /// Uniform pick with replacement. An empty word list yields no word —
    /// that is documented degraded behavior, not an error, and callers must
    /// tolerate zero words added on a given spawn request.
    ///
    /// Text is normalized to the matcher's form here, so user vocabularies
    /// with stray case or whitespace stay hittable.
    pub fn spawn(&mut self, words: &[String], level: u32) -> Option<FallingWord> {
        let text = words.choose(&mut self.rng)?.trim().to_lowercase();
        let x = self.rng.gen_range(0.0..=FIELD_WIDTH - SPAWN_MARGIN);
        let id = WordId(self.next_id);
        self.next_id += 1;
        Some(FallingWord::new(id, text, x, level))
    }
}

impl Default for WordSpawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{fall_speed_for, SPAWN_POSITION};

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_list_spawns_nothing() {
        let mut spawner = WordSpawner::with_seed(1);
        assert!(spawner.spawn(&[], 1).is_none());
        // The spawner stays usable afterwards
        assert!(spawner.spawn(&words(&["cat"]), 1).is_some());
    }

    #[test]
    fn test_spawned_word_uses_current_level_speed() {
        let mut spawner = WordSpawner::with_seed(1);
        let w1 = spawner.spawn(&words(&["cat"]), 1).unwrap();
        assert_eq!(w1.fall_speed, fall_speed_for(1));
        let w2 = spawner.spawn(&words(&["cat"]), 3).unwrap();
        assert_eq!(w2.fall_speed, fall_speed_for(3));
    }

    #[test]
    fn test_words_spawn_above_field_within_lanes() {
        let mut spawner = WordSpawner::with_seed(7);
        for _ in 0..50 {
            let w = spawner.spawn(&words(&["cat", "dog", "bird"]), 1).unwrap();
            assert_eq!(w.position, SPAWN_POSITION);
            assert!(w.x >= 0.0);
            assert!(w.x <= FIELD_WIDTH - SPAWN_MARGIN);
        }
    }

    #[test]
    fn test_text_is_normalized_at_spawn() {
        let mut spawner = WordSpawner::with_seed(5);
        let w = spawner.spawn(&words(&["  Lemon "]), 1).unwrap();
        assert_eq!(w.text, "lemon");
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut spawner = WordSpawner::with_seed(2);
        let list = words(&["a", "b"]);
        let w1 = spawner.spawn(&list, 1).unwrap();
        let w2 = spawner.spawn(&list, 1).unwrap();
        let w3 = spawner.spawn(&list, 1).unwrap();
        assert!(w1.id.0 < w2.id.0);
        assert!(w2.id.0 < w3.id.0);
    }

    #[test]
    fn test_selection_is_with_replacement() {
        // A single-word list must keep producing that word forever.
        let mut spawner = WordSpawner::with_seed(3);
        let list = words(&["lemon"]);
        for _ in 0..10 {
            assert_eq!(spawner.spawn(&list, 1).unwrap().text, "lemon");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let list = words(&["cat", "dog", "bird", "fish"]);
        let mut a = WordSpawner::with_seed(42);
        let mut b = WordSpawner::with_seed(42);
        for _ in 0..20 {
            let wa = a.spawn(&list, 1).unwrap();
            let wb = b.spawn(&list, 1).unwrap();
            assert_eq!(wa.text, wb.text);
            assert_eq!(wa.x, wb.x);
        }
    }
}
