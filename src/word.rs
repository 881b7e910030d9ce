/// Identity of one falling word, unique within a session. Presentation
/// events refer to words by id so removal is unambiguous even when two
/// words share the same text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WordId(pub u64);

/// Vertical start position, just above the visible field.
pub const SPAWN_POSITION: f64 = -50.0;

/// Units fallen per tick for a word spawned at the given level.
pub fn fall_speed_for(level: u32) -> f64 {
    1.0 + level as f64 * 0.3
}

/// One word on its way down. The text and fall speed are fixed at spawn
/// time; only the vertical position changes afterwards.
#[derive(Clone, Debug)]
pub struct FallingWord {
    pub id: WordId,
    pub text: String,
    pub x: f64,
    pub position: f64,
    pub fall_speed: f64,
}

impl FallingWord {
    pub fn new(id: WordId, text: String, x: f64, level: u32) -> Self {
        Self {
            id,
            text,
            x,
            position: SPAWN_POSITION,
            fall_speed: fall_speed_for(level),
        }
    }

    /// Advance one tick.
    pub fn fall(&mut self) {
        self.position += self.fall_speed;
    }

    /// True once the word has dropped past the visible field. A crossed
    /// word is retired by the session and never advanced again.
    pub fn crossed_floor(&self, floor_height: f64) -> bool {
        self.position > floor_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(level: u32) -> FallingWord {
        FallingWord::new(WordId(0), "cat".to_string(), 10.0, level)
    }

    #[test]
    fn test_fall_speed_scales_with_level() {
        assert_eq!(fall_speed_for(1), 1.3);
        assert_eq!(fall_speed_for(2), 1.6);
        assert_eq!(fall_speed_for(5), 2.5);
    }

    #[test]
    fn test_new_word_starts_above_field() {
        let w = word(1);
        assert_eq!(w.position, SPAWN_POSITION);
        assert_eq!(w.fall_speed, 1.3);
        assert_eq!(w.text, "cat");
    }

    #[test]
    fn test_fall_accumulates_speed() {
        let mut w = word(1);
        w.fall();
        assert_eq!(w.position, SPAWN_POSITION + 1.3);
        w.fall();
        assert_eq!(w.position, SPAWN_POSITION + 2.6);
    }

    #[test]
    fn test_floor_crossing_is_strict() {
        let mut w = word(1);
        w.position = 800.0;
        assert!(!w.crossed_floor(800.0));
        w.position = 800.1;
        assert!(w.crossed_floor(800.0));
    }

    #[test]
    fn test_level_one_word_crosses_800_at_tick_654() {
        // -50 + n * 1.3 first exceeds 800 at n = 654
        let mut w = word(1);
        for _ in 0..653 {
            w.fall();
        }
        assert!(!w.crossed_floor(800.0));
        w.fall();
        assert!(w.crossed_floor(800.0));
    }
}
