use crate::events::{RemovalReason, SessionEvent};
use crate::spawner::WordSpawner;
use crate::word::FallingWord;
use crate::TICK_RATE_MS;

pub const DEFAULT_MISTAKE_BUDGET: u32 = 5;
pub const DEFAULT_FLOOR_HEIGHT: f64 = 800.0;

/// Spawn cadence: base period shrinking per level, clamped so it can never
/// reach zero at high levels.
const BASE_SPAWN_PERIOD_MS: u64 = 2000;
const SPAWN_STEP_PER_LEVEL_MS: u64 = 100;
const MIN_SPAWN_PERIOD_MS: u64 = 200;

/// A level-up every ten points, growing the mistake budget by two.
const LEVEL_UP_EVERY: u32 = 10;
const BUDGET_GROWTH_PER_LEVEL: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ready,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub mistakes_allowed: u32,
    pub floor_height: f64,
    pub category: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mistakes_allowed: DEFAULT_MISTAKE_BUDGET,
            floor_height: DEFAULT_FLOOR_HEIGHT,
            category: "all".to_string(),
        }
    }
}

/// Milliseconds between spawns at the given level.
pub fn spawn_period_ms(level: u32) -> u64 {
    BASE_SPAWN_PERIOD_MS
        .saturating_sub(level as u64 * SPAWN_STEP_PER_LEVEL_MS)
        .max(MIN_SPAWN_PERIOD_MS)
}

/// Spawn period expressed in whole ticks, rounded up so the clamped
/// millisecond floor is never undershot.
pub fn spawn_period_ticks(level: u32) -> u64 {
    spawn_period_ms(level).div_ceil(TICK_RATE_MS).max(1)
}

/// Aggregate root for one playthrough: the authoritative word list, the
/// score/level/mistake counters, and the status machine. All mutation goes
/// through `on_tick` and the player commands, serialized by the caller's
/// event loop — no two ticks overlap and input never races a tick.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    words: Vec<String>,
    spawner: WordSpawner,
    pub score: u32,
    pub level: u32,
    pub mistakes_allowed: u32,
    pub mistakes_remaining: u32,
    status: Status,
    active_words: Vec<FallingWord>,
    ticks_until_spawn: u64,
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn new(config: SessionConfig, words: Vec<String>) -> Self {
        Self::with_spawner(config, words, WordSpawner::new())
    }

    /// Session with a caller-supplied spawner, typically seeded in tests.
    pub fn with_spawner(config: SessionConfig, words: Vec<String>, spawner: WordSpawner) -> Self {
        let budget = config.mistakes_allowed;
        Self {
            config,
            words,
            spawner,
            score: 0,
            level: 1,
            mistakes_allowed: budget,
            mistakes_remaining: budget,
            status: Status::Ready,
            active_words: Vec::new(),
            ticks_until_spawn: spawn_period_ticks(1),
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn category(&self) -> &str {
        &self.config.category
    }

    pub fn floor_height(&self) -> f64 {
        self.config.floor_height
    }

    /// Active words in spawn order.
    pub fn active_words(&self) -> &[FallingWord] {
        &self.active_words
    }

    /// Leave `Ready` and spawn the first word. No-op in any other state.
    pub fn start(&mut self) {
        if self.status != Status::Ready {
            return;
        }
        self.status = Status::Running;
        self.spawn_one();
        self.ticks_until_spawn = spawn_period_ticks(self.level);
    }

    /// One clock tick: advance every word, retire floor-crossers as misses,
    /// then run the spawn countdown. Logic-gated — while not `Running` the
    /// tick is a no-op, so a paused or finished session never moves.
    pub fn on_tick(&mut self) {
        if self.status != Status::Running {
            return;
        }

        let mut idx = 0;
        while idx < self.active_words.len() {
            self.active_words[idx].fall();
            if self.active_words[idx].crossed_floor(self.config.floor_height) {
                let word = self.active_words.remove(idx);
                self.record_miss(word);
                if self.status == Status::GameOver {
                    return;
                }
            } else {
                idx += 1;
            }
        }

        self.ticks_until_spawn = self.ticks_until_spawn.saturating_sub(1);
        if self.ticks_until_spawn == 0 {
            self.spawn_one();
            // Cadence changes from a level-up take effect here, at the
            // next schedule.
            self.ticks_until_spawn = spawn_period_ticks(self.level);
        }
    }

    /// Match typed text against the active words. The presentation layer
    /// calls this on every input change, so partial input not matching
    /// anything is a silent no-op. Returns true on a hit.
    pub fn submit_input(&mut self, text: &str) -> bool {
        if self.status != Status::Running {
            return false;
        }
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return false;
        }
        // First match in spawn order wins when several words share text.
        let Some(idx) = self.active_words.iter().position(|w| w.text == normalized) else {
            return false;
        };
        let word = self.active_words.remove(idx);
        self.events.push(SessionEvent::WordRemoved {
            id: word.id,
            reason: RemovalReason::Matched,
        });
        self.score += 1;
        self.events.push(SessionEvent::ScoreChanged(self.score));
        if self.score % LEVEL_UP_EVERY == 0 {
            self.level_up();
        }
        true
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            Status::Running => {
                self.status = Status::Paused;
                self.events.push(SessionEvent::Paused);
            }
            Status::Paused => {
                self.status = Status::Running;
                self.events.push(SessionEvent::Resumed);
            }
            Status::Ready | Status::GameOver => {}
        }
    }

    /// Full reinit: counters back to the configured defaults, word list
    /// emptied, both schedules restarted. Valid from any state.
    pub fn restart(&mut self) {
        self.score = 0;
        self.level = 1;
        self.mistakes_allowed = self.config.mistakes_allowed;
        self.mistakes_remaining = self.config.mistakes_allowed;
        self.active_words.clear();
        self.status = Status::Running;
        self.events.push(SessionEvent::Restarted);
        self.spawn_one();
        self.ticks_until_spawn = spawn_period_ticks(self.level);
    }

    /// Restart into a new category, discarding all falling words.
    pub fn change_category(&mut self, category: &str, words: Vec<String>) {
        self.config.category = category.to_string();
        self.words = words;
        self.restart();
    }

    /// Take the events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn spawn_one(&mut self) {
        if let Some(word) = self.spawner.spawn(&self.words, self.level) {
            self.events.push(SessionEvent::WordSpawned {
                id: word.id,
                text: word.text.clone(),
                x: word.x,
            });
            self.active_words.push(word);
        }
    }

    fn record_miss(&mut self, word: FallingWord) {
        self.events.push(SessionEvent::WordRemoved {
            id: word.id,
            reason: RemovalReason::Missed,
        });
        self.mistakes_remaining = self.mistakes_remaining.saturating_sub(1);
        self.events.push(SessionEvent::MistakesChanged {
            remaining: self.mistakes_remaining,
            allowed: self.mistakes_allowed,
        });
        if self.mistakes_remaining == 0 {
            self.game_over();
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.mistakes_allowed += BUDGET_GROWTH_PER_LEVEL;
        self.mistakes_remaining = self.mistakes_allowed;
        self.events.push(SessionEvent::LevelChanged(self.level));
        self.events.push(SessionEvent::MistakesChanged {
            remaining: self.mistakes_remaining,
            allowed: self.mistakes_allowed,
        });
    }

    fn game_over(&mut self) {
        self.status = Status::GameOver;
        // The field is cleared wholesale; the GameOver event tells the
        // presentation layer to drop everything it still shows.
        self.active_words.clear();
        self.events.push(SessionEvent::GameOver {
            score: self.score,
            level: self.level,
        });
    }
}
