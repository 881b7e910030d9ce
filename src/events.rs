use crate::word::WordId;
use std::io::Write;

/// Why a word left the active list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    Matched,
    Missed,
}

/// Discrete events the session emits for the presentation layer. The TUI
/// reads word positions straight off the session each frame; these cover
/// the one-shot transitions (sounds, score recording, overlays).
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    WordSpawned { id: WordId, text: String, x: f64 },
    WordRemoved { id: WordId, reason: RemovalReason },
    ScoreChanged(u32),
    LevelChanged(u32),
    MistakesChanged { remaining: u32, allowed: u32 },
    Paused,
    Resumed,
    GameOver { score: u32, level: u32 },
    Restarted,
}

impl SessionEvent {
    /// Audio cue for this event, if it carries one. `LevelChanged` is only
    /// emitted on a real level-up, never on restart.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            SessionEvent::WordRemoved {
                reason: RemovalReason::Matched,
                ..
            } => Some(Cue::Hit),
            SessionEvent::WordRemoved {
                reason: RemovalReason::Missed,
                ..
            } => Some(Cue::Miss),
            SessionEvent::LevelChanged(_) => Some(Cue::LevelUp),
            SessionEvent::GameOver { .. } => Some(Cue::GameOver),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Hit,
    Miss,
    LevelUp,
    GameOver,
}

/// Fire-and-forget sound trigger. The core never awaits playback or cares
/// whether it succeeded.
pub trait AudioCue {
    fn play(&mut self, cue: Cue);
}

/// Muted playback.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioCue for NullAudio {
    fn play(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell. Write errors are ignored.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&mut self, cue: Cue) {
        let chimes = match cue {
            Cue::GameOver => 2,
            _ => 1,
        };
        let mut out = std::io::stdout();
        for _ in 0..chimes {
            let _ = out.write_all(b"\x07");
        }
        let _ = out.flush();
    }
}
