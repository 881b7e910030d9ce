pub mod ui;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use wordfall::{
    config::{FileSettingsStore, SettingsStore},
    events::{AudioCue, NullAudio, SessionEvent, TerminalBell},
    runtime::{CrosstermEventSource, GameEvent, Runner},
    scores::{GameResult, ScoreDb},
    session::{GameSession, SessionConfig, Status},
    vocab::VocabSet,
    TICK_RATE_MS,
};

/// falling words typing game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Words fall down the screen; type them before they reach the bottom. Correct words score points, missed words cost you mistakes, and every ten points the game speeds up."
)]
pub struct Cli {
    /// word category to start with
    #[clap(short = 'c', long, value_enum)]
    category: Option<BuiltinCategory>,

    /// number of missed words tolerated before the game ends
    #[clap(short = 'm', long)]
    mistakes: Option<u32>,

    /// player name recorded with final scores
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// custom vocabulary file (json object mapping category names to word lists)
    #[clap(long)]
    vocab: Option<PathBuf>,

    /// disable the terminal bell cues
    #[clap(long)]
    mute: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum BuiltinCategory {
    Abc,
    Animals,
    Fruits,
    Colors,
    Shapes,
    All,
}

impl BuiltinCategory {
    fn as_key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

#[derive(Debug)]
pub struct App {
    pub session: GameSession,
    pub vocab: VocabSet,
    pub player: String,
    pub typed: String,
    pub best_score: Option<u32>,
    categories: Vec<String>,
}

impl App {
    pub fn new(session: GameSession, vocab: VocabSet, player: String) -> Self {
        let categories = vocab.category_names().map(str::to_string).collect();
        Self {
            session,
            vocab,
            player,
            typed: String::new(),
            best_score: None,
            categories,
        }
    }

    /// Restart into the next category in alphabetical rotation.
    pub fn next_category(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let current = self.session.category().to_string();
        let idx = self
            .categories
            .iter()
            .position(|c| *c == current)
            .map_or(0, |i| (i + 1) % self.categories.len());
        let name = self.categories[idx].clone();
        let words = self.vocab.words(&name).to_vec();
        self.typed.clear();
        self.session.change_category(&name, words);
    }
}

/// Apply one keystroke. Returns true when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if key.code == KeyCode::Esc {
        return true;
    }

    match app.session.status() {
        Status::Ready => {
            app.session.start();
        }
        Status::Running => match key.code {
            KeyCode::Tab => {
                app.typed.clear();
                app.session.toggle_pause();
            }
            KeyCode::Backspace => {
                app.typed.pop();
            }
            KeyCode::Char(c) => {
                app.typed.push(c);
                // Matching happens on every input change, not on enter
                if app.session.submit_input(&app.typed) {
                    app.typed.clear();
                }
            }
            _ => {}
        },
        Status::Paused => match key.code {
            KeyCode::Tab => app.session.toggle_pause(),
            KeyCode::Char('c') => app.next_category(),
            _ => {}
        },
        Status::GameOver => match key.code {
            KeyCode::Char('r') => {
                app.typed.clear();
                app.session.restart();
            }
            KeyCode::Char('c') => app.next_category(),
            _ => {}
        },
    }
    false
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileSettingsStore::new();
    let mut settings = store.load();
    if let Some(player) = cli.player {
        settings.player = player;
    }
    if let Some(mistakes) = cli.mistakes {
        settings.mistakes_allowed = mistakes.max(1);
    }
    if let Some(category) = cli.category {
        settings.category = category.as_key();
    }

    let vocab = VocabSet::load_or_builtin(cli.vocab.as_deref());
    let config = SessionConfig {
        mistakes_allowed: settings.mistakes_allowed,
        category: settings.category.clone(),
        ..Default::default()
    };
    let session = GameSession::new(config, vocab.words(&settings.category).to_vec());

    // Score history and sound are both best-effort extras
    let score_db = ScoreDb::new().ok();
    let mut audio: Box<dyn AudioCue> = if cli.mute {
        Box::new(NullAudio)
    } else {
        Box::new(TerminalBell)
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, vocab, settings.player.clone());
    app.best_score = score_db
        .as_ref()
        .and_then(|db| db.best_score(&settings.category).ok().flatten());

    let result = run_app(&mut terminal, &mut app, audio.as_mut(), score_db.as_ref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Remember the category the player ended on; a failed save degrades to
    // in-memory-only settings.
    settings.category = app.session.category().to_string();
    let _ = store.save(&settings);

    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    audio: &mut dyn AudioCue,
    score_db: Option<&ScoreDb>,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        let mut quit = false;
        match runner.step() {
            GameEvent::Tick => app.session.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => quit = handle_key(app, key),
        }

        for event in app.session.drain_events() {
            if let Some(cue) = event.cue() {
                audio.play(cue);
            }
            match event {
                SessionEvent::GameOver { score, level } => {
                    if let Some(db) = score_db {
                        let _ = db.record(&GameResult {
                            player: app.player.clone(),
                            category: app.session.category().to_string(),
                            score,
                            level,
                            finished_at: Local::now(),
                        });
                        app.best_score = db.best_score(app.session.category()).ok().flatten();
                    }
                }
                SessionEvent::Restarted => {
                    if let Some(db) = score_db {
                        app.best_score = db.best_score(app.session.category()).ok().flatten();
                    }
                }
                _ => {}
            }
        }

        if quit {
            break;
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
