//! Session controller
//!
//! Owns the game state and the leaderboard store. Each frame it feeds input
//! to the simulation, reacts to the events the tick produced (persisting a
//! finished round exactly once), and exposes a snapshot for rendering.

use crate::consts::LEADERBOARD_LIMIT;
use crate::highscores::{LeaderboardStore, ResultRecord};
use crate::platform;
use crate::renderer::{Hud, RenderSink, Snapshot};
use crate::settings::{Difficulty, Settings, sanitize_player_name};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Leaderboard rows shown on the menu
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardView {
    pub difficulty: Difficulty,
    pub rows: Vec<ResultRecord>,
    pub best: f64,
}

impl LeaderboardView {
    fn empty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rows: Vec::new(),
            best: 0.0,
        }
    }

    /// e.g. `Top Rating: 7.25/9.0`
    pub fn best_line(&self) -> String {
        format!(
            "Top Rating: {:.2}/{:.1}",
            self.best,
            self.difficulty.rating_cap()
        )
    }

    /// One line per row, or a placeholder when there are none
    pub fn lines(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return vec!["No records yet.".to_string()];
        }
        self.rows.iter().map(ResultRecord::summary_line).collect()
    }
}

pub struct Session<S: LeaderboardStore> {
    settings: Settings,
    player_name: String,
    menu_difficulty: Difficulty,
    state: GameState,
    store: S,
    leaderboard: LeaderboardView,
}

impl<S: LeaderboardStore> Session<S> {
    pub fn new(seed: u64, settings: Settings, store: S) -> Self {
        let player_name = sanitize_player_name(&settings.player_name);
        let menu_difficulty = settings.difficulty;
        let mut session = Self {
            settings,
            player_name,
            menu_difficulty,
            state: GameState::new(seed),
            store,
            leaderboard: LeaderboardView::empty(menu_difficulty),
        };
        session.refresh_leaderboard();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn menu_difficulty(&self) -> Difficulty {
        self.menu_difficulty
    }

    pub fn leaderboard(&self) -> &LeaderboardView {
        &self.leaderboard
    }

    /// Rows to show and fetch; a stored 0 means the default
    pub fn leaderboard_limit(&self) -> usize {
        match self.settings.leaderboard_limit {
            0 => LEADERBOARD_LIMIT,
            n => n,
        }
    }

    /// Menu difficulty changed
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.menu_difficulty = difficulty;
        self.settings.difficulty = difficulty;
        self.refresh_leaderboard();
    }

    /// Menu form submitted
    pub fn start_round(&mut self, raw_name: &str, difficulty: Difficulty) {
        self.player_name = sanitize_player_name(raw_name);
        self.menu_difficulty = difficulty;
        self.settings.player_name = self.player_name.clone();
        self.settings.difficulty = difficulty;
        self.state.start_round(difficulty);
        log::info!("{} takes the field", self.player_name);
    }

    /// Abandon whatever is running and show the menu
    pub fn back_to_menu(&mut self) {
        self.state.reset_to_menu();
        self.refresh_leaderboard();
    }

    /// Advance one frame and handle what happened during it
    pub fn frame(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        tick(&mut self.state, input, dt);
        let events = std::mem::take(&mut self.state.events);
        for event in &events {
            if let GameEvent::RoundOver { victory } = event {
                self.finalize_round(*victory);
            }
        }
        events
    }

    /// Persist the finished round unless already done.
    ///
    /// Returns true if this call submitted the record.
    fn finalize_round(&mut self, victory: bool) -> bool {
        if self.state.round.saved {
            return false;
        }
        self.state.round.saved = true;

        let round = &self.state.round;
        let record = ResultRecord {
            player_name: self.player_name.clone(),
            difficulty: self.state.difficulty,
            rating: round.final_rating,
            kills: round.kills,
            deaths: round.deaths,
            bullets_used: round.shots,
            level_reached: self.state.level,
            victory,
            play_time_sec: round.final_elapsed_sec,
            timestamp: platform::now_ms(),
        };

        match self.store.save(record) {
            Ok(()) => log::info!(
                "Result saved: {} {:.2} on {}",
                self.player_name,
                self.state.round.final_rating,
                self.state.difficulty.as_str()
            ),
            Err(e) => log::warn!("Result not saved: {}", e),
        }
        self.refresh_leaderboard();
        true
    }

    /// Reload the menu leaderboard for the selected difficulty
    pub fn refresh_leaderboard(&mut self) {
        let difficulty = self.menu_difficulty;
        self.leaderboard = LeaderboardView {
            difficulty,
            rows: self.store.top_results(self.leaderboard_limit(), difficulty),
            best: self.store.best_rating(difficulty),
        };
    }

    pub fn hud(&self) -> Hud {
        Hud::for_state(&self.state)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(&self.state)
    }

    pub fn render<R: RenderSink>(&self, sink: &mut R) {
        sink.draw(&self.snapshot());
    }
}
