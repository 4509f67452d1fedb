//! Result records and the leaderboard store
//!
//! Every finished round produces one `ResultRecord`. Stores keep records
//! ranked by rating (desc), kills (desc), play time (asc), then timestamp
//! (asc) so that ties have a stable order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Difficulty;

/// Records kept per difficulty before the lowest ranked are dropped
pub const MAX_RESULTS_PER_DIFFICULTY: usize = 500;

/// Name width on leaderboard rows
const ROW_NAME_WIDTH: usize = 10;

/// Persistence and remote sync failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned HTTP {status}")]
    Http { status: u16 },
    #[error("invalid request: {0}")]
    Invalid(String),
}

/// Outcome of a single round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub rating: f64,
    pub kills: u32,
    pub deaths: u32,
    pub bullets_used: u32,
    pub level_reached: u32,
    pub victory: bool,
    pub play_time_sec: f64,
    /// Unix timestamp (ms) when the round ended
    pub timestamp: f64,
}

impl ResultRecord {
    /// One leaderboard line, e.g. `Ace  7.25/9.0  K:12 D:1 T:84.2s`
    pub fn summary_line(&self) -> String {
        let name: String = self.player_name.chars().take(ROW_NAME_WIDTH).collect();
        format!(
            "{}  {:.2}/{:.1}  K:{} D:{} T:{:.1}s",
            name,
            self.rating,
            self.difficulty.rating_cap(),
            self.kills,
            self.deaths,
            self.play_time_sec
        )
    }

    /// Same round reported twice (e.g. local copy and remote echo).
    ///
    /// Only compares fields the remote API keeps.
    pub fn same_round(&self, other: &ResultRecord) -> bool {
        self.player_name == other.player_name
            && self.difficulty == other.difficulty
            && self.kills == other.kills
            && (self.rating - other.rating).abs() < 1e-9
            && (self.play_time_sec - other.play_time_sec).abs() < 0.001
    }
}

/// Total ranking order; "less" ranks higher
pub fn rank_order(a: &ResultRecord, b: &ResultRecord) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.kills.cmp(&a.kills))
        .then_with(|| a.play_time_sec.total_cmp(&b.play_time_sec))
        .then_with(|| a.timestamp.total_cmp(&b.timestamp))
}

/// Ranked record collection shared by the concrete stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<ResultRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a record at its ranked position.
    ///
    /// Returns the 1-based rank within its difficulty.
    pub fn insert(&mut self, record: ResultRecord) -> usize {
        let pos = self
            .entries
            .partition_point(|e| rank_order(e, &record) != Ordering::Greater);
        let rank = self.entries[..pos]
            .iter()
            .filter(|e| e.difficulty == record.difficulty)
            .count()
            + 1;
        self.entries.insert(pos, record);
        self.trim();
        rank
    }

    /// Re-sort after loading entries from outside
    pub fn normalize(&mut self) {
        self.entries.retain(|e| e.rating.is_finite() && e.play_time_sec.is_finite());
        self.entries.sort_by(rank_order);
        self.trim();
    }

    fn trim(&mut self) {
        let mut seen = [0usize; Difficulty::ALL.len()];
        self.entries.retain(|e| {
            let slot = &mut seen[e.difficulty as usize];
            *slot += 1;
            *slot <= MAX_RESULTS_PER_DIFFICULTY
        });
    }

    pub fn contains(&self, record: &ResultRecord) -> bool {
        self.entries.iter().any(|e| e.same_round(record))
    }

    /// Top `limit` records for one difficulty
    pub fn top(&self, limit: usize, difficulty: Difficulty) -> Vec<ResultRecord> {
        self.entries
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Best rating for a difficulty, 0 when empty
    pub fn best_rating(&self, difficulty: Difficulty) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .map(|e| e.rating)
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where finished rounds go.
///
/// Failures are reported to the caller, which logs them and carries on.
pub trait LeaderboardStore {
    /// Append one record
    fn save(&mut self, record: ResultRecord) -> Result<(), StoreError>;

    /// Ranked records for a difficulty, at most `limit`
    fn top_results(&self, limit: usize, difficulty: Difficulty) -> Vec<ResultRecord>;

    /// Highest rating recorded for a difficulty, 0 if none
    fn best_rating(&self, difficulty: Difficulty) -> f64;
}

/// In-memory store (tests, native runs, storage fallback)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub board: Leaderboard,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardStore for MemoryStore {
    fn save(&mut self, record: ResultRecord) -> Result<(), StoreError> {
        self.board.insert(record);
        Ok(())
    }

    fn top_results(&self, limit: usize, difficulty: Difficulty) -> Vec<ResultRecord> {
        self.board.top(limit, difficulty)
    }

    fn best_rating(&self, difficulty: Difficulty) -> f64 {
        self.board.best_rating(difficulty)
    }
}

/// Browser store backed by LocalStorage.
///
/// Records always land in memory first, so a failed write still shows up
/// on the leaderboard for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    board: Leaderboard,
}

impl LocalStore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tank_battle_results";

    /// Load results from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let mut board = match crate::platform::storage::get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str::<Leaderboard>(&json) {
                Ok(board) => board,
                Err(e) => {
                    log::warn!("Discarding unreadable results: {}", e);
                    Leaderboard::new()
                }
            },
            None => Leaderboard::new(),
        };
        board.normalize();
        log::info!("Loaded {} results", board.len());
        Self { board }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(target_arch = "wasm32")]
    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.board)?;
        crate::platform::storage::set(Self::STORAGE_KEY, &json)?;
        log::info!("Results saved ({} entries)", self.board.len());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Merge records from elsewhere, skipping ones already present.
    ///
    /// Returns how many were added.
    pub fn merge(&mut self, records: Vec<ResultRecord>) -> Result<usize, StoreError> {
        let mut added = 0;
        for record in records {
            if !self.board.contains(&record) {
                self.board.insert(record);
                added += 1;
            }
        }
        if added > 0 {
            self.persist()?;
        }
        Ok(added)
    }
}

impl LeaderboardStore for LocalStore {
    fn save(&mut self, record: ResultRecord) -> Result<(), StoreError> {
        self.board.insert(record);
        self.persist()
    }

    fn top_results(&self, limit: usize, difficulty: Difficulty) -> Vec<ResultRecord> {
        self.board.top(limit, difficulty)
    }

    fn best_rating(&self, difficulty: Difficulty) -> f64 {
        self.board.best_rating(difficulty)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(name: &str, difficulty: Difficulty, rating: f64, kills: u32, time: f64) -> ResultRecord {
        ResultRecord {
            player_name: name.to_string(),
            difficulty,
            rating,
            kills,
            deaths: 1,
            bullets_used: kills * 2,
            level_reached: 2,
            victory: false,
            play_time_sec: time,
            timestamp: 1_700_000_000_000.0,
        }
    }

    #[test]
    fn test_store_and_query_by_difficulty() {
        let mut store = MemoryStore::new();
        store.save(record("sergiokai", Difficulty::Easy, 5.5, 7, 44.5)).unwrap();
        store.save(record("sergiokai", Difficulty::Hard, 9.8, 30, 110.2)).unwrap();

        let easy = store.top_results(10, Difficulty::Easy);
        let hard = store.top_results(10, Difficulty::Hard);
        assert_eq!(easy.len(), 1);
        assert_eq!(hard.len(), 1);
        assert_eq!(easy[0].difficulty, Difficulty::Easy);
        assert_eq!(store.best_rating(Difficulty::Hard), 9.8);
        assert_eq!(store.best_rating(Difficulty::Medium), 0.0);
    }

    #[test]
    fn test_ranking_tie_breaks() {
        let mut board = Leaderboard::new();
        board.insert(record("slow", Difficulty::Medium, 6.0, 10, 90.0));
        board.insert(record("fewer", Difficulty::Medium, 6.0, 8, 30.0));
        board.insert(record("fast", Difficulty::Medium, 6.0, 10, 60.0));
        board.insert(record("best", Difficulty::Medium, 7.0, 1, 200.0));

        let names: Vec<_> = board
            .top(10, Difficulty::Medium)
            .into_iter()
            .map(|r| r.player_name)
            .collect();
        assert_eq!(names, ["best", "fast", "slow", "fewer"]);
    }

    #[test]
    fn test_full_tie_older_first() {
        let mut board = Leaderboard::new();
        let mut newer = record("newer", Difficulty::Easy, 3.0, 4, 50.0);
        newer.timestamp += 10_000.0;
        board.insert(newer);
        board.insert(record("older", Difficulty::Easy, 3.0, 4, 50.0));
        assert_eq!(board.entries[0].player_name, "older");
    }

    #[test]
    fn test_insert_returns_rank_within_difficulty() {
        let mut board = Leaderboard::new();
        board.insert(record("a", Difficulty::Hard, 9.0, 1, 10.0));
        assert_eq!(board.insert(record("b", Difficulty::Easy, 5.0, 1, 10.0)), 1);
        assert_eq!(board.insert(record("c", Difficulty::Easy, 6.0, 1, 10.0)), 1);
        assert_eq!(board.insert(record("d", Difficulty::Easy, 1.0, 1, 10.0)), 3);
    }

    #[test]
    fn test_top_truncates() {
        let mut board = Leaderboard::new();
        for i in 0..12 {
            board.insert(record("p", Difficulty::Medium, f64::from(i), i, 10.0));
        }
        let top = board.top(8, Difficulty::Medium);
        assert_eq!(top.len(), 8);
        assert_eq!(top[0].rating, 11.0);
    }

    #[test]
    fn test_trim_per_difficulty() {
        let mut board = Leaderboard::new();
        for i in 0..(MAX_RESULTS_PER_DIFFICULTY + 5) {
            board.insert(record("p", Difficulty::Easy, i as f64 / 100.0, 1, 10.0));
        }
        board.insert(record("q", Difficulty::Hard, 0.1, 1, 10.0));
        assert_eq!(board.top(usize::MAX, Difficulty::Easy).len(), MAX_RESULTS_PER_DIFFICULTY);
        assert_eq!(board.top(usize::MAX, Difficulty::Hard).len(), 1);
    }

    #[test]
    fn test_merge_skips_duplicates() {
        let mut store = LocalStore::load();
        let r = record("ace", Difficulty::Medium, 4.2, 5, 30.0);
        store.save(r.clone()).unwrap();
        let added = store
            .merge(vec![r.clone(), record("bo", Difficulty::Medium, 3.0, 2, 30.0)])
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.top_results(10, Difficulty::Medium).len(), 2);
    }

    #[test]
    fn test_record_json_is_camel_case() {
        let json = serde_json::to_string(&record("kai", Difficulty::Hard, 1.0, 1, 2.0)).unwrap();
        assert!(json.contains("\"playerName\":\"kai\""));
        assert!(json.contains("\"difficulty\":\"hard\""));
        assert!(json.contains("\"playTimeSec\":2.0"));
        assert!(json.contains("\"bulletsUsed\":2"));
    }

    #[test]
    fn test_summary_line() {
        let r = record("LongishPlayerName", Difficulty::Medium, 7.256, 12, 84.24);
        assert_eq!(r.summary_line(), "LongishPla  7.26/9.0  K:12 D:1 T:84.2s");
    }
}
