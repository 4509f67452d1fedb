//! Remote leaderboard client
//!
//! Talks to the score service:
//! - `POST {base}/api/scores` with one score as JSON
//! - `GET {base}/api/scores/leaderboard?difficulty=D&limit=N` (1..=100)
//!
//! `SyncedStore` keeps the local store authoritative. Remote calls run in the
//! background on the browser's event loop and only ever log on failure.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::highscores::{LeaderboardStore, LocalStore, ResultRecord, StoreError};
use crate::settings::Difficulty;

/// Largest `limit` the leaderboard endpoint accepts
pub const MAX_REMOTE_LIMIT: usize = 100;

/// Score as the service sends and receives it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScore {
    #[serde(default)]
    pub id: i64,
    pub player_name: String,
    pub difficulty: String,
    pub rating: f64,
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub bullets_used: u32,
    #[serde(default)]
    pub level_reached: u32,
    /// 1 for a victory, 0 otherwise
    #[serde(default)]
    pub victory: u8,
    #[serde(default)]
    pub play_time_sec: f64,
    #[serde(default)]
    pub time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_at: Option<String>,
    /// Server-assigned Unix ms
    #[serde(default)]
    pub created_at: i64,
}

impl From<&ResultRecord> for ApiScore {
    fn from(r: &ResultRecord) -> Self {
        Self {
            id: 0,
            player_name: r.player_name.clone(),
            difficulty: r.difficulty.as_str().to_string(),
            rating: r.rating,
            kills: r.kills,
            deaths: r.deaths,
            bullets_used: r.bullets_used,
            level_reached: r.level_reached,
            victory: u8::from(r.victory),
            play_time_sec: r.play_time_sec,
            time_ms: (r.play_time_sec * 1000.0).round() as u64,
            played_at: crate::platform::time::iso_timestamp(r.timestamp),
            created_at: 0,
        }
    }
}

impl TryFrom<ApiScore> for ResultRecord {
    type Error = StoreError;

    fn try_from(s: ApiScore) -> Result<Self, Self::Error> {
        let difficulty = Difficulty::from_str(&s.difficulty)
            .ok_or_else(|| StoreError::Invalid(format!("unknown difficulty {:?}", s.difficulty)))?;
        let play_time_sec = if s.play_time_sec > 0.0 {
            s.play_time_sec
        } else {
            s.time_ms as f64 / 1000.0
        };
        Ok(ResultRecord {
            player_name: s.player_name,
            difficulty,
            rating: s.rating,
            kills: s.kills,
            deaths: s.deaths,
            bullets_used: s.bullets_used,
            level_reached: s.level_reached,
            victory: s.victory != 0,
            play_time_sec,
            timestamp: s.created_at as f64,
        })
    }
}

/// Reject what the service would answer with 400
pub fn validate(score: &ApiScore) -> Result<(), StoreError> {
    if score.player_name.trim().is_empty() {
        return Err(StoreError::Invalid("playerName is required".into()));
    }
    if Difficulty::from_str(&score.difficulty).is_none() {
        return Err(StoreError::Invalid("difficulty must be easy|medium|hard".into()));
    }
    if score.rating.is_nan() || score.rating < 0.0 {
        return Err(StoreError::Invalid("rating must be non-negative".into()));
    }
    Ok(())
}

pub fn scores_url(base: &str) -> String {
    format!("{}/api/scores", base.trim_end_matches('/'))
}

pub fn leaderboard_url(base: &str, difficulty: Difficulty, limit: usize) -> Result<String, StoreError> {
    if !(1..=MAX_REMOTE_LIMIT).contains(&limit) {
        return Err(StoreError::Invalid(format!(
            "limit must be in [1,{}], got {}",
            MAX_REMOTE_LIMIT, limit
        )));
    }
    Ok(format!(
        "{}/api/scores/leaderboard?difficulty={}&limit={}",
        base.trim_end_matches('/'),
        difficulty.as_str(),
        limit
    ))
}

/// Parse a leaderboard response, dropping rows that don't convert
pub fn parse_leaderboard(json: &str) -> Result<Vec<ResultRecord>, StoreError> {
    let scores: Vec<ApiScore> = serde_json::from_str(json)?;
    Ok(scores
        .into_iter()
        .filter_map(|s| match ResultRecord::try_from(s) {
            Ok(r) => Some(r),
            Err(e) => {
                log::warn!("Skipping remote score: {}", e);
                None
            }
        })
        .collect())
}

/// Local store with background sync to the score service
#[derive(Debug, Clone)]
pub struct SyncedStore {
    local: Rc<RefCell<LocalStore>>,
    base_url: Option<String>,
    /// Set when a background pull added rows
    updated: Rc<Cell<bool>>,
}

impl SyncedStore {
    pub fn new(local: LocalStore, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Self {
            local: Rc::new(RefCell::new(local)),
            base_url,
            updated: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.base_url.is_some()
    }

    /// True once after a background pull changed the local rows
    pub fn take_updated(&self) -> bool {
        self.updated.replace(false)
    }

    /// Merge rows into the local store
    fn merge_rows(local: &RefCell<LocalStore>, updated: &Cell<bool>, rows: Vec<ResultRecord>) {
        match local.borrow_mut().merge(rows) {
            Ok(0) => {}
            Ok(n) => {
                log::info!("Merged {} remote scores", n);
                updated.set(true);
            }
            Err(e) => {
                log::warn!("Remote scores kept in memory only: {}", e);
                updated.set(true);
            }
        }
    }

    /// Fetch the remote leaderboard for `difficulty` and merge it locally
    #[cfg(target_arch = "wasm32")]
    pub fn pull(&self, difficulty: Difficulty, limit: usize) {
        let Some(base) = self.base_url.clone() else {
            return;
        };
        let url = match leaderboard_url(&base, difficulty, limit.min(MAX_REMOTE_LIMIT)) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Leaderboard not fetched: {}", e);
                return;
            }
        };
        let local = self.local.clone();
        let updated = self.updated.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match http::get_text(&url).await.and_then(|body| parse_leaderboard(&body)) {
                Ok(rows) => Self::merge_rows(&local, &updated, rows),
                Err(e) => log::warn!("Leaderboard fetch failed, using local scores: {}", e),
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn pull(&self, _difficulty: Difficulty, _limit: usize) {
        // No-op for native
    }

    #[cfg(target_arch = "wasm32")]
    fn push(&self, score: ApiScore) {
        let Some(base) = self.base_url.clone() else {
            return;
        };
        let body = match serde_json::to_string(&score) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Score not submitted: {}", e);
                return;
            }
        };
        wasm_bindgen_futures::spawn_local(async move {
            match http::post_json(&scores_url(&base), &body).await {
                Ok(()) => log::info!("Score submitted to {}", base),
                Err(e) => log::warn!("Score not submitted: {}", e),
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn push(&self, _score: ApiScore) {
        // No-op for native
    }

    /// Merge rows fetched by other means (also used by native tests)
    pub fn merge_remote(&self, rows: Vec<ResultRecord>) {
        Self::merge_rows(&self.local, &self.updated, rows);
    }
}

impl LeaderboardStore for SyncedStore {
    fn save(&mut self, record: ResultRecord) -> Result<(), StoreError> {
        let score = ApiScore::from(&record);
        let local = self.local.borrow_mut().save(record);
        if self.is_remote() {
            match validate(&score) {
                Ok(()) => self.push(score),
                Err(e) => log::warn!("Score not submitted: {}", e),
            }
        }
        local
    }

    fn top_results(&self, limit: usize, difficulty: Difficulty) -> Vec<ResultRecord> {
        self.local.borrow().top_results(limit, difficulty)
    }

    fn best_rating(&self, difficulty: Difficulty) -> f64 {
        self.local.borrow().best_rating(difficulty)
    }
}

#[cfg(target_arch = "wasm32")]
mod http {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use crate::highscores::StoreError;

    fn js_err(e: JsValue) -> StoreError {
        StoreError::Network(format!("{:?}", e))
    }

    async fn send(request: Request) -> Result<String, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Network("no window".into()))?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?;
        let response: Response = value.dyn_into().map_err(js_err)?;
        if !response.ok() {
            return Err(StoreError::Http {
                status: response.status(),
            });
        }
        let text = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        text.as_string()
            .ok_or_else(|| StoreError::Network("response body is not text".into()))
    }

    pub async fn get_text(url: &str) -> Result<String, StoreError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);
        let request = Request::new_with_str_and_init(url, &opts).map_err(js_err)?;
        send(request).await
    }

    pub async fn post_json(url: &str, body: &str) -> Result<(), StoreError> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(body));
        let request = Request::new_with_str_and_init(url, &opts).map_err(js_err)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
        send(request).await.map(|_| ())
    }
}
