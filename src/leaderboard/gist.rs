use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use super::{merge, position_in, top_of, Leaderboard, LeaderboardEntry, Player, Position, SubmitOutcome};

const GITHUB_API: &str = "https://api.github.com";
const FILENAME: &str = "leaderboard.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("malformed leaderboard: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct GistDocument {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
}

/// Board kept as a JSON file inside a GitHub gist.
///
/// Each call fetches the whole gist; `add_entry` writes the whole file back.
/// Writes from this process are serialized so concurrent submissions can't
/// overwrite each other's merge. Another process writing the same gist can
/// still race, there is no version check on the GitHub side.
pub struct GistLeaderboard {
    client: Client,
    base_url: String,
    gist_id: String,
    token: String,
    write_lock: Mutex<()>,
}

impl GistLeaderboard {
    pub fn new(gist_id: String, token: String) -> Self {
        Self::with_base_url(GITHUB_API.to_string(), gist_id, token)
    }

    pub fn with_base_url(base_url: String, gist_id: String, token: String) -> Self {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            gist_id,
            token,
            write_lock: Mutex::new(()),
        }
    }

    fn url(&self) -> String {
        format!("{}/gists/{}", self.base_url.trim_end_matches('/'), self.gist_id)
    }

    async fn load(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let response = self
            .client
            .get(self.url())
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }

        let body = response.text().await?;
        entries_from_document(&body)
    }

    async fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
        let payload = patch_payload(entries)?;

        let response = self
            .client
            .patch(self.url())
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }
        Ok(())
    }

    async fn submit(&self, candidate: LeaderboardEntry) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        let improved = merge(&mut entries, candidate);
        self.save(&entries).await?;
        Ok(improved)
    }
}

#[async_trait]
impl Leaderboard for GistLeaderboard {
    async fn add_entry(&self, player: &Player, score: u32, total: u32) -> SubmitOutcome {
        if total == 0 {
            return SubmitOutcome::Failed;
        }
        match self.submit(LeaderboardEntry::new(player, score, total)).await {
            Ok(true) => SubmitOutcome::Improved,
            Ok(false) => SubmitOutcome::NotImproved,
            Err(err) => {
                error!("Error saving result of user {} to gist: {}", player.id, err);
                SubmitOutcome::Failed
            }
        }
    }

    async fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        match self.load().await {
            Ok(entries) => top_of(&entries, limit),
            Err(err) => {
                error!("Error loading leaderboard from gist: {}", err);
                Vec::new()
            }
        }
    }

    async fn user_position(&self, user_id: u64) -> Option<Position> {
        match self.load().await {
            Ok(entries) => position_in(&entries, user_id),
            Err(err) => {
                error!("Error loading leaderboard from gist: {}", err);
                None
            }
        }
    }
}

/// Entries stored in the gist's leaderboard file. No file or empty content means no entries.
fn entries_from_document(body: &str) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let document: GistDocument = serde_json::from_str(body)?;
    match document.files.get(FILENAME).and_then(|f| f.content.as_deref()) {
        Some(content) if !content.trim().is_empty() => Ok(serde_json::from_str(content)?),
        _ => {
            debug!("Gist has no {} yet, starting from an empty board", FILENAME);
            Ok(Vec::new())
        }
    }
}

/// Body of the PATCH request replacing the leaderboard file wholesale.
fn patch_payload(entries: &[LeaderboardEntry]) -> Result<serde_json::Value, StoreError> {
    let content = serde_json::to_string_pretty(entries)?;
    Ok(json!({
        "files": {
            FILENAME: { "content": content }
        }
    }))
}
