//! The saved-players list the CLI keeps between runs. The query pipeline
//! never touches this; it exists so frequently looked-up ids do not have to
//! be retyped.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const STORE_FILE: &str = "saved_players.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub id: String,
    pub nickname: String,
    pub save_time: i64,
    pub last_used: i64,
}

/// Load from the first readable candidate path. Missing or unparsable files
/// mean an empty list, never an error.
pub fn load_players() -> Vec<SavedPlayer> {
    for path in store_candidates() {
        let Ok(raw) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(players) = serde_json::from_str::<Vec<SavedPlayer>>(&raw) else {
            return Vec::new();
        };
        return players;
    }
    Vec::new()
}

/// Insert or refresh one player, bumping `last_used` so recently queried ids
/// float to the top.
pub fn save_player(player_id: &str, nickname: &str) -> Result<()> {
    let mut players = load_players();
    let now = Utc::now().timestamp();

    match players.iter_mut().find(|p| p.id == player_id) {
        Some(existing) => {
            existing.nickname = nickname.to_string();
            existing.last_used = now;
        }
        None => players.push(SavedPlayer {
            id: player_id.to_string(),
            nickname: nickname.to_string(),
            save_time: now,
            last_used: now,
        }),
    }

    store_players(&store_path(), &mut players)
}

pub fn remove_player(player_id: &str) -> Result<()> {
    let mut players = load_players();
    players.retain(|p| p.id != player_id);
    store_players(&store_path(), &mut players)
}

/// Persist sorted by `last_used` descending, atomically.
pub fn store_players(path: &Path, players: &mut Vec<SavedPlayer>) -> Result<()> {
    players.sort_by(|a, b| b.last_used.cmp(&a.last_used));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = fs::create_dir_all(parent);
        }
    }
    let json = serde_json::to_string_pretty(players).context("serialize saved players")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write saved players")?;
    fs::rename(&tmp, path).context("swap saved players")?;
    Ok(())
}

fn store_path() -> PathBuf {
    if let Ok(path) = env::var("HOK_SAVED_PLAYERS") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(STORE_FILE)
}

fn store_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(path) = env::var("HOK_SAVED_PLAYERS") {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }
    candidates.push(PathBuf::from(STORE_FILE));
    candidates.push(PathBuf::from("data").join(STORE_FILE));
    candidates
}
