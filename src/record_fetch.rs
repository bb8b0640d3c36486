use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.t1qq.com/api/tool/wzrr/morebattle";

const UPSTREAM_OK: i64 = 200;

/// Why a single sub-mode fetch produced no records. These never escape a
/// query call; the coordinator turns them into warning strings and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid battle json: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("upstream error: {msg}")]
    Upstream { code: i64, msg: String },
}

/// One played game as the upstream battle endpoint reports it. Every field
/// defaults so a sparse record still decodes; only a malformed body is an
/// error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BattleRecord {
    #[serde(rename = "dtEventTime", default)]
    pub dt_event_time: String,
    #[serde(rename = "gametime", default)]
    pub game_time: String,
    #[serde(rename = "killcnt", default)]
    pub kills: u32,
    #[serde(rename = "deadcnt", default)]
    pub deaths: u32,
    #[serde(rename = "assistcnt", default)]
    pub assists: u32,
    #[serde(rename = "gameresult", default)]
    pub game_result: i32,
    #[serde(rename = "heroId", default)]
    pub hero_id: u32,
    #[serde(rename = "mapName", default)]
    pub map_name: String,
    #[serde(rename = "gradeGame", default)]
    pub grade_game: String,
    #[serde(rename = "heroIcon", default)]
    pub hero_icon: String,
    #[serde(rename = "roleJobName", default)]
    pub role_job_name: String,
    #[serde(default)]
    pub stars: i32,
    #[serde(rename = "gameSeq", default)]
    pub game_seq: String,
    #[serde(rename = "battleType", default)]
    pub battle_type: i32,
}

impl BattleRecord {
    pub fn is_win(&self) -> bool {
        self.game_result == 1
    }
}

#[derive(Debug, Deserialize)]
struct BattleResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: BattleData,
}

#[derive(Debug, Default, Deserialize)]
struct BattleData {
    #[serde(default)]
    list: Vec<BattleRecord>,
}

/// Fetch one sub-mode's records. Pure per-mode I/O: no dedup, no filtering,
/// no retries.
pub fn fetch_mode_records(
    client: &Client,
    base: &str,
    api_key: &str,
    player_id: &str,
    mode: &str,
) -> Result<Vec<BattleRecord>, FetchError> {
    let resp = client
        .get(base)
        .query(&[("key", api_key), ("id", player_id), ("option", mode)])
        .send()
        .map_err(FetchError::Transport)?;
    let body = resp.text().map_err(FetchError::Transport)?;
    parse_battle_response(&body)
}

/// Decode the `{code, msg, data: {list}}` envelope. Split out from the
/// transport so fixture tests can exercise it directly.
pub fn parse_battle_response(body: &str) -> Result<Vec<BattleRecord>, FetchError> {
    let parsed: BattleResponse = serde_json::from_str(body).map_err(FetchError::Decode)?;
    if parsed.code != UPSTREAM_OK {
        return Err(FetchError::Upstream {
            code: parsed.code,
            msg: parsed.msg,
        });
    }
    Ok(parsed.data.list)
}
