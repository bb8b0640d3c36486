use std::env;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::category::{category_label, resolve_modes};
use crate::classify::{Accumulator, excluded_for_category};
use crate::hero::HeroDb;
use crate::http_client::http_client;
use crate::record_fetch::{BattleRecord, DEFAULT_API_BASE, FetchError, fetch_mode_records};
use crate::summary::{BattleSummary, GameRow, game_rows, sort_recent_first, summarize};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("HOK_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .context("HOK_API_KEY missing")?;
        let base = env::var("HOK_API_BASE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self { api_key, base })
    }
}

/// Outcome of one merged query: deduplicated records sorted most recent
/// first, plus one warning string per sub-mode that contributed nothing.
#[derive(Debug)]
pub struct BattleQuery {
    pub category: String,
    pub modes_count: usize,
    pub records: Vec<BattleRecord>,
    pub errors: Vec<String>,
}

/// Resolve the category to its sub-modes and fetch them all concurrently.
/// A failing sub-mode is reported in `errors` and contributes zero records;
/// the call itself never fails.
pub fn query_battles(cfg: &ApiConfig, player_id: &str, category: &str) -> BattleQuery {
    let modes = resolve_modes(category);

    let client = match http_client() {
        Ok(client) => client,
        Err(err) => {
            return BattleQuery {
                category: category.to_string(),
                modes_count: modes.len(),
                records: Vec::new(),
                errors: vec![format!("battle client build failed: {err}")],
            };
        }
    };

    let (records, errors) = run_fanout(modes, category, |mode| {
        fetch_mode_records(client, &cfg.base, &cfg.api_key, player_id, mode)
    });

    BattleQuery {
        category: category.to_string(),
        modes_count: modes.len(),
        records,
        errors,
    }
}

/// One task per sub-mode, all merged into a single accumulator. Fetch,
/// decode, and classification run outside the critical section; only the
/// identity check + append is serialized.
fn run_fanout<F>(
    modes: &[&str],
    category: &str,
    fetch: F,
) -> (Vec<BattleRecord>, Vec<String>)
where
    F: Fn(&str) -> Result<Vec<BattleRecord>, FetchError> + Sync,
{
    let accumulator = Mutex::new(Accumulator::new());

    let outcomes: Vec<Option<String>> = with_fetch_pool(modes.len(), || {
        use rayon::prelude::*;

        modes
            .par_iter()
            .map(|&mode| match fetch(mode) {
                Ok(mut records) => {
                    records.retain(|record| !excluded_for_category(record, category));
                    let mut acc = accumulator.lock().expect("accumulator lock poisoned");
                    for record in records {
                        acc.admit(record, category);
                    }
                    None
                }
                Err(err) => Some(format!("mode {mode} fetch failed: {err}")),
            })
            .collect()
    });

    let mut records = accumulator
        .into_inner()
        .expect("accumulator lock poisoned")
        .into_records();
    sort_recent_first(&mut records);

    let errors = outcomes.into_iter().flatten().collect();
    (records, errors)
}

fn with_fetch_pool<T>(modes: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    let threads = fetch_parallelism(modes);
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

fn fetch_parallelism(modes: usize) -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(modes)
        .clamp(1, 32)
}

/// The envelope handed back to the caller.
#[derive(Debug, Serialize)]
pub struct BattleReport {
    pub success: bool,
    pub category: String,
    pub total: usize,
    pub summary: BattleSummary,
    #[serde(rename = "recentGames")]
    pub recent_games: Vec<GameRow>,
    #[serde(rename = "modesCount")]
    pub modes_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An empty merged set is a success state, reported with a localized notice
/// rather than an error.
pub fn build_report(query: &BattleQuery, heroes: &HeroDb) -> BattleReport {
    let message = if query.records.is_empty() {
        Some(format!(
            "该玩家在{}模式下暂无战绩记录",
            category_label(&query.category)
        ))
    } else {
        None
    };

    BattleReport {
        success: true,
        category: query.category.clone(),
        total: query.records.len(),
        summary: summarize(&query.records),
        recent_games: game_rows(&query.records, heroes),
        modes_count: query.modes_count,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_seq: &str, time: &str) -> BattleRecord {
        BattleRecord {
            game_seq: game_seq.to_string(),
            dt_event_time: time.to_string(),
            ..BattleRecord::default()
        }
    }

    #[test]
    fn fanout_merges_disjoint_modes_without_loss() {
        let modes = ["2", "3", "5", "6", "7", "17"];
        // Repeated runs to shake out interleaving-dependent bugs.
        for _ in 0..25 {
            let (records, errors) = run_fanout(&modes, "1", |mode| {
                Ok((0..4)
                    .map(|i| record(&format!("{mode}-{i}"), &format!("2024-01-01 10:00:0{i}")))
                    .collect())
            });
            assert_eq!(records.len(), modes.len() * 4);
            assert!(errors.is_empty());
        }
    }

    #[test]
    fn overlapping_modes_deduplicate() {
        let modes = ["2", "3"];
        let (records, errors) = run_fanout(&modes, "1", |_| {
            Ok(vec![
                record("shared", "2024-01-01 10:00:00"),
                record("", "2024-01-01 09:00:00"),
            ])
        });
        // "shared" once; the composite-keyed record collapses too since both
        // modes return an identical copy.
        assert_eq!(records.len(), 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn failed_mode_contributes_nothing_but_does_not_abort() {
        let modes = ["1", "16"];
        let (records, errors) = run_fanout(&modes, "2", |mode| {
            if mode == "1" {
                Err(FetchError::Upstream {
                    code: 500,
                    msg: "boom".to_string(),
                })
            } else {
                Ok(vec![
                    record("a", "2024-01-01 10:00:00"),
                    record("b", "2024-01-01 11:00:00"),
                    record("c", "2024-01-01 12:00:00"),
                ])
            }
        });
        assert_eq!(records.len(), 3);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("mode 1"), "{}", errors[0]);
        assert!(errors[0].contains("boom"), "{}", errors[0]);
    }

    #[test]
    fn matches_category_filters_leaked_ranked_games() {
        let modes = ["2"];
        let (records, _) = run_fanout(&modes, "4", |_| {
            let mut ranked = record("r", "2024-01-01 10:00:00");
            ranked.battle_type = 12;
            let mut top = record("t", "2024-01-01 11:00:00");
            top.map_name = "巅峰赛".to_string();
            let plain = record("p", "2024-01-01 12:00:00");
            Ok(vec![ranked, top, plain])
        });
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].game_seq, "p");
    }

    #[test]
    fn merged_records_come_back_recent_first() {
        let modes = ["8", "9", "10"];
        let (records, _) = run_fanout(&modes, "5", |mode| {
            let day: u32 = mode.parse().unwrap();
            Ok(vec![record(
                &format!("seq-{mode}"),
                &format!("2024-01-{day:02} 10:00:00"),
            )])
        });
        let times: Vec<&str> = records.iter().map(|r| r.dt_event_time.as_str()).collect();
        assert_eq!(
            times,
            [
                "2024-01-10 10:00:00",
                "2024-01-09 10:00:00",
                "2024-01-08 10:00:00",
            ]
        );
    }

    #[test]
    fn empty_result_reports_success_with_notice() {
        let query = BattleQuery {
            category: "3".to_string(),
            modes_count: 1,
            records: Vec::new(),
            errors: Vec::new(),
        };
        let report = build_report(&query, &HeroDb::fallback());
        assert!(report.success);
        assert_eq!(report.total, 0);
        assert_eq!(report.summary.total_games, 0);
        assert!(report.recent_games.is_empty());
        assert_eq!(report.modes_count, 1);
        assert_eq!(
            report.message.as_deref(),
            Some("该玩家在巅峰赛模式下暂无战绩记录")
        );
    }

    #[test]
    fn non_empty_result_omits_notice() {
        let query = BattleQuery {
            category: "1".to_string(),
            modes_count: 1,
            records: vec![record("a", "2024-01-01 10:00:00")],
            errors: Vec::new(),
        };
        let report = build_report(&query, &HeroDb::fallback());
        assert!(report.success);
        assert_eq!(report.total, 1);
        assert!(report.message.is_none());
        assert_eq!(report.recent_games.len(), 1);
    }
}
