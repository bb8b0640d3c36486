use serde::Serialize;

use crate::hero::HeroDb;
use crate::record_fetch::BattleRecord;

const WIN_LABEL: &str = "胜利";
const LOSS_LABEL: &str = "失败";

#[derive(Debug, Clone, Serialize)]
pub struct BattleSummary {
    #[serde(rename = "totalGames")]
    pub total_games: usize,
    #[serde(rename = "winRate")]
    pub win_rate: String,
    #[serde(rename = "avgKDA")]
    pub avg_kda: String,
    #[serde(rename = "totalWins")]
    pub total_wins: usize,
    #[serde(rename = "totalLoss")]
    pub total_loss: usize,
}

/// One row of the per-game table handed back to the caller, already in
/// display form.
#[derive(Debug, Clone, Serialize)]
pub struct GameRow {
    pub index: usize,
    pub time: String,
    #[serde(rename = "heroId")]
    pub hero_id: u32,
    #[serde(rename = "heroName")]
    pub hero_name: String,
    #[serde(rename = "heroIcon")]
    pub hero_icon: String,
    pub kda: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub score: String,
    pub result: String,
    #[serde(rename = "resultClass")]
    pub result_class: String,
    pub mode: String,
}

/// Most recent first. `dt_event_time` sorts lexicographically at full
/// precision; the sort is stable so equal timestamps keep their insertion
/// order and repeated runs stay deterministic.
pub fn sort_recent_first(records: &mut [BattleRecord]) {
    records.sort_by(|a, b| b.dt_event_time.cmp(&a.dt_event_time));
}

pub fn summarize(records: &[BattleRecord]) -> BattleSummary {
    if records.is_empty() {
        return BattleSummary {
            total_games: 0,
            win_rate: "0%".to_string(),
            avg_kda: "0/0/0".to_string(),
            total_wins: 0,
            total_loss: 0,
        };
    }

    let total = records.len();
    let wins = records.iter().filter(|r| r.is_win()).count();
    let kills: u64 = records.iter().map(|r| r.kills as u64).sum();
    let deaths: u64 = records.iter().map(|r| r.deaths as u64).sum();
    let assists: u64 = records.iter().map(|r| r.assists as u64).sum();

    let win_rate = wins as f64 / total as f64 * 100.0;
    let avg_kills = kills as f64 / total as f64;
    let avg_deaths = deaths as f64 / total as f64;
    let avg_assists = assists as f64 / total as f64;

    BattleSummary {
        total_games: total,
        win_rate: format!("{win_rate:.1}%"),
        avg_kda: format!("{avg_kills:.1}/{avg_deaths:.1}/{avg_assists:.1}"),
        total_wins: wins,
        total_loss: total - wins,
    }
}

/// Display rows in the records' current (post-sort) order, hero names
/// resolved through the given lookup.
pub fn game_rows(records: &[BattleRecord], heroes: &HeroDb) -> Vec<GameRow> {
    records
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let (result, result_class) = if r.is_win() {
                (WIN_LABEL, "win")
            } else {
                (LOSS_LABEL, "lose")
            };
            GameRow {
                index: idx + 1,
                time: r.game_time.clone(),
                hero_id: r.hero_id,
                hero_name: heroes.name(r.hero_id),
                hero_icon: r.hero_icon.clone(),
                kda: format!("{}/{}/{}", r.kills, r.deaths, r.assists),
                kills: r.kills,
                deaths: r.deaths,
                assists: r.assists,
                score: r.grade_game.clone(),
                result: result.to_string(),
                result_class: result_class.to_string(),
                mode: r.map_name.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::HeroDb;

    fn record(time: &str, kills: u32, deaths: u32, assists: u32, win: bool) -> BattleRecord {
        BattleRecord {
            dt_event_time: time.to_string(),
            game_time: time.to_string(),
            kills,
            deaths,
            assists,
            game_result: if win { 1 } else { 2 },
            ..BattleRecord::default()
        }
    }

    #[test]
    fn summary_averages_and_win_rate() {
        let records = vec![
            record("2024-01-01 10:00:00", 3, 5, 10, false),
            record("2024-01-01 11:00:00", 1, 2, 4, true),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.total_wins, 1);
        assert_eq!(summary.total_loss, 1);
        assert_eq!(summary.win_rate, "50.0%");
        assert_eq!(summary.avg_kda, "2.0/3.5/7.0");
    }

    #[test]
    fn empty_summary_is_zeroed_not_an_error() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.win_rate, "0%");
        assert_eq!(summary.avg_kda, "0/0/0");
        assert_eq!(summary.total_wins, 0);
        assert_eq!(summary.total_loss, 0);
    }

    #[test]
    fn sort_is_recent_first_and_stable() {
        let mut a = record("2024-01-01 10:00:00", 0, 0, 0, true);
        a.game_seq = "a".to_string();
        let mut b = record("2024-01-02 10:00:00", 0, 0, 0, true);
        b.game_seq = "b".to_string();
        let mut c = record("2024-01-01 10:00:00", 0, 0, 0, true);
        c.game_seq = "c".to_string();

        let mut records = vec![a, b, c];
        sort_recent_first(&mut records);
        let order: Vec<&str> = records.iter().map(|r| r.game_seq.as_str()).collect();
        // b is newest; a and c tie and keep insertion order.
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn rows_carry_display_fields() {
        let mut rec = record("2024-01-01 10:00:00", 7, 2, 9, true);
        rec.hero_id = 505;
        rec.grade_game = "13.2".to_string();
        rec.map_name = "王者峡谷".to_string();
        rec.hero_icon = "https://example.com/505.png".to_string();

        let heroes = HeroDb::fallback();
        let rows = game_rows(&[rec], &heroes);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.index, 1);
        assert_eq!(row.hero_name, "瑶");
        assert_eq!(row.kda, "7/2/9");
        assert_eq!(row.score, "13.2");
        assert_eq!(row.result, "胜利");
        assert_eq!(row.result_class, "win");
        assert_eq!(row.mode, "王者峡谷");
    }

    #[test]
    fn loss_rows_use_lose_class() {
        let rec = record("2024-01-01 10:00:00", 0, 3, 1, false);
        let rows = game_rows(&[rec], &HeroDb::fallback());
        assert_eq!(rows[0].result, "失败");
        assert_eq!(rows[0].result_class, "lose");
    }
}
