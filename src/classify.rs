//! Dedup and classification of merged battle records.
//!
//! Sub-mode result sets overlap, so every record passes an identity check
//! before it is kept. On top of that, the sub-modes behind the 匹配 category
//! are known to leak ranked and top-tier games upstream; those are excluded
//! here, for that category only.

use std::collections::HashSet;

use crate::record_fetch::BattleRecord;

const RANKED_LABEL: &str = "排位";
const RANKED_LABEL_FULL: &str = "排位赛";
const TOP_TIER_LABEL: &str = "巅峰";
const TOP_TIER_LABEL_FULL: &str = "巅峰赛";

// Duo, trio, five-stack, solo ranked queues.
const RANKED_BATTLE_TYPES: &[i32] = &[12, 13, 15, 16];

/// The category whose sub-modes leak ranked/top-tier games.
pub const MATCHES_CATEGORY: &str = "4";

/// Identity of a record across overlapping sub-mode queries. `game_seq` is
/// authoritative when the upstream provides it; otherwise time + hero is the
/// best available composite. Two distinct games by the same hero in the same
/// second would collide under the fallback, a known upstream limitation.
pub fn identity_key(record: &BattleRecord) -> String {
    if record.game_seq.is_empty() {
        format!("{}-{}", record.dt_event_time, record.hero_id)
    } else {
        record.game_seq.clone()
    }
}

/// Map-name and battle-type signals are sometimes redundant and sometimes
/// contradictory upstream; the OR of both is the observed-correct policy.
pub fn is_ranked(record: &BattleRecord) -> bool {
    record.map_name == RANKED_LABEL_FULL
        || record.map_name.contains(RANKED_LABEL)
        || RANKED_BATTLE_TYPES.contains(&record.battle_type)
}

pub fn is_top_tier(record: &BattleRecord) -> bool {
    record.map_name == TOP_TIER_LABEL_FULL || record.map_name.contains(TOP_TIER_LABEL)
}

/// Whether a record must be dropped for the given category. Only the 匹配
/// category filters; everything else takes any deduplicated record.
pub fn excluded_for_category(record: &BattleRecord, category: &str) -> bool {
    category == MATCHES_CATEGORY && (is_ranked(record) || is_top_tier(record))
}

/// Merge target for one query call. Owned by the coordinator, mutated only
/// inside its critical section, discarded when the call returns.
#[derive(Debug, Default)]
pub struct Accumulator {
    seen: HashSet<String>,
    records: Vec<BattleRecord>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one incoming record: reject duplicates for every category,
    /// reject ranked/top-tier leakage for the 匹配 category.
    pub fn admit(&mut self, record: BattleRecord, category: &str) -> bool {
        if !self.seen.insert(identity_key(&record)) {
            return false;
        }
        if excluded_for_category(&record, category) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<BattleRecord> {
        self.records
    }
}
