//! Category codes exposed to the caller and the upstream sub-modes each one
//! expands to. The table is fixed; sub-mode universes overlap upstream, which
//! is what makes the dedup/exclusion pass in `classify` necessary.

/// (category code, upstream `option` values, display label).
///
/// Category "4" deliberately spans the non-ranked sub-modes even though
/// options 2 and 7 are observed to also return ranked games upstream; those
/// leak through here and are filtered out in `classify`.
const CATEGORY_TABLE: &[(&str, &[&str], &str)] = &[
    ("1", &["0"], "全部比赛"),
    ("2", &["1", "16"], "排位赛"),
    ("3", &["4"], "巅峰赛"),
    ("4", &["2", "3", "5", "6", "7", "17"], "匹配模式"),
    ("5", &["8", "9", "10"], "房间模式"),
];

/// Sub-modes to query for a category code. Unknown codes resolve to the
/// "all matches" set rather than an error.
pub fn resolve_modes(category: &str) -> &'static [&'static str] {
    CATEGORY_TABLE
        .iter()
        .find(|(code, ..)| *code == category)
        .map(|(_, modes, _)| *modes)
        .unwrap_or(CATEGORY_TABLE[0].1)
}

/// Display label for a category code, with the same "all matches" fallback
/// as `resolve_modes`.
pub fn category_label(category: &str) -> &'static str {
    CATEGORY_TABLE
        .iter()
        .find(|(code, ..)| *code == category)
        .map(|(.., label)| *label)
        .unwrap_or(CATEGORY_TABLE[0].2)
}

/// All `(code, label)` pairs, in presentation order.
pub fn category_options() -> Vec<(&'static str, &'static str)> {
    CATEGORY_TABLE
        .iter()
        .map(|(code, _, label)| (*code, *label))
        .collect()
}
