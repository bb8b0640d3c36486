use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One entry of the bundled `heroList.json` table.
#[derive(Debug, Clone, Deserialize)]
pub struct HeroInfo {
    pub ename: u32,
    pub cname: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub hero_type: i32,
}

/// Resolved profile for a single hero id, display-ready.
#[derive(Debug, Clone, Serialize)]
pub struct HeroProfile {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub type_text: String,
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

// Kept in sync with the ids that show up most in practice, for when the
// bundled table is missing or unreadable.
const FALLBACK_HEROES: &[(u32, &str)] = &[
    (505, "瑶"),
    (155, "马可波罗"),
    (196, "诸葛亮"),
    (119, "干将莫邪"),
    (184, "蔡文姬"),
    (503, "海月"),
    (117, "钟无艳"),
    (585, "元流之子(辅助)"),
    (188, "大禹"),
];

/// Hero id → name/title/role lookup. Built once per process, passed by
/// reference into the aggregator; tests construct one from an in-memory list.
#[derive(Debug, Clone, Default)]
pub struct HeroDb {
    heroes: HashMap<u32, HeroInfo>,
}

impl HeroDb {
    /// Load the bundled table, falling back to the literal map when the file
    /// is missing or unparsable.
    pub fn load() -> Self {
        for path in hero_list_candidates() {
            let Ok(raw) = fs::read_to_string(&path) else {
                continue;
            };
            let Ok(heroes) = serde_json::from_str::<Vec<HeroInfo>>(&raw) else {
                continue;
            };
            return Self::from_heroes(heroes);
        }
        Self::fallback()
    }

    pub fn from_heroes(heroes: Vec<HeroInfo>) -> Self {
        Self {
            heroes: heroes.into_iter().map(|h| (h.ename, h)).collect(),
        }
    }

    pub fn fallback() -> Self {
        Self::from_heroes(
            FALLBACK_HEROES
                .iter()
                .map(|(id, name)| HeroInfo {
                    ename: *id,
                    cname: (*name).to_string(),
                    title: String::new(),
                    hero_type: 0,
                })
                .collect(),
        )
    }

    pub fn name(&self, hero_id: u32) -> String {
        match self.heroes.get(&hero_id) {
            Some(hero) => hero.cname.clone(),
            None => fallback_name(hero_id),
        }
    }

    pub fn profile(&self, hero_id: u32) -> HeroProfile {
        let Some(hero) = self.heroes.get(&hero_id) else {
            return HeroProfile {
                id: hero_id,
                name: fallback_name(hero_id),
                title: None,
                type_text: "unknown".to_string(),
                full_name: None,
            };
        };
        if hero.title.is_empty() && hero.hero_type == 0 {
            // Fallback entries carry a name only.
            return HeroProfile {
                id: hero_id,
                name: hero.cname.clone(),
                title: None,
                type_text: "unknown".to_string(),
                full_name: None,
            };
        }
        HeroProfile {
            id: hero_id,
            name: hero.cname.clone(),
            title: Some(hero.title.clone()),
            type_text: hero_type_text(hero.hero_type).to_string(),
            full_name: Some(format!("{} - {}", hero.cname, hero.title)),
        }
    }
}

fn fallback_name(hero_id: u32) -> String {
    for (id, name) in FALLBACK_HEROES {
        if *id == hero_id {
            return (*name).to_string();
        }
    }
    format!("未知英雄({hero_id})")
}

fn hero_type_text(hero_type: i32) -> &'static str {
    match hero_type {
        1 => "坦克",
        2 => "战士",
        3 => "刺客",
        4 => "法师",
        5 => "射手",
        6 => "辅助",
        _ => "未知类型",
    }
}

fn hero_list_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(path) = env::var("HOK_HERO_LIST") {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }
    candidates.push(PathBuf::from("heroList.json"));
    candidates.push(PathBuf::from("data/heroList.json"));
    candidates
}
