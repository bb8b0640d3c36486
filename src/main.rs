use anyhow::{Result, anyhow};

use hok_tracker::category::category_options;
use hok_tracker::hero::HeroDb;
use hok_tracker::query::{ApiConfig, build_report, query_battles};
use hok_tracker::saved_players;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match args.first().map(String::as_str) {
        Some("query") => {
            let player_id = args
                .get(1)
                .ok_or_else(|| anyhow!("usage: hok_tracker query <player_id> [category]"))?;
            let category = args.get(2).map(String::as_str).unwrap_or("1");
            run_query(player_id, category)
        }
        Some("heroes") => {
            let hero_id = args
                .get(1)
                .and_then(|v| v.parse::<u32>().ok())
                .ok_or_else(|| anyhow!("usage: hok_tracker heroes <hero_id>"))?;
            let profile = HeroDb::load().profile(hero_id);
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(())
        }
        Some("categories") => {
            for (code, label) in category_options() {
                println!("{code}  {label}");
            }
            Ok(())
        }
        Some("save") => {
            let (Some(id), Some(nickname)) = (args.get(1), args.get(2)) else {
                return Err(anyhow!("usage: hok_tracker save <player_id> <nickname>"));
            };
            saved_players::save_player(id, nickname)?;
            println!("saved {id} ({nickname})");
            Ok(())
        }
        Some("players") => {
            let players = saved_players::load_players();
            if players.is_empty() {
                println!("no saved players");
                return Ok(());
            }
            for p in players {
                println!("{}  {}", p.id, p.nickname);
            }
            Ok(())
        }
        Some("remove") => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow!("usage: hok_tracker remove <player_id>"))?;
            saved_players::remove_player(id)?;
            println!("removed {id}");
            Ok(())
        }
        _ => {
            eprintln!("usage: hok_tracker <query|heroes|categories|save|players|remove> ...");
            Ok(())
        }
    }
}

fn run_query(player_id: &str, category: &str) -> Result<()> {
    let cfg = ApiConfig::from_env()?;
    let heroes = HeroDb::load();

    let query = query_battles(&cfg, player_id, category);
    for err in &query.errors {
        eprintln!("[WARN] {err}");
    }

    let report = build_report(&query, &heroes);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
