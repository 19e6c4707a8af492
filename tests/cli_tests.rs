use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_tier-scorer")
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("tier-scorer-{name}-{stamp}.{ext}"))
}

fn config_for(db: &PathBuf) -> PathBuf {
    let path = unique_temp_path("config", "toml");
    fs::write(
        &path,
        format!(
            "[database]\nurl = \"sqlite://{}\"\n\n[job]\nconcurrency = 2\n\n[job.fetch_retry]\nmax_attempts = 1\n",
            db.display()
        ),
    )
    .expect("config should be written");
    path
}

#[test]
fn ladder_command_lists_31_ranks() {
    let output = Command::new(bin()).arg("ladder").output().expect("ladder should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("ladder should emit json");
    let entries = payload.as_array().expect("ladder should be an array");
    assert_eq!(entries.len(), 31);
    assert_eq!(entries[0]["rank"], "iron_iv");
    assert_eq!(entries[30]["rank"], "challenger");
    assert_eq!(entries[30]["base_value"], 4200);
}

#[test]
fn score_command_emits_breakdown() {
    let output = Command::new(bin())
        .args([
            "score", "--rank", "Gold III", "--wins", "50", "--losses", "50", "--main-games", "30",
            "--main-wins", "15", "--sub-games", "20", "--sub-wins", "8",
        ])
        .output()
        .expect("score should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("score should emit json");
    assert_eq!(payload["rank"], "gold_iii");
    assert_eq!(payload["base_value"], 1300);
    assert_eq!(payload["tier_score"], 1296);
}

#[test]
fn score_command_rejects_unknown_rank() {
    let output = Command::new(bin())
        .args(["score", "--rank", "wood_iv"])
        .output()
        .expect("score should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid rank"));
}

#[test]
fn seed_then_recompute_round_trip() {
    let db = unique_temp_path("roster", "db");
    let config = config_for(&db);
    let members = unique_temp_path("members", "json");
    fs::write(
        &members,
        r#"[
            {"id": "a", "name": "Lux", "rank": "gold_iii", "main_position": "mid", "sub_positions": ["support"],
             "total_wins": 50, "total_losses": 50, "main_games": 30, "main_wins": 15, "sub_games": 20, "sub_wins": 8},
            {"id": "b", "name": "Faker", "rank": "challenger", "tier_score": 4200}
        ]"#,
    )
    .expect("members should be written");

    let seed = Command::new(bin())
        .arg("--config")
        .arg(&config)
        .arg("seed")
        .arg("--file")
        .arg(&members)
        .output()
        .expect("seed should run");
    assert_eq!(seed.status.code(), Some(0), "{}", String::from_utf8_lossy(&seed.stderr));

    let run = |args: &[&str]| {
        Command::new(bin())
            .arg("--config")
            .arg(&config)
            .args(args)
            .output()
            .expect("recompute should run")
    };

    let dry = run(&["recompute", "--dry-run"]);
    assert_eq!(dry.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_slice(&dry.stdout).expect("dry run json");
    assert_eq!(payload["success"], true);
    assert_eq!(payload["summary"]["dryRun"], true);
    assert_eq!(payload["summary"]["updatedCount"], 0);

    let first = run(&["recompute"]);
    let payload: serde_json::Value = serde_json::from_slice(&first.stdout).expect("first run json");
    assert_eq!(payload["success"], true);
    assert_eq!(payload["summary"]["totalMembers"], 2);
    assert_eq!(payload["summary"]["updatedCount"], 1);
    assert_eq!(payload["summary"]["unchangedCount"], 1);
    assert_eq!(payload["summary"]["results"][0]["newScore"], 1296);

    let second = run(&["recompute"]);
    let payload: serde_json::Value = serde_json::from_slice(&second.stdout).expect("second run json");
    assert_eq!(payload["summary"]["updatedCount"], 0);
    assert_eq!(payload["summary"]["unchangedCount"], 2);

    for path in [&db, &config, &members] {
        fs::remove_file(path).ok();
    }
}

#[test]
fn recompute_reports_failure_envelope() {
    // Missing table: the fetch fails before anything is written.
    let db = unique_temp_path("empty", "db");
    let config = config_for(&db);

    let output = Command::new(bin())
        .arg("--config")
        .arg(&config)
        .arg("recompute")
        .output()
        .expect("recompute should run");

    assert_eq!(output.status.code(), Some(1));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("failure should still emit json");
    assert_eq!(payload["success"], false);
    assert!(payload["error"].as_str().unwrap().contains("no such table"));

    fs::remove_file(&db).ok();
    fs::remove_file(&config).ok();
}
