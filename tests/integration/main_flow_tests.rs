#[path = "../common/mod.rs"]
mod common;

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command
};

use chrono::Duration;
use serial_test::serial;
use stock_rating_processor::{
    database::{config::StorageConfig, json_store::JsonStore, store::Persistence},
    model::{
        processor::{MatchSubmission, RatingProcessor},
        structures::character::Character
    },
    utils::test_utils::{generate_match_log, log_start}
};

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("stock_rating_flow_{}", uuid::Uuid::new_v4()))
}

fn open(dir: &Path) -> RatingProcessor<JsonStore> {
    RatingProcessor::new(JsonStore::open(StorageConfig::from_env(Some(dir.to_path_buf()))).unwrap())
}

/// Submitting a log match by match and rebuilding it from scratch must leave
/// byte-identical files behind.
#[test]
fn test_live_submissions_agree_with_rebuild() {
    common::init_test_env();
    let dir = temp_dir();
    let processor = open(&dir);

    for (i, record) in generate_match_log(200, 7).iter().enumerate() {
        let facts = &record.facts;
        let submission = MatchSubmission {
            player1: facts.player1.clone(),
            character1: facts.character1.to_string(),
            player2: facts.player2.clone(),
            character2: facts.character2.to_string(),
            winner: facts.winner.as_str().to_string(),
            three_stock: facts.three_stock
        };
        processor
            .submit_match(&submission, log_start() + Duration::minutes(i as i64))
            .unwrap();
    }

    let live_players = fs::read_to_string(dir.join("characters.json")).unwrap();
    let live_log = fs::read_to_string(dir.join("match_log.json")).unwrap();

    let summary = processor.rebuild("20240102_000000").unwrap();
    assert_eq!(summary.matches, 200);

    assert_eq!(fs::read_to_string(dir.join("characters.json")).unwrap(), live_players);
    assert_eq!(fs::read_to_string(dir.join("match_log.json")).unwrap(), live_log);
    assert_eq!(
        fs::read_to_string(dir.join("characters_backup_20240102_000000.json")).unwrap(),
        live_players
    );

    fs::remove_dir_all(&dir).ok();
}

/// Logs written before timestamps and projections were recorded still replay.
#[test]
fn test_rebuild_legacy_log() {
    common::init_test_env();
    let dir = temp_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("match_log.json"),
        r#"[
  {"p1": "alice", "c1": "Fox", "p2": "bob", "c2": "Marth", "winner": "p1"},
  {"p1": "bob", "c1": "Marth", "p2": "alice", "c2": "Fox", "winner": "p1"}
]"#
    )
    .unwrap();

    let processor = open(&dir);
    processor.rebuild("legacy").unwrap();

    let log = processor.persistence().load_match_log().unwrap();
    assert_eq!(log[0].projection.new1, 1030);
    assert_eq!(log[0].projection.diff1, 30);
    assert!(log[0].facts.timestamp.is_none());
    assert!(log[1].projection.diff1 > 30);

    let store = processor.snapshot().unwrap();
    assert_eq!(store.character_rating("bob", Character::Marth), log[1].projection.new1);
    // Undated matches say nothing about when anyone last played
    assert!(store.get("alice").unwrap().last_active.is_none());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_decay_is_persisted_by_reads() {
    common::init_test_env();
    let dir = temp_dir();
    let processor = open(&dir);

    let submission = MatchSubmission {
        player1: "alice".to_string(),
        character1: "Fox".to_string(),
        player2: "bob".to_string(),
        character2: "Marth".to_string(),
        winner: "p1".to_string(),
        three_stock: true
    };
    let record = processor.submit_match(&submission, log_start()).unwrap();
    assert_eq!(record.projection.new1, 1060);

    let later = log_start().date() + Duration::days(30);
    let stats = processor.player_stats("alice", later).unwrap();
    assert_eq!(stats.ratings, vec![(Character::Fox, 1028)]);

    // A fresh processor over the same directory sees the decayed value
    let reopened = open(&dir);
    assert_eq!(reopened.leaderboard(later).unwrap()[0].ratings[&Character::Fox], 1028);

    fs::remove_dir_all(&dir).ok();
}

/// Processors that share a data directory but nothing else must still see
/// each other's submissions; the directory lock is all that orders them.
#[test]
fn test_separate_processors_share_directory() {
    common::init_test_env();
    let dir = temp_dir();
    let threads = 8;
    let per_thread = 20;

    let handles = (0..threads)
        .map(|t| {
            let dir = dir.clone();
            std::thread::spawn(move || {
                let processor = open(&dir);
                for i in 0..per_thread {
                    let submission = MatchSubmission {
                        player1: "alice".to_string(),
                        character1: "Fox".to_string(),
                        player2: "bob".to_string(),
                        character2: "Marth".to_string(),
                        winner: if (t + i) % 2 == 0 { "p1" } else { "p2" }.to_string(),
                        three_stock: false
                    };
                    processor.submit_match(&submission, log_start()).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let processor = open(&dir);
    let log = processor.persistence().load_match_log().unwrap();
    assert_eq!(log.len(), threads * per_thread);

    // Each entry was rated against the state the previous one left behind
    for pair in log.windows(2) {
        let (prev, next) = (&pair[0].projection, &pair[1].projection);
        assert_eq!(next.new1 - next.diff1, prev.new1);
        assert_eq!(next.new2 - next.diff2, prev.new2);
    }

    let live = processor.snapshot().unwrap();
    processor.rebuild("20240102_000000").unwrap();
    assert_eq!(processor.snapshot().unwrap(), live);

    fs::remove_dir_all(&dir).ok();
}

fn run_binary(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_stock-rating-processor"))
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .env("RUST_LOG", "error")
        .env_remove("SYNC_ENABLED")
        .output()
        .expect("Failed to execute processor")
}

#[test]
#[serial]
fn test_cli_submit_and_leaderboard() {
    let dir = temp_dir();

    let output = run_binary(
        &dir,
        &["submit", "--p1", "alice", "--c1", "Fox", "--p2", "bob", "--c2", "R.O.B", "--winner", "p1"]
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("1030 (+30)"));

    let output = run_binary(&dir, &["leaderboard"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.lines().next().unwrap().contains("alice"));

    let output = run_binary(&dir, &["head-to-head", "bob", "alice"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("0-1"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
#[serial]
fn test_cli_rejects_unknown_character() {
    let dir = temp_dir();

    let output = run_binary(
        &dir,
        &["submit", "--p1", "alice", "--c1", "Goku", "--p2", "bob", "--c2", "Fox", "--winner", "p1"]
    );

    assert!(!output.status.success(), "Unknown characters must fail the command");
    assert!(!dir.join("match_log.json").exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
#[serial]
fn test_cli_reset_requires_confirmation() {
    let dir = temp_dir();
    run_binary(
        &dir,
        &["submit", "--p1", "alice", "--c1", "Fox", "--p2", "bob", "--c2", "Fox", "--winner", "p2"]
    );

    run_binary(&dir, &["reset"]);
    assert!(dir.join("characters.json").exists());

    let output = run_binary(&dir, &["reset", "--yes"]);
    assert!(output.status.success());
    assert!(!dir.join("characters.json").exists());
    assert!(!dir.join("match_log.json").exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
#[serial]
fn test_cli_concurrent_submissions() {
    let dir = temp_dir();
    fs::create_dir_all(&dir).unwrap();

    let children = (0..8)
        .map(|i| {
            let winner = if i % 2 == 0 { "p1" } else { "p2" };
            Command::new(env!("CARGO_BIN_EXE_stock-rating-processor"))
                .arg("--data-dir")
                .arg(&dir)
                .args(["submit", "--p1", "alice", "--c1", "Fox", "--p2", "bob", "--c2", "Marth", "--winner", winner])
                .env("RUST_LOG", "error")
                .env_remove("SYNC_ENABLED")
                .spawn()
                .expect("Failed to execute processor")
        })
        .collect::<Vec<_>>();
    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    let store = JsonStore::open(StorageConfig::from_env(Some(dir.clone()))).unwrap();
    assert_eq!(store.load_match_log().unwrap().len(), 8);

    fs::remove_dir_all(&dir).ok();
}
