use assert_cmd::Command;
use predicates::prelude::*;

fn brawl() -> Command {
    Command::cargo_bin("brawl").unwrap()
}

fn catalog_path(file: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("engine/content/catalogs")
        .join(file)
}

#[test]
fn duel_prints_narration_and_a_winner() {
    brawl()
        .args(["duel", "alice", "bob", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[START] Duel: alice vs bob, both at 100 HP"))
        .stdout(predicate::str::contains("[ROUND] 1 → alice"))
        .stdout(predicate::str::contains("[END] winner="));
}

#[test]
fn same_seed_prints_the_same_duel() {
    let first = brawl().args(["duel", "a", "b", "--seed", "3"]).output().unwrap();
    let second = brawl().args(["duel", "a", "b", "--seed", "3"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn house_duel_ends_in_one_swing() {
    brawl()
        .args(["duel", "bot", "alice", "--house", "bot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[TAUNT][bot]"))
        .stdout(predicate::str::contains("GOD SMITE → alice HIT 1000000"))
        .stdout(predicate::str::contains("[END] winner=bot rounds=1"));
}

#[test]
fn royale_reports_knockouts() {
    brawl()
        .args(["royale", "a", "b", "c", "--catalog-id", "gentle", "--hp", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[START] Royale (3 players): a, b, c, all at 30 HP"))
        .stdout(predicate::str::contains("(1 remaining)"));
}

#[test]
fn royale_needs_two_players() {
    brawl().args(["royale", "solo"]).assert().failure();
}

#[test]
fn json_report_has_winner_and_log() {
    brawl()
        .args(["duel", "a", "b", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"winner\""))
        .stdout(predicate::str::contains("\"log\""));
}

#[test]
fn yaml_catalog_file_is_loaded() {
    brawl()
        .args(["catalog", "--catalog"])
        .arg(catalog_path("gentle.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("pillow swing"));
}

#[test]
fn catalog_with_bom_is_accepted() {
    let text = std::fs::read(catalog_path("default.json")).unwrap();
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(&text);
    let path = std::env::temp_dir().join(format!("brawl-bom-{}.json", std::process::id()));
    std::fs::write(&path, bytes).unwrap();

    brawl()
        .args(["action", "--turns", "3", "--catalog"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1 {\"kind\":"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_catalog_file_fails_with_its_path() {
    brawl()
        .args(["catalog", "--catalog", "nope/missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn unknown_catalog_id_fails() {
    brawl().args(["catalog", "--catalog-id", "spicy"]).assert().failure();
}

#[test]
fn simulate_many_summarizes_trials() {
    Command::cargo_bin("simulate-many")
        .unwrap()
        .args(["--trials", "20", "--challenger", "alice", "--opponent", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trials:             20"))
        .stdout(predicate::str::contains("alice wins:"));
}

#[test]
fn simulate_many_json_counts_every_trial() {
    let out = Command::cargo_bin("simulate-many")
        .unwrap()
        .args(["--trials", "10", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let wins = v["stats"]["challenger_wins"].as_u64().unwrap()
        + v["stats"]["opponent_wins"].as_u64().unwrap();
    assert_eq!(wins, 10);
}
